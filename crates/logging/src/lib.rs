#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` provides the verbosity-gated diagnostics channel used across the
//! `oc-mirror` workspace. Progress output is line-oriented and scales with a
//! numeric [`Verbosity`]: the engine describes everything it does as
//! [`Message`](core::message::Message) values tagged with a level, and the
//! [`MessageSink`] decides which of them reach the underlying writer.
//!
//! # Design
//!
//! - [`Verbosity`] is a small copyable value threaded through the invocation
//!   configuration. There is no global logger and no ambient mutable state;
//!   callers own their sink.
//! - [`MessageSink`] wraps any [`io::Write`](std::io::Write) implementor.
//!   Tests hand it a `Vec<u8>` and assert on exact lines; the binary hands it
//!   a locked stdout.
//! - [`levels`] documents the level scheme so call sites agree on which
//!   diagnostics appear at which volume.
//!
//! # Invariants
//!
//! - A message tagged with level `n` is written iff `n <= verbosity`.
//! - The sink never reorders or buffers messages beyond what the wrapped
//!   writer does; flushing is the caller's decision.
//!
//! # See also
//!
//! - `core::message` for message construction and rendering.
//! - `engine` for the reconciler that narrates its walk through this sink.

use std::io::{self, Write};

use core::message::Message;

pub mod levels;

mod verbosity;

pub use verbosity::Verbosity;

/// Verbosity-gated sink that renders [`Message`] values line-wise.
///
/// # Examples
///
/// ```
/// use core::message::Message;
/// use logging::{MessageSink, Verbosity, levels};
///
/// let mut sink = MessageSink::new(Vec::new(), Verbosity::default());
/// sink.emit(levels::MUTATION, &Message::info("creating file")).unwrap();
/// sink.emit(levels::CHECK, &Message::info("checking file")).unwrap();
///
/// let output = String::from_utf8(sink.into_inner()).unwrap();
/// // Default verbosity shows mutations but not per-entry checks.
/// assert_eq!(output, "oc-mirror info: creating file\n");
/// ```
#[derive(Clone, Debug)]
pub struct MessageSink<W> {
    writer: W,
    verbosity: Verbosity,
}

impl<W> MessageSink<W> {
    /// Creates a sink writing to `writer` at the given verbosity.
    #[must_use]
    pub const fn new(writer: W, verbosity: Verbosity) -> Self {
        Self { writer, verbosity }
    }

    /// Returns the configured verbosity.
    #[must_use]
    pub const fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Borrows the underlying writer.
    #[must_use]
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Consumes the sink and returns the wrapped writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> MessageSink<W>
where
    W: Write,
{
    /// Writes `message` iff `level` is within the configured verbosity.
    pub fn emit(&mut self, level: u8, message: &Message) -> io::Result<()> {
        if self.verbosity.shows(level) {
            message.render_line(&mut self.writer)?;
        }
        Ok(())
    }

    /// Flushes the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
