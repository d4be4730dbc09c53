#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `core` holds the pieces of the `oc-mirror` workspace that every other crate
//! agrees on: the [`Message`](message::Message) diagnostics type, the
//! [`ExitCode`](exit_code::ExitCode) taxonomy, and the version banner. The
//! crate is deliberately dependency-free so that leaf crates can emit
//! structured diagnostics without pulling in the engine or the CLI.
//!
//! # Design
//!
//! - [`message`] defines a severity-tagged, line-oriented message type. Higher
//!   layers render messages through `logging::MessageSink` rather than
//!   printing directly, keeping every diagnostic attributable and testable.
//! - [`exit_code`] maps each entry of the error taxonomy to a distinct process
//!   exit code. Errors across the workspace carry enough context to resolve
//!   themselves to one of these codes.
//! - [`paths`] holds the lexical path normalization shared by exclusion
//!   matching and capture-path mirroring.
//! - [`version`] renders the deterministic `--version` banner.
//!
//! # See also
//!
//! - `logging` for the verbosity-gated sink that consumes [`message::Message`]
//!   values.
//! - `cli` for the front-end that maps engine failures onto
//!   [`exit_code::ExitCode`] values.

pub mod exit_code;
pub mod message;
pub mod paths;
pub mod version;

pub use exit_code::{ExitCode, HasExitCode};
pub use message::{Message, Severity};
