//! User-visible diagnostic messages.
//!
//! Every line `oc-mirror` prints is a [`Message`]: a severity, an optional
//! numeric code, and the message text. Rendering is centralised here so that
//! stdout and stderr output stays uniform (`oc-mirror <severity>: <text>`)
//! and tests can assert on exact lines.

use std::borrow::Cow;
use std::fmt;
use std::io::{self, Write};

/// Severity of a user-visible message.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Severity {
    /// Informational message.
    Info,
    /// Warning message.
    Warning,
    /// Error message.
    Error,
}

impl Severity {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A renderable diagnostic line.
///
/// Messages are cheap to construct; static text avoids allocation entirely
/// via [`Cow`].
///
/// # Examples
///
/// ```
/// use core::message::Message;
///
/// let message = Message::error("rotation failed").with_code(11);
/// assert_eq!(message.to_string(), "oc-mirror error: rotation failed (code 11)");
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Message {
    severity: Severity,
    code: Option<i32>,
    text: Cow<'static, str>,
}

impl Message {
    /// Program prefix used on every rendered line.
    pub const PREFIX: &'static str = "oc-mirror";

    /// Creates an informational message.
    #[must_use]
    pub fn info(text: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Severity::Info, text)
    }

    /// Creates a warning message.
    #[must_use]
    pub fn warning(text: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Severity::Warning, text)
    }

    /// Creates an error message.
    #[must_use]
    pub fn error(text: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Severity::Error, text)
    }

    fn new(severity: Severity, text: impl Into<Cow<'static, str>>) -> Self {
        Self {
            severity,
            code: None,
            text: text.into(),
        }
    }

    /// Attaches a numeric code rendered as a ` (code N)` trailer.
    #[must_use]
    pub const fn with_code(mut self, code: i32) -> Self {
        self.code = Some(code);
        self
    }

    /// Returns the message severity.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the numeric code, if any.
    #[must_use]
    pub const fn code(&self) -> Option<i32> {
        self.code
    }

    /// Returns the message text without prefix or trailer.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Renders the message followed by a newline into `writer`.
    pub fn render_line<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "{self}")
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {}",
            Self::PREFIX,
            self.severity.as_str(),
            self.text
        )?;
        if let Some(code) = self.code {
            write!(f, " (code {code})")?;
        }
        Ok(())
    }
}
