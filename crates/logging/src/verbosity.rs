//! Numeric verbosity threshold.

/// Diagnostic volume selected for one invocation.
///
/// Verbosity has no semantic effect on reconciliation; it only controls how
/// much of the walk is narrated.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct Verbosity(u8);

impl Verbosity {
    /// Suppresses every diagnostic, including warnings.
    pub const SILENT: Self = Self(0);

    /// Default volume: run banner, warnings, and mutations.
    pub const DEFAULT: Self = Self(2);

    /// Highest meaningful volume: everything, including per-directory stats.
    pub const MAX: Self = Self(5);

    /// Creates a verbosity from a raw level, saturating at [`Self::MAX`].
    #[must_use]
    pub const fn new(level: u8) -> Self {
        if level > Self::MAX.0 {
            Self::MAX
        } else {
            Self(level)
        }
    }

    /// Returns the raw level.
    #[must_use]
    pub const fn level(self) -> u8 {
        self.0
    }

    /// Reports whether a message tagged with `level` should be written.
    #[must_use]
    pub const fn shows(self, level: u8) -> bool {
        level <= self.0
    }
}

impl Default for Verbosity {
    fn default() -> Self {
        Self::DEFAULT
    }
}
