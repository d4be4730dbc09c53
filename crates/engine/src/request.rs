//! Invocation configuration.

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use filters::ExclusionSet;
use generations::DEFAULT_GENERATIONS;

/// Diff-capture configuration: where generations live and how many survive.
#[derive(Clone, Debug)]
pub struct DiffOptions {
    root: PathBuf,
    max_generations: NonZeroU32,
}

impl DiffOptions {
    /// Creates diff options rooted at `root` with the default retention.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_generations: DEFAULT_GENERATIONS,
        }
    }

    /// Overrides the number of retained generations.
    #[must_use]
    pub const fn with_max_generations(mut self, max_generations: NonZeroU32) -> Self {
        self.max_generations = max_generations;
        self
    }

    /// Returns the diff root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the retained generation count.
    #[must_use]
    pub const fn max_generations(&self) -> NonZeroU32 {
        self.max_generations
    }
}

/// Everything one mirror run needs, established once at startup.
///
/// The request is read-only for the duration of the walk; nothing in the
/// engine consults ambient global state.
#[derive(Clone, Debug)]
pub struct SyncRequest {
    source: PathBuf,
    target: PathBuf,
    diff: Option<DiffOptions>,
    exclusions: ExclusionSet,
}

impl SyncRequest {
    /// Creates a request mirroring `source` into `target`.
    #[must_use]
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            diff: None,
            exclusions: ExclusionSet::default(),
        }
    }

    /// Enables pre-change capture with the given diff options.
    #[must_use]
    pub fn with_diff(mut self, diff: DiffOptions) -> Self {
        self.diff = Some(diff);
        self
    }

    /// Installs the exclusion set consulted before creations.
    #[must_use]
    pub fn with_exclusions(mut self, exclusions: ExclusionSet) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Returns the source root.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Returns the target root.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Returns the diff configuration, if capture is enabled.
    #[must_use]
    pub const fn diff(&self) -> Option<&DiffOptions> {
        self.diff.as_ref()
    }

    /// Returns the exclusion set.
    #[must_use]
    pub const fn exclusions(&self) -> &ExclusionSet {
        &self.exclusions
    }
}
