//! Version banner rendering.

/// Crate version compiled into the binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Renders the deterministic `--version` banner.
///
/// The banner is byte-identical across platforms so tests and packaging
/// scripts can assert on it.
#[must_use]
pub fn banner() -> String {
    format!(
        "oc-mirror {VERSION}\nhttps://github.com/oferchen/oc-mirror\n\
         License: GPL-3.0-or-later\n"
    )
}
