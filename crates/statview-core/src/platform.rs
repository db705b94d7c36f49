//! Platform identifier to layout resolution.
//!
//! Identifiers follow the `os-arch` resource prefixes used by native loaders
//! (`darwin`, `linux-x86-64`, ...). Matching is exact. There is no fallback
//! layout: guessing would silently corrupt every field read after it.

use std::str::FromStr;

use tracing::debug;

use crate::error::{Result, StatError};
use crate::layout::Layout;

/// Known identifiers, in lookup order.
static PLATFORMS: &[(&str, Layout)] = &[
    ("darwin", Layout::Darwin),
    ("darwin-x86-64", Layout::Darwin),
    ("darwin-aarch64", Layout::Darwin),
    ("linux-x86-64", Layout::LinuxX86_64),
    ("linux-aarch64", Layout::LinuxAarch64),
];

/// Resolves a platform identifier to its native record layout.
pub fn resolve(platform: &str) -> Result<Layout> {
    match PLATFORMS.iter().find(|(id, _)| *id == platform) {
        Some(&(_, layout)) => {
            debug!(platform, layout = layout.name(), "resolved stat layout");
            Ok(layout)
        }
        None => {
            debug!(platform, "no stat layout for platform");
            Err(StatError::UnsupportedPlatform(platform.to_string()))
        }
    }
}

/// All identifiers [`resolve`] accepts.
pub fn supported_platforms() -> impl Iterator<Item = &'static str> {
    PLATFORMS.iter().map(|(id, _)| *id)
}

/// Identifier of the platform this crate was compiled for, if supported.
pub fn host_platform() -> Option<&'static str> {
    if cfg!(all(target_os = "macos", target_arch = "x86_64")) {
        Some("darwin-x86-64")
    } else if cfg!(all(target_os = "macos", target_arch = "aarch64")) {
        Some("darwin-aarch64")
    } else if cfg!(all(target_os = "linux", target_arch = "x86_64")) {
        Some("linux-x86-64")
    } else if cfg!(all(target_os = "linux", target_arch = "aarch64")) {
        Some("linux-aarch64")
    } else {
        None
    }
}

impl FromStr for Layout {
    type Err = StatError;

    fn from_str(s: &str) -> Result<Self> {
        resolve(s)
    }
}
