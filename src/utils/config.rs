//! Application configuration constants.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    settings_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                settings_filename: format!(".{pkg}.toml"),
            }
        })
    }

    /// Settings file looked up in the working directory (e.g. `.clip64.toml`).
    pub fn settings_filename(&self) -> &str {
        &self.settings_filename
    }
}

// ---- Paths ----

/// Longest path (in bytes of the platform encoding) the collector accepts, exclusive.
#[cfg(unix)]
pub const PATH_LIMIT: usize = libc::PATH_MAX as usize;

#[cfg(not(unix))]
pub const PATH_LIMIT: usize = 260;

/// Characters stripped from both ends of each root argument.
pub const RESERVED_ROOT_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

// ---- Output ----

/// Suffix added by the directory sink and removed again in decode mode.
pub const ENCODED_SUFFIX: &str = ".b64";

/// [`ENCODED_SUFFIX`] without its dot, as `Path::extension` reports it.
pub const ENCODED_EXT: &str = "b64";
