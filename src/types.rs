//! Public and internal types for the clip64 API and pipeline.

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// Extension filter, always stored with its leading dot (e.g. `.txt`). Compared case-sensitively.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Extension(String);

impl Extension {
    /// `txt` and `.txt` both become `.txt`.
    pub fn new(ext: &str) -> Self {
        if ext.starts_with('.') {
            Extension(ext.to_string())
        } else {
            Extension(format!(".{ext}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How per-file progress is shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStyle {
    /// `[ i/n] path` per file, then `Done.`.
    #[default]
    Lines,
    /// Single progress bar.
    Bar,
    /// Nothing.
    Quiet,
}

/// Where encoded text is written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputTarget {
    #[default]
    Stdout,
    /// One line per input file in a single file.
    File(PathBuf),
    /// One `<name>.b64` file per input file.
    Dir(PathBuf),
}

/// Full options (CLI and settings file). Library callers use [`EncodeOpts`].
#[derive(Clone, Debug, Default)]
pub struct Opts {
    /// Only collect files with this extension. None collects every non-directory.
    pub ext: Option<Extension>,
    /// Encoded-text destination.
    pub output: OutputTarget,
    /// Decode collected base64 files into this directory instead of encoding.
    pub decode_to: Option<PathBuf>,
    pub progress: ProgressStyle,
    /// Wait for Enter between files (line progress only).
    pub pause: bool,
    pub verbose: bool,
}

/// Lib-only options for [`encode_roots`](crate::encode_roots).
#[derive(Clone, Debug, Default)]
pub struct EncodeOpts {
    pub ext: Option<Extension>,
}

impl From<&Opts> for EncodeOpts {
    fn from(o: &Opts) -> Self {
        EncodeOpts { ext: o.ext.clone() }
    }
}

/// Totals for a finished run. For encoding `bytes_out` counts base64 characters; for decoding it
/// counts restored bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files: usize,
    pub bytes_in: u64,
    pub bytes_out: u64,
}
