use clap::Parser;
use std::path::PathBuf;

use crate::ProgressStyle;

/// Encode files to base64 text, one blob per file.
#[derive(Clone, Parser)]
#[command(name = "clip64")]
#[command(about = "Find files under the given roots and emit each one as base64 text.")]
pub struct Cli {
    /// Files or directories to process. Reserved characters (\ / : * ? " < > |) are trimmed from both ends.
    #[arg(value_name = "ROOT")]
    pub roots: Vec<String>,

    /// Only collect files with this extension (case-sensitive, e.g. `.png` or `png`).
    #[arg(long, short = 'e')]
    pub ext: Option<String>,

    /// Write all encoded texts to this file, one per line, instead of stdout.
    #[arg(long, short = 'o', conflicts_with = "out_dir")]
    pub output: Option<PathBuf>,

    /// Write one `<name>.b64` file per input into this directory. With --decode: where decoded files go.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Treat collected files as base64 text and decode them into --out-dir.
    #[arg(long, short = 'd', requires = "out_dir")]
    pub decode: bool,

    /// Progress display.
    #[arg(long, value_enum)]
    pub progress: Option<ProgressStyle>,

    /// Wait for Enter between files.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub pause: Option<bool>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}
