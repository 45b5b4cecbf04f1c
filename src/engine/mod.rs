//! Engine: CLI parsing, run handler, progress, root helpers.

pub mod arg_parser;
pub mod cli;
pub mod progress;
pub mod tools;

pub use arg_parser::Cli;
pub use cli::{handle_run, resolve_opts};
pub use progress::{BarProgress, LineProgress, NoProgress, ProgressObserver, format_progress_line};
pub use tools::{prepare_roots, sanitize_root};
