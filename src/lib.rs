//! clip64: find files under one or more roots and turn each into standard base64 text.

pub mod codec;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use error::{Clip64Error, CodecError, IoOp};
pub use types::*;

use log::debug;
use std::path::PathBuf;

use engine::progress::ProgressObserver;
use pipeline::Sink;

pub type Result<T> = std::result::Result<T, Clip64Error>;

/// Single entry point: walk `roots` with `opts`, then encode each collected file into `sink`,
/// reporting to `observer`. Fails on the first error; nothing after it is processed.
///
/// Roots are used as given; sanitize CLI input with [`engine::prepare_roots`] first.
///
/// ```no_run
/// use std::path::PathBuf;
/// use clip64::pipeline::MemorySink;
/// use clip64::engine::NoProgress;
///
/// let mut sink = MemorySink::new();
/// let opts = clip64::EncodeOpts { ext: Some(clip64::Extension::new(".png")) };
/// let summary = clip64::encode_roots(&[PathBuf::from("assets")], &opts, &mut sink, &mut NoProgress)?;
/// println!("{} files", summary.files);
/// # Ok::<(), clip64::Clip64Error>(())
/// ```
pub fn encode_roots(
    roots: &[PathBuf],
    opts: &EncodeOpts,
    sink: &mut dyn Sink,
    observer: &mut dyn ProgressObserver,
) -> Result<RunSummary> {
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );
    let paths = pipeline::collect_paths(roots, opts)?;
    pipeline::run_pipeline(&paths, sink, observer)
}
