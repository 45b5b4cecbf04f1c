//! Pipeline components: path collection, walk, sinks, orchestration.

pub mod collector;
pub mod orchestrator;
pub mod sink;
pub mod walk;

pub use collector::{Accumulator, PathCollector};
pub use orchestrator::{read_binary, restore_paths, restored_path, run_pipeline};
pub use sink::{DirSink, FileSink, MemorySink, Sink, StdoutSink, relative_to_roots};
pub use walk::{list_dir, matches_extension, walk};

use log::debug;
use std::path::PathBuf;

use crate::EncodeOpts;
use crate::error::Clip64Error;

/// Walk every root in order into one collector. Initial capacity is the number of roots.
pub fn collect_paths(roots: &[PathBuf], opts: &EncodeOpts) -> Result<PathCollector, Clip64Error> {
    let mut paths = PathCollector::new(roots.len())?;
    for root in roots {
        debug!("Walking {}", root.display());
        walk(root, opts.ext.as_ref(), &mut paths)?;
    }
    Ok(paths)
}
