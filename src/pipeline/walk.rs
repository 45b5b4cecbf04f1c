//! Recursive discovery: directories are listed and descended, everything else goes through the
//! extension filter into an [`Accumulator`].
//!
//! Symlinks to directories are followed and cycles are not detected.

use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::Extension;
use crate::error::Clip64Error;

use super::collector::Accumulator;

/// Immediate entries of `dir` in the order the platform enumerates them.
///
/// A directory that cannot be opened yields no entries, and listing stops at the first entry
/// error. This is the only failure the walk tolerates.
pub fn list_dir(dir: &Path) -> Vec<PathBuf> {
    let mut entries = Vec::new();
    for res in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
    {
        match res {
            Ok(entry) => entries.push(entry.into_path()),
            Err(err) => {
                debug!("skipping unreadable directory {}: {}", dir.display(), err);
                break;
            }
        }
    }
    entries
}

/// Whether `path`'s final extension (from the last `.` of the file name, dot included) is exactly
/// `ext`. Case-sensitive. `None` matches everything.
pub fn matches_extension(path: &Path, ext: Option<&Extension>) -> bool {
    let Some(ext) = ext else {
        return true;
    };
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.as_encoded_bytes();
    match name.iter().rposition(|&b| b == b'.') {
        Some(dot) => &name[dot..] == ext.as_str().as_bytes(),
        None => false,
    }
}

/// Walk `root` depth-first, appending each matching non-directory to `into`.
///
/// Stops at and returns the first append error. The root itself is only appended when it is a
/// matching non-directory. A path whose metadata cannot be read (missing, broken symlink)
/// contributes nothing.
pub fn walk<A>(root: &Path, ext: Option<&Extension>, into: &mut A) -> Result<(), Clip64Error>
where
    A: Accumulator + ?Sized,
{
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => {
            for entry in list_dir(root) {
                walk(&entry, ext, into)?;
            }
        }
        Ok(_) => {
            if matches_extension(root, ext) {
                into.append(root.to_path_buf())?;
            }
        }
        // Unreadable attributes: handled like a directory that cannot be listed.
        Err(err) => debug!("skipping {}: {}", root.display(), err),
    }
    Ok(())
}
