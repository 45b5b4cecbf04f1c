//! Root argument helpers

use std::path::PathBuf;

use crate::error::Clip64Error;
use crate::pipeline::collector::path_len;
use crate::utils::config::{PATH_LIMIT, RESERVED_ROOT_CHARS};

/// Strip reserved characters (`\ / : * ? " < > |`) from both ends of a root argument.
/// On Unix a leading `/` is kept so absolute roots stay absolute.
pub fn sanitize_root(arg: &str) -> String {
    let trimmed = arg.trim_matches(RESERVED_ROOT_CHARS);
    if cfg!(unix) && arg.starts_with('/') && !trimmed.is_empty() {
        format!("/{trimmed}")
    } else {
        trimmed.to_string()
    }
}

/// Sanitize every root. Empty results are dropped with a warning; over-long roots fail.
pub fn prepare_roots<S: AsRef<str>>(args: &[S]) -> Result<Vec<PathBuf>, Clip64Error> {
    let mut roots = Vec::with_capacity(args.len());
    for arg in args {
        let arg = arg.as_ref();
        let clean = sanitize_root(arg);
        if clean.is_empty() {
            log::warn!("ignoring root {:?}: nothing left after sanitizing", arg);
            continue;
        }
        let path = PathBuf::from(clean);
        let len = path_len(&path);
        if len >= PATH_LIMIT {
            return Err(Clip64Error::PathTooLong {
                path,
                len,
                limit: PATH_LIMIT,
            });
        }
        if !path.exists() {
            log::warn!("root {} does not exist; it will contribute no files", path.display());
        }
        roots.push(path);
    }
    Ok(roots)
}
