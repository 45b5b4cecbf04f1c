use log::debug;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::RunSummary;
use crate::codec;
use crate::engine::progress::ProgressObserver;
use crate::error::{Clip64Error, IoOp};
use crate::utils::config::ENCODED_EXT;

use super::collector::PathCollector;
use super::sink::{Sink, relative_to_roots};

/// Read a whole file. The buffer is reserved up front so allocation failure is reported, not
/// aborted on.
pub fn read_binary(path: &Path) -> Result<Vec<u8>, Clip64Error> {
    let read_err = |e| Clip64Error::io(IoOp::ReadFailed, path, e);
    let mut file = File::open(path).map_err(read_err)?;
    let size = file.metadata().map_err(read_err)?.len() as usize;
    let mut buf = Vec::new();
    buf.try_reserve_exact(size)
        .map_err(|_| Clip64Error::OutOfMemory { requested: size })?;
    file.read_to_end(&mut buf).map_err(read_err)?;
    Ok(buf)
}

/// Encode `binary` into a freshly reserved string.
fn encode_buffer(binary: &[u8]) -> Result<String, Clip64Error> {
    let len = codec::encoded_len(binary.len()).ok_or(Clip64Error::OutOfMemory {
        requested: usize::MAX,
    })?;
    let mut text = String::new();
    text.try_reserve_exact(len)
        .map_err(|_| Clip64Error::OutOfMemory { requested: len })?;
    codec::encode_to(binary, &mut text);
    Ok(text)
}

/// For each collected path in order: report, read, encode, hand to `sink`.
/// Stops at the first failure; later files are not touched.
pub fn run_pipeline(
    paths: &PathCollector,
    sink: &mut dyn Sink,
    observer: &mut dyn ProgressObserver,
) -> Result<RunSummary, Clip64Error> {
    let total = paths.len();
    let mut summary = RunSummary::default();
    for (i, path) in paths.iter().enumerate() {
        observer.report(i + 1, total, path);
        let binary = read_binary(path)?;
        let text = encode_buffer(&binary)?;
        debug!(
            "{}: {} bytes -> {} chars",
            path.display(),
            binary.len(),
            text.len()
        );
        summary.bytes_in += binary.len() as u64;
        drop(binary);
        sink.write_text(path, &text)
            .map_err(|e| Clip64Error::io(IoOp::SinkWriteFailed, path, e))?;
        summary.bytes_out += text.len() as u64;
        summary.files += 1;
        observer.finished(i + 1, total, path);
    }
    Ok(summary)
}

/// Output path for a decoded file: its path below its root, with one trailing `.b64` removed.
pub fn restored_path(out_dir: &Path, roots: &[PathBuf], source: &Path) -> PathBuf {
    let target = out_dir.join(relative_to_roots(source, roots));
    if target.extension() == Some(OsStr::new(ENCODED_EXT)) {
        target.with_extension("")
    } else {
        target
    }
}

/// True when `target` already exists and is the same file as `source`.
fn is_same_file(source: &Path, target: &Path) -> bool {
    match (fs::canonicalize(source), fs::canonicalize(target)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Decode mode: each collected file holds base64 text (trailing whitespace ignored); the decoded
/// bytes go to [`restored_path`]. Same ordering and fail-fast rules as [`run_pipeline`].
///
/// A target that would overwrite its own source, or one already written in this run, is a
/// `WriteFailed` error with kind `AlreadyExists`.
pub fn restore_paths(
    paths: &PathCollector,
    roots: &[PathBuf],
    out_dir: &Path,
    observer: &mut dyn ProgressObserver,
) -> Result<RunSummary, Clip64Error> {
    fs::create_dir_all(out_dir).map_err(|e| Clip64Error::io(IoOp::WriteFailed, out_dir, e))?;
    let total = paths.len();
    let mut summary = RunSummary::default();
    let mut written = HashSet::new();
    for (i, path) in paths.iter().enumerate() {
        observer.report(i + 1, total, path);
        let target = restored_path(out_dir, roots, path);
        if is_same_file(path, &target) || !written.insert(target.clone()) {
            let e = io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("refusing to overwrite {}", target.display()),
            );
            return Err(Clip64Error::io(IoOp::WriteFailed, &target, e));
        }
        let text = read_binary(path)?;
        let trimmed = text.trim_ascii_end();
        let binary = codec::decode(trimmed)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Clip64Error::io(IoOp::WriteFailed, parent, e))?;
        }
        fs::write(&target, &binary).map_err(|e| Clip64Error::io(IoOp::WriteFailed, &target, e))?;
        debug!(
            "{}: {} chars -> {} bytes ({})",
            path.display(),
            trimmed.len(),
            binary.len(),
            target.display()
        );
        summary.bytes_in += text.len() as u64;
        summary.bytes_out += binary.len() as u64;
        summary.files += 1;
        observer.finished(i + 1, total, path);
    }
    Ok(summary)
}
