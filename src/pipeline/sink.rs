//! Output sinks: where encoded text goes, one blob per processed file.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::utils::config::ENCODED_SUFFIX;

/// Receives one encoded text per processed file. `source` is the file the text came from.
pub trait Sink {
    fn write_text(&mut self, source: &Path, text: &str) -> io::Result<()>;
}

/// One line per file on stdout.
#[derive(Default)]
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn write_text(&mut self, _source: &Path, text: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(text.as_bytes())?;
        out.write_all(b"\n")?;
        out.flush()
    }
}

/// One line per file, appended to a single output file (truncated on open).
pub struct FileSink {
    writer: BufWriter<File>,
}

impl FileSink {
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(Self {
            writer: BufWriter::new(File::create(path)?),
        })
    }
}

impl Sink for FileSink {
    fn write_text(&mut self, _source: &Path, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

/// Path of `source` below whichever of `roots` it was found under, or just its file name when it is
/// a root itself (or under none of them).
pub fn relative_to_roots<'a>(source: &'a Path, roots: &[PathBuf]) -> &'a Path {
    roots
        .iter()
        .filter_map(|root| source.strip_prefix(root).ok())
        .find(|rel| !rel.as_os_str().is_empty())
        .or_else(|| source.file_name().map(Path::new))
        .unwrap_or(Path::new(""))
}

/// Writes `<dir>/<path below its root>.b64` for each input file, creating subdirectories as
/// needed. A second write to the same target in one run is refused with `AlreadyExists`.
pub struct DirSink {
    dir: PathBuf,
    roots: Vec<PathBuf>,
    written: HashSet<PathBuf>,
}

impl DirSink {
    /// Creates `dir` (and parents) if missing. Targets use the file name only; see
    /// [`DirSink::with_roots`].
    pub fn create(dir: &Path) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            roots: Vec::new(),
            written: HashSet::new(),
        })
    }

    /// Mirror each source's layout below the root it was collected from.
    pub fn with_roots(mut self, roots: &[PathBuf]) -> Self {
        self.roots = roots.to_vec();
        self
    }

    pub fn target_for(&self, source: &Path) -> PathBuf {
        let mut target = self
            .dir
            .join(relative_to_roots(source, &self.roots))
            .into_os_string();
        target.push(ENCODED_SUFFIX);
        PathBuf::from(target)
    }
}

impl Sink for DirSink {
    fn write_text(&mut self, source: &Path, text: &str) -> io::Result<()> {
        let target = self.target_for(source);
        if !self.written.insert(target.clone()) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already written in this run", target.display()),
            ));
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, text)
    }
}

/// Keeps every text in memory, paired with its source path.
#[derive(Default, Debug)]
pub struct MemorySink {
    pub texts: Vec<(PathBuf, String)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sink for MemorySink {
    fn write_text(&mut self, source: &Path, text: &str) -> io::Result<()> {
        self.texts.push((source.to_path_buf(), text.to_owned()));
        Ok(())
    }
}
