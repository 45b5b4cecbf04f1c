//! Pipeline tests: end-to-end encode, fail-fast on read/sink errors, sinks, decode mode.

use clip64::codec::encode;
use clip64::engine::{NoProgress, ProgressObserver};
use clip64::pipeline::{
    Accumulator, DirSink, FileSink, MemorySink, PathCollector, Sink, collect_paths,
    relative_to_roots, restore_paths, restored_path, run_pipeline,
};
use clip64::{Clip64Error, CodecError, EncodeOpts, Extension, IoOp, RunSummary, encode_roots};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Records every observer call as `(event, index, total)`.
#[derive(Default)]
struct RecordingObserver {
    events: Vec<(&'static str, usize, usize)>,
}

impl ProgressObserver for RecordingObserver {
    fn report(&mut self, index: usize, total: usize, _path: &Path) {
        self.events.push(("report", index, total));
    }

    fn finished(&mut self, index: usize, total: usize, _path: &Path) {
        self.events.push(("finished", index, total));
    }
}

/// Accepts `ok_writes` texts, then fails every write.
struct FailingSink {
    ok_writes: usize,
    written: Vec<String>,
}

impl Sink for FailingSink {
    fn write_text(&mut self, _source: &Path, text: &str) -> io::Result<()> {
        if self.written.len() == self.ok_writes {
            return Err(io::Error::other("sink closed"));
        }
        self.written.push(text.to_string());
        Ok(())
    }
}

fn collector_of(paths: &[PathBuf]) -> PathCollector {
    let mut c = PathCollector::new(paths.len()).unwrap();
    for p in paths {
        c.append(p.clone()).unwrap();
    }
    c
}

fn write_files(dir: &Path, files: &[(&str, &[u8])]) -> Vec<PathBuf> {
    files
        .iter()
        .map(|(name, data)| {
            let p = dir.join(name);
            fs::write(&p, data).unwrap();
            p
        })
        .collect()
}

// --- encode pipeline ---

#[test]
fn test_end_to_end_hello() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("hello"), [104u8, 101, 108, 108, 111]).unwrap();

    let mut sink = MemorySink::new();
    let summary = encode_roots(
        &[dir.path().to_path_buf()],
        &EncodeOpts::default(),
        &mut sink,
        &mut NoProgress,
    )
    .unwrap();

    assert_eq!(sink.texts.len(), 1);
    assert_eq!(sink.texts[0].0, dir.path().join("hello"));
    assert_eq!(sink.texts[0].1, "aGVsbG8=");
    assert_eq!(
        summary,
        RunSummary {
            files: 1,
            bytes_in: 5,
            bytes_out: 8
        }
    );
}

#[test]
fn test_encode_roots_with_filter() {
    let dir = tempfile::tempdir().unwrap();
    write_files(dir.path(), &[("a.txt", &b"foo"[..]), ("b.png", &b"bar"[..])]);
    let mut sink = MemorySink::new();
    let opts = EncodeOpts {
        ext: Some(Extension::new("png")),
    };
    encode_roots(&[dir.path().to_path_buf()], &opts, &mut sink, &mut NoProgress).unwrap();
    assert_eq!(sink.texts.len(), 1);
    assert_eq!(sink.texts[0].1, "YmFy");
}

#[test]
fn test_pipeline_preserves_collection_order_and_reports_progress() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_files(
        dir.path(),
        &[("one", &b"f"[..]), ("two", &b"fo"[..]), ("three", &b""[..])],
    );
    let collector = collector_of(&paths);
    let mut sink = MemorySink::new();
    let mut observer = RecordingObserver::default();

    run_pipeline(&collector, &mut sink, &mut observer).unwrap();

    let texts: Vec<&str> = sink.texts.iter().map(|(_, t)| t.as_str()).collect();
    assert_eq!(texts, vec!["Zg==", "Zm8=", ""]);
    assert_eq!(
        observer.events,
        vec![
            ("report", 1, 3),
            ("finished", 1, 3),
            ("report", 2, 3),
            ("finished", 2, 3),
            ("report", 3, 3),
            ("finished", 3, 3),
        ]
    );
}

#[test]
fn test_pipeline_empty_collector() {
    let collector = PathCollector::new(1).unwrap();
    let mut sink = MemorySink::new();
    let summary = run_pipeline(&collector, &mut sink, &mut NoProgress).unwrap();
    assert_eq!(summary, RunSummary::default());
    assert!(sink.texts.is_empty());
}

#[test]
fn test_pipeline_aborts_on_read_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mut paths = write_files(dir.path(), &[("first", &b"abc"[..])]);
    paths.push(dir.path().join("missing"));
    paths.extend(write_files(dir.path(), &[("third", &b"xyz"[..])]));
    let collector = collector_of(&paths);
    let mut sink = MemorySink::new();
    let mut observer = RecordingObserver::default();

    let err = run_pipeline(&collector, &mut sink, &mut observer).unwrap_err();

    match err {
        Clip64Error::Io { op, path, .. } => {
            assert_eq!(op, IoOp::ReadFailed);
            assert_eq!(path, dir.path().join("missing"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(sink.texts.len(), 1);
    assert!(!observer.events.contains(&("report", 3, 3)));
}

#[test]
fn test_pipeline_aborts_on_sink_failure() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_files(dir.path(), &[("a", &b"1"[..]), ("b", &b"2"[..]), ("c", &b"3"[..])]);
    let collector = collector_of(&paths);
    let mut sink = FailingSink {
        ok_writes: 1,
        written: Vec::new(),
    };
    let mut observer = RecordingObserver::default();

    let err = run_pipeline(&collector, &mut sink, &mut observer).unwrap_err();

    assert!(matches!(
        err,
        Clip64Error::Io {
            op: IoOp::SinkWriteFailed,
            ..
        }
    ));
    assert_eq!(sink.written, vec![encode(b"1")]);
    assert_eq!(
        observer.events,
        vec![("report", 1, 3), ("finished", 1, 3), ("report", 2, 3)]
    );
}

// --- sinks ---

#[test]
fn test_file_sink_one_line_per_file() {
    let dir = tempfile::tempdir().unwrap();
    let inputs = tempfile::tempdir().unwrap();
    let paths = write_files(inputs.path(), &[("a", &b"foo"[..]), ("b", &b"foob"[..])]);
    let out = dir.path().join("out.txt");
    let mut sink = FileSink::create(&out).unwrap();

    run_pipeline(&collector_of(&paths), &mut sink, &mut NoProgress).unwrap();
    drop(sink);

    assert_eq!(fs::read_to_string(&out).unwrap(), "Zm9v\nZm9vYg==\n");
}

#[test]
fn test_dir_sink_writes_b64_files() {
    let inputs = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let paths = write_files(inputs.path(), &[("pic.png", &b"fooba"[..])]);
    let out_dir = out.path().join("nested");
    let mut sink = DirSink::create(&out_dir).unwrap();

    run_pipeline(&collector_of(&paths), &mut sink, &mut NoProgress).unwrap();

    assert_eq!(
        fs::read_to_string(out_dir.join("pic.png.b64")).unwrap(),
        "Zm9vYmE="
    );
}

/// ```text
/// tmp/
///   a/x.txt  "first"
///   b/x.txt  "second"
/// ```
fn same_name_tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (sub, data) in [("a", "first"), ("b", "second")] {
        fs::create_dir(dir.path().join(sub)).unwrap();
        fs::write(dir.path().join(sub).join("x.txt"), data).unwrap();
    }
    dir
}

#[test]
fn test_relative_to_roots() {
    let roots = [PathBuf::from("/in"), PathBuf::from("/other")];
    assert_eq!(
        relative_to_roots(Path::new("/other/a/x.txt"), &roots),
        Path::new("a/x.txt")
    );
    assert_eq!(relative_to_roots(Path::new("/in"), &[PathBuf::from("/in")]), Path::new("in"));
    assert_eq!(relative_to_roots(Path::new("/elsewhere/y"), &roots), Path::new("y"));
}

#[test]
fn test_dir_sink_keeps_layout_below_root() {
    let inputs = same_name_tree();
    let out = tempfile::tempdir().unwrap();
    let roots = [inputs.path().to_path_buf()];
    let mut sink = DirSink::create(out.path()).unwrap().with_roots(&roots);

    let summary = encode_roots(&roots, &EncodeOpts::default(), &mut sink, &mut NoProgress).unwrap();

    assert_eq!(summary.files, 2);
    assert_eq!(fs::read_to_string(out.path().join("a/x.txt.b64")).unwrap(), encode(b"first"));
    assert_eq!(fs::read_to_string(out.path().join("b/x.txt.b64")).unwrap(), encode(b"second"));
}

#[test]
fn test_dir_sink_refuses_second_write_to_same_target() {
    let inputs = same_name_tree();
    let out = tempfile::tempdir().unwrap();
    let mut sink = DirSink::create(out.path()).unwrap();

    let err = encode_roots(
        &[inputs.path().join("a"), inputs.path().join("b")],
        &EncodeOpts::default(),
        &mut sink,
        &mut NoProgress,
    )
    .unwrap_err();

    match err {
        Clip64Error::Io { op, path, source } => {
            assert_eq!(op, IoOp::SinkWriteFailed);
            assert_eq!(path, inputs.path().join("b/x.txt"));
            assert_eq!(source.kind(), io::ErrorKind::AlreadyExists);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(fs::read_to_string(out.path().join("x.txt.b64")).unwrap(), encode(b"first"));
}

// --- decode mode ---

#[test]
fn test_restored_path_strips_suffix() {
    let out = Path::new("/out");
    let roots = [PathBuf::from("/in")];
    assert_eq!(
        restored_path(out, &roots, Path::new("/in/pic.png.b64")),
        PathBuf::from("/out/pic.png")
    );
    assert_eq!(
        restored_path(out, &roots, Path::new("/in/sub/plain")),
        PathBuf::from("/out/sub/plain")
    );
    assert_eq!(
        restored_path(out, &[], Path::new("/in/.b64")),
        PathBuf::from("/out/.b64")
    );
}

#[cfg(unix)]
#[test]
fn test_restored_path_keeps_non_utf8_name() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let source = Path::new("/in").join(OsStr::from_bytes(b"caf\xe9.bin.b64"));
    let restored = restored_path(Path::new("/out"), &[PathBuf::from("/in")], &source);
    assert_eq!(
        restored,
        Path::new("/out").join(OsStr::from_bytes(b"caf\xe9.bin"))
    );

    let out = tempfile::tempdir().unwrap();
    let sink = DirSink::create(out.path()).unwrap();
    let target = sink.target_for(&Path::new("/in").join(OsStr::from_bytes(b"caf\xe9.bin")));
    assert_eq!(target.file_name().unwrap().as_bytes(), b"caf\xe9.bin.b64");
}

#[test]
fn test_encode_then_restore_round_trip() {
    let inputs = tempfile::tempdir().unwrap();
    let encoded = tempfile::tempdir().unwrap();
    let restored = tempfile::tempdir().unwrap();
    let blob: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
    write_files(inputs.path(), &[("blob.bin", blob.as_slice()), ("note.txt", &b"hi"[..])]);

    let mut sink = DirSink::create(encoded.path())
        .unwrap()
        .with_roots(&[inputs.path().to_path_buf()]);
    encode_roots(
        &[inputs.path().to_path_buf()],
        &EncodeOpts::default(),
        &mut sink,
        &mut NoProgress,
    )
    .unwrap();

    let b64_files = collect_paths(
        &[encoded.path().to_path_buf()],
        &EncodeOpts {
            ext: Some(Extension::new(".b64")),
        },
    )
    .unwrap();
    let summary = restore_paths(
        &b64_files,
        &[encoded.path().to_path_buf()],
        restored.path(),
        &mut NoProgress,
    )
    .unwrap();

    assert_eq!(summary.files, 2);
    assert_eq!(fs::read(restored.path().join("blob.bin")).unwrap(), blob);
    assert_eq!(fs::read(restored.path().join("note.txt")).unwrap(), b"hi");
}

#[test]
fn test_restore_ignores_trailing_newline() {
    let inputs = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let paths = write_files(inputs.path(), &[("hello.b64", &b"aGVsbG8=\r\n"[..])]);

    restore_paths(&collector_of(&paths), &[], out.path(), &mut NoProgress).unwrap();

    assert_eq!(fs::read(out.path().join("hello")).unwrap(), b"hello");
}

#[test]
fn test_restore_rejects_invalid_text() {
    let inputs = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let paths = write_files(inputs.path(), &[("bad.b64", &b"Zm9v!A=="[..])]);

    let err = restore_paths(&collector_of(&paths), &[], out.path(), &mut NoProgress).unwrap_err();

    assert!(matches!(
        err,
        Clip64Error::Codec(CodecError::InvalidCharacter { byte: b'!', .. })
    ));
    assert!(!out.path().join("bad").exists());
}

#[test]
fn test_encode_then_restore_nested_same_names() {
    let inputs = same_name_tree();
    let encoded = tempfile::tempdir().unwrap();
    let restored = tempfile::tempdir().unwrap();
    let roots = [inputs.path().to_path_buf()];
    let mut sink = DirSink::create(encoded.path()).unwrap().with_roots(&roots);
    encode_roots(&roots, &EncodeOpts::default(), &mut sink, &mut NoProgress).unwrap();

    let encoded_roots = [encoded.path().to_path_buf()];
    let b64_files = collect_paths(&encoded_roots, &EncodeOpts::default()).unwrap();
    let summary =
        restore_paths(&b64_files, &encoded_roots, restored.path(), &mut NoProgress).unwrap();

    assert_eq!(summary.files, 2);
    assert_eq!(fs::read(restored.path().join("a/x.txt")).unwrap(), b"first");
    assert_eq!(fs::read(restored.path().join("b/x.txt")).unwrap(), b"second");
}

#[test]
fn test_restore_refuses_to_overwrite_source() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_files(dir.path(), &[("plain", &b"aGk="[..])]);
    let roots = [dir.path().to_path_buf()];

    let err = restore_paths(&collector_of(&paths), &roots, dir.path(), &mut NoProgress).unwrap_err();

    assert!(matches!(
        err,
        Clip64Error::Io {
            op: IoOp::WriteFailed,
            ..
        }
    ));
    assert_eq!(fs::read(dir.path().join("plain")).unwrap(), b"aGk=");
}

#[test]
fn test_restore_refuses_second_write_to_same_target() {
    let inputs = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    fs::create_dir(inputs.path().join("a")).unwrap();
    fs::create_dir(inputs.path().join("b")).unwrap();
    fs::write(inputs.path().join("a/x.b64"), "Zmlyc3Q=").unwrap();
    fs::write(inputs.path().join("b/x.b64"), "c2Vjb25k").unwrap();
    let paths = collector_of(&[inputs.path().join("a/x.b64"), inputs.path().join("b/x.b64")]);

    let err = restore_paths(&paths, &[], out.path(), &mut NoProgress).unwrap_err();

    match err {
        Clip64Error::Io { op, source, .. } => {
            assert_eq!(op, IoOp::WriteFailed);
            assert_eq!(source.kind(), io::ErrorKind::AlreadyExists);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(fs::read(out.path().join("x")).unwrap(), b"first");
}
