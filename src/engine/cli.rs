//! CLI run handler: settings file, then flags, then encode (default) or decode.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::engine::arg_parser::Cli;
use crate::engine::progress::observer_for;
use crate::engine::tools::prepare_roots;
use crate::pipeline::sink::{DirSink, FileSink, Sink, StdoutSink};
use crate::pipeline::{collect_paths, restore_paths, run_pipeline};
use crate::utils::{SettingsFileError, apply_file_to_opts, load_settings_file, setup_logging};
use crate::{EncodeOpts, Extension, Opts, OutputTarget, RunSummary};

/// Defaults < `.clip64.toml` in `cwd` < command-line flags.
///
/// A malformed settings file is skipped and handed back so it can be reported once logging is up.
pub fn resolve_opts(cli: &Cli, cwd: &Path) -> (Opts, Option<SettingsFileError>) {
    let mut opts = Opts::default();
    let skipped = match load_settings_file(cwd) {
        Ok(Some(file)) => {
            apply_file_to_opts(&file, &mut opts);
            None
        }
        Ok(None) => None,
        Err(e) => Some(e),
    };
    if let Some(ref e) = cli.ext {
        opts.ext = Some(Extension::new(e));
    }
    if let Some(ref p) = cli.output {
        opts.output = OutputTarget::File(p.clone());
    }
    if let Some(ref d) = cli.out_dir {
        if cli.decode {
            opts.decode_to = Some(d.clone());
        } else {
            opts.output = OutputTarget::Dir(d.clone());
        }
    }
    if let Some(p) = cli.progress {
        opts.progress = p;
    }
    if let Some(p) = cli.pause {
        opts.pause = p;
    }
    if let Some(v) = cli.verbose {
        opts.verbose = v;
    }
    (opts, skipped)
}

fn open_sink(target: &OutputTarget, roots: &[PathBuf]) -> Result<Box<dyn Sink>> {
    Ok(match target {
        OutputTarget::Stdout => Box::new(StdoutSink),
        OutputTarget::File(p) => Box::new(
            FileSink::create(p).with_context(|| format!("open output file {}", p.display()))?,
        ),
        OutputTarget::Dir(d) => Box::new(
            DirSink::create(d)
                .with_context(|| format!("create output dir {}", d.display()))?
                .with_roots(roots),
        ),
    })
}

/// Collect paths under the CLI roots, then encode them to the configured sink or decode them.
pub fn handle_run(cli: &Cli) -> Result<RunSummary> {
    let cwd = std::env::current_dir().context("read current directory")?;
    let (opts, skipped) = resolve_opts(cli, &cwd);
    setup_logging(opts.verbose);
    if let Some(e) = skipped {
        warn!("Ignoring settings file: {e}");
    }
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );

    let roots = prepare_roots(&cli.roots)?;
    if roots.is_empty() {
        warn!("No roots given; nothing to do.");
        return Ok(RunSummary::default());
    }

    let paths = collect_paths(&roots, &EncodeOpts::from(&opts))?;
    debug!("Collected {} files", paths.len());
    let desc = if opts.decode_to.is_some() {
        "Decoding"
    } else {
        "Encoding"
    };
    let mut observer = observer_for(opts.progress, opts.pause, desc);

    let summary = match opts.decode_to {
        Some(ref out_dir) => restore_paths(&paths, &roots, out_dir, observer.as_mut())
            .with_context(|| format!("decode into {}", out_dir.display()))?,
        None => {
            let mut sink = open_sink(&opts.output, &roots)?;
            run_pipeline(&paths, sink.as_mut(), observer.as_mut())?
        }
    };
    info!(
        "{} files, {} bytes in, {} bytes out",
        summary.files, summary.bytes_in, summary.bytes_out
    );
    Ok(summary)
}
