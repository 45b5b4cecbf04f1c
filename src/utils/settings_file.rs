//! Load `.clip64.toml` from the working directory (CLI only). Library callers pass [`EncodeOpts`](crate::EncodeOpts).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::utils::config::PackagePaths;
use crate::{Extension, Opts, OutputTarget, ProgressStyle};

#[derive(Debug, Default, Deserialize)]
pub struct SettingsFile {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    ext: Option<String>,
    output: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    progress: Option<ProgressStyle>,
    pause: Option<bool>,
    verbose: Option<bool>,
}

impl SettingsFile {
    pub fn parse(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}

/// A settings file that exists but does not parse.
#[derive(Debug, Error)]
#[error("{}: {source}", path.display())]
pub struct SettingsFileError {
    pub path: PathBuf,
    #[source]
    pub source: toml::de::Error,
}

/// Load the settings file from `dir` if present. `Ok(None)` if missing or unreadable.
///
/// A malformed file is an error; the CLI warns and carries on with defaults.
pub fn load_settings_file(dir: &Path) -> Result<Option<SettingsFile>, SettingsFileError> {
    let path = dir.join(PackagePaths::get().settings_filename());
    let Ok(s) = std::fs::read_to_string(&path) else {
        return Ok(None);
    };
    SettingsFile::parse(&s)
        .map(Some)
        .map_err(|source| SettingsFileError { path, source })
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($sec:expr, $opts:expr, $sec_field:ident => $opts_field:ident) => {
        if let Some(v) = $sec.$sec_field {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file settings to opts (only fields present in the file). Call before applying CLI.
/// `out_dir` wins over `output` when both are set.
pub fn apply_file_to_opts(file: &SettingsFile, opts: &mut Opts) {
    let sec = &file.settings;
    if let Some(ref e) = sec.ext {
        opts.ext = Some(Extension::new(e));
    }
    if let Some(ref p) = sec.output {
        opts.output = OutputTarget::File(p.clone());
    }
    if let Some(ref d) = sec.out_dir {
        opts.output = OutputTarget::Dir(d.clone());
    }
    apply_file_opt!(sec, opts, progress => progress);
    apply_file_opt!(sec, opts, pause => pause);
    apply_file_opt!(sec, opts, verbose => verbose);
}
