//! Command dispatch and handler modules.

mod order;
mod units;

use std::path::PathBuf;

use miette::Result;

use hdlsort_core::config::{ProjectConfig, CONFIG_FILE_NAME};
use hdlsort_resolver::diagnostics::{Diagnostics, Severity};
use hdlsort_util::errors::HdlSortError;
use hdlsort_util::fs::find_ancestor_with;
use hdlsort_util::progress::{status_info, status_warn};

use crate::cli::{Cli, Command, SourceArgs};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Order(args) => order::exec(args),
        Command::Units { source, json } => units::exec(&source, json),
    }
}

/// Build the run configuration from `--config` (or the nearest
/// `HdlSort.toml` when no sources are given) plus the path flags.
///
/// Also returns the library that positional paths and other per-library
/// flags apply to: `-l`, else the configuration's default library.
fn load_config(source: &SourceArgs) -> Result<(ProjectConfig, String)> {
    let mut config = match &source.config {
        Some(path) => ProjectConfig::from_path(path)?,
        None if source.paths.is_empty() && source.lib_paths.is_empty() => {
            let cwd = std::env::current_dir().map_err(HdlSortError::Io)?;
            let root = find_ancestor_with(&cwd, CONFIG_FILE_NAME).ok_or_else(|| {
                HdlSortError::Config {
                    message: format!(
                        "No source paths given and no {CONFIG_FILE_NAME} found in current or parent directories"
                    ),
                }
            })?;
            ProjectConfig::from_path(&root.join(CONFIG_FILE_NAME))?
        }
        None => ProjectConfig::default(),
    };
    let library = match &source.library {
        Some(name) => name.to_ascii_uppercase(),
        None => config.default_library().to_string(),
    };

    if !source.paths.is_empty() {
        config
            .library_mut(&library)
            .paths
            .extend(source.paths.iter().cloned());
    }
    for pair in &source.lib_paths {
        let (library, path) = pair
            .split_once('=')
            .filter(|(lib, path)| !lib.trim().is_empty() && !path.is_empty())
            .ok_or_else(|| HdlSortError::Config {
                message: format!("expected LIB=PATH, got '{pair}'"),
            })?;
        config
            .library_mut(library.trim())
            .paths
            .push(PathBuf::from(path));
    }
    Ok((config, library))
}

/// Print every diagnostic as a status line on stderr.
fn report(diagnostics: &Diagnostics) {
    for diagnostic in diagnostics {
        match diagnostic.severity() {
            Severity::Warning => status_warn("warning", &diagnostic.to_string()),
            Severity::Note => status_info("note", &diagnostic.to_string()),
        }
    }
}
