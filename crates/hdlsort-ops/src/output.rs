//! Output drivers for an ordered file list: run a command per file, print
//! the list, write it to a file, or concatenate the sources into an archive.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use hdlsort_core::config::OutputOptions;
use hdlsort_core::template::{interpolate, FormatContext};
use hdlsort_resolver::leveler::UnitFile;
use hdlsort_util::errors::HdlSortError;
use hdlsort_util::process::CommandBuilder;
use hdlsort_util::progress::{status, status_warn};

/// Substitute `file`'s name and library into `template`.
pub fn format_file(file: &UnitFile, template: &str) -> String {
    interpolate(template, &FormatContext::new(&file.file_name, &file.library_name))
}

/// One formatted line per file, each terminated by a newline.
pub fn render_list(files: &[&UnitFile], format: &str) -> String {
    let mut text = String::new();
    for file in files {
        text.push_str(&format_file(file, format));
        text.push('\n');
    }
    text
}

/// What the drivers of one group did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DriverReport {
    pub commands_run: usize,
    pub commands_failed: usize,
    pub printed: bool,
    pub written: bool,
    pub archived: bool,
}

/// Run every driver `opts` selects over `files`, in order: execute, print,
/// write, archive. Printed lines go to `out`.
///
/// Executed commands also see the file and library as `HDLSORT_FILE_NAME`
/// and `HDLSORT_LIBRARY_NAME`. A command exiting non-zero is reported and
/// the remaining files still run.
pub fn run_drivers(
    files: &[&UnitFile],
    opts: &OutputOptions,
    out: &mut dyn Write,
) -> miette::Result<DriverReport> {
    let mut report = DriverReport::default();

    if let Some(template) = &opts.execute {
        for file in files {
            let command = format_file(file, template);
            status("Running", &command);
            let exit = CommandBuilder::shell(command.as_str())
                .env("HDLSORT_FILE_NAME", file.file_name.as_str())
                .env("HDLSORT_LIBRARY_NAME", file.library_name.as_str())
                .run()?;
            report.commands_run += 1;
            if !exit.success() {
                status_warn("Failed", &format!("{command} ({exit})"));
                report.commands_failed += 1;
            }
        }
    }

    if opts.print {
        out.write_all(render_list(files, &opts.format).as_bytes())
            .map_err(|e| HdlSortError::Output {
                message: format!("Failed to print file list: {e}"),
            })?;
        report.printed = true;
    }

    if let Some(path) = &opts.output {
        status("Writing", &path.display().to_string());
        write_list(files, &opts.format, path)?;
        report.written = true;
    }

    if let Some(path) = &opts.archive {
        status("Archiving", &path.display().to_string());
        write_archive(files, path)?;
        report.archived = true;
    }

    Ok(report)
}

fn create(path: &Path) -> Result<File, HdlSortError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        hdlsort_util::fs::ensure_dir(parent).map_err(|e| HdlSortError::Output {
            message: format!("Failed to create {}: {e}", parent.display()),
        })?;
    }
    File::create(path).map_err(|e| HdlSortError::Output {
        message: format!("Failed to create {}: {e}", path.display()),
    })
}

/// Write the formatted list to `path`, replacing any existing file.
pub fn write_list(files: &[&UnitFile], format: &str, path: &Path) -> miette::Result<()> {
    let mut file = create(path)?;
    file.write_all(render_list(files, format).as_bytes())
        .map_err(|e| HdlSortError::Output {
            message: format!("Failed to write {}: {e}", path.display()),
        })?;
    Ok(())
}

/// Concatenate the raw contents of `files` into `path`, in order.
pub fn write_archive(files: &[&UnitFile], path: &Path) -> miette::Result<()> {
    let mut archive = create(path)?;
    for file in files {
        let bytes = std::fs::read(&file.file_name).map_err(|e| HdlSortError::Read {
            path: file.file_name.clone(),
            message: e.to_string(),
        })?;
        archive.write_all(&bytes).map_err(|e| HdlSortError::Output {
            message: format!("Failed to write {}: {e}", path.display()),
        })?;
    }
    tracing::debug!(files = files.len(), archive = %path.display(), "archive written");
    Ok(())
}
