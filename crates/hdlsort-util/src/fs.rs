use std::path::{Path, PathBuf};

use crate::errors::HdlSortError;

/// Walk up from `start` looking for a file named `filename`.
/// Returns the path to the directory containing the file, or `None`.
pub fn find_ancestor_with(start: &Path, filename: &str) -> Option<PathBuf> {
    let mut current = start;
    loop {
        let candidate = current.join(filename);
        if candidate.is_file() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

/// Ensure a directory exists, creating it and any parents if needed.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Expand `path` into the list of source files it denotes.
///
/// Directories are walked recursively in sorted order. Entries whose name
/// starts with `.` are not visited and files whose name ends with `~` are
/// skipped. A plain file path is returned as-is unless it ends with `~`.
pub fn collect_source_files(path: &Path) -> Result<Vec<PathBuf>, HdlSortError> {
    let mut files = Vec::new();
    collect_recursive(path, &mut files)?;
    Ok(files)
}

fn collect_recursive(path: &Path, out: &mut Vec<PathBuf>) -> Result<(), HdlSortError> {
    let meta = std::fs::metadata(path).map_err(|e| HdlSortError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    if meta.is_dir() {
        let unreadable = |e: std::io::Error| HdlSortError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        };
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path).map_err(unreadable)? {
            let entry = entry.map_err(unreadable)?;
            if !entry.file_name().to_string_lossy().starts_with('.') {
                entries.push(entry.path());
            }
        }
        entries.sort();
        for entry in entries {
            collect_recursive(&entry, out)?;
        }
    } else if !is_backup_file(path) {
        out.push(path.to_path_buf());
    }
    Ok(())
}

fn is_backup_file(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().ends_with('~'))
}

/// Read a source file as text.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD rather than failing.
pub fn read_source(path: &Path) -> Result<String, HdlSortError> {
    let bytes = std::fs::read(path).map_err(|e| HdlSortError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    tracing::trace!(path = %path.display(), bytes = bytes.len(), "read source");
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
