//! Operation: list every extracted design unit.

use std::fmt::Write as _;

use hdlsort_core::config::ProjectConfig;
use hdlsort_core::unit::LibraryUnit;
use hdlsort_util::errors::HdlSortError;

use crate::ops_analyze::{analyze, Analysis};

/// Analyze the configured sources without ordering them.
pub fn units(config: &ProjectConfig) -> miette::Result<Analysis> {
    analyze(config)
}

/// Human-readable listing: one header line per unit followed by its
/// imports and instances.
pub fn render_text(units: &[LibraryUnit]) -> String {
    let mut text = String::new();
    for unit in units {
        let _ = writeln!(
            text,
            "{unit}  {}:{}-{}",
            unit.file_name, unit.begin_line, unit.end_line
        );
        if !unit.use_library_list.is_empty() {
            let _ = writeln!(text, "    library {}", unit.use_library_list.join(", "));
        }
        for (library, names) in &unit.use_unit_list {
            if names.is_empty() {
                let _ = writeln!(text, "    use {library}.all");
            }
            for name in names {
                let _ = writeln!(text, "    use {library}.{name}");
            }
        }
        for instance in unit.instances() {
            let _ = writeln!(text, "    {instance}");
        }
    }
    text
}

/// JSON array of every unit.
pub fn render_json(units: &[LibraryUnit]) -> miette::Result<String> {
    let json = serde_json::to_string_pretty(units).map_err(|e| HdlSortError::Output {
        message: format!("Failed to serialize units: {e}"),
    })?;
    Ok(json)
}
