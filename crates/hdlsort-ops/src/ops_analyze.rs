//! Operation: read every configured source path into a unit corpus.

use hdlsort_core::config::ProjectConfig;
use hdlsort_core::reader::read_file;
use hdlsort_resolver::corpus::UnitCorpus;
use hdlsort_resolver::diagnostics::{Diagnostic, Diagnostics};
use hdlsort_util::fs::collect_source_files;

/// Everything extracted from the configured sources.
#[derive(Debug, Default)]
pub struct Analysis {
    pub corpus: UnitCorpus,
    pub diagnostics: Diagnostics,
    /// Number of files read.
    pub file_count: usize,
}

/// Walk every library's paths in configuration order and extract units.
///
/// A path that cannot be read stops the run. Units left open at the end of
/// a file are reported and left out of the corpus.
pub fn analyze(config: &ProjectConfig) -> miette::Result<Analysis> {
    let mut analysis = Analysis::default();

    for library in &config.libraries {
        for path in &library.paths {
            for file in collect_source_files(path)? {
                let found = read_file(&file, &library.name)?;
                analysis.file_count += 1;
                if let Some(open) = found.unterminated {
                    analysis.diagnostics.push(Diagnostic::UnterminatedUnit {
                        file: open.file_name.clone(),
                        unit: open.to_string(),
                        line: open.begin_line,
                    });
                }
                analysis.corpus.extend(found.units);
            }
        }
    }

    tracing::info!(
        files = analysis.file_count,
        units = analysis.corpus.len(),
        "analysis finished"
    );
    Ok(analysis)
}
