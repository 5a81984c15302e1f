//! Operation: compute the compilation order and hand it to the output drivers.
//!
//! Pipeline: analyze sources, apply architecture selections, reduce to the
//! closure of the top-level entities when any are configured, level the
//! files, then run each group's drivers.

use std::io::Write;

use hdlsort_core::binding::BindingRequest;
use hdlsort_core::config::{OutputOptions, ProjectConfig};
use hdlsort_resolver::diagnostics::{Diagnostic, Diagnostics};
use hdlsort_resolver::leveler::{level_files, UnitFile};

use crate::ops_analyze::analyze;
use crate::output::{run_drivers, DriverReport};

/// The leveled file list, before any output is produced.
#[derive(Debug)]
pub struct OrderPlan {
    /// Files in build order across all libraries.
    pub files: Vec<UnitFile>,
    pub diagnostics: Diagnostics,
    pub file_count: usize,
    pub unit_count: usize,
}

impl OrderPlan {
    /// Files of one output group: every file, or only those of `library`.
    pub fn group(&self, library: Option<&str>) -> Vec<&UnitFile> {
        self.files
            .iter()
            .filter(|f| library.map_or(true, |lib| f.library_name == lib))
            .collect()
    }
}

/// One group whose drivers ran.
#[derive(Debug)]
pub struct GroupReport {
    /// `None` for the all-libraries group.
    pub library: Option<String>,
    pub files: usize,
    pub drivers: DriverReport,
}

#[derive(Debug)]
pub struct OrderResult {
    pub plan: OrderPlan,
    pub groups: Vec<GroupReport>,
}

/// Parse binding requests, reporting the malformed ones instead of failing.
fn parse_requests(texts: &[String], default_library: &str, diags: &mut Diagnostics) -> Vec<BindingRequest> {
    texts
        .iter()
        .filter_map(|text| match BindingRequest::parse(text, default_library) {
            Ok(request) => Some(request),
            Err(e) => {
                diags.push(Diagnostic::MalformedBinding {
                    text: text.clone(),
                    reason: e.to_string(),
                });
                None
            }
        })
        .collect()
}

/// Analyze, select, close and level, without producing output.
pub fn plan(config: &ProjectConfig) -> miette::Result<OrderPlan> {
    let analysis = analyze(config)?;
    let mut diagnostics = analysis.diagnostics;
    let mut corpus = analysis.corpus;

    let mut selections = Vec::new();
    let mut tops = Vec::new();
    for library in &config.libraries {
        selections.extend(parse_requests(&library.use_entity, &library.name, &mut diagnostics));
        tops.extend(parse_requests(&library.top, &library.name, &mut diagnostics));
    }

    if !selections.is_empty() {
        corpus.retain_selected_architectures(&selections, &mut diagnostics);
    }
    if !tops.is_empty() {
        corpus = corpus.compute_closure(&tops, &mut diagnostics);
    }

    let files = level_files(corpus.units(), &config.ordering, &mut diagnostics);
    tracing::info!(files = files.len(), "order computed");

    Ok(OrderPlan {
        files,
        diagnostics,
        file_count: analysis.file_count,
        unit_count: corpus.len(),
    })
}

/// Compute the order and run every group's output drivers.
///
/// The all-libraries group runs first, then each library in configuration
/// order. When no group has output configured, the whole list is printed.
pub fn order(config: &ProjectConfig, out: &mut dyn Write) -> miette::Result<OrderResult> {
    let plan = plan(config)?;

    let mut groups: Vec<(Option<&str>, OutputOptions)> = Vec::new();
    if let Some(opts) = &config.output {
        groups.push((None, opts.clone()));
    }
    for library in &config.libraries {
        if let Some(opts) = &library.output {
            groups.push((Some(library.name.as_str()), opts.clone()));
        }
    }
    if groups.iter().all(|(_, opts)| opts.is_idle()) {
        let mut fallback = groups
            .first()
            .map(|(_, opts)| opts.clone())
            .unwrap_or_default();
        fallback.print = true;
        groups = vec![(None, fallback)];
    }

    let mut reports = Vec::new();
    for (library, opts) in groups {
        let files = plan.group(library);
        let drivers = run_drivers(&files, &opts, out)?;
        reports.push(GroupReport {
            library: library.map(str::to_string),
            files: files.len(),
            drivers,
        });
    }

    Ok(OrderResult {
        plan,
        groups: reports,
    })
}
