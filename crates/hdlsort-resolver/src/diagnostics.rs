//! Non-fatal findings reported while resolving and ordering units.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Note,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => f.write_str("note"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// A single finding. None of these stop the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A unit was still open when its file ended; it is left out of the corpus.
    UnterminatedUnit {
        file: String,
        unit: String,
        line: usize,
    },
    /// A use clause names something no unit in that library defines.
    UnresolvedUse {
        unit: String,
        library: String,
        name: String,
    },
    /// A use or library clause names a library with no sources.
    UnknownLibrary { unit: String, library: String },
    /// No architecture satisfies an instantiation.
    InstanceNotFound { unit: String, instance: String },
    /// A top-level or selection request matches no architecture.
    TopNotFound { request: String },
    /// A request without an architecture matches several.
    Conflict {
        request: String,
        candidates: Vec<String>,
    },
    /// A file uses a name no file defines.
    UndefinedName { file: String, name: String },
    /// Files that depend on each other.
    DependencyCycle { files: Vec<String> },
    MalformedBinding { text: String, reason: String },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::UnknownLibrary { .. } => Severity::Note,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnterminatedUnit { file, unit, line } => {
                write!(f, "{file}:{line}: {unit} is not terminated; skipped")
            }
            Diagnostic::UnresolvedUse {
                unit,
                library,
                name,
            } => write!(f, "{unit}: use of {library}.{name} does not resolve"),
            Diagnostic::UnknownLibrary { unit, library } => {
                write!(f, "{unit}: library {library} has no sources")
            }
            Diagnostic::InstanceNotFound { unit, instance } => {
                write!(f, "{unit}: no architecture found for {instance}")
            }
            Diagnostic::TopNotFound { request } => {
                write!(f, "no architecture matches {request}")
            }
            Diagnostic::Conflict {
                request,
                candidates,
            } => write!(
                f,
                "{request} is ambiguous, using all of: {}",
                candidates.join(", ")
            ),
            Diagnostic::UndefinedName { file, name } => {
                write!(f, "{file}: no file defines {name}")
            }
            Diagnostic::DependencyCycle { files } => {
                write!(f, "dependency cycle between {}", files.join(", "))
            }
            Diagnostic::MalformedBinding { text, reason } => {
                write!(f, "ignoring binding request '{text}': {reason}")
            }
        }
    }
}

/// Append-only list of findings in the order they were recorded.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic. Callers print the stream themselves, so the
    /// log mirror stays at debug level.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(severity = %diagnostic.severity(), "{diagnostic}");
        self.items.push(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Number of findings with warning severity.
    pub fn warning_count(&self) -> usize {
        self.items
            .iter()
            .filter(|d| d.severity() == Severity::Warning)
            .count()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
