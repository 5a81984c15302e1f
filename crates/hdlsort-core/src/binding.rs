//! Binding requests: `LIBRARY.ENTITY(ARCHITECTURE)`, `ENTITY(ARCHITECTURE)`
//! or a bare `ENTITY`.

use std::fmt;

use hdlsort_util::errors::HdlSortError;
use serde::Serialize;

/// Which architecture(s) of an entity a request selects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ArchitectureSelector {
    /// Exactly the named architecture.
    Named(String),
    /// Every architecture of the entity. As a top-level request, more than
    /// one candidate is reported as a conflict and all of them are kept.
    Wildcard,
}

/// A request to bind (or build) an entity from a given library.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BindingRequest {
    pub library_name: String,
    pub entity_name: String,
    pub architecture: ArchitectureSelector,
}

impl BindingRequest {
    pub fn new(library: &str, entity: &str, architecture: ArchitectureSelector) -> Self {
        Self {
            library_name: library.to_ascii_uppercase(),
            entity_name: entity.to_ascii_uppercase(),
            architecture: match architecture {
                ArchitectureSelector::Named(arch) => {
                    ArchitectureSelector::Named(arch.to_ascii_uppercase())
                }
                ArchitectureSelector::Wildcard => ArchitectureSelector::Wildcard,
            },
        }
    }

    /// Parse the textual form, filling in `default_library` when the text
    /// does not name one. A bare entity name selects every architecture.
    pub fn parse(text: &str, default_library: &str) -> Result<Self, HdlSortError> {
        let malformed = || HdlSortError::Binding {
            message: text.to_string(),
        };
        let text = text.trim();

        let (path, architecture) = match text.find('(') {
            Some(open) => {
                let arch = text[open + 1..]
                    .strip_suffix(')')
                    .ok_or_else(malformed)?
                    .trim();
                if !is_word(arch) {
                    return Err(malformed());
                }
                (&text[..open], ArchitectureSelector::Named(arch.to_string()))
            }
            None => (text, ArchitectureSelector::Wildcard),
        };

        let parts: Vec<&str> = path.split('.').map(str::trim).collect();
        let (library, entity) = match parts.as_slice() {
            [entity] => (default_library, *entity),
            [library, entity] => (*library, *entity),
            _ => return Err(malformed()),
        };
        if !is_word(library) || !is_word(entity) {
            return Err(malformed());
        }

        Ok(Self::new(library, entity, architecture))
    }

    /// The requested architecture name, if one was given.
    pub fn arch_name(&self) -> Option<&str> {
        match &self.architecture {
            ArchitectureSelector::Named(arch) => Some(arch),
            ArchitectureSelector::Wildcard => None,
        }
    }
}

impl fmt::Display for BindingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.library_name, self.entity_name)?;
        if let Some(arch) = self.arch_name() {
            write!(f, "({arch})")?;
        }
        Ok(())
    }
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}
