//! Design-unit records produced by the extractor.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Name of the library that always denotes the enclosing unit's own library.
pub const WORK_LIBRARY: &str = "WORK";

/// Libraries and names imported by a unit, keyed by library name.
pub type UseUnitList = BTreeMap<String, BTreeSet<String>>;

/// One `use lib.name[.item];` clause, or a bare library reference when
/// `name` is `None` (`use lib.all;`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseClause {
    pub library: String,
    pub name: Option<String>,
}

impl UseClause {
    pub fn new(library: impl Into<String>, name: Option<String>) -> Self {
        Self {
            library: library.into().to_ascii_uppercase(),
            name: name.map(|n| n.to_ascii_uppercase()),
        }
    }
}

/// The target of an instantiation: exactly one of entity or component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InstanceTarget {
    Entity {
        name: String,
        architecture: Option<String>,
    },
    Component {
        name: String,
    },
}

/// An instantiation statement recovered from an architecture body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instance {
    pub label: String,
    pub library: Option<String>,
    #[serde(flatten)]
    pub target: InstanceTarget,
}

impl Instance {
    /// Name of the entity (or component) being instantiated.
    pub fn target_name(&self) -> &str {
        match &self.target {
            InstanceTarget::Entity { name, .. } | InstanceTarget::Component { name } => name,
        }
    }

    /// Requested architecture, if the instance names one.
    pub fn architecture(&self) -> Option<&str> {
        match &self.target {
            InstanceTarget::Entity { architecture, .. } => architecture.as_deref(),
            InstanceTarget::Component { .. } => None,
        }
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : ", self.label)?;
        match &self.target {
            InstanceTarget::Entity { .. } => write!(f, "entity ")?,
            InstanceTarget::Component { .. } => write!(f, "component ")?,
        }
        if let Some(lib) = &self.library {
            write!(f, "{lib}.")?;
        }
        write!(f, "{}", self.target_name())?;
        if let Some(arch) = self.architecture() {
            write!(f, "({arch})")?;
        }
        Ok(())
    }
}

/// The four kinds of design unit. Architectures carry their own name and
/// the instances mined from their body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum UnitKind {
    Entity,
    Architecture {
        arch_name: String,
        instances: Vec<Instance>,
    },
    Package,
    PackageBody,
}

impl UnitKind {
    pub fn label(&self) -> &'static str {
        match self {
            UnitKind::Entity => "entity",
            UnitKind::Architecture { .. } => "architecture",
            UnitKind::Package => "package",
            UnitKind::PackageBody => "package body",
        }
    }
}

/// An entity, architecture, package or package body found in a source file.
///
/// `name` is the entity name for an architecture, so several architectures
/// may share it; entities and packages are unique per library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryUnit {
    #[serde(flatten)]
    pub kind: UnitKind,
    pub name: String,
    pub library_name: String,
    pub file_name: String,
    pub begin_line: usize,
    pub end_line: usize,
    pub use_library_list: Vec<String>,
    pub use_unit_list: UseUnitList,
}

impl LibraryUnit {
    /// Build a unit from its opening declaration and the clauses preceding it.
    ///
    /// `WORK` in any clause is rewritten to `library_name`.
    pub fn new(
        kind: UnitKind,
        name: &str,
        library_name: &str,
        file_name: &str,
        begin_line: usize,
        libraries: &[String],
        uses: &[UseClause],
    ) -> Self {
        let library_name = library_name.to_ascii_uppercase();

        let mut use_library_list: Vec<String> = Vec::new();
        for lib in libraries {
            let lib = resolve_work(&lib.to_ascii_uppercase(), &library_name);
            if !use_library_list.contains(&lib) {
                use_library_list.push(lib);
            }
        }

        let mut use_unit_list = UseUnitList::new();
        for clause in uses {
            let lib = resolve_work(&clause.library, &library_name);
            let names = use_unit_list.entry(lib).or_default();
            if let Some(name) = &clause.name {
                names.insert(name.clone());
            }
        }

        Self {
            kind,
            name: name.to_ascii_uppercase(),
            library_name,
            file_name: file_name.to_string(),
            begin_line,
            end_line: begin_line,
            use_library_list,
            use_unit_list,
        }
    }

    pub fn is_architecture(&self) -> bool {
        matches!(self.kind, UnitKind::Architecture { .. })
    }

    /// Architecture identifier, for architectures only.
    pub fn arch_name(&self) -> Option<&str> {
        match &self.kind {
            UnitKind::Architecture { arch_name, .. } => Some(arch_name),
            _ => None,
        }
    }

    /// Instances mined from an architecture body; empty for other kinds.
    pub fn instances(&self) -> &[Instance] {
        match &self.kind {
            UnitKind::Architecture { instances, .. } => instances,
            _ => &[],
        }
    }

    /// Whether the unit defines its `name` in the library namespace.
    pub fn defines_name(&self) -> bool {
        matches!(self.kind, UnitKind::Entity | UnitKind::Package)
    }

    /// Libraries this unit may draw instances from: those named in library
    /// clauses followed by those named in use clauses.
    pub fn referenced_libraries(&self) -> Vec<&str> {
        let mut libs: Vec<&str> = self.use_library_list.iter().map(String::as_str).collect();
        for lib in self.use_unit_list.keys() {
            if !libs.contains(&lib.as_str()) {
                libs.push(lib);
            }
        }
        libs
    }
}

impl fmt::Display for LibraryUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            UnitKind::Architecture { arch_name, .. } => write!(
                f,
                "architecture {}.{}({})",
                self.library_name, self.name, arch_name
            ),
            kind => write!(f, "{} {}.{}", kind.label(), self.library_name, self.name),
        }
    }
}

pub(crate) fn resolve_work(library: &str, own_library: &str) -> String {
    if library == WORK_LIBRARY {
        own_library.to_string()
    } else {
        library.to_string()
    }
}
