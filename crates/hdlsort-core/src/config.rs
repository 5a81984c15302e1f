use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use hdlsort_util::errors::HdlSortError;

use crate::template::DEFAULT_FORMAT;
use crate::unit::WORK_LIBRARY;

/// Name of the project configuration file.
pub const CONFIG_FILE_NAME: &str = "HdlSort.toml";

/// The parsed representation of an `HdlSort.toml` file, or the same
/// information assembled from command-line flags.
///
/// Built once before analysis starts and not modified afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub ordering: OrderingConfig,

    /// Output for the all-libraries group.
    #[serde(default)]
    pub output: Option<OutputOptions>,

    #[serde(default, rename = "library")]
    pub libraries: Vec<LibraryConfig>,
}

/// How the file order is computed, from `[ordering]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderingConfig {
    #[serde(default)]
    pub strategy: LevelingStrategy,
    /// Let use clauses naming another library add ordering edges.
    #[serde(default, rename = "cross-library")]
    pub cross_library: bool,
}

/// Level assignment algorithm for the file graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelingStrategy {
    /// Recursive level propagation; cycles are cut silently.
    #[default]
    Propagate,
    /// Strongly-connected components with cycle diagnostics.
    Topological,
}

impl FromStr for LevelingStrategy {
    type Err = HdlSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "propagate" => Ok(Self::Propagate),
            "topological" => Ok(Self::Topological),
            other => Err(HdlSortError::Config {
                message: format!("unknown ordering strategy '{other}'"),
            }),
        }
    }
}

impl fmt::Display for LevelingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Propagate => f.write_str("propagate"),
            Self::Topological => f.write_str("topological"),
        }
    }
}

/// One library: where its sources live and what to do with its files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    pub name: String,
    #[serde(default)]
    pub paths: Vec<PathBuf>,
    /// Architecture selections, `ENTITY(ARCH)` or `LIB.ENTITY(ARCH)`.
    #[serde(default, rename = "use-entity")]
    pub use_entity: Vec<String>,
    /// Top-level entities whose closure is built.
    #[serde(default)]
    pub top: Vec<String>,
    #[serde(default)]
    pub output: Option<OutputOptions>,
}

impl LibraryConfig {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_ascii_uppercase(),
            paths: Vec::new(),
            use_entity: Vec::new(),
            top: Vec::new(),
            output: None,
        }
    }
}

/// What to do with an ordered file list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputOptions {
    #[serde(default)]
    pub print: bool,
    #[serde(default = "default_format")]
    pub format: String,
    /// Shell command template run once per file.
    #[serde(default)]
    pub execute: Option<String>,
    /// File receiving the formatted list.
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// File receiving the concatenated sources.
    #[serde(default)]
    pub archive: Option<PathBuf>,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            print: false,
            format: default_format(),
            execute: None,
            output: None,
            archive: None,
        }
    }
}

impl OutputOptions {
    /// True when no driver is selected.
    pub fn is_idle(&self) -> bool {
        !self.print && self.execute.is_none() && self.output.is_none() && self.archive.is_none()
    }
}

fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

impl ProjectConfig {
    /// A configuration with a single library.
    pub fn single(library: &str, paths: Vec<PathBuf>) -> Self {
        let mut lib = LibraryConfig::new(library);
        lib.paths = paths;
        Self {
            libraries: vec![lib],
            ..Self::default()
        }
    }

    /// Load and parse an `HdlSort.toml` file from the given path.
    ///
    /// Relative source, output and archive paths are taken relative to the
    /// directory holding the file.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| HdlSortError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        let mut config = Self::from_str(&content)?;
        let base = path.parent().unwrap_or(Path::new("."));
        config.rebase(base);
        Ok(config)
    }

    /// Parse an `HdlSort.toml` from a string.
    pub fn from_str(content: &str) -> miette::Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(|e| HdlSortError::Config {
            message: format!("Failed to parse {CONFIG_FILE_NAME}: {e}"),
        })?;
        config.normalize()?;
        Ok(config)
    }

    /// Upper-case library names and fold duplicate `[[library]]` entries.
    fn normalize(&mut self) -> Result<(), HdlSortError> {
        let mut merged: Vec<LibraryConfig> = Vec::new();
        for mut lib in std::mem::take(&mut self.libraries) {
            lib.name = lib.name.trim().to_ascii_uppercase();
            if lib.name.is_empty() {
                return Err(HdlSortError::Config {
                    message: "library name must not be empty".to_string(),
                });
            }
            match merged.iter_mut().find(|m| m.name == lib.name) {
                Some(existing) => {
                    existing.paths.extend(lib.paths);
                    existing.use_entity.extend(lib.use_entity);
                    existing.top.extend(lib.top);
                    if lib.output.is_some() {
                        existing.output = lib.output;
                    }
                }
                None => merged.push(lib),
            }
        }
        self.libraries = merged;
        Ok(())
    }

    fn rebase(&mut self, base: &Path) {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        let rebase_output = |out: &mut OutputOptions| {
            out.output.iter_mut().for_each(join);
            out.archive.iter_mut().for_each(join);
        };
        if let Some(out) = self.output.as_mut() {
            rebase_output(out);
        }
        for lib in &mut self.libraries {
            lib.paths.iter_mut().for_each(join);
            if let Some(out) = lib.output.as_mut() {
                rebase_output(out);
            }
        }
    }

    /// Look up a library, adding an empty entry if it is not configured yet.
    pub fn library_mut(&mut self, name: &str) -> &mut LibraryConfig {
        let name = name.to_ascii_uppercase();
        let idx = match self.libraries.iter().position(|lib| lib.name == name) {
            Some(idx) => idx,
            None => {
                self.libraries.push(LibraryConfig::new(&name));
                self.libraries.len() - 1
            }
        };
        &mut self.libraries[idx]
    }

    /// Name of the library that unqualified binding requests default to.
    pub fn default_library(&self) -> &str {
        self.libraries
            .first()
            .map_or(WORK_LIBRARY, |lib| lib.name.as_str())
    }
}
