//! The unit corpus: every extracted unit, in extraction order, with
//! library-aware lookup of instantiation targets and top-level closure.

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

use hdlsort_core::binding::{ArchitectureSelector, BindingRequest};
use hdlsort_core::unit::{Instance, LibraryUnit};

use crate::diagnostics::{Diagnostic, Diagnostics};

/// All units known to one run. Insertion order is kept so every result
/// derived from the corpus is deterministic.
#[derive(Debug, Default, Clone)]
pub struct UnitCorpus {
    units: Vec<LibraryUnit>,
}

impl UnitCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_units(units: Vec<LibraryUnit>) -> Self {
        Self { units }
    }

    pub fn extend(&mut self, units: impl IntoIterator<Item = LibraryUnit>) {
        self.units.extend(units);
    }

    pub fn units(&self) -> &[LibraryUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Whether any unit belongs to `library`.
    pub fn has_library(&self, library: &str) -> bool {
        self.units.iter().any(|u| u.library_name == library)
    }

    /// Indices of architectures of `library.entity` whose name passes `arch`.
    fn architecture_indices(&self, library: &str, entity: &str, arch: Option<&str>) -> Vec<usize> {
        self.units
            .iter()
            .enumerate()
            .filter(|(_, u)| u.library_name == library && u.name == entity)
            .filter(|(_, u)| match (u.arch_name(), arch) {
                (Some(_), None) => true,
                (Some(have), Some(want)) => have == want,
                (None, _) => false,
            })
            .map(|(i, _)| i)
            .collect()
    }

    fn instance_target_indices(&self, architecture: &LibraryUnit, instance: &Instance) -> Vec<usize> {
        let name = instance.target_name();
        let arch = instance.architecture();

        if let Some(library) = &instance.library {
            return self.architecture_indices(library, name, arch);
        }

        let own = self.architecture_indices(&architecture.library_name, name, arch);
        if !own.is_empty() {
            return own;
        }
        architecture
            .referenced_libraries()
            .into_iter()
            .filter(|lib| *lib != architecture.library_name)
            .map(|lib| self.architecture_indices(lib, name, arch))
            .find(|found| !found.is_empty())
            .unwrap_or_default()
    }

    /// Architectures that satisfy `instance` inside `architecture`.
    ///
    /// Without an explicit library the architecture's own library is searched
    /// first, then each library it references, stopping at the first hit.
    /// An explicit library is the only one searched.
    pub fn find_instance_targets(
        &self,
        architecture: &LibraryUnit,
        instance: &Instance,
    ) -> Vec<&LibraryUnit> {
        self.instance_target_indices(architecture, instance)
            .into_iter()
            .map(|i| &self.units[i])
            .collect()
    }

    /// Non-architecture units named `library.name`.
    fn named_unit_indices(&self, library: &str, name: &str) -> Vec<usize> {
        self.units
            .iter()
            .enumerate()
            .filter(|(_, u)| !u.is_architecture() && u.library_name == library && u.name == name)
            .map(|(i, _)| i)
            .collect()
    }

    /// The minimal set of units needed to build `tops`, in corpus order.
    ///
    /// Unresolved names, missing instances and ambiguous requests are
    /// reported to `diags`; none of them stops the search.
    pub fn compute_closure(&self, tops: &[BindingRequest], diags: &mut Diagnostics) -> UnitCorpus {
        let mut required: BTreeSet<usize> = BTreeSet::new();
        let mut reached: HashSet<(&str, &str)> = HashSet::new();
        let mut unknown_libraries: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<usize> = VecDeque::new();

        for top in tops {
            let found = self.architecture_indices(&top.library_name, &top.entity_name, top.arch_name());
            if found.is_empty() {
                diags.push(Diagnostic::TopNotFound {
                    request: top.to_string(),
                });
                continue;
            }
            if top.architecture == ArchitectureSelector::Wildcard && found.len() > 1 {
                diags.push(Diagnostic::Conflict {
                    request: top.to_string(),
                    candidates: found
                        .iter()
                        .filter_map(|&i| self.units[i].arch_name().map(str::to_string))
                        .collect(),
                });
            }
            for idx in found {
                if required.insert(idx) {
                    queue.push_back(idx);
                }
            }
        }

        while let Some(idx) = queue.pop_front() {
            let unit = &self.units[idx];
            tracing::trace!(unit = %unit, "closure visit");

            for (library, names) in &unit.use_unit_list {
                let library = library.as_str();
                if !self.has_library(library) {
                    if unknown_libraries.insert(library) {
                        diags.push(Diagnostic::UnknownLibrary {
                            unit: unit.to_string(),
                            library: library.to_string(),
                        });
                    }
                    continue;
                }
                for name in names {
                    if !reached.insert((library, name.as_str())) {
                        continue;
                    }
                    let hits = self.named_unit_indices(library, name);
                    if hits.is_empty() {
                        diags.push(Diagnostic::UnresolvedUse {
                            unit: unit.to_string(),
                            library: library.to_string(),
                            name: name.clone(),
                        });
                    }
                    for hit in hits {
                        if required.insert(hit) {
                            queue.push_back(hit);
                        }
                    }
                }
            }

            for instance in unit.instances() {
                let targets = self.instance_target_indices(unit, instance);
                if targets.is_empty() {
                    diags.push(Diagnostic::InstanceNotFound {
                        unit: unit.to_string(),
                        instance: instance.to_string(),
                    });
                }
                for target in targets {
                    if required.insert(target) {
                        queue.push_back(target);
                    }
                }
            }
        }

        tracing::debug!(tops = tops.len(), units = required.len(), "closure computed");
        UnitCorpus::from_units(required.into_iter().map(|i| self.units[i].clone()).collect())
    }

    /// Drop architectures that lose an architecture selection.
    ///
    /// For every entity named by a selection, only the selected architectures
    /// stay. Selections without an architecture are reported as malformed, and
    /// selections naming an architecture that does not exist are reported as
    /// not found.
    pub fn retain_selected_architectures(
        &mut self,
        selections: &[BindingRequest],
        diags: &mut Diagnostics,
    ) {
        let mut selected: BTreeMap<(String, String), BTreeSet<String>> = BTreeMap::new();
        for request in selections {
            let Some(arch) = request.arch_name() else {
                diags.push(Diagnostic::MalformedBinding {
                    text: request.to_string(),
                    reason: "an architecture selection must name an architecture".to_string(),
                });
                continue;
            };
            if self
                .architecture_indices(&request.library_name, &request.entity_name, Some(arch))
                .is_empty()
            {
                diags.push(Diagnostic::TopNotFound {
                    request: request.to_string(),
                });
            }
            selected
                .entry((request.library_name.clone(), request.entity_name.clone()))
                .or_default()
                .insert(arch.to_string());
        }

        let before = self.units.len();
        self.units.retain(|unit| {
            let Some(arch) = unit.arch_name() else {
                return true;
            };
            match selected.get(&(unit.library_name.clone(), unit.name.clone())) {
                Some(keep) => keep.contains(arch),
                None => true,
            }
        });
        tracing::debug!(removed = before - self.units.len(), "architecture selection applied");
    }
}
