//! File leveling: fold units into per-file records, link files through the
//! names they use and define, assign each file a level and sort.
//!
//! A file sits at a higher level than every file that uses it, so sorting by
//! level descending puts definitions before their users.

use std::collections::{BTreeSet, HashMap};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::Serialize;

use hdlsort_core::config::{LevelingStrategy, OrderingConfig};
use hdlsort_core::unit::LibraryUnit;

use crate::diagnostics::{Diagnostic, Diagnostics};

/// Every unit of one source file, folded together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitFile {
    pub file_name: String,
    pub library_name: String,
    /// Entity and package names defined in the file.
    pub unit_name_list: BTreeSet<String>,
    /// `(library, name)` pairs used by the file's units.
    pub use_name_list: BTreeSet<(String, String)>,
    /// Files this one depends on.
    pub use_list: BTreeSet<String>,
    /// Files depending on this one.
    pub be_used_list: BTreeSet<String>,
    pub level: usize,
}

impl UnitFile {
    fn new(file_name: &str, library_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            library_name: library_name.to_string(),
            unit_name_list: BTreeSet::new(),
            use_name_list: BTreeSet::new(),
            use_list: BTreeSet::new(),
            be_used_list: BTreeSet::new(),
            level: 0,
        }
    }
}

/// Index-based view of the file graph while levels are assigned.
struct FileGraph {
    files: Vec<UnitFile>,
    uses: Vec<BTreeSet<usize>>,
}

impl FileGraph {
    fn build(units: &[LibraryUnit], cross_library: bool, diags: &mut Diagnostics) -> Self {
        let mut files: Vec<UnitFile> = Vec::new();
        let mut by_name: HashMap<&str, usize> = HashMap::new();

        for unit in units {
            let idx = *by_name.entry(unit.file_name.as_str()).or_insert_with(|| {
                files.push(UnitFile::new(&unit.file_name, &unit.library_name));
                files.len() - 1
            });
            let file = &mut files[idx];
            if unit.defines_name() {
                file.unit_name_list.insert(unit.name.clone());
            }
            for (library, names) in &unit.use_unit_list {
                if !cross_library && *library != file.library_name {
                    continue;
                }
                for name in names {
                    file.use_name_list.insert((library.clone(), name.clone()));
                }
            }
        }

        let mut defined: HashMap<(&str, &str), Vec<usize>> = HashMap::new();
        for (idx, file) in files.iter().enumerate() {
            for name in &file.unit_name_list {
                defined
                    .entry((file.library_name.as_str(), name.as_str()))
                    .or_default()
                    .push(idx);
            }
        }
        let known_libraries: BTreeSet<&str> =
            files.iter().map(|f| f.library_name.as_str()).collect();

        let mut uses: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); files.len()];
        for (idx, file) in files.iter().enumerate() {
            for (library, name) in &file.use_name_list {
                match defined.get(&(library.as_str(), name.as_str())) {
                    Some(definers) => {
                        uses[idx].extend(definers.iter().copied().filter(|&d| d != idx));
                    }
                    // Libraries without sources are reported by the closure.
                    None if known_libraries.contains(library.as_str()) => {
                        diags.push(Diagnostic::UndefinedName {
                            file: file.file_name.clone(),
                            name: format!("{library}.{name}"),
                        });
                    }
                    None => {}
                }
            }
        }

        for (idx, deps) in uses.iter().enumerate() {
            for &dep in deps {
                let user = files[idx].file_name.clone();
                let used = files[dep].file_name.clone();
                files[idx].use_list.insert(used);
                files[dep].be_used_list.insert(user);
            }
        }

        Self { files, uses }
    }

    /// Recursive propagation along the current chain only.
    fn propagate(&mut self) {
        let mut chain = BTreeSet::new();
        for idx in 0..self.files.len() {
            if !self.uses[idx].is_empty() {
                self.set_level(idx, 1, &mut chain);
            }
        }
    }

    fn set_level(&mut self, idx: usize, level: usize, chain: &mut BTreeSet<usize>) {
        if level <= self.files[idx].level {
            return;
        }
        self.files[idx].level = level;
        chain.insert(idx);
        let deps: Vec<usize> = self.uses[idx].iter().copied().collect();
        for dep in deps {
            if !chain.contains(&dep) {
                self.set_level(dep, level + 1, chain);
            }
        }
        chain.remove(&idx);
    }

    /// Longest paths over the strongly-connected components; each cycle is
    /// reported and its files share one level.
    fn topological(&mut self, diags: &mut Diagnostics) {
        let mut graph: DiGraph<usize, ()> = DiGraph::new();
        let nodes: Vec<NodeIndex> = (0..self.files.len()).map(|i| graph.add_node(i)).collect();
        for (idx, deps) in self.uses.iter().enumerate() {
            for &dep in deps {
                graph.add_edge(nodes[idx], nodes[dep], ());
            }
        }

        // tarjan_scc yields dependencies before their users.
        let mut components = tarjan_scc(&graph);
        components.reverse();

        let mut component_of = vec![0usize; self.files.len()];
        for (c, members) in components.iter().enumerate() {
            for node in members {
                component_of[graph[*node]] = c;
            }
        }

        let mut component_level = vec![0usize; components.len()];
        for (c, members) in components.iter().enumerate() {
            if members.len() > 1 {
                let mut files: Vec<String> = members
                    .iter()
                    .map(|n| self.files[graph[*n]].file_name.clone())
                    .collect();
                files.sort();
                diags.push(Diagnostic::DependencyCycle { files });
            }
            let mut level = usize::from(members.iter().any(|n| !self.uses[graph[*n]].is_empty()));
            for node in members {
                for user in graph.neighbors_directed(*node, Direction::Incoming) {
                    let uc = component_of[graph[user]];
                    if uc != c {
                        level = level.max(component_level[uc] + 1);
                    }
                }
            }
            component_level[c] = level;
            for node in members {
                self.files[graph[*node]].level = level;
            }
        }
    }
}

/// Fold `units` into files, level them and return them in build order:
/// level descending, then file name ascending.
///
/// Names used from another library only count when `cross_library` is set.
/// Used names that no file defines are reported and otherwise ignored.
pub fn level_files(
    units: &[LibraryUnit],
    ordering: &OrderingConfig,
    diags: &mut Diagnostics,
) -> Vec<UnitFile> {
    let mut graph = FileGraph::build(units, ordering.cross_library, diags);
    match ordering.strategy {
        LevelingStrategy::Propagate => graph.propagate(),
        LevelingStrategy::Topological => graph.topological(diags),
    }

    let mut files = graph.files;
    files.sort_by(|a, b| {
        b.level
            .cmp(&a.level)
            .then_with(|| a.file_name.cmp(&b.file_name))
    });
    tracing::debug!(
        files = files.len(),
        strategy = %ordering.strategy,
        "files leveled"
    );
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdlsort_core::reader::extract_units;

    fn units(files: &[(&str, &str, &str)]) -> Vec<LibraryUnit> {
        files
            .iter()
            .flat_map(|(name, lib, text)| extract_units(text, name, lib).units)
            .collect()
    }

    fn order(files: &[UnitFile]) -> Vec<&str> {
        files.iter().map(|f| f.file_name.as_str()).collect()
    }

    fn ordering(strategy: LevelingStrategy) -> OrderingConfig {
        OrderingConfig {
            strategy,
            cross_library: false,
        }
    }

    const CHAIN: &[(&str, &str, &str)] = &[
        ("c_top.vhd", "work", "use work.mid.all;\nentity top is end top;\n"),
        ("b_mid.vhd", "work", "use work.base.all;\npackage mid is end mid;\n"),
        ("a_base.vhd", "work", "package base is end base;\n"),
        ("z_alone.vhd", "work", "entity alone is end alone;\n"),
    ];

    #[test]
    fn chain_orders_definitions_first() {
        for strategy in [LevelingStrategy::Propagate, LevelingStrategy::Topological] {
            let mut diags = Diagnostics::new();
            let files = level_files(&units(CHAIN), &ordering(strategy), &mut diags);
            assert_eq!(
                order(&files),
                vec!["a_base.vhd", "b_mid.vhd", "c_top.vhd", "z_alone.vhd"]
            );
            let levels: Vec<usize> = files.iter().map(|f| f.level).collect();
            assert_eq!(levels, vec![3, 2, 1, 0]);
            assert!(diags.is_empty());
        }
    }

    #[test]
    fn diamond_uses_longest_path() {
        let input = units(&[
            ("top.vhd", "work", "use work.a.all, work.b.all;\nentity top is end top;\n"),
            ("a.vhd", "work", "use work.b.all;\npackage a is end a;\n"),
            ("b.vhd", "work", "package b is end b;\n"),
        ]);
        for strategy in [LevelingStrategy::Propagate, LevelingStrategy::Topological] {
            let files = level_files(&input, &ordering(strategy), &mut Diagnostics::new());
            assert_eq!(order(&files), vec!["b.vhd", "a.vhd", "top.vhd"]);
            assert_eq!(files[0].level, 3);
        }
    }

    #[test]
    fn links_are_recorded_both_ways() {
        let files = level_files(&units(CHAIN), &OrderingConfig::default(), &mut Diagnostics::new());
        let mid = files.iter().find(|f| f.file_name == "b_mid.vhd").unwrap();
        assert!(mid.use_list.contains("a_base.vhd"));
        assert!(mid.be_used_list.contains("c_top.vhd"));
        assert!(mid.unit_name_list.contains("MID"));
        assert!(mid
            .use_name_list
            .contains(&("WORK".to_string(), "BASE".to_string())));
    }

    #[test]
    fn cycles_terminate() {
        let input = units(&[
            ("a.vhd", "work", "use work.b.all;\npackage a is end a;\n"),
            ("b.vhd", "work", "use work.a.all;\npackage b is end b;\n"),
            ("top.vhd", "work", "use work.a.all;\nentity top is end top;\n"),
        ]);

        let files = level_files(&input, &OrderingConfig::default(), &mut Diagnostics::new());
        assert_eq!(files.len(), 3);
        assert_eq!(files.last().unwrap().file_name, "top.vhd");

        let mut diags = Diagnostics::new();
        let files = level_files(&input, &ordering(LevelingStrategy::Topological), &mut diags);
        assert_eq!(order(&files), vec!["a.vhd", "b.vhd", "top.vhd"]);
        assert_eq!(files[0].level, files[1].level);
        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags.iter().next(),
            Some(&Diagnostic::DependencyCycle {
                files: vec!["a.vhd".to_string(), "b.vhd".to_string()]
            })
        );
    }

    #[test]
    fn cross_library_edges_are_opt_in() {
        let input = units(&[
            ("app.vhd", "work", "library util;\nuse util.types.all;\nentity app is end app;\n"),
            ("types.vhd", "util", "package types is end types;\n"),
        ]);

        let files = level_files(&input, &OrderingConfig::default(), &mut Diagnostics::new());
        assert_eq!(order(&files), vec!["app.vhd", "types.vhd"]);
        assert!(files.iter().all(|f| f.level == 0));

        let config = OrderingConfig {
            strategy: LevelingStrategy::Propagate,
            cross_library: true,
        };
        let files = level_files(&input, &config, &mut Diagnostics::new());
        assert_eq!(order(&files), vec!["types.vhd", "app.vhd"]);
    }

    #[test]
    fn undefined_names_are_reported() {
        let input = units(&[
            ("top.vhd", "work", "use work.missing.all;\nuse ieee.std_logic_1164.all;\nentity top is end top;\n"),
        ]);
        let config = OrderingConfig {
            strategy: LevelingStrategy::Propagate,
            cross_library: true,
        };
        let mut diags = Diagnostics::new();
        let files = level_files(&input, &config, &mut diags);
        assert_eq!(files.len(), 1);
        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags.iter().next().unwrap().to_string(),
            "top.vhd: no file defines WORK.MISSING"
        );
    }

    #[test]
    fn architecture_file_follows_entity_file() {
        let input = units(&[
            ("adder_rtl.vhd", "work", "architecture rtl of adder is begin end rtl;\n"),
            ("adder.vhd", "work", "entity adder is end adder;\n"),
        ]);
        let files = level_files(&input, &OrderingConfig::default(), &mut Diagnostics::new());
        assert_eq!(order(&files), vec!["adder.vhd", "adder_rtl.vhd"]);
    }
}
