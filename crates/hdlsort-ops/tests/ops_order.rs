use std::fs;
use std::path::Path;

use hdlsort_core::config::{OutputOptions, ProjectConfig};
use hdlsort_ops::ops_order::{order, plan};
use hdlsort_ops::ops_units::{render_json, render_text, units};
use hdlsort_resolver::diagnostics::Diagnostic;

fn write(dir: &Path, name: &str, text: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, text).unwrap();
}

fn file_names(files: &[&str]) -> Vec<String> {
    files.iter().map(|f| f.to_string()).collect()
}

fn base_names(plan: &hdlsort_ops::ops_order::OrderPlan) -> Vec<String> {
    plan.files
        .iter()
        .map(|f| {
            Path::new(&f.file_name)
                .file_name()
                .unwrap()
                .to_string_lossy()
                .into_owned()
        })
        .collect()
}

fn project(dir: &Path) {
    write(dir, "src/pkg.vhd", "package p is\n  constant w : integer := 8;\nend p;\n");
    write(
        dir,
        "src/top.vhd",
        "use work.p.all;\nentity t is\nend t;\narchitecture a of t is\nbegin\nend a;\n",
    );
    write(dir, "src/top.vhd~", "garbage");
    write(dir, "src/.hidden/x.vhd", "package hidden is end hidden;\n");
}

#[test]
fn test_plan_orders_package_first() {
    let tmp = tempfile::tempdir().unwrap();
    project(tmp.path());
    let config = ProjectConfig::single("work", vec![tmp.path().join("src")]);
    let plan = plan(&config).unwrap();
    assert_eq!(plan.file_count, 2);
    assert_eq!(plan.unit_count, 3);
    assert_eq!(base_names(&plan), file_names(&["pkg.vhd", "top.vhd"]));
    assert!(plan.diagnostics.is_empty());
}

#[test]
fn test_order_prints_when_no_output_configured() {
    let tmp = tempfile::tempdir().unwrap();
    project(tmp.path());
    let config = ProjectConfig::single("work", vec![tmp.path().join("src")]);
    let mut out = Vec::new();
    let result = order(&config, &mut out).unwrap();
    assert_eq!(result.groups.len(), 1);
    assert!(result.groups[0].drivers.printed);

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("pkg.vhd"));
    assert!(lines[1].ends_with("top.vhd"));
}

#[test]
fn test_order_writes_list_and_archive() {
    let tmp = tempfile::tempdir().unwrap();
    project(tmp.path());
    let mut config = ProjectConfig::single("work", vec![tmp.path().join("src")]);
    let list = tmp.path().join("out/order.txt");
    let archive = tmp.path().join("out/all.vhd");
    config.output = Some(OutputOptions {
        format: "{library_name} #{file_name}".to_string(),
        output: Some(list.clone()),
        archive: Some(archive.clone()),
        ..OutputOptions::default()
    });

    let mut out = Vec::new();
    let result = order(&config, &mut out).unwrap();
    assert!(out.is_empty());
    assert!(result.groups[0].drivers.written);
    assert!(result.groups[0].drivers.archived);

    let listed = fs::read_to_string(&list).unwrap();
    assert!(listed.starts_with("WORK "));
    assert_eq!(listed.lines().count(), 2);

    let archived = fs::read_to_string(&archive).unwrap();
    let pkg = archived.find("package p is").unwrap();
    let top = archived.find("entity t is").unwrap();
    assert!(pkg < top);
}

#[test]
fn test_library_groups_are_filtered() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "util/types.vhd", "package types is end types;\n");
    write(
        tmp.path(),
        "app/app.vhd",
        "library util;\nuse util.types.all;\nentity app is end app;\n",
    );
    let toml = r#"
[[library]]
name = "util"
paths = ["util"]
[library.output]
print = true

[[library]]
name = "work"
paths = ["app"]
[library.output]
print = true
format = "{library_name}:{file_name}"
"#;
    let config_path = tmp.path().join("HdlSort.toml");
    fs::write(&config_path, toml).unwrap();
    let config = ProjectConfig::from_path(&config_path).unwrap();

    let mut out = Vec::new();
    let result = order(&config, &mut out).unwrap();
    assert_eq!(result.groups.len(), 2);
    assert_eq!(result.groups[0].library.as_deref(), Some("UTIL"));
    assert_eq!(result.groups[0].files, 1);

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("types.vhd"));
    assert!(lines[1].starts_with("WORK:"));
}

#[test]
fn test_top_and_selection_reduce_the_order() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "src/core.vhd", "entity core is end core;\n");
    write(tmp.path(), "src/core_fast.vhd", "architecture fast of core is begin end fast;\n");
    write(tmp.path(), "src/core_slow.vhd", "architecture slow of core is begin end slow;\n");
    write(
        tmp.path(),
        "src/top.vhd",
        "entity top is end top;\narchitecture rtl of top is begin\n c : core port map (x);\nend rtl;\n",
    );
    write(tmp.path(), "src/unused.vhd", "package unused is end unused;\n");

    let mut config = ProjectConfig::single("work", vec![tmp.path().join("src")]);
    config.libraries[0].use_entity = vec!["core(fast)".to_string(), "bad(".to_string()];
    config.libraries[0].top = vec!["top".to_string()];

    let plan = plan(&config).unwrap();
    assert_eq!(
        base_names(&plan),
        file_names(&["core.vhd", "core_fast.vhd", "top.vhd"])
    );
    let malformed: Vec<&Diagnostic> = plan
        .diagnostics
        .iter()
        .filter(|d| matches!(d, Diagnostic::MalformedBinding { .. }))
        .collect();
    assert_eq!(malformed.len(), 1);
}

#[test]
fn test_unterminated_unit_is_diagnosed() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "broken.vhd", "entity broken is\n  port (a : in bit);\n");
    let config = ProjectConfig::single("work", vec![tmp.path().join("broken.vhd")]);
    let plan = plan(&config).unwrap();
    assert!(plan.files.is_empty());
    assert_eq!(plan.diagnostics.len(), 1);
    assert!(matches!(
        plan.diagnostics.iter().next(),
        Some(Diagnostic::UnterminatedUnit { line: 1, .. })
    ));
}

#[test]
fn test_missing_path_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let config = ProjectConfig::single("work", vec![tmp.path().join("nope")]);
    assert!(plan(&config).is_err());
}

#[cfg(unix)]
#[test]
fn test_execute_runs_once_per_file() {
    let tmp = tempfile::tempdir().unwrap();
    project(tmp.path());
    let log = tmp.path().join("log.txt");
    let mut config = ProjectConfig::single("work", vec![tmp.path().join("src")]);
    config.output = Some(OutputOptions {
        execute: Some(format!("echo {{library_name}} >> {}", log.display())),
        ..OutputOptions::default()
    });

    let mut out = Vec::new();
    let result = order(&config, &mut out).unwrap();
    assert_eq!(result.groups[0].drivers.commands_run, 2);
    assert_eq!(result.groups[0].drivers.commands_failed, 0);
    assert_eq!(fs::read_to_string(&log).unwrap(), "WORK\nWORK\n");
}

#[cfg(unix)]
#[test]
fn test_execute_exports_file_and_library() {
    let tmp = tempfile::tempdir().unwrap();
    project(tmp.path());
    let log = tmp.path().join("env.txt");
    let mut config = ProjectConfig::single("work", vec![tmp.path().join("src")]);
    config.output = Some(OutputOptions {
        execute: Some(format!(
            "basename \"$HDLSORT_FILE_NAME\" >> {log} && echo \"$HDLSORT_LIBRARY_NAME\" >> {log}",
            log = log.display()
        )),
        ..OutputOptions::default()
    });

    let mut out = Vec::new();
    order(&config, &mut out).unwrap();
    assert_eq!(
        fs::read_to_string(&log).unwrap(),
        "pkg.vhd\nWORK\ntop.vhd\nWORK\n"
    );
}

#[cfg(unix)]
#[test]
fn test_failing_command_is_counted_not_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    project(tmp.path());
    let mut config = ProjectConfig::single("work", vec![tmp.path().join("src")]);
    config.output = Some(OutputOptions {
        execute: Some("exit 1".to_string()),
        print: true,
        ..OutputOptions::default()
    });

    let mut out = Vec::new();
    let result = order(&config, &mut out).unwrap();
    assert_eq!(result.groups[0].drivers.commands_run, 2);
    assert_eq!(result.groups[0].drivers.commands_failed, 2);
    assert!(result.groups[0].drivers.printed);
}

#[test]
fn test_units_listing() {
    let tmp = tempfile::tempdir().unwrap();
    project(tmp.path());
    let config = ProjectConfig::single("work", vec![tmp.path().join("src")]);
    let analysis = units(&config).unwrap();
    let units = analysis.corpus.units();

    let text = render_text(units);
    assert!(text.contains("package WORK.P"));
    assert!(text.contains("architecture WORK.T(A)"));
    assert!(text.contains("    use WORK.P"));

    let json: serde_json::Value = serde_json::from_str(&render_json(units).unwrap()).unwrap();
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 3);
    assert_eq!(list[0]["kind"], "Package");
    assert_eq!(list[2]["kind"], "Architecture");
    assert_eq!(list[2]["arch_name"], "A");
    assert_eq!(list[2]["name"], "T");
}
