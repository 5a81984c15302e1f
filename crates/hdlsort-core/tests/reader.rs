use hdlsort_core::lexer::tokenize_line;
use hdlsort_core::reader::{extract_units, read_file};
use hdlsort_core::token::{Keyword, Symbol};
use hdlsort_core::unit::{InstanceTarget, UnitKind};

#[test]
fn test_comment_only_line_is_empty() {
    assert!(tokenize_line("   -- nothing to see here", 1).is_empty());
    assert!(tokenize_line("--entity foo is", 7).is_empty());
}

#[test]
fn test_keywords_are_case_insensitive() {
    for text in ["ENTITY", "Entity", "entity"] {
        let tokens = tokenize_line(text, 1);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].symbol, Symbol::Keyword(Keyword::Entity));
    }
}

#[test]
fn test_entity_end_forms() {
    for end in ["end foo;", "end entity;", "end;", "end entity foo;", "END FOO ;"] {
        let text = format!("entity foo is\n  port (a : in bit);\n{end}\n");
        let found = extract_units(&text, "foo.vhd", "work");
        assert_eq!(found.units.len(), 1, "{end:?}");
        let unit = &found.units[0];
        assert_eq!(unit.kind, UnitKind::Entity);
        assert_eq!(unit.name, "FOO");
        assert_eq!(unit.library_name, "WORK");
        assert_eq!(unit.begin_line, 1);
        assert_eq!(unit.end_line, 3);
        assert!(found.unterminated.is_none());
    }
}

#[test]
fn test_end_with_wrong_name_keeps_unit_open() {
    let found = extract_units("entity foo is\nend bar;\n", "foo.vhd", "work");
    assert!(found.units.is_empty());
    assert_eq!(found.unterminated.unwrap().name, "FOO");
}

#[test]
fn test_architecture_self_use() {
    let text = "\
architecture rtl of foo is
  signal s : bit;
begin
  process begin
    wait;
  end process;
end rtl;
";
    let found = extract_units(text, "foo_rtl.vhd", "mylib");
    assert_eq!(found.units.len(), 1);
    let arch = &found.units[0];
    assert_eq!(arch.name, "FOO");
    assert_eq!(arch.arch_name(), Some("RTL"));
    assert_eq!(arch.begin_line, 1);
    assert_eq!(arch.end_line, 7);
    assert!(arch.use_unit_list["MYLIB"].contains("FOO"));
}

#[test]
fn test_package_body_end_forms() {
    for end in ["end package body;", "end package body p;", "end p;"] {
        let text = format!("package body p is\n  constant c : integer := 1;\n{end}\n");
        let found = extract_units(&text, "p_body.vhd", "work");
        assert_eq!(found.units.len(), 1, "{end:?}");
        assert_eq!(found.units[0].kind, UnitKind::PackageBody);
        assert!(found.units[0].use_unit_list["WORK"].contains("P"));
    }
}

#[test]
fn test_subprogram_end_does_not_close_architecture() {
    let text = "\
architecture rtl of top is
  function f return bit is
  begin
    return '0';
  end;
begin
  u : entity work.leaf port map (x);
end rtl;
";
    let found = extract_units(text, "top.vhd", "work");
    assert_eq!(found.units.len(), 1);
    let arch = &found.units[0];
    assert_eq!(arch.end_line, 8);
    assert_eq!(arch.instances().len(), 1);
    assert_eq!(arch.instances()[0].label, "U");
    assert!(found.unterminated.is_none());
}

#[test]
fn test_subprogram_end_does_not_close_package_body() {
    let text = "\
package body p is
  procedure reset is
  begin
    null;
  end;
end package body p;
";
    let found = extract_units(text, "p_body.vhd", "work");
    assert_eq!(found.units.len(), 1);
    assert_eq!(found.units[0].kind, UnitKind::PackageBody);
    assert_eq!(found.units[0].end_line, 6);
}

#[test]
fn test_bare_end_closes_package() {
    let found = extract_units("package p is
  constant c : bit := '0';
end;
", "p.vhd", "work");
    assert_eq!(found.units.len(), 1);
    assert_eq!(found.units[0].kind, UnitKind::Package);
    assert_eq!(found.units[0].end_line, 3);
}

#[test]
fn test_clauses_attach_to_next_unit_only() {
    let text = "\
library ieee;
use ieee.std_logic_1164.all;
use work.types.all;

entity top is
end top;

architecture rtl of top is
begin
  u1 : entity work.adder(rtl) port map (a => a);
  u2 : fifo port map (x);
end architecture rtl;
";
    let found = extract_units(text, "top.vhd", "work");
    assert_eq!(found.units.len(), 2);

    let entity = &found.units[0];
    assert_eq!(entity.use_library_list, vec!["IEEE"]);
    assert!(entity.use_unit_list["IEEE"].contains("STD_LOGIC_1164"));
    assert!(entity.use_unit_list["WORK"].contains("TYPES"));

    let arch = &found.units[1];
    assert!(arch.use_library_list.is_empty());
    assert_eq!(arch.use_unit_list.len(), 1);
    assert!(arch.use_unit_list["WORK"].contains("TOP"));

    let instances = arch.instances();
    assert_eq!(instances.len(), 2);
    assert_eq!(instances[0].label, "U1");
    assert_eq!(instances[0].library.as_deref(), Some("WORK"));
    assert_eq!(
        instances[0].target,
        InstanceTarget::Entity {
            name: "ADDER".to_string(),
            architecture: Some("RTL".to_string()),
        }
    );
    assert_eq!(
        instances[1].target,
        InstanceTarget::Component {
            name: "FIFO".to_string()
        }
    );
}

#[test]
fn test_work_alias_in_instances_maps_to_own_library() {
    let text = "architecture a of t is begin\n u : entity work.x port map (p);\nend a;\n";
    let found = extract_units(text, "t.vhd", "ip");
    assert_eq!(found.units[0].instances()[0].library.as_deref(), Some("IP"));
    assert!(found.units[0].use_unit_list["IP"].contains("T"));
}

#[test]
fn test_package_instantiation_is_one_statement() {
    let text = "package int_pkg is new work.generic_pkg generic map (W => 8);\nentity e is end e;\n";
    let found = extract_units(text, "pkgs.vhd", "work");
    assert_eq!(found.units.len(), 2);
    assert_eq!(found.units[0].kind, UnitKind::Package);
    assert_eq!(found.units[0].name, "INT_PKG");
    assert_eq!(found.units[0].end_line, 1);
    assert_eq!(found.units[1].name, "E");
}

#[test]
fn test_unterminated_unit_is_reported_separately() {
    let text = "package p is\n  constant c : integer := 0;\n";
    let found = extract_units(text, "p.vhd", "work");
    assert!(found.units.is_empty());
    let open = found.unterminated.unwrap();
    assert_eq!(open.kind, UnitKind::Package);
    assert_eq!(open.begin_line, 1);
    assert_eq!(open.end_line, 2);
}

#[test]
fn test_read_file_decodes_permissively() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("latin1.vhd");
    let mut bytes = b"-- caf\xe9\nentity e is\nend e;\n".to_vec();
    bytes.push(b'\n');
    std::fs::write(&path, bytes).unwrap();

    let found = read_file(&path, "work").unwrap();
    assert_eq!(found.units.len(), 1);
    assert_eq!(found.units[0].file_name, path.to_string_lossy());
    assert_eq!(found.units[0].begin_line, 2);
}

#[test]
fn test_read_missing_file_fails() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(read_file(&tmp.path().join("missing.vhd"), "work").is_err());
}
