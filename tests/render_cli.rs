use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

const TYPES: &str = r#"{"types": [
    {"name": "Car", "kind": "class", "implements": {"Codable": "Codable"},
     "annotations": {"role": "model"},
     "variables": [
        {"name": "speed", "type_name": "Int", "is_computed": true},
        {"name": "owner", "type_name": "Person?"}
     ]},
    {"name": "Person", "kind": "struct"},
    {"name": "Color", "kind": "enum"}
]}"#;

fn setup(dir: &Path) {
    fs::write(dir.join("types.json"), TYPES).unwrap();
    fs::create_dir_all(dir.join("templates")).unwrap();
    fs::write(
        dir.join("templates/Stored.stencil"),
        "{% for t in types.classes %}{{ t }}: {{ t.variables | not_computed | join(',') }}{% endfor %}\n",
    )
    .unwrap();
}

fn typestencil(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("typestencil").unwrap();
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_render_to_stdout() {
    let temp_dir = tempfile::tempdir().unwrap();
    setup(temp_dir.path());

    typestencil(temp_dir.path())
        .args(["render", "--types", "types.json", "-T", "templates", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::eq("Car: owner\n"));
}

#[test]
fn test_render_writes_files() {
    let temp_dir = tempfile::tempdir().unwrap();
    setup(temp_dir.path());

    typestencil(temp_dir.path())
        .args(["render", "--types", "types.json", "-T", "templates", "-o", "Generated"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stored.generated.swift"));

    let written =
        fs::read_to_string(temp_dir.path().join("Generated/Stored.generated.swift")).unwrap();
    assert!(written.starts_with("// Generated using typestencil"));
    assert!(written.ends_with("Car: owner\n"));
}

#[test]
fn test_render_ext_flag_sets_extension() {
    let temp_dir = tempfile::tempdir().unwrap();
    setup(temp_dir.path());

    typestencil(temp_dir.path())
        .args(["render", "--types", "types.json", "-T", "templates", "-o", "out", "--ext", ".kt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stored.generated.kt"));

    assert!(temp_dir.path().join("out/Stored.generated.kt").exists());
    assert!(!temp_dir.path().join("out/Stored.generated.swift").exists());
}

#[test]
fn test_render_uses_config_and_arguments() {
    let temp_dir = tempfile::tempdir().unwrap();
    setup(temp_dir.path());
    fs::write(
        temp_dir.path().join("templates/Args.stencil"),
        "{{ argument.module }}-{{ argument.debug }}-{{ types.all | annotated('role=model') | join(',') }}",
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("typestencil.json"),
        r#"{"types": "types.json", "templates": ["templates/Args.stencil"], "output": "out", "output_ext": "kt", "header": false, "arguments": {"module": "Core"}}"#,
    )
    .unwrap();

    typestencil(temp_dir.path())
        .args(["render", "--arg", "debug"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("out/Args.generated.kt")).unwrap(),
        "Core-true-Car"
    );
}

#[test]
fn test_render_filter_argument_error_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    setup(temp_dir.path());
    fs::write(
        temp_dir.path().join("Bad.stencil"),
        "{{ types.all | implements('A', 'B') }}",
    )
    .unwrap();

    typestencil(temp_dir.path())
        .args(["render", "--types", "types.json", "-T", "Bad.stencil", "--stdout"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("'implements' filter takes a single String argument"));
}

#[test]
fn test_render_without_output_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    setup(temp_dir.path());

    typestencil(temp_dir.path())
        .args(["render", "--types", "types.json", "-T", "templates"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:").and(predicate::str::contains("--output")));
}

#[test]
fn test_check_reports_syntax_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    setup(temp_dir.path());

    typestencil(temp_dir.path())
        .args(["check", "-T", "templates"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stored.stencil"));

    fs::write(temp_dir.path().join("templates/Broken.stencil"), "{% for %}").unwrap();
    typestencil(temp_dir.path())
        .args(["check", "-T", "templates"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_filters_lists_negations() {
    let temp_dir = tempfile::tempdir().unwrap();

    typestencil(temp_dir.path())
        .arg("filters")
        .assert()
        .success()
        .stdout(predicate::str::contains("computed"))
        .stdout(predicate::str::contains("!computed"))
        .stdout(predicate::str::contains("!annotated"))
        .stdout(predicate::str::contains("snake_cased"))
        .stdout(predicate::str::contains("!snake_cased").not());
}
