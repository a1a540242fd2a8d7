use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_goyaml")));
    cmd.env_remove("GOPATH")
        .env_remove("RUST_LOG")
        .env("GOROOT", "/nonexistent/goroot");
    cmd
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path.as_ref())
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.as_ref().display(), e))
}

/// Documents the shapes fixture package into `out`.
fn generate(out: &Path, extra: &[&str]) {
    cmd()
        .args(["--gopath", &fixture_path("gopath")])
        .arg("example.com/shapes")
        .arg(out)
        .args(["acme", "github.com/acme/shapes", "main"])
        .args(extra)
        .assert()
        .success();
}

// -- split layout --

#[test]
fn split_layout_writes_package_and_types() {
    let out = TempDir::new().unwrap();
    generate(out.path(), &[]);

    let pkg = read(out.path().join("shapes.yml"));
    assert!(pkg.starts_with("#YamlMIME: GoLangPkg\n"));
    assert!(pkg.contains("uid: acme.shapes\n"));
    assert!(pkg.contains("name: shapes\n"));
    assert!(pkg.contains("ismain: false\n"));
    assert!(pkg.contains("summary: Package shapes computes areas of simple shapes.\n"));
    assert!(pkg.contains("importPath: example.com/shapes\n"));
    assert!(pkg.contains("- acme.shapes.Kind\n"));
    assert!(pkg.contains("- acme.shapes.Square\n"));
    assert!(pkg.contains("uid: acme.shapes.Describe\n"));
    assert!(!pkg.contains("helper"));

    let square = read(out.path().join("shapes/Square.yml"));
    assert!(square.starts_with("#YamlMIME: GoLangPkg\nuid: acme.shapes.Square\n"));
    assert!(square.contains("summary: Square is a shape with four equal sides.\n"));
    assert!(square.contains("uid: acme.shapes.NewSquare\n"));
    assert!(square.contains("uid: acme.shapes.Square.Area\n"));
    assert!(square.contains("uid: acme.shapes.Square.Grow\n"));
    assert!(square.contains("// contains filtered or unexported fields"));
    assert!(!square.contains("color"));

    let kind = read(out.path().join("shapes/Kind.yml"));
    assert!(kind.contains("- KindSquare\n"));
    assert!(kind.contains("- KindCircle\n"));
}

#[test]
fn values_are_grouped() {
    let out = TempDir::new().unwrap();
    generate(out.path(), &[]);

    let pkg = read(out.path().join("shapes.yml"));
    assert!(pkg.contains("- Metric\n"));
    assert!(pkg.contains("- Imperial\n"));
    assert!(pkg.contains("- DefaultSide\n"));
    assert!(!pkg.contains("cubit"));
    // iota constants live on their type
    assert!(!pkg.contains("KindSquare"));
}

#[test]
fn source_positions_and_metadata() {
    let out = TempDir::new().unwrap();
    generate(out.path(), &[]);

    let square = read(out.path().join("shapes/Square.yml"));
    assert!(square.contains("repo: github.com/acme/shapes\n"));
    assert!(square.contains("branch: main\n"));
    assert!(square.contains("file: square.go\n"));
}

#[test]
fn notes_examples_and_dirs() {
    let out = TempDir::new().unwrap();
    generate(out.path(), &[]);

    let pkg = read(out.path().join("shapes.yml"));
    assert!(pkg.contains("BUG:\n"));
    assert!(pkg.contains("uid: ann\n"));
    assert!(pkg.contains("Grow ignores negative deltas."));
    assert!(pkg.contains("name: Square_Area\n"));
    assert!(pkg.contains("fmt.Println(s.Area())"));
    assert!(pkg.contains("name: geom\n"));
    assert!(pkg.contains("summary: Package geom holds geometry helpers.\n"));
    assert!(pkg.contains("haspkg: true\n"));
}

// -- nested layout --

#[test]
fn nested_layout_single_file() {
    let out = TempDir::new().unwrap();
    generate(out.path(), &["--layout", "nested"]);

    assert!(!out.path().join("shapes").exists());
    let pkg = read(out.path().join("shapes.yml"));
    assert!(pkg.contains("uid: acme.shapes.Square\n"));
    assert!(pkg.contains("uid: acme.shapes.Square.Area\n"));
}

#[test]
fn subdir_option() {
    let out = TempDir::new().unwrap();
    generate(out.path(), &["--subdir", "api/go"]);

    assert!(out.path().join("api/go/shapes.yml").is_file());
    assert!(out.path().join("api/go/shapes/Square.yml").is_file());
}

#[test]
fn output_is_deterministic() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    generate(first.path(), &[]);
    generate(second.path(), &[]);

    for file in ["shapes.yml", "shapes/Kind.yml", "shapes/Square.yml"] {
        assert_eq!(
            fs::read(first.path().join(file)).unwrap(),
            fs::read(second.path().join(file)).unwrap(),
            "{} differs between runs",
            file
        );
    }
}

// -- locating packages --

#[test]
fn gopath_from_environment() {
    let out = TempDir::new().unwrap();
    cmd()
        .env("GOPATH", fixture_path("gopath"))
        .arg("example.com/shapes")
        .arg(out.path())
        .assert()
        .success();

    let pkg = read(out.path().join("shapes.yml"));
    assert!(pkg.contains("uid: shapes\n"));
    // no repo or branch configured
    assert!(!pkg.contains("repo:"));
}

#[test]
fn source_root_fallback() {
    let out = TempDir::new().unwrap();
    cmd()
        .args(["--source-root", &fixture_path("gopath/src")])
        .arg("example.com/shapes/geom")
        .arg(out.path())
        .assert()
        .success();

    let pkg = read(out.path().join("geom.yml"));
    assert!(pkg.contains("importPath: example.com/shapes/geom\n"));
    assert!(pkg.contains("- Origin\n"));
}

#[test]
fn local_path_argument() {
    let out = TempDir::new().unwrap();
    cmd()
        .current_dir(fixture_path("gopath/src/example.com"))
        .arg("./shapes")
        .arg(out.path())
        .assert()
        .success();

    let pkg = read(out.path().join("shapes.yml"));
    assert!(pkg.contains("name: shapes\n"));
}

#[test]
fn empty_package_lists_subdirectory() {
    let out = TempDir::new().unwrap();
    cmd()
        .arg(fixture_path("empty"))
        .arg(out.path())
        .assert()
        .success();

    let pkg = read(out.path().join("empty.yml"));
    assert!(!pkg.contains("\nuid:"));
    assert!(pkg.contains("consts: []\n"));
    assert!(pkg.contains("types: []\n"));
    assert!(pkg.contains("funcs: []\n"));
    assert!(pkg.contains("name: sub\n"));
    assert!(pkg.contains("path: sub\n"));
    assert!(!out.path().join("empty").exists());
}

// -- errors --

#[test]
fn missing_arguments_fail() {
    let out = TempDir::new().unwrap();
    cmd()
        .current_dir(out.path())
        .arg("example.com/shapes")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("OUTPUT"));
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn invalid_notes_pattern_fails() {
    let out = TempDir::new().unwrap();
    cmd()
        .args(["--gopath", &fixture_path("gopath")])
        .args(["--notes", "("])
        .arg("example.com/shapes")
        .arg(out.path().join("docs"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid notes pattern"));
    assert!(!out.path().join("docs").exists());
}
