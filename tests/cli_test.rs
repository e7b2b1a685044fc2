// Command-line tests for the dokgen binary

use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_dokgen")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

#[test]
fn version_prints_package_version() {
    cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(concat!("dokgen ", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn process_prints_markdown_with_title() {
    cmd()
        .args(["process", &fixture_path("guide/01_Basics/C01Drawing.rs")])
        .args(["--title", "Drawing"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# Drawing\n\n# Drawing basics\n"))
        .stdout(predicate::str::contains("<img src=\"media/canvas.png\"/>"))
        .stdout(predicate::str::contains("writeln!").not());
}

#[test]
fn process_prints_json() {
    let assert = cmd()
        .args(["process", &fixture_path("guide/01_Basics/C01Drawing.rs")])
        .args(["--format", "json", "--package", "examples.basics"])
        .assert()
        .success();

    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["media"][0], "media/canvas.png");
    assert_eq!(json["programs"][0]["index"], 0);
    assert!(json["programs"][0]["source"]
        .as_str()
        .unwrap()
        .starts_with("//! examples.basics\n"));
}

#[test]
fn process_reports_annotation_errors() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("Broken.rs");
    fs::write(&file, "fn main() {\n    #[text]\n    let n = 42;\n}\n").unwrap();

    cmd()
        .args(["process", file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("@Text expects a string literal"));
}

#[test]
fn build_writes_outputs() {
    let out = TempDir::new().unwrap();
    let md = out.path().join("md");
    let examples = out.path().join("examples");

    cmd()
        .args(["build", &fixture_path("guide")])
        .args(["--output", md.to_str().unwrap()])
        .args(["--examples", examples.to_str().unwrap()])
        .args(["--web-root-url", "https://example.com/guide"])
        .arg("--sequential")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Generated 1 documents, 1 programs, copied 1 markdown files, 0 errors",
        ));

    assert!(md.join("01_Basics/C01Drawing.md").exists());
    assert!(md.join("_sidebar.md").exists());
    assert!(md.join("dokgen-manifest.json").exists());
    assert!(examples.join("01_Basics/C01Drawing000.rs").exists());
}

#[test]
fn build_with_failed_file_exits_with_failure() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    fs::write(
        src.path().join("Broken.rs"),
        "fn main() {\n    #[code::block(\"x\")]\n    let a = 1;\n}\n",
    )
    .unwrap();
    fs::write(src.path().join("Fine.rs"), "fn main() {\n    #[text]\n    \"ok\";\n}\n").unwrap();

    cmd()
        .args(["build", src.path().to_str().unwrap()])
        .args(["--output", out.path().join("md").to_str().unwrap()])
        .args(["--examples", out.path().join("examples").to_str().unwrap()])
        .arg("--no-manifest")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Failed files (1)"))
        .stdout(predicate::str::contains("Broken.rs"));

    assert!(out.path().join("md/Fine.md").exists());
    assert!(!out.path().join("md/dokgen-manifest.json").exists());
}

#[test]
fn build_uses_config_file() {
    let out = TempDir::new().unwrap();
    let config = out.path().join("dokgen.toml");
    fs::write(
        &config,
        format!(
            "[output]\nmarkdown_dir = \"{}\"\nexamples_dir = \"{}\"\n\n[index]\nfile_name = \"SUMMARY.md\"\n",
            out.path().join("site").display(),
            out.path().join("programs").display()
        ),
    )
    .unwrap();

    cmd()
        .args(["build", &fixture_path("guide")])
        .args(["--config", config.to_str().unwrap()])
        .assert()
        .success();

    assert!(out.path().join("site/SUMMARY.md").exists());
    assert!(out.path().join("programs/01_Basics/C01Drawing000.rs").exists());
}

#[test]
fn build_missing_path_fails() {
    let out = TempDir::new().unwrap();
    cmd()
        .args(["build", "/nonexistent/sources"])
        .args(["--output", out.path().join("md").to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path not found"));
}

#[test]
fn index_prints_tree() {
    cmd()
        .args(["index", &fixture_path("index_tree")])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("- Chapter One\n  - Sub Chapter One\n"))
        .stdout(predicate::str::contains(
            "  - [Article $ Baz ? Qux !!!](01_ChapterOne/C002ArticleBazQux.md)",
        ));
}
