//! End-to-end tests for the autodoc binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

const INVOICE_TEXT: &str = "\
INVOICE
Customer: John Doe
Phone: 0712 345 678
Email: john@example.com
Service: Oil Change
Total: TSH 25,000
";

fn autodoc() -> Command {
    Command::cargo_bin("autodoc").expect("binary builds")
}

#[test]
fn extract_text_file_prints_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("invoice.txt");
    fs::write(&input, INVOICE_TEXT).unwrap();

    autodoc()
        .arg("extract")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("John Doe"))
        .stdout(predicate::str::contains("Oil Change"));
}

#[test]
fn extract_text_summary_format() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("invoice.txt");
    fs::write(&input, INVOICE_TEXT).unwrap();

    autodoc()
        .arg("extract")
        .arg(&input)
        .args(["--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Customer:"))
        .stdout(predicate::str::contains("John Doe"));
}

#[test]
fn extract_rejects_image_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("invoice.png");
    fs::write(&input, b"not really a png").unwrap();

    autodoc()
        .arg("extract")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("OCR is disabled"));
}

#[test]
fn extract_missing_input_fails() {
    autodoc()
        .arg("extract")
        .arg("does-not-exist.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn config_init_seeds_defaults_and_pipeline_accepts_them() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");

    autodoc()
        .arg("config")
        .arg("init")
        .args(["--output", config.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    let raw = fs::read_to_string(&config).unwrap();
    assert!(raw.contains("patterns"));
    assert!(raw.contains("templates"));

    let input = dir.path().join("invoice.txt");
    fs::write(&input, INVOICE_TEXT).unwrap();

    autodoc()
        .arg("--config")
        .arg(config.to_str().unwrap())
        .arg("extract")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("John Doe"));
}

#[test]
fn batch_processes_directory_glob() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["a.txt", "b.txt"] {
        fs::write(dir.path().join(name), INVOICE_TEXT).unwrap();
    }
    let out_dir = dir.path().join("out");

    let pattern = format!("{}/*.txt", dir.path().display());

    autodoc()
        .arg("batch")
        .arg(&pattern)
        .args(["--output-dir", out_dir.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 2 files"));

    assert!(out_dir.join("a.json").exists());
    assert!(out_dir.join("b.json").exists());
}
