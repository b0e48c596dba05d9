// ABOUTME: Integration tests for the html-chunker CLI binary.
// ABOUTME: Tests chunk file output for files and directories, JSON summaries and error exits.

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo::CommandCargoExt;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn chunker_cmd() -> Command {
    Command::cargo_bin("html-chunker").unwrap()
}

fn paragraphs(n: usize) -> String {
    let body: String = (0..n).map(|i| format!("<p>Paragraph {}</p>", i)).collect();
    format!("<html><body>{}</body></html>", body)
}

#[test]
fn chunks_single_file() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("page.html");
    let out = temp_dir.path().join("out");
    fs::write(&html_path, "<html><body><p>Hi there</p></body></html>").unwrap();

    chunker_cmd()
        .arg(&html_path)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Processing complete!"))
        .stdout(predicate::str::contains("Created 1 chunk(s)"));

    let chunk = fs::read_to_string(out.join("page").join("chunk_000.html")).unwrap();
    assert_eq!(chunk, "<html><body><p>Hi there</p></body></html>");
}

#[test]
fn splits_large_file_into_numbered_chunks() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("long.html");
    let out = temp_dir.path().join("out");
    fs::write(&html_path, paragraphs(100)).unwrap();

    chunker_cmd()
        .arg(&html_path)
        .arg("-o")
        .arg(&out)
        .arg("--max-tokens")
        .arg("100")
        .assert()
        .success();

    let dir = out.join("long");
    assert!(dir.join("chunk_000.html").is_file());
    assert!(dir.join("chunk_001.html").is_file());
}

#[test]
fn chunks_every_file_in_directory() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("site");
    let out = temp_dir.path().join("out");
    fs::create_dir_all(input.join("nested")).unwrap();
    fs::write(input.join("a.html"), "<p>A</p>").unwrap();
    fs::write(input.join("nested").join("b.htm"), "<p>B</p>").unwrap();
    fs::write(input.join("readme.txt"), "not html").unwrap();

    chunker_cmd()
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 2 file(s)"));

    assert!(out.join("a").join("chunk_000.html").is_file());
    assert!(out.join("b").join("chunk_000.html").is_file());
}

#[test]
fn custom_prefix_names_files() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("page.html");
    let out = temp_dir.path().join("out");
    fs::write(&html_path, "<p>Hello</p>").unwrap();

    chunker_cmd()
        .arg(&html_path)
        .arg("-o")
        .arg(&out)
        .arg("--prefix")
        .arg("part-")
        .assert()
        .success();

    assert!(out.join("page").join("part-000.html").is_file());
}

#[test]
fn no_clean_keeps_scripts() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("page.html");
    let html = "<html><body><script>var x = 1;</script><p>Hi</p></body></html>";
    fs::write(&html_path, html).unwrap();

    let cleaned = temp_dir.path().join("cleaned");
    chunker_cmd()
        .arg(&html_path)
        .arg("-o")
        .arg(&cleaned)
        .assert()
        .success();
    let chunk = fs::read_to_string(cleaned.join("page").join("chunk_000.html")).unwrap();
    assert!(!chunk.contains("<script"));

    let raw = temp_dir.path().join("raw");
    chunker_cmd()
        .arg(&html_path)
        .arg("-o")
        .arg(&raw)
        .arg("--no-clean")
        .assert()
        .success();
    let chunk = fs::read_to_string(raw.join("page").join("chunk_000.html")).unwrap();
    assert!(chunk.contains("<script>var x = 1;</script>"));
}

#[test]
fn json_summary() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("page.html");
    let out = temp_dir.path().join("out");
    fs::write(&html_path, "<p>Hello</p>").unwrap();

    let output = chunker_cmd()
        .arg(&html_path)
        .arg("-o")
        .arg(&out)
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["total_chunks"], 1);
    assert_eq!(summary["files"].as_array().unwrap().len(), 1);
    assert_eq!(summary["failed"].as_array().unwrap().len(), 0);
}

#[test]
fn stats_flag_prints_token_range() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("page.html");
    fs::write(&html_path, "<p>Hello</p>").unwrap();

    chunker_cmd()
        .arg(&html_path)
        .arg("-o")
        .arg(temp_dir.path().join("out"))
        .arg("--stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Token range:"));
}

#[test]
fn missing_input_fails() {
    let temp_dir = TempDir::new().unwrap();

    chunker_cmd()
        .arg(temp_dir.path().join("nope.html"))
        .arg("-o")
        .arg(temp_dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn non_html_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("notes.txt");
    fs::write(&path, "plain text").unwrap();

    chunker_cmd()
        .arg(&path)
        .arg("-o")
        .arg(temp_dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an HTML file"));
}

#[test]
fn empty_directory_fails() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("empty");
    fs::create_dir(&input).unwrap();

    chunker_cmd()
        .arg(&input)
        .arg("-o")
        .arg(temp_dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no HTML files found"));
}

#[test]
fn unknown_model_fails() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("page.html");
    fs::write(&html_path, "<p>Hello</p>").unwrap();

    chunker_cmd()
        .arg(&html_path)
        .arg("-o")
        .arg(temp_dir.path().join("out"))
        .arg("--model")
        .arg("not-a-real-model")
        .assert()
        .failure();
}

#[test]
fn zero_max_tokens_fails() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("page.html");
    fs::write(&html_path, "<p>Hello</p>").unwrap();

    chunker_cmd()
        .arg(&html_path)
        .arg("-o")
        .arg(temp_dir.path().join("out"))
        .arg("-t")
        .arg("0")
        .assert()
        .failure();
}
