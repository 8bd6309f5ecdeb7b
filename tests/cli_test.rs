use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

const DECK: &str = "% Test Deck\n% Tester\n% Today\n\n\
# Welcome\n\nHello\n\n\
# Points\n\n- one\n- two\n\n\
# Build\n\nStart\n. . .\nMiddle\n. . .\nEnd\n???\nRemember to breathe\n";

fn run_command(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_deckpilot"))
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn write_deck(dir: &Path) -> String {
    let path = dir.join("deck.md");
    fs::write(&path, DECK).expect("Failed to write deck");
    path.to_str().unwrap().to_string()
}

#[test]
fn test_outline_command() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let deck = write_deck(temp_dir.path());

    let output = run_command(&["outline", "-i", &deck]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Test Deck"));
    assert!(stdout.contains("1. Welcome [0 steps]"));
    assert!(stdout.contains("3. Build [2 steps] [notes]"));
    assert!(stdout.contains("3 slides, 4 advances from start to end"));
}

#[test]
fn test_outline_with_animated_lists() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let deck = write_deck(temp_dir.path());

    let output = run_command(&["outline", "-i", &deck, "--animate-list-items"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2. Points [2 steps]"));
}

#[test]
fn test_missing_deck_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("missing.md");

    let output = run_command(&["outline", "-i", missing.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load deck"));
}

#[test]
fn test_play_reads_commands_from_stdin() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let deck = write_deck(temp_dir.path());

    let mut child = Command::new(env!("CARGO_BIN_EXE_deckpilot"))
        .args(["play", "-i", deck.as_str()])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn play");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(b"jump 3\nnext\nprev\nprev\njump 9\nfullscreen\nbogus\nquit\n")
        .expect("Failed to write commands");

    let output = child.wait_with_output().expect("Failed to wait for play");
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--- slide 1/3 step 0/0 (0%) ---"));
    assert!(stdout.contains("--- slide 3/3 step 0/2 (100%) ---"));
    assert!(stdout.contains("--- slide 3/3 step 1/2 (100%) ---"));
    assert!(stdout.contains("--- slide 2/3 step 0/0 (50%) ---"));
    assert!(stdout.contains("--- slide 2/3 step 0/0 fullscreen (50%) ---"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("out of range"));
    assert!(stderr.contains("Invalid command: bogus"));
}

#[test]
fn test_export_writes_one_page_per_state() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let deck = write_deck(temp_dir.path());
    let out_dir = temp_dir.path().join("out");

    let css_path = temp_dir.path().join("theme.css");
    fs::write(&css_path, "body { color: teal; }").expect("Failed to write CSS file");

    let output = run_command(&[
        "export",
        "-i",
        &deck,
        "-o",
        out_dir.to_str().unwrap(),
        "--css",
        css_path.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let mut pages: Vec<String> = fs::read_dir(&out_dir)
        .expect("Output directory exists")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    pages.sort();
    assert_eq!(
        pages,
        vec![
            "slide_0001_00.html",
            "slide_0002_00.html",
            "slide_0003_00.html",
            "slide_0003_01.html",
            "slide_0003_02.html",
        ]
    );

    let middle = fs::read_to_string(out_dir.join("slide_0003_01.html")).unwrap();
    assert!(middle.contains("<p>Middle</p>"));
    assert!(!middle.contains("<p>End</p>"));
    assert!(!middle.contains("breathe"));
    assert!(middle.contains("<style>body { color: teal; }</style>"));
}

#[test]
fn test_export_rejects_unknown_mode() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let deck = write_deck(temp_dir.path());
    let out_dir = temp_dir.path().join("out");

    let output = run_command(&[
        "export",
        "-i",
        &deck,
        "-o",
        out_dir.to_str().unwrap(),
        "--mode",
        "inline",
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown resource mode"));
}
