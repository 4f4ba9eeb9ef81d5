use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const FIXTURE: &str = "tests/fixtures/bookmarklets.txt";

#[test]
fn writes_netscape_bookmark_file() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("bookmarks.html");

    cargo_bin_cmd!("bookmarklet-packer")
        .arg(FIXTURE)
        .arg(&out)
        .assert()
        .success();

    let html = fs::read_to_string(&out).unwrap();
    assert!(html.starts_with("<!DOCTYPE NETSCAPE-Bookmark-file-1>\n"));
    assert!(html.contains("<H1>Test Owner</H1>"));
    assert!(html.contains("<DT><H3>YouTube Tools</H3>"));
    assert!(html.contains("<DT><H3>Speed</H3>"));
    assert!(html.contains("<DD>Updated Monday, February 5th, 2024 at 8:49 PM"));
    assert_eq!(html.matches("<DT><A HREF=\"javascript:").count(), 7);
}

#[test]
fn json_goes_to_stdout() {
    let output = cargo_bin_cmd!("bookmarklet-packer")
        .arg(FIXTURE)
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["title"], "Test Owner");
    assert_eq!(value["root"]["bookmarks"][0]["name"], "Favicon Grabber");
    assert_eq!(value["root"]["folders"][1]["name"], "YouTube Tools");
}

#[test]
fn unterminated_block_fails_without_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("broken.txt");
    let out = dir.path().join("bookmarks.html");
    fs::write(&input, "// banner\n\nBEGIN Broken\nalert(1);\n").unwrap();

    cargo_bin_cmd!("bookmarklet-packer")
        .arg(&input)
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 3: block `Broken` is missing its END line"));

    assert!(!out.exists());
}

#[test]
fn check_reports_warnings_and_writes_nothing() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.txt");
    let out = dir.path().join("bookmarks.html");
    fs::write(
        &input,
        "BEGIN Perl Thing\nLANG Perl\nprint 1;\nEND\nBEGIN Fine\ngo();\nEND\n",
    )
    .unwrap();

    cargo_bin_cmd!("bookmarklet-packer")
        .arg(&input)
        .arg(&out)
        .arg("--check")
        .assert()
        .success()
        .stderr(predicate::str::contains("skipped `Perl Thing`"));

    assert!(!out.exists());
}

#[test]
fn flags_override_configuration() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.txt");
    fs::write(
        &input,
        "BEGIN Reset\nFOLDER Speed\na();\nEND\nBEGIN Reset\nb();\nEND\nBEGIN Beta\nEND\nBEGIN Alpha\nEND\n",
    )
    .unwrap();

    let output = cargo_bin_cmd!("bookmarklet-packer")
        .arg(&input)
        .args(["--format", "json", "--sticky-folders", "--duplicates", "rename", "--sort"])
        .arg("--quiet")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let speed = &value["root"]["folders"][0];
    assert_eq!(speed["name"], "Speed");
    let names: Vec<_> = speed["bookmarks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Alpha", "Beta", "Reset", "Reset (2)"]);
}

#[test]
fn config_file_sets_title() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.txt");
    let config = dir.path().join("packer.toml");
    fs::write(&input, "BEGIN A\ngo();\nEND\n").unwrap();
    fs::write(&config, "[output]\ntitle = \"My Tools\"\n").unwrap();

    cargo_bin_cmd!("bookmarklet-packer")
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("<H1>My Tools</H1>"));
}
