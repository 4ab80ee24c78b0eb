//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn testcraft() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("testcraft").unwrap()
}

#[test]
fn validate_valid_test_set() {
    testcraft()
        .arg("validate")
        .arg("--test-set")
        .arg("../../test-sets/javascript-basics.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("5 questions"))
        .stdout(predicate::str::contains("All test sets valid"));
}

#[test]
fn validate_directory() {
    testcraft()
        .arg("validate")
        .arg("--test-set")
        .arg("../../test-sets")
        .assert()
        .success()
        .stdout(predicate::str::contains("JavaScript Knowledge Assessment"))
        .stdout(predicate::str::contains("Product Feedback Survey"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(
        &path,
        r#"
[test]
title = "Broken"

[[questions]]
id = "q"
type = "choice"
title = "Pick"
score = 5
"#,
    )
    .unwrap();

    testcraft()
        .arg("validate")
        .arg("--test-set")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("[q] WARNING: choice has no options"))
        .stdout(predicate::str::contains("1 warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    testcraft()
        .arg("validate")
        .arg("--test-set")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn preview_renders_questions() {
    testcraft()
        .arg("preview")
        .arg("--test-set")
        .arg("../../test-sets/javascript-basics.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("== JavaScript Basics =="))
        .stdout(predicate::str::contains(
            "1. [Choice] Which of the following is NOT a JavaScript data type? * (10 pts)",
        ))
        .stdout(predicate::str::contains("   [ ] [] (empty array)"))
        .stdout(predicate::str::contains("(Not confident -> Very confident)"));
}

#[test]
fn take_scores_answers() {
    let dir = TempDir::new().unwrap();
    let saved = dir.path().join("out").join("response.json");

    testcraft()
        .arg("take")
        .arg("--test-set")
        .arg("../../test-sets/javascript-basics.toml")
        .arg("--answers")
        .arg("../../sample-data/javascript-answers.json")
        .arg("--save")
        .arg(&saved)
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 16.5 / 25 (66.0%)"))
        .stdout(predicate::str::contains("Float"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&saved).unwrap()).unwrap();
    assert_eq!(json["testId"], "javascript-basics");
    assert_eq!(json["totalScore"], 16.5);
    assert_eq!(json["maxPossibleScore"], 25);
}

#[test]
fn take_rejects_missing_required_answers() {
    testcraft()
        .arg("take")
        .arg("--test-set")
        .arg("../../test-sets/javascript-basics.toml")
        .arg("--answers")
        .arg("../../sample-data/javascript-incomplete.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("This question is required"))
        .stderr(predicate::str::contains("2 required question(s) unanswered"));
}

#[test]
fn stats_prints_tables() {
    testcraft()
        .arg("stats")
        .arg("--test-set")
        .arg("../../test-sets")
        .arg("--responses")
        .arg("../../sample-data/responses.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Completions"))
        .stdout(predicate::str::contains("43.2%"))
        .stdout(predicate::str::contains("65%"))
        .stdout(predicate::str::contains("81-100%"))
        .stdout(predicate::str::contains("File Upload"));
}

#[test]
fn report_writes_html_and_json() {
    let dir = TempDir::new().unwrap();

    testcraft()
        .arg("report")
        .arg("--test-set")
        .arg("../../test-sets")
        .arg("--responses")
        .arg("../../sample-data/responses.json")
        .arg("--output")
        .arg(dir.path())
        .arg("--format")
        .arg("all")
        .assert()
        .success()
        .stderr(predicate::str::contains("HTML report"))
        .stderr(predicate::str::contains("JSON report"));

    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names.len(), 2);
    assert!(names[0].ends_with(".html"));
    assert!(names[1].ends_with(".json"));
}

#[test]
fn login_known_user() {
    let dir = TempDir::new().unwrap();

    testcraft()
        .current_dir(dir.path())
        .env("HOME", dir.path())
        .arg("login")
        .arg("--username")
        .arg("testuser")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as Test User"))
        .stdout(predicate::str::contains("Session: sess_"));
}

#[test]
fn login_unknown_user_fails() {
    let dir = TempDir::new().unwrap();

    testcraft()
        .current_dir(dir.path())
        .env("HOME", dir.path())
        .arg("login")
        .arg("--username")
        .arg("nobody")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown user: nobody"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    testcraft()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created testcraft.toml"))
        .stdout(predicate::str::contains("Created test-sets/example.toml"));

    assert!(dir.path().join("testcraft.toml").exists());
    assert!(dir.path().join("test-sets/example.toml").exists());

    testcraft()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--test-set")
        .arg("test-sets/example.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("All test sets valid"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    testcraft()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    testcraft()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn help_output() {
    testcraft()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Survey and test builder"));
}

#[test]
fn version_output() {
    testcraft()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("testcraft"));
}
