use std::fs;
use std::path::PathBuf;
use std::process::Command;

/// Helper to create a temp directory that is cleaned up on drop.
struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("formkey_cli_test_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).expect("failed to create temp dir");
        Self { path }
    }

    fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Writes a small two-question capture and returns its path.
fn write_quiz_capture(dir: &TempDir) -> PathBuf {
    let json = serde_json::json!({
        "items": [
            {
                "data-params": r#"%.@.[0,"What is 2+2?","Pick one",[[1,[[0,"3"],[1,"4"]]]]]"#,
                "img-url": null,
                "isCheckbox": false
            },
            {
                "data-params": "garbage",
                "isCheckbox": true
            }
        ],
        "optionTexts": ["3", "4"]
    });
    let path = dir.join("capture.json");
    fs::write(&path, serde_json::to_string_pretty(&json).unwrap()).expect("failed to write capture");
    path
}

/// Writes a session file in the shape `solve` persists.
fn write_session(dir: &TempDir, question: &str, answer: &str) -> PathBuf {
    let json = serde_json::json!({
        "questions": [{"text": question}],
        "answers": {"result": [{"fullQuestion": question, "answer": answer}]},
        "fetched_at": null
    });
    let path = dir.join("session.json");
    fs::write(&path, serde_json::to_string_pretty(&json).unwrap()).expect("failed to write session");
    path
}

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_formkey")
}

#[test]
fn parse_prints_questions_from_capture() {
    let dir = TempDir::new("parse_basic");
    let capture = write_quiz_capture(&dir);

    let out = Command::new(bin())
        .args(["parse", "--input"])
        .arg(&capture)
        .output()
        .expect("failed to run formkey");

    assert!(out.status.success(), "parse should succeed");
    let stdout = String::from_utf8_lossy(&out.stdout);
    let questions: serde_json::Value = serde_json::from_str(&stdout).expect("stdout should be JSON");
    assert_eq!(questions[0]["text"], "What is 2+2?");
    assert_eq!(questions[0]["options"][1], "4");
    // Malformed sibling still occupies its slot, with the checkbox signal.
    assert_eq!(questions[1]["text"], "");
    assert_eq!(questions[1]["isCheckbox"], true);
}

#[test]
fn parse_supports_yaml_output() {
    let dir = TempDir::new("parse_yaml");
    let capture = write_quiz_capture(&dir);

    let out = Command::new(bin())
        .args(["parse", "--format", "yaml", "--input"])
        .arg(&capture)
        .output()
        .expect("failed to run formkey");

    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("text: What is 2+2?"), "unexpected yaml: {stdout}");
}

#[test]
fn parse_rejects_malformed_capture_json() {
    let dir = TempDir::new("parse_bad_json");
    let path = dir.join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    let out = Command::new(bin())
        .args(["parse", "--input"])
        .arg(&path)
        .output()
        .expect("failed to run formkey");

    assert!(!out.status.success(), "malformed capture must fail");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("capture"), "unexpected stderr: {stderr}");
}

#[test]
fn clear_strips_marker_suffixes() {
    let dir = TempDir::new("clear_marks");
    let json = serde_json::json!({
        "items": [],
        "optionTexts": ["4 +", "3", "x + y"]
    });
    let capture = dir.join("capture.json");
    fs::write(&capture, serde_json::to_string(&json).unwrap()).unwrap();
    let output = dir.join("cleared.json");

    let status = Command::new(bin())
        .args(["clear", "--input"])
        .arg(&capture)
        .arg("--output")
        .arg(&output)
        .status()
        .expect("failed to run formkey");

    assert!(status.success());
    let cleared: Vec<String> =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(cleared, vec!["4", "3", "x + y"]);
}

#[test]
fn reapply_fails_without_a_session() {
    let dir = TempDir::new("reapply_no_session");
    let capture = write_quiz_capture(&dir);

    let out = Command::new(bin())
        .args(["reapply", "--input"])
        .arg(&capture)
        .arg("--session")
        .arg(dir.join("missing-session.json"))
        .output()
        .expect("failed to run formkey");

    assert!(!out.status.success(), "reapply without cache must fail");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("No cached session"), "unexpected stderr: {stderr}");
}

#[test]
fn reapply_marks_options_from_saved_session() {
    let dir = TempDir::new("reapply_marks");
    let capture = write_quiz_capture(&dir);
    let session = write_session(&dir, "What is 2+2?", "4");
    let output = dir.join("marked.json");

    let status = Command::new(bin())
        .args(["reapply", "--input"])
        .arg(&capture)
        .arg("--session")
        .arg(&session)
        .arg("--output")
        .arg(&output)
        .status()
        .expect("failed to run formkey");

    assert!(status.success());
    let marked: Vec<String> = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(marked, vec!["3", "4 +"]);
}

#[test]
fn solve_reports_transport_failure() {
    let dir = TempDir::new("solve_unreachable");
    let capture = write_quiz_capture(&dir);

    let out = Command::new(bin())
        .args(["solve", "--base-url", "http://127.0.0.1:9", "--input"])
        .arg(&capture)
        .arg("--session")
        .arg(dir.join("session.json"))
        .output()
        .expect("failed to run formkey");

    assert!(!out.status.success(), "unreachable service must fail the run");
    assert!(
        !dir.join("session.json").exists(),
        "a failed solve must not persist a session"
    );
}

#[test]
fn solve_rejects_empty_capture_before_any_request() {
    let dir = TempDir::new("solve_empty");
    let capture = dir.join("empty.json");
    fs::write(&capture, r#"{"items": [], "optionTexts": []}"#).unwrap();

    let out = Command::new(bin())
        .args(["solve", "--base-url", "http://127.0.0.1:9", "--input"])
        .arg(&capture)
        .output()
        .expect("failed to run formkey");

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("no questions"), "unexpected stderr: {stderr}");
}
