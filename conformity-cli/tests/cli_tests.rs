use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command isolated from the user's state and environment
fn conformity(state: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_conformity"));
    cmd.env("NO_COLOR", "1")
        .env_remove("CONFORMITY_URL")
        .env_remove("CONFORMITY_MIN_SEARCH_LEN")
        .env_remove("CONFORMITY_POLL_INTERVAL_MS")
        .env_remove("CONFORMITY_ON_TRANSPORT_ERROR")
        .env_remove("CONFORMITY_REQUEST_TIMEOUT_SECS")
        .arg("--state-dir")
        .arg(state.path())
        // nothing listens here; commands under test must fail before any request
        .arg("--url")
        .arg("http://127.0.0.1:9");
    cmd
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_conformity"));
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Check a project document against its technical specification",
        ));
}

#[test]
fn test_report_help() {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_conformity"));
    cmd.arg("report")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--search"));
}

#[test]
fn test_theme_defaults_to_light() {
    let state = TempDir::new().unwrap();
    conformity(&state)
        .arg("theme")
        .assert()
        .success()
        .stdout(predicate::str::contains("light"));
}

#[test]
fn test_theme_toggle_is_persisted() {
    let state = TempDir::new().unwrap();
    conformity(&state).args(["theme", "toggle"]).assert().success();

    conformity(&state)
        .args(["theme", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dark"));

    let saved = std::fs::read_to_string(state.path().join("session.json")).unwrap();
    assert!(saved.contains("\"dark\""));
}

#[test]
fn test_watch_without_job_points_to_submit() {
    let state = TempDir::new().unwrap();
    conformity(&state)
        .arg("watch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No comparison in progress"))
        .stderr(predicate::str::contains("conformity submit"));
}

#[test]
fn test_download_without_job_points_to_submit() {
    let state = TempDir::new().unwrap();
    conformity(&state)
        .arg("download")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No comparison in progress"));
}

#[test]
fn test_submit_rejects_unsupported_file_type() {
    let state = TempDir::new().unwrap();
    let spec = state.path().join("spec.pdf");
    let project = state.path().join("project.xlsx");
    std::fs::write(&spec, b"%PDF-1.4").unwrap();
    std::fs::write(&project, b"cells").unwrap();

    conformity(&state)
        .arg("submit")
        .arg(&spec)
        .arg(&project)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported file type"));

    assert!(!state.path().join("session.json").exists());
}

#[test]
fn test_blank_session_is_rejected() {
    let state = TempDir::new().unwrap();
    conformity(&state)
        .args(["report", "--session", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("session id cannot be empty"));
}

#[test]
fn test_min_search_len_below_floor_is_rejected() {
    let state = TempDir::new().unwrap();
    conformity(&state)
        .args(["--min-search-len", "1", "theme"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("min_search_len must be at least 2"));
}
