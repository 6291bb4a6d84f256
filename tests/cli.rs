#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

fn cli(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("careplan-cli").unwrap();
    cmd.current_dir(dir).args(["--plan", "plan.json", "--cache-dir", "cache"]);
    cmd
}

#[test]
fn plan_allocate_and_check_a_day() {
    let dir = tempdir().unwrap();
    cli(dir.path()).args(["add-child", "--name", "Ada"]).assert().success();
    cli(dir.path()).args(["add-child", "--name", "Leo"]).assert().success();
    cli(dir.path()).args(["add-staff", "--name", "Sam"]).assert().success();
    cli(dir.path())
        .args(["add-template", "--title", "Circle", "--duration", "30"])
        .assert()
        .success();

    for child in ["1", "2"] {
        cli(dir.path())
            .args(["generate", "--child", child, "--date", "2024-01-01"])
            .args(["--start", "09:00", "--end", "10:00", "--save"])
            .assert()
            .success()
            .stdout(predicate::str::contains("09:30 → 10:00 | Circle"));
    }

    // un seul membre pour deux enfants en parallèle : assignations forcées
    cli(dir.path())
        .args(["allocate", "--date", "2024-01-01", "--save"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("CONFLICT"));

    cli(dir.path())
        .args(["check", "--date", "2024-01-01", "--report", "conflicts.csv"])
        .assert()
        .code(2);
    let report = std::fs::read_to_string(dir.path().join("conflicts.csv")).unwrap();
    assert!(report.contains("forced"));
    assert!(report.contains("overlap"));

    cli(dir.path()).args(["add-staff", "--name", "Kim"]).assert().success();
    cli(dir.path())
        .args(["allocate", "--date", "2024-01-01", "--save"])
        .assert()
        .success();
    cli(dir.path())
        .args(["check", "--date", "2024-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: no conflicts"));
}

#[test]
fn generate_rejects_inverted_window() {
    let dir = tempdir().unwrap();
    cli(dir.path()).args(["add-child", "--name", "Ada"]).assert().success();
    cli(dir.path())
        .args(["add-template", "--title", "Circle"])
        .assert()
        .success();
    cli(dir.path())
        .args(["generate", "--child", "1", "--date", "2024-01-01"])
        .args(["--start", "11:00", "--end", "10:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid time window"));
}

#[test]
fn summary_falls_back_offline() {
    let dir = tempdir().unwrap();
    cli(dir.path()).args(["add-child", "--name", "Ada"]).assert().success();
    cli(dir.path())
        .args(["log-progress", "--child", "1", "--date", "2024-01-01", "--completed"])
        .args(["--engagement", "8", "--notes", "good focus"])
        .assert()
        .success()
        .stdout(predicate::str::contains("100% completed"));
    cli(dir.path())
        .args(["summary", "--child", "1", "--date", "2024-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Today we focused on routine"))
        .stderr(predicate::str::contains("offline fallback"));
    cli(dir.path())
        .args(["anonymize", "--child", "1", "--out", "anon.json"])
        .assert()
        .success();
    let anon = std::fs::read_to_string(dir.path().join("anon.json")).unwrap();
    assert!(anon.contains("[redacted]"));
    assert!(!anon.contains("good focus"));
}

#[test]
fn coach_and_allocation_explanation_fall_back_offline() {
    let dir = tempdir().unwrap();
    cli(dir.path()).args(["add-child", "--name", "Ada"]).assert().success();
    cli(dir.path()).args(["add-staff", "--name", "Sam"]).assert().success();
    cli(dir.path())
        .args(["add-template", "--title", "Circle", "--duration", "30"])
        .assert()
        .success();
    cli(dir.path())
        .args(["generate", "--child", "1", "--date", "2024-01-01"])
        .args(["--start", "09:00", "--end", "10:00", "--save"])
        .assert()
        .success();
    cli(dir.path())
        .args(["log-progress", "--child", "1", "--date", "2024-01-01", "--engagement", "4"])
        .assert()
        .success();

    cli(dir.path())
        .args(["coach", "--child", "1", "--date", "2024-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Give one clear instruction"))
        .stderr(predicate::str::contains("offline fallback"));

    cli(dir.path())
        .args(["allocate", "--date", "2024-01-01", "--explain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Give one clear instruction"))
        .stdout(predicate::str::contains("09:00 → 09:30 | Ada | Sam"));
}

#[test]
fn allocate_restricted_to_listed_staff() {
    let dir = tempdir().unwrap();
    cli(dir.path()).args(["add-child", "--name", "Ada"]).assert().success();
    cli(dir.path()).args(["add-staff", "--name", "Sam"]).assert().success();
    cli(dir.path()).args(["add-staff", "--name", "Kim"]).assert().success();
    cli(dir.path())
        .args(["add-template", "--title", "Circle", "--duration", "60"])
        .assert()
        .success();
    cli(dir.path())
        .args(["generate", "--child", "1", "--date", "2024-01-01"])
        .args(["--start", "09:00", "--end", "10:00", "--save"])
        .assert()
        .success();

    cli(dir.path())
        .args(["allocate", "--date", "2024-01-01", "--staff", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| Ada | Kim"));
    cli(dir.path())
        .args(["allocate", "--date", "2024-01-01", "--staff", "2,7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown staff member: 7"));
}

#[test]
fn unknown_child_is_reported() {
    let dir = tempdir().unwrap();
    cli(dir.path())
        .args(["coach", "--child", "9", "--date", "2024-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown child: 9"));
}
