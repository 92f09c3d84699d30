#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn cli(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("horaires-cli").unwrap();
    cmd.current_dir(dir)
        .arg("--store")
        .arg(dir.join("workplaces"))
        .arg("--schedule")
        .arg(dir.join("schedule.json"));
    cmd
}

#[test]
fn generate_then_check_reports_warnings() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(
        root.join("team.csv"),
        "first_name,last_name,email,availability\nAlice,Martin,alice@example.com,Mon 10:00-18:00\n",
    )
    .unwrap();

    cli(root)
        .args(["add-block", "--workplace", "library", "--day", "mon"])
        .args(["--start", "10:00", "--end", "22:00"])
        .assert()
        .success();

    cli(root)
        .args(["hours", "--workplace", "library"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10:00-22:00"))
        .stdout(predicate::str::contains("closed"));

    cli(root)
        .args(["list-workplaces"])
        .assert()
        .success()
        .stdout(predicate::str::contains("library"));

    cli(root)
        .args(["generate", "--workplace", "library", "--workers", "team.csv"])
        .args(["--seed", "42", "--out-csv", "out.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("library schedule (seed 42)"))
        .stdout(predicate::str::contains("Alice Martin"));

    let csv = fs::read_to_string(root.join("out.csv")).unwrap();
    assert!(csv.starts_with("day,start,end,assigned"));
    assert!(csv.contains("Unfilled"));
    assert!(root.join("schedule.json").exists());

    cli(root)
        .args(["check"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unfilled"));

    cli(root)
        .args(["show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| Monday 10:00-"));
}

#[test]
fn overlapping_block_fails() {
    let dir = tempdir().unwrap();
    let root = dir.path();

    cli(root)
        .args(["add-block", "--workplace", "library", "--day", "Monday"])
        .args(["--start", "10:00", "--end", "14:00"])
        .assert()
        .success();

    cli(root)
        .args(["add-block", "--workplace", "library", "--day", "Monday"])
        .args(["--start", "12:00", "--end", "16:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("overlapping"));
}

#[test]
fn generate_requires_opening_hours() {
    let dir = tempdir().unwrap();
    cli(dir.path())
        .args(["generate", "--workplace", "ghost", "--workers", "team.csv"])
        .assert()
        .failure();
}

#[test]
fn stored_roster_is_managed_and_used_by_generate() {
    let dir = tempdir().unwrap();
    let root = dir.path();

    cli(root)
        .args(["add-block", "--workplace", "cafe", "--day", "tue"])
        .args(["--start", "08:00", "--end", "14:00"])
        .assert()
        .success();

    // sans équipe, generate refuse de tourner
    cli(root)
        .args(["generate", "--workplace", "cafe", "--seed", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no workers"));

    cli(root)
        .args(["add-worker", "--workplace", "cafe", "--first-name", "Alice"])
        .args(["--last-name", "Martin", "--email", "alice@example.com"])
        .args(["--availability", "Tue 08:00-14:00"])
        .assert()
        .success();

    cli(root)
        .args(["add-worker", "--workplace", "cafe", "--first-name", "Alicia"])
        .args(["--last-name", "Martin", "--email", "alice@example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    fs::write(
        root.join("more.csv"),
        "first_name,last_name,email,work_study,availability\n\
         Bob,Stone,bob@example.com,yes,Tue 09:00-14:00\n",
    )
    .unwrap();
    cli(root)
        .args(["import-workers", "--workplace", "cafe", "--csv", "more.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 added, 0 updated"));

    cli(root)
        .args(["update-worker", "--workplace", "cafe", "--email", "alice@example.com"])
        .args(["--last-name", "Roy"])
        .assert()
        .success();

    cli(root)
        .args(["workers", "--workplace", "cafe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice@example.com | Alice Roy | Tuesday 08:00-14:00"))
        .stdout(predicate::str::contains("Bob Stone [work-study]"));

    cli(root)
        .args(["generate", "--workplace", "cafe", "--seed", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bob@example.com"))
        .stdout(predicate::str::contains("alice@example.com"));

    cli(root)
        .args(["remove-worker", "--workplace", "cafe", "--email", "bob@example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("removed Bob Stone"));

    cli(root)
        .args(["remove-worker", "--workplace", "cafe", "--email", "bob@example.com"])
        .assert()
        .failure();
}
