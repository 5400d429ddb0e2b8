//! Integration tests for the `stay` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to drive the real binary
//! against a scratch data file: registering an apartment, submitting and
//! confirming requests, availability checks, and error exits.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper: a fresh data file path inside a temp dir.
fn scratch() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let data = dir.path().join("bookings.json");
    (dir, data)
}

/// Helper: `stay --data <file>` ready for more args.
fn stay(data: &Path) -> Command {
    let mut cmd = Command::cargo_bin("stay").unwrap();
    cmd.arg("--data").arg(data);
    cmd
}

/// Helper: register apartment `loft` (max 4 guests, 12000 per night).
fn add_loft(data: &Path) {
    stay(data)
        .args([
            "add-apartment",
            "--id",
            "loft",
            "--name",
            "Sea View Loft",
            "--price",
            "12000",
            "--max-guests",
            "4",
        ])
        .assert()
        .success()
        .stdout("loft\n");
}

/// Helper: submit a request and return the printed booking id.
fn request(data: &Path, start: &str, end: &str, guests: &str) -> String {
    let output = stay(data)
        .args([
            "request",
            "--apartment",
            "loft",
            "--name",
            "Ana",
            "--email",
            "ana@example.com",
            "--phone",
            "555-0100",
            "--start",
            start,
            "--end",
            end,
            "--guests",
            guests,
            "--today",
            "2024-01-01",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    String::from_utf8(output).unwrap().trim().to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Booking workflow
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn request_is_stored_pending_in_data_file() {
    let (_dir, data) = scratch();
    add_loft(&data);

    let id = request(&data, "2024-03-01", "2024-03-05", "2");
    assert_eq!(id, "bk-000001");

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&data).unwrap()).unwrap();
    assert_eq!(json["bookings"][0]["status"], "pending");
    assert_eq!(json["bookings"][0]["start"], "2024-03-01");
}

#[test]
fn confirmed_booking_blocks_dates() {
    let (_dir, data) = scratch();
    add_loft(&data);
    let id = request(&data, "2024-01-10", "2024-01-12", "2");

    // Pending requests do not block.
    stay(&data)
        .args(["blocked", "--apartment", "loft"])
        .assert()
        .success()
        .stdout("");

    stay(&data)
        .args(["confirm", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("confirmed"));

    stay(&data)
        .args(["blocked", "--apartment", "loft"])
        .assert()
        .success()
        .stdout("2024-01-10\n2024-01-11\n2024-01-12\n");
}

#[test]
fn check_reports_conflicts_and_availability() {
    let (_dir, data) = scratch();
    add_loft(&data);
    let id = request(&data, "2024-03-01", "2024-03-10", "2");
    stay(&data).args(["confirm", &id]).assert().success();

    stay(&data)
        .args(["check", "--apartment", "loft", "--start", "2024-03-03", "--end", "2024-03-05"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("conflict"))
        .stdout(predicate::str::contains(id.as_str()));

    stay(&data)
        .args(["check", "--apartment", "loft", "--start", "2024-03-11", "--end", "2024-03-15"])
        .assert()
        .success()
        .stdout("available\n");
}

#[test]
fn same_day_turnover_policy_from_config_file() {
    let (dir, data) = scratch();
    let config = dir.path().join("policy.toml");
    std::fs::write(&config, "boundary = \"same_day_turnover\"\n").unwrap();
    add_loft(&data);
    let id = request(&data, "2024-03-01", "2024-03-05", "2");
    stay(&data).args(["confirm", &id]).assert().success();

    // Inclusive by default: checkout day clashes.
    stay(&data)
        .args(["check", "--apartment", "loft", "--start", "2024-03-05", "--end", "2024-03-08"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("conflict"));

    stay(&data)
        .arg("--config")
        .arg(&config)
        .args(["check", "--apartment", "loft", "--start", "2024-03-05", "--end", "2024-03-08"])
        .assert()
        .success()
        .stdout("available\n");
}

#[test]
fn too_many_guests_fails_and_stores_nothing() {
    let (_dir, data) = scratch();
    add_loft(&data);

    stay(&data)
        .args([
            "request", "--apartment", "loft", "--name", "Ana", "--email", "ana@example.com",
            "--phone", "555-0100", "--start", "2024-03-01", "--end", "2024-03-05",
            "--guests", "5", "--today", "2024-01-01",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("maximum number of guests is 4"))
        .stderr(predicate::str::contains("guest_count_exceeded"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&data).unwrap()).unwrap();
    assert_eq!(json["bookings"].as_array().unwrap().len(), 0);
}

#[test]
fn reversed_dates_fail_with_invalid_range() {
    let (_dir, data) = scratch();
    add_loft(&data);

    stay(&data)
        .args(["check", "--apartment", "loft", "--start", "2024-03-05", "--end", "2024-03-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid_range"));
}

#[test]
fn cancelling_twice_fails_with_invalid_transition() {
    let (_dir, data) = scratch();
    add_loft(&data);
    let id = request(&data, "2024-03-01", "2024-03-05", "2");

    stay(&data).args(["cancel", &id]).assert().success();
    stay(&data)
        .args(["cancel", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid_transition"));
}

#[test]
fn request_in_the_past_is_rejected() {
    let (_dir, data) = scratch();
    add_loft(&data);

    stay(&data)
        .args([
            "request", "--apartment", "loft", "--name", "Ana", "--email", "ana@example.com",
            "--phone", "555-0100", "--start", "2024-03-01", "--end", "2024-03-05",
            "--today", "2024-06-01",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("start_in_past"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Read-only views
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn list_shows_newest_first_with_actions() {
    let (_dir, data) = scratch();
    add_loft(&data);
    let first = request(&data, "2024-03-01", "2024-03-02", "1");
    let second = request(&data, "2024-04-01", "2024-04-02", "1");
    stay(&data).args(["confirm", &first]).assert().success();

    let output = stay(&data).arg("list").assert().success().get_output().stdout.clone();
    let text = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with(&second));
    assert!(lines[0].ends_with("pending\tconfirm,cancel"));
    assert!(lines[1].starts_with(&first));
    assert!(lines[1].ends_with("confirmed\tcancel"));
}

#[test]
fn calendar_prints_month_grid() {
    let (_dir, data) = scratch();
    add_loft(&data);
    let id = request(&data, "2024-02-27", "2024-03-02", "2");
    stay(&data).args(["confirm", &id]).assert().success();

    stay(&data)
        .args(["calendar", "--apartment", "loft", "--month", "2024-02"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-02-29 x bk-000001"))
        .stdout(predicate::str::contains("2024-02-01 ."))
        .stdout(predicate::str::contains("3 of 29 day(s) booked"));
}

#[test]
fn calendar_and_day_listing_cover_every_apartment() {
    let (_dir, data) = scratch();
    add_loft(&data);
    stay(&data)
        .args([
            "add-apartment",
            "--id",
            "cabin",
            "--name",
            "Forest Cabin",
            "--price",
            "8000",
            "--max-guests",
            "2",
        ])
        .assert()
        .success();

    let loft = request(&data, "2024-05-01", "2024-05-03", "2");
    stay(&data).args(["confirm", &loft]).assert().success();
    let cabin = stay(&data)
        .args([
            "request",
            "--apartment",
            "cabin",
            "--name",
            "Luis",
            "--email",
            "luis@example.com",
            "--phone",
            "555-0101",
            "--start",
            "2024-05-03",
            "--end",
            "2024-05-04",
            "--guests",
            "1",
            "--today",
            "2024-01-01",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let cabin = String::from_utf8(cabin).unwrap().trim().to_string();
    stay(&data).args(["confirm", &cabin]).assert().success();
    // Pending requests do not occupy the calendar.
    request(&data, "2024-05-10", "2024-05-11", "1");

    stay(&data)
        .args(["calendar", "--month", "2024-05"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-05-03 x bk-000001,bk-000002"))
        .stdout(predicate::str::contains("2024-05-10 ."))
        .stdout(predicate::str::contains("4 of 31 day(s) booked"));

    stay(&data)
        .args(["day", "2024-05-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "bk-000001\tSea View Loft\t2024-05-01..=2024-05-03\tconfirmed",
        ))
        .stdout(predicate::str::contains(
            "bk-000002\tForest Cabin\t2024-05-03..=2024-05-04\tconfirmed",
        ));

    stay(&data)
        .args(["day", "2024-05-20"])
        .assert()
        .success()
        .stdout("no bookings on 2024-05-20\n");
}

#[test]
fn calendar_rejects_bad_month() {
    let (_dir, data) = scratch();
    add_loft(&data);

    stay(&data)
        .args(["calendar", "--apartment", "loft", "--month", "2024-13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid_month"));

    stay(&data)
        .args(["calendar", "--apartment", "loft", "--month", "March"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YYYY-MM"));
}

#[test]
fn quote_prints_json() {
    let (_dir, data) = scratch();
    add_loft(&data);

    let output = stay(&data)
        .args([
            "quote",
            "--apartment",
            "loft",
            "--start",
            "2024-08-01",
            "--end",
            "2024-08-04",
            "--guests",
            "2",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let quote: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(quote["nights"], 3);
    assert_eq!(quote["total"], 36000);
}

#[test]
fn unknown_apartment_fails() {
    let (_dir, data) = scratch();
    add_loft(&data);

    stay(&data)
        .args(["blocked", "--apartment", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("apartment_not_found"));
}

#[test]
fn invalid_config_file_fails() {
    let (dir, data) = scratch();
    let config = dir.path().join("policy.toml");
    std::fs::write(&config, "boundary = \"sometimes\"\n").unwrap();

    stay(&data)
        .arg("--config")
        .arg(&config)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid policy"));
}
