//! End-to-end tests that drive the `gaslight` binary.

#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn gaslight() -> Command {
    let mut cmd = Command::cargo_bin("gaslight").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

fn stdout_of(args: &[&str]) -> String {
    let output = gaslight().args(args).output().unwrap();
    assert!(output.status.success(), "{args:?} failed");
    String::from_utf8(output.stdout).unwrap()
}

// ---------------------------------------------------------------------------
// roll
// ---------------------------------------------------------------------------

#[test]
fn roll_shows_total() {
    gaslight()
        .args(["roll", "3d6", "--seed", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3d6").and(predicate::str::contains("[")));
}

#[test]
fn roll_with_seed_is_repeatable() {
    let first = stdout_of(&["roll", "2d6+6", "--seed", "11"]);
    let second = stdout_of(&["roll", "2d6+6", "--seed", "11"]);
    assert_eq!(first, second);
}

#[test]
fn roll_rejects_bad_notation() {
    gaslight()
        .args(["roll", "2x6"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid dice notation"));
}

// ---------------------------------------------------------------------------
// check / oppose
// ---------------------------------------------------------------------------

#[test]
fn check_names_the_skill_and_thresholds() {
    gaslight()
        .args(["check", "60", "--skill", "Spot Hidden", "--seed", "2"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Spot Hidden")
                .and(predicate::str::contains("(60 / 30 / 12)"))
                .and(predicate::str::contains("rolled")),
        );
}

#[test]
fn check_rejects_zero_target() {
    gaslight()
        .args(["check", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("target must be at least 1"));
}

#[test]
fn bonus_and_penalty_dice_conflict() {
    gaslight()
        .args(["check", "50", "--bonus", "1", "--penalty", "1"])
        .assert()
        .failure();
}

#[test]
fn blind_checks_offer_nothing() {
    gaslight()
        .args(["check", "1", "--blind", "--luck", "99", "--seed", "5"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("pushed")
                .not()
                .and(predicate::str::contains("luck to succeed").not()),
        );
}

#[test]
fn oppose_names_a_winner() {
    gaslight()
        .args(["oppose", "60", "40", "--seed", "8"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("attacker wins")
                .or(predicate::str::contains("defender wins"))
                .or(predicate::str::contains("neither side succeeds")),
        );
}

// ---------------------------------------------------------------------------
// derive
// ---------------------------------------------------------------------------

#[test]
fn derive_prints_stats() {
    gaslight()
        .args([
            "derive", "--str", "50", "--con", "60", "--siz", "65", "--dex", "70", "--pow", "55",
            "--age", "42",
        ])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Hit Points")
                .and(predicate::str::contains("12"))
                .and(predicate::str::contains("Damage Bonus"))
                .and(predicate::str::contains("none")),
        );
}

#[test]
fn derive_requires_every_attribute() {
    gaslight()
        .args(["derive", "--str", "50"])
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// create / show
// ---------------------------------------------------------------------------

#[test]
fn create_json_is_a_committed_sheet() {
    let text = stdout_of(&[
        "create",
        "--name",
        "Lucy Cartwright",
        "--occupation",
        "professor",
        "--age",
        "35",
        "--seed",
        "7",
        "--json",
    ]);
    let sheet: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(sheet["name"], "Lucy Cartwright");
    assert_eq!(sheet["occupation"], "professor");
    assert_eq!(sheet["age"], 35);
    assert_eq!(sheet["inventory"].as_array().unwrap().len(), 2);
    assert_eq!(sheet["status"]["madness"], "normal");
}

#[test]
fn create_is_repeatable_with_a_seed() {
    let args = ["create", "--seed", "21", "--json"];
    let a: serde_json::Value = serde_json::from_str(&stdout_of(&args)).unwrap();
    let b: serde_json::Value = serde_json::from_str(&stdout_of(&args)).unwrap();
    assert_eq!(a["name"], b["name"]);
    assert_eq!(a["attributes"], b["attributes"]);
    assert_eq!(a["skills"], b["skills"]);
}

#[test]
fn create_rejects_unknown_occupation() {
    gaslight()
        .args(["create", "--occupation", "astronaut", "--seed", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown occupation: astronaut"));
}

#[test]
fn created_sheet_can_be_shown() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("harvey.json");
    let path_str = path.to_str().unwrap();

    gaslight()
        .args([
            "create",
            "--name",
            "Harvey Walters",
            "--occupation",
            "journalist",
            "--seed",
            "3",
            "--out",
            path_str,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved"));
    assert!(path.exists());

    gaslight()
        .args(["show", path_str])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Harvey Walters")
                .and(predicate::str::contains("Journalist"))
                .and(predicate::str::contains("HP"))
                .and(predicate::str::contains("Inventory")),
        );
}

#[test]
fn show_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    gaslight()
        .args(["show", dir.path().join("nobody.json").to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}

// ---------------------------------------------------------------------------
// catalogs
// ---------------------------------------------------------------------------

#[test]
fn occupations_lists_formulas() {
    gaslight()
        .arg("occupations")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Private Investigator")
                .and(predicate::str::contains("EDU×4"))
                .and(predicate::str::contains("13 occupations")),
        );
}

#[test]
fn skills_lists_derived_bases() {
    gaslight()
        .arg("skills")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Dodge")
                .and(predicate::str::contains("half DEX"))
                .and(predicate::str::contains("Language (Own)")),
        );
}

#[test]
fn items_filter_by_category() {
    gaslight()
        .args(["items", "--category", "weapon"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(".38 Revolver")
                .and(predicate::str::contains("Lantern").not()),
        );
}

#[test]
fn items_reject_unknown_category() {
    gaslight()
        .args(["items", "--category", "spaceship"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown category"));
}

// ---------------------------------------------------------------------------
// demo
// ---------------------------------------------------------------------------

#[test]
fn demo_plays_through() {
    gaslight()
        .args(["demo", "--seed", "1920"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("invite code")
                .and(predicate::str::contains("1 investigator(s) on file"))
                .and(predicate::str::contains("Harvey Walters joined the table"))
                .and(predicate::str::contains("roll requested"))
                .and(predicate::str::contains("loses 6 SAN"))
                .and(predicate::str::contains("status update"))
                .and(predicate::str::contains("note(s) on the pinboard"))
                .and(predicate::str::contains("Keeper closed the table")),
        );
}
