// domain-verify/tests/cli_integration.rs

//! CLI tests that never need the network: every input is either empty,
//! disposable-only, or rejected before any DNS query.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Command isolated from the user's config files and DV_* variables.
fn cli(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("domain-verify").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join("xdg"))
        .env_remove("RUST_LOG");
    for var in [
        "DV_CONCURRENCY",
        "DV_TIMEOUT",
        "DV_INPUT",
        "DV_OUTPUT",
        "DV_UNIQUE_OUTPUT",
        "DV_BLOCKLIST",
        "DV_CONFIG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Helper to create an input CSV in `dir`
fn write_input(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).expect("Failed to write input file");
}

#[test]
fn test_help_shows_flags() {
    let dir = TempDir::new().unwrap();
    cli(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--input"))
        .stdout(predicate::str::contains("--unique-output"))
        .stdout(predicate::str::contains("--concurrency"))
        .stdout(predicate::str::contains("--no-builtin-blocklist"));
}

#[test]
fn test_zero_concurrency_rejected() {
    let dir = TempDir::new().unwrap();
    cli(dir.path())
        .args(["--concurrency", "0"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Concurrency must be between 1 and 100"));
}

#[test]
fn test_same_output_paths_rejected() {
    let dir = TempDir::new().unwrap();
    cli(dir.path())
        .args(["-o", "out.csv", "-u", "out.csv"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("must be different files"));
}

#[test]
fn test_missing_input_file() {
    let dir = TempDir::new().unwrap();
    cli(dir.path())
        .args(["--input", "nope.csv"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("nope.csv"));
}

#[test]
fn test_missing_email_column() {
    let dir = TempDir::new().unwrap();
    write_input(dir.path(), "emails.csv", "name,address\nA,a@mailinator.com\n");

    cli(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("missing required column 'email'"));

    assert!(!dir.path().join("invalid_domains.csv").exists());
    assert!(!dir.path().join("unique_invalid_domains.csv").exists());
}

#[test]
fn test_disposable_only_input_writes_reports() {
    let dir = TempDir::new().unwrap();
    write_input(
        dir.path(),
        "emails.csv",
        "email\na@mailinator.com\nb@yopmail.com\nc@mailinator.com\nbroken-address\n",
    );

    cli(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Invalid domains written to invalid_domains.csv",
        ))
        .stdout(predicate::str::contains(
            "Unique invalid domains written to unique_invalid_domains.csv",
        ))
        .stdout(predicate::str::contains("Total domains checked: 3"));

    let invalid = fs::read_to_string(dir.path().join("invalid_domains.csv")).unwrap();
    assert_eq!(
        invalid,
        "domain,error\n\
         mailinator.com,Disposable email domain\n\
         yopmail.com,Disposable email domain\n\
         mailinator.com,Disposable email domain\n"
    );
    let unique = fs::read_to_string(dir.path().join("unique_invalid_domains.csv")).unwrap();
    assert_eq!(unique, "domain\nmailinator.com\nyopmail.com\n");
}

#[test]
fn test_custom_blocklist_and_paths() {
    let dir = TempDir::new().unwrap();
    write_input(dir.path(), "contacts.csv", "id,email\n1,x@burner.test\n");
    write_input(dir.path(), "extra.txt", "# extra\nburner.test\n");

    cli(dir.path())
        .args([
            "-i",
            "contacts.csv",
            "-o",
            "bad.csv",
            "-u",
            "bad_unique.csv",
            "--blocklist",
            "extra.txt",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total domains checked: 1"));

    let invalid = fs::read_to_string(dir.path().join("bad.csv")).unwrap();
    assert_eq!(invalid, "domain,error\nburner.test,Disposable email domain\n");
    assert!(dir.path().join("bad_unique.csv").exists());
}

#[test]
fn test_empty_input_reports_all_valid() {
    let dir = TempDir::new().unwrap();
    write_input(dir.path(), "emails.csv", "email\n");

    cli(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "All domains have valid MX records and are not disposable.",
        ))
        .stdout(predicate::str::contains("Total domains checked: 0"))
        .stdout(predicate::str::contains("Checked").not());

    assert!(!dir.path().join("invalid_domains.csv").exists());
    assert!(!dir.path().join("unique_invalid_domains.csv").exists());
}

#[test]
fn test_json_summary() {
    let dir = TempDir::new().unwrap();
    write_input(dir.path(), "emails.csv", "email\na@mailinator.com\n");

    let output = cli(dir.path()).arg("--json").output().unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["total_domains"], 1);
    assert_eq!(summary["dns_checked"], 0);
    assert_eq!(summary["counts"]["disposable"], 1);
    assert_eq!(summary["invalid_output"], "invalid_domains.csv");
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    write_input(
        dir.path(),
        "emails.csv",
        "email\na@mailinator.com\nb@example.com\n",
    );

    cli(dir.path())
        .args(["--dry-run", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_domains\": 2"))
        .stdout(predicate::str::contains("\"disposable\": 1"))
        .stdout(predicate::str::contains("\"dns_checks\": 1"));

    assert!(!dir.path().join("invalid_domains.csv").exists());
}

#[test]
fn test_config_file_sets_paths() {
    let dir = TempDir::new().unwrap();
    write_input(dir.path(), "in.csv", "email\na@trash.example\n");
    write_input(
        dir.path(),
        "domain-verify.toml",
        "[defaults]\ninput = \"in.csv\"\noutput = \"cfg_invalid.csv\"\n\n[blocklist]\ndomains = [\"trash.example\"]\nbuiltin = false\n",
    );

    cli(dir.path()).assert().success();

    let invalid = fs::read_to_string(dir.path().join("cfg_invalid.csv")).unwrap();
    assert_eq!(invalid, "domain,error\ntrash.example,Disposable email domain\n");
}

#[test]
fn test_invalid_discovered_config_is_fatal() {
    let dir = TempDir::new().unwrap();
    write_input(dir.path(), "emails.csv", "email\na@mailinator.com\n");
    write_input(dir.path(), "domain-verify.toml", "[defaults]\nconcurrency = 0\n");

    cli(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to load config file"))
        .stderr(predicate::str::contains("domain-verify.toml"));

    assert!(!dir.path().join("invalid_domains.csv").exists());
}

#[test]
fn test_invalid_config_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    write_input(dir.path(), "bad.toml", "[defaults]\nconcurrency = 0\n");

    cli(dir.path())
        .args(["--config", "bad.toml"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to load config file"));
}
