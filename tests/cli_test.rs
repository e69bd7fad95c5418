use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn storefront() -> Command {
    let mut cmd = Command::new(cargo_bin!());
    cmd.env_remove("STOREFRONT_DB_PATH")
        .env_remove("PAYMENT_SECRET_KEY")
        .env_remove("STOREFRONT_SEED");
    cmd
}

#[test]
fn test_help_lists_subcommands() -> Result<(), Box<dyn std::error::Error>> {
    storefront()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("report"));
    Ok(())
}

#[test]
fn test_report_prints_csv_header() -> Result<(), Box<dyn std::error::Error>> {
    storefront()
        .arg("report")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "id,customer_name,customer_email,customer_phone,status,total,transaction_id",
        ));
    Ok(())
}

#[test]
fn test_serve_requires_secret_key() -> Result<(), Box<dyn std::error::Error>> {
    storefront()
        .args(["serve", "--seed", "tests/fixtures/seed.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--payment-secret-key"));
    Ok(())
}

#[test]
fn test_serve_fails_on_missing_seed() -> Result<(), Box<dyn std::error::Error>> {
    storefront()
        .args(["serve", "--seed", "tests/fixtures/does-not-exist.json"])
        .env("PAYMENT_SECRET_KEY", "sk_test_123")
        .assert()
        .failure()
        .stderr(predicate::str::contains("IO error"));
    Ok(())
}

#[cfg(not(feature = "storage-rocksdb"))]
#[test]
fn test_db_path_needs_rocksdb_feature() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    storefront()
        .args(["report", "--db-path"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("storage-rocksdb"));
    Ok(())
}
