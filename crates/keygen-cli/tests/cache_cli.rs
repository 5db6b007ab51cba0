//! Black-box tests for `keygen-verify cache`.
//!
//! These never contact the API: records are signed locally and the binary is
//! pointed at the matching public key.

use assert_cmd::Command;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use ed25519_dalek::{Signer, SigningKey};
use keygen_verify::{CacheRecord, ContentDigest, SigningComponents};
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const HOST: &str = "api.example";
const TARGET: &str = "post /v1/accounts/ACME/licenses/actions/validate-key";
const DATE: &str = "Tue, 01 Jan 2030 00:00:00 GMT";
const BODY: &str = r#"{"meta":{"valid":true,"detail":"is valid","constant":"VALID"}}"#;

fn signed_record(key: &SigningKey, body: &str) -> CacheRecord {
    let digest = ContentDigest::of(body.as_bytes());
    let components = SigningComponents::from_target(TARGET, HOST, DATE, &digest);
    CacheRecord {
        date: DATE.to_string(),
        target: TARGET.to_string(),
        signature: BASE64.encode(key.sign(components.canonical_string().as_bytes()).to_bytes()),
        body: body.to_string(),
    }
}

fn write_record(dir: &Path, record: &CacheRecord) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(
        dir.join("validate.json"),
        serde_json::to_string(record).unwrap(),
    )
    .unwrap();
}

fn cli(cache_dir: &Path, key: &SigningKey) -> Command {
    cli_with_key_hex(cache_dir, &hex::encode(key.verifying_key().to_bytes()))
}

fn cli_with_key_hex(cache_dir: &Path, public_key_hex: &str) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("keygen-verify").expect("keygen-verify binary");
    for var in [
        "KEYGEN_API_URL",
        "KEYGEN_ACCOUNT_ID",
        "KEYGEN_PUBLIC_KEY",
        "KEYGEN_HOST",
        "KEYGEN_CACHE_DIR",
        "KEYGEN_NO_CACHE",
        "KEYGEN_TAMPER_POLICY",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("RUST_LOG", "warn")
        .arg("cache")
        .arg("check")
        .arg("--cache-dir")
        .arg(cache_dir)
        .arg("--public-key")
        .arg(public_key_hex)
        .arg("--signing-host")
        .arg(HOST);
    cmd
}

#[test]
fn cache_check_reports_miss() {
    let temp = TempDir::new().unwrap();
    let key = SigningKey::generate(&mut rand::thread_rng());

    cli(&temp.path().join("cache"), &key)
        .assert()
        .success()
        .stdout(predicate::str::contains("Cache miss: key=validate"));
}

#[test]
fn cache_check_verifies_signed_record() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("cache");
    let key = SigningKey::generate(&mut rand::thread_rng());
    write_record(&dir, &signed_record(&key, BODY));

    cli(&dir, &key)
        .assert()
        .success()
        .stdout(predicate::str::contains("Cache verified: key=validate"))
        .stdout(predicate::str::contains(
            "License is valid! detail=is valid code=VALID",
        ));
}

#[test]
fn cache_check_fails_on_tampered_body() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("cache");
    let key = SigningKey::generate(&mut rand::thread_rng());
    let mut record = signed_record(&key, BODY);
    record.body = BODY.replace("is valid", "is forever valid");
    write_record(&dir, &record);

    cli(&dir, &key)
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("tampered"));

    assert!(dir.join("validate.json").exists());
}

#[test]
fn cache_check_fails_on_foreign_key() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("cache");
    let key = SigningKey::generate(&mut rand::thread_rng());
    let other = SigningKey::generate(&mut rand::thread_rng());
    write_record(&dir, &signed_record(&other, BODY));

    cli(&dir, &key).assert().failure().code(4);
}

#[test]
fn cache_check_evict_policy_removes_tampered_record() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("cache");
    let key = SigningKey::generate(&mut rand::thread_rng());
    let mut record = signed_record(&key, BODY);
    record.date = "Wed, 02 Jan 2030 00:00:00 GMT".to_string();
    write_record(&dir, &record);

    cli(&dir, &key)
        .arg("--tamper-policy")
        .arg("evict")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cache miss"));

    assert!(!dir.join("validate.json").exists());
}

#[test]
fn cache_check_rejects_bad_public_key() {
    let temp = TempDir::new().unwrap();

    cli_with_key_hex(&temp.path().join("cache"), "nothex")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("configuration error"));
}

#[test]
fn cache_list_and_clear() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("cache");
    let key = SigningKey::generate(&mut rand::thread_rng());
    write_record(&dir, &signed_record(&key, BODY));

    #[allow(deprecated)]
    Command::cargo_bin("keygen-verify")
        .unwrap()
        .args(["cache", "list", "--cache-dir"])
        .arg(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("validate"));

    #[allow(deprecated)]
    Command::cargo_bin("keygen-verify")
        .unwrap()
        .args(["cache", "clear", "--cache-dir"])
        .arg(&dir)
        .assert()
        .success();

    assert!(!dir.exists());
}
