mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use common::{SIGNATURE, fixture, key_store, notification_xml};
use mobilpay::domain::ports::EnvelopeCipher;
use mobilpay::{Envelope, HybridCipher};
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn mobilpay() -> Command {
    let mut cmd = Command::new(cargo_bin!("mobilpay"));
    cmd.env_remove("MOBILPAY_SIGNATURE")
        .env_remove("MOBILPAY_PUBLIC_KEY")
        .env_remove("MOBILPAY_PRIVATE_KEY")
        .env_remove("MOBILPAY_DEVELOPMENT")
        .env_remove("RUST_LOG");
    cmd
}

fn key_args(cmd: &mut Command) -> &mut Command {
    cmd.arg("--signature")
        .arg(SIGNATURE)
        .arg("--public-key")
        .arg(fixture("public_key.pem"))
        .arg("--private-key")
        .arg(fixture("private_key.pem"))
}

#[test]
fn test_create_prints_envelope() -> Result<(), Box<dyn std::error::Error>> {
    let mut request = NamedTempFile::new()?;
    writeln!(
        request,
        r#"{{"order_id": "1001", "amount": "49.90", "customer_id": "17",
            "details": "Order #1001", "timestamp": "20240315120000",
            "confirm_url": "https://shop.example/confirm",
            "return_url": "https://shop.example/return"}}"#
    )?;

    let mut cmd = mobilpay();
    cmd.arg("create");
    key_args(&mut cmd).arg(request.path());
    let output = cmd.assert().success().get_output().stdout.clone();

    let envelope: Envelope = serde_json::from_slice(&output)?;
    let xml = HybridCipher::new(key_store()).open(&envelope.env_key, &envelope.data)?;
    let xml = String::from_utf8(xml)?;
    assert!(xml.contains("<order type=\"card\" id=\"1001\" timestamp=\"20240315120000\">"));
    assert!(xml.contains("currency=\"RON\" amount=\"49.90\""));
    Ok(())
}

#[test]
fn test_create_reports_missing_fields() {
    let mut request = NamedTempFile::new().unwrap();
    writeln!(request, r#"{{"order_id": "1", "amount": 5}}"#).unwrap();

    let mut cmd = mobilpay();
    cmd.arg("create");
    key_args(&mut cmd).arg(request.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"));
}

#[test]
fn test_create_reads_keys_from_environment() {
    let mut request = NamedTempFile::new().unwrap();
    writeln!(
        request,
        r#"{{"order_id": "7", "amount": 1, "customer_id": "c", "details": "d",
            "confirm_url": "https://a/c", "return_url": "https://a/r"}}"#
    )
    .unwrap();

    let mut cmd = mobilpay();
    cmd.env("MOBILPAY_SIGNATURE", SIGNATURE)
        .env("MOBILPAY_PUBLIC_KEY", fixture("public_key.pem"))
        .env("MOBILPAY_PRIVATE_KEY", fixture("private_key.pem"))
        .arg("create")
        .arg(request.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"env_key\""))
        .stdout(predicate::str::contains("\"data\""));
}

#[test]
fn test_missing_keys_are_configuration_errors() {
    let mut cmd = mobilpay();
    cmd.arg("notify")
        .arg("--signature")
        .arg(SIGNATURE)
        .arg("--env-key")
        .arg("a")
        .arg("--data")
        .arg("b");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_notify_prints_record() {
    let envelope = HybridCipher::new(key_store())
        .seal(notification_xml("X123", "30", "Card declined").as_bytes())
        .unwrap();

    let mut cmd = mobilpay();
    cmd.arg("notify");
    key_args(&mut cmd)
        .arg("--env-key")
        .arg(&envelope.env_key)
        .arg("--data")
        .arg(&envelope.data);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"crc\": \"X123\""))
        .stdout(predicate::str::contains("\"message\": \"Card declined\""))
        .stdout(predicate::str::contains("\"foo\": \"bar\""));
}

#[test]
fn test_notify_hides_decryption_cause() {
    let mut cmd = mobilpay();
    cmd.arg("notify");
    key_args(&mut cmd)
        .arg("--env-key")
        .arg("AAAA")
        .arg("--data")
        .arg("AAAA");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Could not decrypt message."))
        .stderr(predicate::str::contains("session key").not());
}

#[test]
fn test_ack_output() {
    let mut cmd = mobilpay();
    cmd.arg("ack").arg("X123");
    cmd.assert()
        .success()
        .stdout("<?xml version='1.0' encoding='utf-8'?>\n<crc>X123</crc>\n");

    let mut cmd = mobilpay();
    cmd.arg("ack")
        .arg("--error-type")
        .arg("FATAL_ERROR")
        .arg("--error-code")
        .arg("1");
    cmd.assert().success().stdout(predicate::str::contains(
        "<crc error_type=\"FATAL_ERROR\" error_code=\"1\"></crc>",
    ));
}
