#![allow(dead_code)]

use mobilpay::{Billing, KeyStore, PaymentRequest};
use rust_decimal_macros::dec;
use std::path::PathBuf;

pub const SIGNATURE: &str = "XXXX-XXXX-XXXX-XXXX-XXXX";

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn key_store() -> KeyStore {
    KeyStore::from_files(fixture("public_key.pem"), fixture("private_key.pem")).unwrap()
}

pub fn other_key_store() -> KeyStore {
    KeyStore::from_files(
        fixture("other_public_key.pem"),
        fixture("other_private_key.pem"),
    )
    .unwrap()
}

pub fn payment_request() -> PaymentRequest {
    PaymentRequest::new(
        "1001",
        dec!(49.90),
        "customer-17",
        "Order #1001",
        "https://shop.example/mobilpay/confirm",
        "https://shop.example/mobilpay/return",
    )
    .with_timestamp("20240315120000")
    .with_billing(Billing {
        first_name: "Ion".to_string(),
        last_name: "Popescu".to_string(),
        address: "Str. Lunga 1, Cluj".to_string(),
        email: "ion@example.com".to_string(),
        phone: "0700000000".to_string(),
    })
    .with_param("foo", "bar")
    .with_param("baz", "1")
}

/// A notification as the gateway sends it for `payment_request()`.
pub fn notification_xml(crc: &str, error_code: &str, error_message: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<order type="card" id="1001" timestamp="20240315120000">
  <signature>{SIGNATURE}</signature>
  <url>
    <return>https://shop.example/mobilpay/return</return>
    <confirm>https://shop.example/mobilpay/confirm</confirm>
  </url>
  <invoice currency="RON" amount="49.90" customer_type="2" customer_id="customer-17">
    <details>Order #1001</details>
  </invoice>
  <params>
    <param><name>foo</name><value>bar</value></param>
    <param><name>baz</name><value>1</value></param>
  </params>
  <mobilpay timestamp="20240315120512" crc="{crc}">
    <action>confirmed</action>
    <customer type="person">
      <first_name>Ion</first_name>
      <last_name>Popescu</last_name>
    </customer>
    <purchase>123456</purchase>
    <original_amount>49.90</original_amount>
    <processed_amount>49.90</processed_amount>
    <pan_masked>4****1111</pan_masked>
    <error code="{error_code}">{error_message}</error>
  </mobilpay>
</order>"#
    )
}
