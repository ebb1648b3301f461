//! Client for the mobilPay card gateway's XML protocol.
//!
//! Outbound payment orders are rendered as XML and sealed in an RSA + RC4
//! envelope; inbound notifications are opened, parsed into a
//! [`NotificationRecord`](domain::notification::NotificationRecord) and
//! acknowledged with a small `<crc>` document.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;

pub use application::client::PaymentClient;
pub use config::ClientConfig;
pub use domain::acknowledgement::AcknowledgementRequest;
pub use domain::envelope::Envelope;
pub use domain::notification::{Action, NotificationError, NotificationRecord};
pub use domain::order::{Billing, PaymentRequest};
pub use error::{PaymentError, Result};
pub use infrastructure::hybrid::HybridCipher;
pub use infrastructure::keystore::KeyStore;
