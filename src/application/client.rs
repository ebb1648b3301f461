use crate::config::ClientConfig;
use crate::domain::acknowledgement::AcknowledgementRequest;
use crate::domain::envelope::Envelope;
use crate::domain::notification::NotificationRecord;
use crate::domain::order::PaymentRequest;
use crate::domain::ports::EnvelopeCipher;
use crate::error::{PaymentError, Result};
use crate::infrastructure::hybrid::HybridCipher;
use crate::infrastructure::keystore::KeyStore;
use crate::interfaces::xml::acknowledgement_writer::build_acknowledgement;
use crate::interfaces::xml::notification_reader::parse_notification;
use crate::interfaces::xml::order_writer::build_order;

/// `strftime` layout of the order timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// The main entry point for talking to the gateway.
///
/// `PaymentClient` turns payment requests into sealed envelopes and sealed
/// notifications back into records. It holds no mutable state, so a single
/// instance can serve concurrent callers.
pub struct PaymentClient<C: EnvelopeCipher = HybridCipher> {
    signature: String,
    cipher: C,
    development: bool,
}

impl PaymentClient {
    /// Creates a client backed by the RSA + RC4 envelope.
    ///
    /// # Arguments
    ///
    /// * `signature` - The merchant signature issued by the gateway.
    /// * `keys` - Gateway public key and merchant private key.
    pub fn new(signature: impl Into<String>, keys: KeyStore) -> Result<Self> {
        Self::with_cipher(signature, HybridCipher::new(keys))
    }

    /// Loads key material from the configured paths.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let keys = KeyStore::from_files(&config.public_key, &config.private_key)?;
        let cipher = HybridCipher::new(keys).with_development(config.development);
        Ok(Self::with_cipher(config.signature.clone(), cipher)?.with_development(config.development))
    }
}

impl<C: EnvelopeCipher> PaymentClient<C> {
    pub fn with_cipher(signature: impl Into<String>, cipher: C) -> Result<Self> {
        let signature = signature.into();
        if signature.is_empty() {
            return Err(PaymentError::ConfigurationError(
                "Missing signature argument".to_string(),
            ));
        }
        Ok(Self {
            signature,
            cipher,
            development: false,
        })
    }

    /// In development mode each order document is logged in full.
    pub fn with_development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn cipher(&self) -> &C {
        &self.cipher
    }

    /// Validates `request` and renders its order document without encrypting
    /// it. A missing timestamp is stamped with the local time.
    pub fn build_order_document(&self, request: &PaymentRequest) -> Result<Vec<u8>> {
        let amount = request.validate().inspect_err(|e| {
            if self.development {
                tracing::debug!(?request, error = %e, "rejected payment request");
            }
        })?;

        let timestamp = match request.timestamp.as_deref() {
            Some(timestamp) if !timestamp.is_empty() => timestamp.to_string(),
            _ => chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
        };

        let xml = build_order(request, amount, &self.signature, &timestamp)?;
        if self.development {
            tracing::debug!(xml = %String::from_utf8_lossy(&xml), "built order document");
        }
        Ok(xml)
    }

    /// Builds and seals the order document for `request`.
    ///
    /// Validation runs before any cipher work.
    pub fn create_payment_request(&self, request: &PaymentRequest) -> Result<Envelope> {
        let xml = self.build_order_document(request)?;
        let envelope = self.cipher.seal(&xml)?;
        tracing::info!(order_id = %request.order_id, "created payment request");
        Ok(envelope)
    }

    /// Opens a gateway notification and parses it.
    ///
    /// # Arguments
    ///
    /// * `env_key` - The `env_key` form field, possibly percent-encoded.
    /// * `data` - The `data` form field, possibly percent-encoded.
    pub fn process_notification(&self, env_key: &str, data: &str) -> Result<NotificationRecord> {
        let xml = self.cipher.open(env_key, data)?;
        let record = parse_notification(&xml)?;
        tracing::info!(
            order_id = %record.order_id,
            action = ?record.action(),
            crc = ?record.crc,
            "processed notification"
        );
        Ok(record)
    }

    /// Renders the reply body for a processed notification.
    pub fn acknowledge(&self, ack: &AcknowledgementRequest) -> Result<Vec<u8>> {
        build_acknowledgement(ack)
    }
}
