//! RSA + RC4 hybrid envelope.
//!
//! A fresh 16-byte session key is RSA-wrapped with PKCS#1 v1.5 padding and
//! the document itself is RC4-encrypted under that key, with no IV and no
//! authentication tag, as the gateway expects.

use super::keystore::KeyStore;
use crate::domain::envelope::Envelope;
use crate::domain::ports::EnvelopeCipher;
use crate::error::{PaymentError, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rand::RngCore;
use rand::rngs::OsRng;
use rc4::consts::U16;
use rc4::{KeyInit, Rc4, StreamCipher};
use rsa::Pkcs1v15Encrypt;
use std::borrow::Cow;
use thiserror::Error;

pub const SESSION_KEY_LEN: usize = 16;

/// Internal failure causes on the open path. Only ever logged; callers see
/// [`PaymentError::DecryptionError`].
#[derive(Error, Debug)]
enum OpenFailure {
    #[error("percent-decoding failed: {0}")]
    PercentDecode(#[from] std::string::FromUtf8Error),
    #[error("base64 decoding failed: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("session key rejected")]
    SessionKey,
}

pub struct HybridCipher {
    keys: KeyStore,
    development: bool,
}

impl HybridCipher {
    pub fn new(keys: KeyStore) -> Self {
        Self {
            keys,
            development: false,
        }
    }

    /// In development mode the underlying cause of a failed decryption is
    /// logged at debug level.
    pub fn with_development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }

    pub fn keys(&self) -> &KeyStore {
        &self.keys
    }

    /// Encrypts `plaintext`, returning the raw wrapped key and raw payload.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
        let mut session_key = [0u8; SESSION_KEY_LEN];
        OsRng.fill_bytes(&mut session_key);

        let wrapped_key = self
            .keys
            .public_key()
            .encrypt(&mut OsRng, Pkcs1v15Encrypt, &session_key)
            .map_err(|e| PaymentError::ConfigurationError(format!("key wrap failed: {e}")))?;

        let mut payload = plaintext.to_vec();
        let mut cipher = Rc4::<U16>::new(&session_key.into());
        cipher.apply_keystream(&mut payload);

        Ok((wrapped_key, payload))
    }

    /// Unwraps the session key with RSA blinding, so the private-key
    /// exponentiation does not depend on the attacker-chosen ciphertext.
    ///
    /// A wrapped key that fails PKCS#1 v1.5 unpadding is replaced by an empty
    /// sentinel rather than returned as an error.
    fn unwrap_session_key(&self, wrapped_key: &[u8]) -> Vec<u8> {
        self.keys
            .private_key()
            .decrypt_blinded(&mut OsRng, Pkcs1v15Encrypt, wrapped_key)
            .unwrap_or_default()
    }

    /// Recovers the document from a raw wrapped key and raw payload.
    ///
    /// The empty sentinel is rejected by the session-key length check, the
    /// same place a well-padded key of the wrong length fails.
    fn decrypt(&self, wrapped_key: &[u8], payload: &[u8]) -> Result<Vec<u8>, OpenFailure> {
        let session_key = self.unwrap_session_key(wrapped_key);

        let mut cipher =
            Rc4::<U16>::new_from_slice(&session_key).map_err(|_| OpenFailure::SessionKey)?;
        let mut document = payload.to_vec();
        cipher.apply_keystream(&mut document);
        Ok(document)
    }

    fn try_open(&self, env_key: &str, data: &str) -> Result<Vec<u8>, OpenFailure> {
        let wrapped_key = decode_field(env_key)?;
        let payload = decode_field(data)?;
        self.decrypt(&wrapped_key, &payload)
    }
}

impl EnvelopeCipher for HybridCipher {
    fn seal(&self, plaintext: &[u8]) -> Result<Envelope> {
        let (wrapped_key, payload) = self.encrypt(plaintext)?;
        tracing::debug!(
            wrapped_key_len = wrapped_key.len(),
            payload_len = payload.len(),
            "sealed envelope"
        );
        Ok(Envelope::new(
            STANDARD.encode(wrapped_key),
            STANDARD.encode(payload),
        ))
    }

    fn open(&self, env_key: &str, data: &str) -> Result<Vec<u8>> {
        if env_key.is_empty() || data.is_empty() {
            return Err(PaymentError::ArgumentError("Arguments missing.".to_string()));
        }

        self.try_open(env_key, data).map_err(|cause| {
            if self.development {
                tracing::debug!(error = %cause, "envelope decryption failed");
            }
            PaymentError::DecryptionError
        })
    }
}

/// Percent-decodes then base64-decodes one inbound field. ASCII whitespace is
/// dropped before base64 decoding.
fn decode_field(field: &str) -> Result<Vec<u8>, OpenFailure> {
    let unquoted = urlencoding::decode(field)?;
    let compact: Cow<'_, str> = if unquoted.contains(|c: char| c.is_ascii_whitespace()) {
        Cow::Owned(unquoted.chars().filter(|c| !c.is_ascii_whitespace()).collect())
    } else {
        unquoted
    };
    Ok(STANDARD.decode(compact.as_bytes())?)
}
