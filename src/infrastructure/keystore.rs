use crate::error::{PaymentError, Result};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::fmt;
use std::fs;
use std::path::Path;

/// Key material for the envelope cipher.
///
/// Holds the gateway's public key (outbound orders) and the merchant's private
/// key (inbound notifications). Immutable once built, so it is shared across
/// threads without locking.
#[derive(Clone)]
pub struct KeyStore {
    public_key: RsaPublicKey,
    private_key: RsaPrivateKey,
}

impl KeyStore {
    pub fn new(public_key: RsaPublicKey, private_key: RsaPrivateKey) -> Self {
        Self {
            public_key,
            private_key,
        }
    }

    /// Parses both keys from PEM text.
    ///
    /// The public key may be SPKI (`PUBLIC KEY`) or PKCS#1 (`RSA PUBLIC KEY`);
    /// the private key may be PKCS#8 (`PRIVATE KEY`) or PKCS#1
    /// (`RSA PRIVATE KEY`).
    pub fn from_pem(public_pem: &str, private_pem: &str) -> Result<Self> {
        Ok(Self::new(
            parse_public_key(public_pem)?,
            parse_private_key(private_pem)?,
        ))
    }

    pub fn from_files(public_path: impl AsRef<Path>, private_path: impl AsRef<Path>) -> Result<Self> {
        let public_pem = read_key_file(public_path.as_ref())?;
        let private_pem = read_key_file(private_path.as_ref())?;
        Self::from_pem(&public_pem, &private_pem)
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private_key
    }
}

// Never print key material.
impl fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyStore").finish_non_exhaustive()
    }
}

fn read_key_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        PaymentError::ConfigurationError(format!("cannot read key {}: {e}", path.display()))
    })
}

fn parse_public_key(pem: &str) -> Result<RsaPublicKey> {
    let pem = pem.trim();
    if pem.is_empty() {
        return Err(PaymentError::ConfigurationError(
            "missing public key".to_string(),
        ));
    }
    RsaPublicKey::from_public_key_pem(pem)
        .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
        .map_err(|e| PaymentError::ConfigurationError(format!("invalid public key: {e}")))
}

fn parse_private_key(pem: &str) -> Result<RsaPrivateKey> {
    let pem = pem.trim();
    if pem.is_empty() {
        return Err(PaymentError::ConfigurationError(
            "missing private key".to_string(),
        ));
    }
    RsaPrivateKey::from_pkcs8_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
        .map_err(|e| PaymentError::ConfigurationError(format!("invalid private key: {e}")))
}
