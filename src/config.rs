use crate::error::{PaymentError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Merchant settings needed to build a [`crate::application::client::PaymentClient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Merchant signature issued by the gateway.
    pub signature: String,
    /// PEM file with the gateway's RSA public key.
    pub public_key: PathBuf,
    /// PEM file with the merchant's RSA private key.
    pub private_key: PathBuf,
    /// Log order documents and decryption failure causes.
    #[serde(default)]
    pub development: bool,
}

impl ClientConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            PaymentError::ConfigurationError(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| PaymentError::ConfigurationError(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.signature.is_empty() {
            return Err(PaymentError::ConfigurationError(
                "Missing signature argument".to_string(),
            ));
        }
        if self.public_key.as_os_str().is_empty() {
            return Err(PaymentError::ConfigurationError(
                "Missing public_key argument".to_string(),
            ));
        }
        if self.private_key.as_os_str().is_empty() {
            return Err(PaymentError::ConfigurationError(
                "Missing private_key argument".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"signature": "SIGN", "public_key": "pub.pem", "private_key": "priv.pem"}}"#
        )
        .unwrap();

        let config = ClientConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.signature, "SIGN");
        assert_eq!(config.public_key, PathBuf::from("pub.pem"));
        assert!(!config.development);
    }

    #[test]
    fn test_empty_signature_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"signature": "", "public_key": "pub.pem", "private_key": "priv.pem"}}"#
        )
        .unwrap();

        assert!(matches!(
            ClientConfig::from_json_file(file.path()),
            Err(PaymentError::ConfigurationError(msg)) if msg.contains("signature")
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not json").unwrap();
        assert!(matches!(
            ClientConfig::from_json_file(file.path()),
            Err(PaymentError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_missing_key_path_rejected() {
        let config = ClientConfig {
            signature: "SIGN".to_string(),
            public_key: PathBuf::new(),
            private_key: PathBuf::from("priv.pem"),
            development: false,
        };
        assert!(matches!(
            config.validate(),
            Err(PaymentError::ConfigurationError(msg)) if msg.contains("public_key")
        ));
    }
}
