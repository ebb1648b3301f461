use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Argument error: {0}")]
    ArgumentError(String),
    /// Every failure on the inbound envelope path collapses into this variant.
    #[error("Could not decrypt message.")]
    DecryptionError,
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T, E = PaymentError> = std::result::Result<T, E>;
