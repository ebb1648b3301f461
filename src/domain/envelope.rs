use serde::{Deserialize, Serialize};

/// The `(env_key, data)` pair exchanged with the gateway.
///
/// Both fields are base64 text. Outbound values are never percent-encoded
/// here; that is left to the form encoder of the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// The RSA-wrapped session key.
    pub env_key: String,
    /// The RC4-encrypted document.
    pub data: String,
}

impl Envelope {
    pub fn new(env_key: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            env_key: env_key.into(),
            data: data.into(),
        }
    }
}
