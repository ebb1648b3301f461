use super::envelope::Envelope;
use crate::error::Result;

/// Hybrid cipher used by the payment client to seal outbound documents and
/// open inbound notifications.
pub trait EnvelopeCipher: Send + Sync {
    /// Encrypts `plaintext` under a fresh session key.
    fn seal(&self, plaintext: &[u8]) -> Result<Envelope>;

    /// Decrypts an envelope received from the gateway. Inputs may still be
    /// percent-encoded.
    fn open(&self, env_key: &str, data: &str) -> Result<Vec<u8>>;
}
