use serde::{Deserialize, Serialize};

/// The reply sent back after handling a notification.
///
/// Empty `error_type`/`error_code` are treated like `None` when rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcknowledgementRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
}

impl AcknowledgementRequest {
    /// Acknowledges a processed notification by echoing its crc.
    pub fn success(crc: impl Into<String>) -> Self {
        Self {
            message: crc.into(),
            ..Default::default()
        }
    }

    pub fn failure(
        error_type: impl Into<String>,
        error_code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            error_type: Some(error_type.into()),
            error_code: Some(error_code.into()),
        }
    }

    pub(crate) fn error_type(&self) -> Option<&str> {
        self.error_type.as_deref().filter(|s| !s.is_empty())
    }

    pub(crate) fn error_code(&self) -> Option<&str> {
        self.error_code.as_deref().filter(|s| !s.is_empty())
    }
}
