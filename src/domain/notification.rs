use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Transaction state reported in the notification's `action` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    New,
    PaidPending,
    ConfirmedPending,
    Paid,
    Confirmed,
    Credit,
    Canceled,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::New,
        Action::PaidPending,
        Action::ConfirmedPending,
        Action::Paid,
        Action::Confirmed,
        Action::Credit,
        Action::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::New => "new",
            Action::PaidPending => "paid_pending",
            Action::ConfirmedPending => "confirmed_pending",
            Action::Paid => "paid",
            Action::Confirmed => "confirmed",
            Action::Credit => "credit",
            Action::Canceled => "canceled",
        }
    }

    /// Status text the gateway shows to merchants.
    pub fn label(&self) -> &'static str {
        match self {
            Action::New => "Tranzactie nouă",
            Action::PaidPending => "Platită, în procesare",
            Action::ConfirmedPending => "Confirmată, în procesare",
            Action::Paid => "Platită",
            Action::Confirmed => "Confirmată",
            Action::Credit => "Creditată",
            Action::Canceled => "Anulată",
        }
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| format!("unknown action: {s}"))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `<error code="..">message</error>` child of the response block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationError {
    pub code: Option<String>,
    pub message: String,
}

/// A decrypted gateway notification.
///
/// `fields` holds every scalar child of the `<mobilpay>` block (tag name to
/// text) except `customer` and `error`, so new protocol fields pass through
/// without a schema change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub order_id: String,
    pub timestamp: String,
    pub order_type: String,
    pub customer_id: Option<String>,
    pub params: BTreeMap<String, String>,
    pub crc: Option<String>,
    pub fields: BTreeMap<String, String>,
    pub error: Option<NotificationError>,
}

impl NotificationRecord {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// The transaction action, when present and known.
    pub fn action(&self) -> Option<Action> {
        self.field("action")?.parse().ok()
    }

    /// True when the gateway reported an error with a non-zero code.
    pub fn is_error(&self) -> bool {
        self.error
            .as_ref()
            .is_some_and(|e| e.code.as_deref().is_some_and(|code| code != "0"))
    }
}
