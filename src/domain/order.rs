use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Longest `order_id` the gateway accepts, counted in characters.
pub const MAX_ORDER_ID_LEN: usize = 64;

pub const DEFAULT_ORDER_TYPE: &str = "card";
pub const DEFAULT_CURRENCY: &str = "RON";

/// Represents a positive monetary amount for a payment order.
///
/// Wraps `rust_decimal::Decimal` so the order document never renders a
/// zero or negative charge.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(PaymentError::ValidationError(
                "amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = PaymentError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Contact details rendered under `<contact_info><billing type="person">`.
///
/// Absent fields default to the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Billing {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
}

impl Billing {
    /// True when every field is empty; such a block is not rendered.
    pub fn is_empty(&self) -> bool {
        [
            &self.first_name,
            &self.last_name,
            &self.address,
            &self.email,
            &self.phone,
        ]
        .iter()
        .all(|field| field.is_empty())
    }
}

/// A card payment order, as handed to [`crate::application::client::PaymentClient`].
///
/// Required fields are deserialized leniently (missing becomes empty) so that
/// [`PaymentRequest::validate`] reports them with the gateway's own wording
/// instead of a serde error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    #[serde(default)]
    pub order_id: String,
    #[serde(default = "default_order_type")]
    pub order_type: String,
    /// `YYYYMMDDHHmmss`. Stamped by the client when left empty.
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub amount: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub customer_id: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub billing: Option<Billing>,
    /// Echoed back by the gateway in the notification's `<params>` block.
    #[serde(default, rename = "params")]
    pub extra_params: BTreeMap<String, String>,
    #[serde(default)]
    pub confirm_url: String,
    #[serde(default)]
    pub return_url: String,
}

fn default_order_type() -> String {
    DEFAULT_ORDER_TYPE.to_string()
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl PaymentRequest {
    pub fn new(
        order_id: impl Into<String>,
        amount: Decimal,
        customer_id: impl Into<String>,
        details: impl Into<String>,
        confirm_url: impl Into<String>,
        return_url: impl Into<String>,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            order_type: default_order_type(),
            timestamp: None,
            amount,
            currency: default_currency(),
            customer_id: customer_id.into(),
            details: details.into(),
            billing: None,
            extra_params: BTreeMap::new(),
            confirm_url: confirm_url.into(),
            return_url: return_url.into(),
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_order_type(mut self, order_type: impl Into<String>) -> Self {
        self.order_type = order_type.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn with_billing(mut self, billing: Billing) -> Self {
        self.billing = Some(billing);
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_params.insert(name.into(), value.into());
        self
    }

    /// Extra parameters that make it into the document. Entries with an empty
    /// name or value are dropped.
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.extra_params
            .iter()
            .filter(|(name, value)| !name.is_empty() && !value.is_empty())
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Checks everything the gateway rejects before any XML or cipher work.
    pub fn validate(&self) -> Result<Amount> {
        let missing: Vec<&str> = [
            ("order_id", self.order_id.as_str()),
            ("customer_id", self.customer_id.as_str()),
            ("details", self.details.as_str()),
            ("confirm_url", self.confirm_url.as_str()),
            ("return_url", self.return_url.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() || self.amount.is_zero() {
            let mut fields = missing;
            if self.amount.is_zero() {
                fields.push("amount");
            }
            return Err(PaymentError::ValidationError(format!(
                "Can't create mobilpay request with missing args: {}",
                fields.join(", ")
            )));
        }

        if self.order_id.chars().count() > MAX_ORDER_ID_LEN {
            return Err(PaymentError::ValidationError(format!(
                "order_id should not have more than {MAX_ORDER_ID_LEN} characters."
            )));
        }

        Amount::new(self.amount)
    }
}
