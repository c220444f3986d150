//! Invoice records as offered by the order-management backend
//!
//! The upstream shape is not contractually fixed, so every field is optional
//! and deserialized leniently: a value of the wrong JSON type is treated as
//! absent instead of failing the whole batch.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

/// Opaque invoice identifier, echoed back verbatim in status reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InvoiceId {
    Text(String),
    Number(Number),
    /// Any other non-null JSON value, such as `{"$oid": "..."}`.
    Other(Value),
}

impl InvoiceId {
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }
}

impl fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => f.write_str(&render_number(number)),
            Self::Other(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for InvoiceId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A loosely-typed scalar field value (amounts, rates, quantities).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(Number),
    Text(String),
    Flag(bool),
}

impl Scalar {
    /// Numeric view of the value; only JSON numbers qualify.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(number) => number.as_f64(),
            Self::Text(_) | Self::Flag(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => f.write_str(&render_number(number)),
            Self::Text(text) => f.write_str(text),
            Self::Flag(flag) => write!(f, "{flag}"),
        }
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or_else(|| Self::Text(format_decimal(value)), Self::Number)
    }
}

/// Render a JSON number in its shortest natural form (`100`, `12.5`).
pub fn render_number(number: &Number) -> String {
    if let Some(int) = number.as_i64() {
        return int.to_string();
    }
    if let Some(uint) = number.as_u64() {
        return uint.to_string();
    }
    number.as_f64().map_or_else(|| number.to_string(), format_decimal)
}

/// Format a float without a fractional part when it is integral.
pub fn format_decimal(value: f64) -> String {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if value.is_finite() && value.fract() == 0.0 && value.abs() < MAX_EXACT {
        #[allow(clippy::cast_possible_truncation)]
        let int = value as i64;
        return int.to_string();
    }
    value.to_string()
}

/// Nested customer reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRef {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// One element of an invoice's item sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub rate: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub total: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub amount: Option<Scalar>,
}

impl LineItem {
    /// The item's total, falling back to its amount field.
    pub fn total_or_amount(&self) -> Option<&Scalar> {
        self.total.as_ref().or(self.amount.as_ref())
    }
}

/// The item sequence of an invoice.
///
/// Elements that are not JSON objects are kept as `None` so that item
/// positions stay stable for diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Items {
    #[default]
    Missing,
    /// Present, but not an array.
    Malformed,
    List(Vec<Option<LineItem>>),
}

impl Items {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl<'de> Deserialize<'de> for Items {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let items = match Value::deserialize(deserializer)? {
            Value::Null => Self::Missing,
            Value::Array(entries) => Self::List(
                entries
                    .into_iter()
                    .map(|entry| match entry {
                        Value::Object(_) => serde_json::from_value(entry).ok(),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => Self::Malformed,
        };
        Ok(items)
    }
}

impl Serialize for Items {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Missing | Self::Malformed => serializer.serialize_none(),
            Self::List(entries) => {
                let mut seq = serializer.serialize_seq(Some(entries.len()))?;
                for entry in entries {
                    seq.serialize_element(entry)?;
                }
                seq.end()
            }
        }
    }
}

/// A pending sales invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(
        rename = "_id",
        default,
        deserialize_with = "invoice_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<InvoiceId>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerRef>,
    #[serde(
        rename = "customerName",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Items::is_missing")]
    pub items: Items,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub total: Option<Scalar>,
    #[serde(
        rename = "totalAmount",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_amount: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub amount: Option<Scalar>,
    #[serde(
        rename = "grandTotal",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub grand_total: Option<Scalar>,
    #[serde(
        rename = "finalAmount",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub final_amount: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Deserialize a field, treating type mismatches and `null` as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Keep any non-null identifier so status reports can echo it.
fn invoice_id<'de, D>(deserializer: D) -> Result<Option<InvoiceId>, D::Error>
where
    D: Deserializer<'de>,
{
    let id = match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(text) => Some(InvoiceId::Text(text)),
        Value::Number(number) => Some(InvoiceId::Number(number)),
        other => Some(InvoiceId::Other(other)),
    };
    Ok(id)
}
