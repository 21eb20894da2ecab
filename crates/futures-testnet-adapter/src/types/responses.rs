/*
[INPUT]:  JSON bodies returned by /fapi/v1/order
[OUTPUT]: Order record passed through verbatim, with typed lookups
[POS]:    Data layer - response types for API communication
[UPDATE]: When callers need another field typed
*/

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Order record as returned by the exchange.
///
/// The body is kept exactly as received; the accessors only read from it and
/// return `None` when a field is absent, `null` or of an unexpected type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderResponse(Value);

impl OrderResponse {
    /// `orderId`, also accepted as a numeric string
    pub fn order_id(&self) -> Option<i64> {
        match self.0.get("orderId")? {
            Value::Number(number) => number.as_i64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn client_order_id(&self) -> Option<&str> {
        self.text("clientOrderId")
    }

    pub fn symbol(&self) -> Option<&str> {
        self.text("symbol")
    }

    pub fn status(&self) -> Option<&str> {
        self.text("status")
    }

    /// Look up any field the server sent
    pub fn field(&self, key: &str) -> Option<Value> {
        self.0.get(key).cloned()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn to_value(&self) -> Value {
        self.0.clone()
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl From<Value> for OrderResponse {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
