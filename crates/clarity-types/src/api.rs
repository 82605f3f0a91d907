use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::{Channel, Message};

// -- State --

#[derive(Debug, Serialize, Deserialize)]
pub struct StateResponse {
    pub channels: Vec<Channel>,
    pub messages: Vec<Message>,
}

// -- Messages --

/// Fields are optional so a missing field surfaces as a 400 with a readable
/// error rather than a deserialization rejection. Unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct PostMessageRequest {
    pub channel: Option<String>,
    pub user: Option<String>,
    pub text: Option<String>,
    /// Any JSON value; read by truthiness (`null`, `false`, `0`, `""` are unpinned).
    #[serde(default, deserialize_with = "truthy")]
    pub pinned: bool,
}

// -- Ask --

#[derive(Debug, Default, Deserialize)]
pub struct AskRequest {
    pub question: Option<String>,
    #[serde(rename = "maxAgeHours")]
    pub max_age_hours: Option<f64>,
}

fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
