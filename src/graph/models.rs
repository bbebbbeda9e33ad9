//! Resource Graph request and response models

use serde::Serialize;
use serde_json::Value;

use crate::config::api;
use crate::error::{InventoryError, Result};

/// One raw result row, as returned by Resource Graph (`objectArray` format)
pub type Row = Value;

/// Request body for a single Resource Graph query call
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub subscriptions: Vec<String>,
    pub query: String,
    pub options: QueryOptions,
}

/// Query options; the skip token is only serialized when continuing
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct QueryOptions {
    #[serde(rename = "resultFormat")]
    pub result_format: String,
    #[serde(rename = "$skipToken", skip_serializing_if = "Option::is_none")]
    pub skip_token: Option<String>,
}

impl QueryRequest {
    /// Build a request for the given page position
    pub fn new(subscriptions: &[String], query: &str, skip_token: Option<&str>) -> Self {
        Self {
            subscriptions: subscriptions.to_vec(),
            query: query.to_string(),
            options: QueryOptions {
                result_format: api::RESULT_FORMAT.to_string(),
                skip_token: skip_token.map(str::to_string),
            },
        }
    }

    /// Reject requests the service would refuse anyway
    pub fn validate(&self) -> Result<()> {
        if self.subscriptions.is_empty() {
            return Err(InventoryError::InvalidInput(
                "at least one subscription id is required".to_string(),
            ));
        }
        if self.subscriptions.iter().any(|s| s.trim().is_empty()) {
            return Err(InventoryError::InvalidInput(
                "subscription ids must not be blank".to_string(),
            ));
        }
        if self.query.trim().is_empty() {
            return Err(InventoryError::InvalidInput(
                "query text must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// A single page of query results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPage {
    pub rows: Vec<Row>,
    /// Continuation token; `None` marks the final page
    pub skip_token: Option<String>,
}

impl QueryPage {
    /// Parse a response body into a page
    ///
    /// A missing or null `data` field is an empty page. The continuation
    /// token is read from `$skipToken`, then `skipToken`; an empty string
    /// counts as no token.
    pub fn from_body(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body).map_err(|e| {
            InventoryError::MalformedResponse(format!("response body is not JSON: {}", e))
        })?;

        let mut obj = match value {
            Value::Object(obj) => obj,
            other => {
                return Err(InventoryError::MalformedResponse(format!(
                    "expected a JSON object, got {}",
                    json_kind(&other)
                )))
            }
        };

        let skip_token = ["$skipToken", "skipToken"]
            .iter()
            .filter_map(|key| obj.get(*key).and_then(Value::as_str))
            .find(|token| !token.is_empty())
            .map(str::to_string);

        let rows = match obj.remove("data") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(rows)) => rows,
            Some(other) => {
                return Err(InventoryError::MalformedResponse(format!(
                    "unexpected data format (expected array), got {}",
                    json_kind(&other)
                )))
            }
        };

        Ok(Self { rows, skip_token })
    }
}

/// Rows aggregated across every fetched page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub rows: Vec<Row>,
    pub pages_fetched: u32,
    /// The page cap was hit while the service still offered more pages
    pub truncated: bool,
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
