//! Normalized resource record models

use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use crate::error::{InventoryError, Result};
use crate::graph::Row;

/// Source column names for the required fields
pub mod fields {
    pub const NAME: &str = "name";
    pub const RESOURCE_GROUP: &str = "resourceGroup";
    pub const TYPE: &str = "type";
    pub const SUBSCRIPTION_ID: &str = "subscriptionId";
    /// Creation time, checked in order
    pub const CREATED_AT: &[&str] = &["createdAt", "created_at"];
}

/// Fixed-shape record consumed by the exporter
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRecord {
    pub name: String,
    pub resource_group: String,
    pub resource_type: String,
    pub subscription_id: String,
    pub created_at: Option<DateTime<FixedOffset>>,
}

impl ResourceRecord {
    /// Build a record from a raw Resource Graph row
    ///
    /// Unknown columns are ignored. Any of the four required columns being
    /// absent or null fails with [`InventoryError::MissingField`].
    pub fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            name: required_str(row, fields::NAME)?,
            resource_group: required_str(row, fields::RESOURCE_GROUP)?,
            resource_type: required_str(row, fields::TYPE)?,
            subscription_id: required_str(row, fields::SUBSCRIPTION_ID)?,
            created_at: created_at(row)?,
        })
    }

    /// Creation time in RFC 3339, or empty when unknown
    pub fn created_at_rfc3339(&self) -> String {
        self.created_at
            .map(|ts| ts.to_rfc3339())
            .unwrap_or_default()
    }
}

/// Normalize every row, stopping at the first bad one
pub fn normalize_rows(rows: &[Row]) -> Result<Vec<ResourceRecord>> {
    rows.iter().map(ResourceRecord::from_row).collect()
}

fn required_str(row: &Row, field: &str) -> Result<String> {
    match row.get(field) {
        None | Some(Value::Null) => Err(InventoryError::MissingField(field.to_string())),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(InventoryError::InvalidField {
            field: field.to_string(),
            message: format!("expected string, got {}", other),
        }),
    }
}

fn created_at(row: &Row) -> Result<Option<DateTime<FixedOffset>>> {
    let Some((field, value)) = fields::CREATED_AT
        .iter()
        .find_map(|f| row.get(*f).filter(|v| !v.is_null()).map(|v| (*f, v)))
    else {
        return Ok(None);
    };

    let text = value.as_str().ok_or_else(|| InventoryError::InvalidField {
        field: field.to_string(),
        message: format!("expected timestamp string, got {}", value),
    })?;

    DateTime::parse_from_rfc3339(text)
        .map(Some)
        .map_err(|e| InventoryError::InvalidField {
            field: field.to_string(),
            message: format!("'{}' is not an RFC 3339 timestamp: {}", text, e),
        })
}
