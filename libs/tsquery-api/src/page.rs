use serde::{Deserialize, Serialize};

use crate::column::ColumnDescriptor;

// ═══════════════════════════════════════════════════════════════
//  RawValue — undecoded value as delivered by the service
// ═══════════════════════════════════════════════════════════════

/// One undecoded value. At most one payload is expected to be set;
/// which one is legal is decided by the column descriptor, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scalar_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_value: Option<Vec<RawValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_value: Option<RawRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_series_value: Option<Vec<RawTimePoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub null_value: Option<bool>,
}

impl RawValue {
    pub fn null() -> Self {
        Self {
            null_value: Some(true),
            ..Default::default()
        }
    }

    pub fn scalar(value: impl Into<String>) -> Self {
        Self {
            scalar_value: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn array(values: Vec<RawValue>) -> Self {
        Self {
            array_value: Some(values),
            ..Default::default()
        }
    }

    pub fn row(values: Vec<RawValue>) -> Self {
        Self {
            row_value: Some(RawRow::new(values)),
            ..Default::default()
        }
    }

    pub fn time_series(points: Vec<RawTimePoint>) -> Self {
        Self {
            time_series_value: Some(points),
            ..Default::default()
        }
    }

    /// Only `NullValue: true` is an explicit null; `NullValue: false` is not.
    pub fn is_null(&self) -> bool {
        self.null_value == Some(true)
    }
}

/// Positional values of one row. Order matches the page's `ColumnInfo`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Data", default)]
    pub data: Vec<RawValue>,
}

impl RawRow {
    pub fn new(data: Vec<RawValue>) -> Self {
        Self { data }
    }
}

/// One `(time, value)` point of a time-series value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTimePoint {
    pub time: String,
    pub value: RawValue,
}

impl RawTimePoint {
    pub fn new(time: impl Into<String>, value: RawValue) -> Self {
        Self {
            time: time.into(),
            value,
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Page
// ═══════════════════════════════════════════════════════════════

/// One fetch response: schema, rows and an optional continuation token.
///
/// The schema is the same for every page of a query. A page without
/// `next_token` is the last one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Page {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_id: Option<String>,
    #[serde(rename = "ColumnInfo", default)]
    pub columns: Vec<ColumnDescriptor>,
    #[serde(default)]
    pub rows: Vec<RawRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl Page {
    pub fn new(columns: Vec<ColumnDescriptor>, rows: Vec<RawRow>) -> Self {
        Self {
            query_id: None,
            columns,
            rows,
            next_token: None,
        }
    }

    pub fn with_next_token(mut self, token: impl Into<String>) -> Self {
        self.next_token = Some(token.into());
        self
    }

    pub fn with_query_id(mut self, id: impl Into<String>) -> Self {
        self.query_id = Some(id.into());
        self
    }

    pub fn is_last(&self) -> bool {
        self.next_token.is_none()
    }
}
