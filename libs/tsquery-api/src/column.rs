use serde::{Deserialize, Serialize};

/// Service-reported scalar type name (`VARCHAR`, `DOUBLE`, `TIMESTAMP`, ...).
///
/// The decoder never interprets it; it is kept for metadata output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScalarType(pub String);

impl ScalarType {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Schema-level description of one column.
///
/// Fixed for the life of a query result. Nested kinds own their child
/// descriptors, so a schema is always a finite tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Type")]
    pub kind: ColumnKind,
}

impl ColumnDescriptor {
    /// Unnamed descriptor, as used for array elements and time-series values.
    pub fn new(kind: ColumnKind) -> Self {
        Self { name: None, kind }
    }

    pub fn named(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: Some(name.into()),
            kind,
        }
    }

    /// Name for error messages and rendering; `"?"` when the column is unnamed.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("?")
    }
}

/// Closed set of column shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ColumnTypeInfo", into = "ColumnTypeInfo")]
pub enum ColumnKind {
    Scalar(ScalarType),
    Array(Box<ColumnDescriptor>),
    Row(Vec<ColumnDescriptor>),
    TimeSeries(Box<ColumnDescriptor>),
}

impl ColumnKind {
    pub fn scalar(ty: impl Into<String>) -> Self {
        Self::Scalar(ScalarType(ty.into()))
    }

    pub fn array(element: ColumnDescriptor) -> Self {
        Self::Array(Box::new(element))
    }

    pub fn row(fields: Vec<ColumnDescriptor>) -> Self {
        Self::Row(fields)
    }

    pub fn time_series(value: ColumnDescriptor) -> Self {
        Self::TimeSeries(Box::new(value))
    }

    /// Short lowercase name of the value shape this kind expects.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Array(_) => "array",
            Self::Row(_) => "row",
            Self::TimeSeries(_) => "time series",
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Wire form
// ═══════════════════════════════════════════════════════════════

/// Column type exactly as the service encodes it: one optional member per kind.
///
/// Exactly one member must be set; anything else is rejected when
/// converting into [`ColumnKind`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ColumnTypeInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scalar_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_column_info: Option<Box<ColumnDescriptor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_column_info: Option<Vec<ColumnDescriptor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_series_measure_value_column_info: Option<Box<ColumnDescriptor>>,
}

impl TryFrom<ColumnTypeInfo> for ColumnKind {
    type Error = String;

    fn try_from(info: ColumnTypeInfo) -> Result<Self, Self::Error> {
        match (
            info.scalar_type,
            info.array_column_info,
            info.row_column_info,
            info.time_series_measure_value_column_info,
        ) {
            (Some(ty), None, None, None) => Ok(Self::Scalar(ScalarType(ty))),
            (None, Some(elem), None, None) => Ok(Self::Array(elem)),
            (None, None, Some(fields), None) => Ok(Self::Row(fields)),
            (None, None, None, Some(value)) => Ok(Self::TimeSeries(value)),
            (s, a, r, t) => {
                let set = [s.is_some(), a.is_some(), r.is_some(), t.is_some()]
                    .iter()
                    .filter(|k| **k)
                    .count();
                Err(format!("column type must declare exactly one kind, found {set}"))
            }
        }
    }
}

impl From<ColumnKind> for ColumnTypeInfo {
    fn from(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Scalar(ty) => Self {
                scalar_type: Some(ty.0),
                ..Default::default()
            },
            ColumnKind::Array(elem) => Self {
                array_column_info: Some(elem),
                ..Default::default()
            },
            ColumnKind::Row(fields) => Self {
                row_column_info: Some(fields),
                ..Default::default()
            },
            ColumnKind::TimeSeries(value) => Self {
                time_series_measure_value_column_info: Some(value),
                ..Default::default()
            },
        }
    }
}
