use std::fmt;

/// Decoded value. Shape mirrors the [`ColumnKind`](crate::ColumnKind) it was decoded against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Datum {
    Null,
    Scalar(String),
    Array(Vec<Datum>),
    Row(Vec<Datum>),
    /// `(timestamp, value)` pairs; timestamps are passed through as the service sent them.
    TimeSeries(Vec<(String, Datum)>),
}

impl Datum {
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }
}

/// Schema-less rendering. Column names need the descriptor, see `tsquery_engine::render`.
impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Scalar(s) => f.write_str(s),
            Self::Array(items) => {
                f.write_str("[")?;
                write_joined(f, items)?;
                f.write_str("]")
            }
            Self::Row(fields) => {
                f.write_str("{")?;
                write_joined(f, fields)?;
                f.write_str("}")
            }
            Self::TimeSeries(points) => {
                f.write_str("[")?;
                for (i, (time, value)) in points.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{{time={time}, value={value}}}")?;
                }
                f.write_str("]")
            }
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Datum]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// One decoded row. Positional: order matches the page's columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record(pub Vec<Datum>);

impl Record {
    pub fn values(&self) -> &[Datum] {
        &self.0
    }

    pub fn into_values(self) -> Vec<Datum> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Datum> {
        self.0.get(index)
    }
}

impl From<Vec<Datum>> for Record {
    fn from(values: Vec<Datum>) -> Self {
        Self(values)
    }
}
