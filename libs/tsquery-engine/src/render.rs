//! Human-readable rendering of decoded records.
//!
//! Format: `{factory=plant-1, readings=[{time=..., value=5}], avg=NULL}`.
//! Scalars, arrays and nulls carry their column name; rows and time series
//! do not.

use tsquery_api::{ColumnDescriptor, ColumnKind, Datum, Record};

pub fn render_record(columns: &[ColumnDescriptor], record: &Record) -> String {
    render_fields(columns, record.values())
}

pub fn render_datum(column: &ColumnDescriptor, datum: &Datum) -> String {
    match (&column.kind, datum) {
        (_, Datum::Null) => format!("{}NULL", prefix(column)),
        (ColumnKind::Scalar(_), Datum::Scalar(value)) => format!("{}{value}", prefix(column)),
        (ColumnKind::Array(element), Datum::Array(items)) => {
            let items: Vec<String> = items.iter().map(|item| render_datum(element, item)).collect();
            format!("{}[{}]", prefix(column), items.join(", "))
        }
        (ColumnKind::Row(fields), Datum::Row(values)) => render_fields(fields, values),
        (ColumnKind::TimeSeries(value), Datum::TimeSeries(points)) => {
            let points: Vec<String> = points
                .iter()
                .map(|(time, datum)| format!("{{time={time}, value={}}}", render_datum(value, datum)))
                .collect();
            format!("[{}]", points.join(", "))
        }
        // Not produced by the decoder; fall back to the schema-less form.
        (_, other) => format!("{}{other}", prefix(column)),
    }
}

fn render_fields(columns: &[ColumnDescriptor], values: &[Datum]) -> String {
    let parts: Vec<String> = columns
        .iter()
        .zip(values)
        .map(|(column, datum)| render_datum(column, datum))
        .collect();
    format!("{{{}}}", parts.join(", "))
}

fn prefix(column: &ColumnDescriptor) -> String {
    match &column.name {
        Some(name) => format!("{name}="),
        None => String::new(),
    }
}
