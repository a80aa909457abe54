use tsquery_api::{ColumnDescriptor, ColumnKind, DecodeError, Datum, Page, RawValue, Record};

// ═══════════════════════════════════════════════════════════════
//  Row / value decoding
// ═══════════════════════════════════════════════════════════════

/// Decode every row of a page against its columns, in order.
pub fn decode_page(page: &Page) -> Result<Vec<Record>, DecodeError> {
    page.rows
        .iter()
        .map(|row| decode_row(&page.columns, &row.data))
        .collect()
}

/// Decode one row. `raw[i]` is decoded against `schema[i]`.
pub fn decode_row(schema: &[ColumnDescriptor], raw: &[RawValue]) -> Result<Record, DecodeError> {
    decode_fields(schema, raw).map(Record)
}

/// Decode a single value against its descriptor.
///
/// An explicit null wins over the descriptor kind. Otherwise the payload
/// the kind expects must be present; other payloads are ignored.
pub fn decode_value(descriptor: &ColumnDescriptor, raw: &RawValue) -> Result<Datum, DecodeError> {
    if raw.is_null() {
        return Ok(Datum::Null);
    }

    match &descriptor.kind {
        ColumnKind::Scalar(_) => {
            let value = raw.scalar_value.as_ref().ok_or_else(|| mismatch(descriptor))?;
            Ok(Datum::Scalar(value.clone()))
        }
        ColumnKind::Array(element) => {
            let items = raw.array_value.as_ref().ok_or_else(|| mismatch(descriptor))?;
            items
                .iter()
                .map(|item| decode_value(element, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Datum::Array)
        }
        ColumnKind::Row(fields) => {
            let row = raw.row_value.as_ref().ok_or_else(|| mismatch(descriptor))?;
            decode_fields(fields, &row.data).map(Datum::Row)
        }
        ColumnKind::TimeSeries(value) => {
            let points = raw.time_series_value.as_ref().ok_or_else(|| mismatch(descriptor))?;
            points
                .iter()
                .map(|point| -> Result<_, DecodeError> {
                    Ok((point.time.clone(), decode_value(value, &point.value)?))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Datum::TimeSeries)
        }
    }
}

fn decode_fields(schema: &[ColumnDescriptor], raw: &[RawValue]) -> Result<Vec<Datum>, DecodeError> {
    if schema.len() != raw.len() {
        return Err(DecodeError::SchemaMismatch {
            expected: schema.len(),
            actual: raw.len(),
        });
    }
    schema
        .iter()
        .zip(raw)
        .map(|(descriptor, value)| decode_value(descriptor, value))
        .collect()
}

fn mismatch(descriptor: &ColumnDescriptor) -> DecodeError {
    DecodeError::ShapeMismatch {
        column: descriptor.display_name().to_string(),
        expected: descriptor.kind.shape(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsquery_api::{RawRow, RawTimePoint};

    fn scalar(name: &str) -> ColumnDescriptor {
        ColumnDescriptor::named(name, ColumnKind::scalar("VARCHAR"))
    }

    fn unnamed_scalar() -> ColumnDescriptor {
        ColumnDescriptor::new(ColumnKind::scalar("DOUBLE"))
    }

    /// Inverse of decoding, driven by the descriptor.
    fn encode(descriptor: &ColumnDescriptor, datum: &Datum) -> RawValue {
        match (&descriptor.kind, datum) {
            (_, Datum::Null) => RawValue::null(),
            (ColumnKind::Scalar(_), Datum::Scalar(s)) => RawValue::scalar(s.clone()),
            (ColumnKind::Array(elem), Datum::Array(items)) => {
                RawValue::array(items.iter().map(|d| encode(elem, d)).collect())
            }
            (ColumnKind::Row(fields), Datum::Row(values)) => RawValue::row(encode_fields(fields, values)),
            (ColumnKind::TimeSeries(value), Datum::TimeSeries(points)) => RawValue::time_series(
                points
                    .iter()
                    .map(|(t, d)| RawTimePoint::new(t.clone(), encode(value, d)))
                    .collect(),
            ),
            (kind, datum) => panic!("datum {datum:?} does not fit {kind:?}"),
        }
    }

    fn encode_fields(schema: &[ColumnDescriptor], values: &[Datum]) -> Vec<RawValue> {
        schema.iter().zip(values).map(|(c, d)| encode(c, d)).collect()
    }

    fn nested_schema() -> Vec<ColumnDescriptor> {
        vec![
            scalar("factory"),
            ColumnDescriptor::named("levels", ColumnKind::array(unnamed_scalar())),
            ColumnDescriptor::named(
                "still_water",
                ColumnKind::time_series(ColumnDescriptor::new(ColumnKind::row(vec![
                    scalar("sum"),
                    scalar("count"),
                ]))),
            ),
        ]
    }

    #[test]
    fn decodes_flat_row() {
        let schema = vec![scalar("factory"), scalar("value")];
        let record = decode_row(&schema, &[RawValue::scalar("A"), RawValue::scalar("1")]).unwrap();
        assert_eq!(record, Record(vec![Datum::scalar("A"), Datum::scalar("1")]));
    }

    #[test]
    fn decodes_array_of_scalars() {
        let col = ColumnDescriptor::named("xs", ColumnKind::array(unnamed_scalar()));
        let raw = RawValue::array(vec![RawValue::scalar("1"), RawValue::scalar("2"), RawValue::scalar("3")]);
        assert_eq!(
            decode_value(&col, &raw).unwrap(),
            Datum::Array(vec![Datum::scalar("1"), Datum::scalar("2"), Datum::scalar("3")])
        );
    }

    #[test]
    fn decodes_time_series_keeping_timestamps() {
        let col = ColumnDescriptor::named("ts", ColumnKind::time_series(unnamed_scalar()));
        let raw = RawValue::time_series(vec![
            RawTimePoint::new("2026-10-17 10:00:00.000000000", RawValue::scalar("5")),
            RawTimePoint::new("2026-10-17 10:00:15.000000000", RawValue::scalar("6")),
        ]);
        assert_eq!(
            decode_value(&col, &raw).unwrap(),
            Datum::TimeSeries(vec![
                ("2026-10-17 10:00:00.000000000".into(), Datum::scalar("5")),
                ("2026-10-17 10:00:15.000000000".into(), Datum::scalar("6")),
            ])
        );
    }

    #[test]
    fn decodes_row_column_recursively() {
        let col = ColumnDescriptor::named("pair", ColumnKind::row(vec![scalar("a"), scalar("b")]));
        let raw = RawValue::row(vec![RawValue::scalar("x"), RawValue::null()]);
        assert_eq!(
            decode_value(&col, &raw).unwrap(),
            Datum::Row(vec![Datum::scalar("x"), Datum::Null])
        );
    }

    #[test]
    fn explicit_null_for_every_kind() {
        let kinds = [
            ColumnKind::scalar("VARCHAR"),
            ColumnKind::array(unnamed_scalar()),
            ColumnKind::row(vec![scalar("a")]),
            ColumnKind::time_series(unnamed_scalar()),
        ];
        for kind in kinds {
            let col = ColumnDescriptor::named("c", kind);
            assert_eq!(decode_value(&col, &RawValue::null()).unwrap(), Datum::Null);
        }
    }

    #[test]
    fn null_flag_false_falls_through_to_payload() {
        let raw = RawValue {
            null_value: Some(false),
            ..RawValue::scalar("7")
        };
        assert_eq!(decode_value(&scalar("n"), &raw).unwrap(), Datum::scalar("7"));
    }

    #[test]
    fn arity_mismatch_is_schema_error() {
        let schema = vec![scalar("a"), scalar("b")];
        let err = decode_row(&schema, &[RawValue::scalar("only")]).unwrap_err();
        assert_eq!(err, DecodeError::SchemaMismatch { expected: 2, actual: 1 });
    }

    #[test]
    fn nested_row_arity_mismatch_is_reported() {
        let col = ColumnDescriptor::named("pair", ColumnKind::row(vec![scalar("a"), scalar("b")]));
        let err = decode_value(&col, &RawValue::row(vec![])).unwrap_err();
        assert_eq!(err, DecodeError::SchemaMismatch { expected: 2, actual: 0 });
    }

    #[test]
    fn scalar_given_sequence_is_shape_mismatch() {
        let raw = RawValue::array(vec![RawValue::scalar("1")]);
        let err = decode_value(&scalar("factory"), &raw).unwrap_err();
        assert_eq!(
            err,
            DecodeError::ShapeMismatch {
                column: "factory".into(),
                expected: "scalar",
            }
        );
    }

    #[test]
    fn mismatch_deep_inside_aborts_whole_row() {
        let schema = nested_schema();
        let raw = vec![
            RawValue::scalar("plant-1"),
            RawValue::array(vec![RawValue::scalar("1"), RawValue::time_series(vec![])]),
            RawValue::time_series(vec![]),
        ];
        let err = decode_row(&schema, &raw).unwrap_err();
        assert_eq!(
            err,
            DecodeError::ShapeMismatch {
                column: "?".into(),
                expected: "scalar",
            }
        );
    }

    #[test]
    fn time_series_given_scalar_is_shape_mismatch() {
        let col = ColumnDescriptor::named("ts", ColumnKind::time_series(unnamed_scalar()));
        let err = decode_value(&col, &RawValue::scalar("5")).unwrap_err();
        assert!(matches!(err, DecodeError::ShapeMismatch { expected: "time series", .. }));
    }

    #[test]
    fn record_survives_encode_then_decode() {
        let schema = nested_schema();
        let record = Record(vec![
            Datum::scalar("plant-1"),
            Datum::Array(vec![Datum::scalar("0.5"), Datum::Null, Datum::scalar("0.7")]),
            Datum::TimeSeries(vec![
                ("t1".into(), Datum::Row(vec![Datum::scalar("10.0"), Datum::scalar("2")])),
                ("t2".into(), Datum::Null),
            ]),
        ]);
        let raw = encode_fields(&schema, record.values());
        assert_eq!(decode_row(&schema, &raw).unwrap(), record);
    }

    #[test]
    fn decoded_shapes_follow_descriptors() {
        let schema = nested_schema();
        let raw = vec![
            RawValue::scalar("plant-2"),
            RawValue::array(vec![]),
            RawValue::time_series(vec![RawTimePoint::new(
                "t1",
                RawValue::row(vec![RawValue::scalar("1"), RawValue::scalar("1")]),
            )]),
        ];
        let record = decode_row(&schema, &raw).unwrap();
        assert_eq!(record.len(), schema.len());
        for (col, datum) in schema.iter().zip(record.values()) {
            let shape = match datum {
                Datum::Scalar(_) => "scalar",
                Datum::Array(_) => "array",
                Datum::Row(_) => "row",
                Datum::TimeSeries(_) => "time series",
                Datum::Null => unreachable!("no nulls in this row"),
            };
            assert_eq!(shape, col.kind.shape());
        }
    }

    #[test]
    fn decodes_all_rows_of_page_in_order() {
        let page = Page::new(
            vec![scalar("k")],
            vec![
                RawRow::new(vec![RawValue::scalar("1")]),
                RawRow::new(vec![RawValue::scalar("2")]),
            ],
        );
        let records = decode_page(&page).unwrap();
        assert_eq!(
            records,
            vec![Record(vec![Datum::scalar("1")]), Record(vec![Datum::scalar("2")])]
        );
    }
}
