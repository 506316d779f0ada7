//! Polars AnyValue key helpers.

use polars::prelude::*;

/// Converts a Polars `AnyValue` into a comparable key.
///
/// Returns `None` for `Null`. Floats are formatted without trailing zeros so
/// that `1.0` and `1` produce the same key.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use icu_common::value_key;
///
/// assert_eq!(value_key(AnyValue::Null), None);
/// assert_eq!(value_key(AnyValue::Int64(42)), Some("42".to_string()));
/// assert_eq!(value_key(AnyValue::Float64(1.0)), Some("1".to_string()));
/// ```
pub fn value_key(value: AnyValue<'_>) -> Option<String> {
    let key = match value {
        AnyValue::Null => return None,
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => {
            let s = other.to_string();
            if s.starts_with('"') && s.ends_with('"') && s.len() >= 2 {
                s[1..s.len() - 1].to_string()
            } else {
                s
            }
        }
    };
    Some(key)
}

/// Formats a floating-point number as a string without trailing zeros after decimal.
///
/// Integer-valued floats like 40.0 are formatted as "40", not "4".
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        s
    }
}

/// Collects the keys of every value in a series, in row order.
pub fn series_keys(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let mut keys = Vec::with_capacity(series.len());
    for idx in 0..series.len() {
        keys.push(value_key(series.get(idx)?));
    }
    Ok(keys)
}

/// Collects the keys of a named column of a DataFrame, in row order.
pub fn column_keys(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?;
    series_keys(column.as_materialized_series())
}
