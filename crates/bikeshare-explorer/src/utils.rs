//! Shared helpers for frequency statistics and column access.
//!
//! Every "most common value" in the explorer goes through [`mode`], so the
//! loader's fills and the reporters' answers always agree on tie-breaks.

use crate::error::{ExplorerError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

// =============================================================================
// Frequency Utilities
// =============================================================================

/// One distinct value and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount<T> {
    pub value: T,
    pub count: usize,
}

fn count_values<T, I>(values: I) -> HashMap<T, usize>
where
    T: Hash + Eq,
    I: IntoIterator<Item = Option<T>>,
{
    let mut counts = HashMap::new();
    for value in values.into_iter().flatten() {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
}

/// Most frequent non-null value.
///
/// Ties resolve to the smallest value, so the result does not depend on
/// hashing or row order.
pub fn mode<T, I>(values: I) -> Option<T>
where
    T: Hash + Eq + Ord,
    I: IntoIterator<Item = Option<T>>,
{
    count_values(values)
        .into_iter()
        .max_by(|(a, a_count), (b, b_count)| a_count.cmp(b_count).then_with(|| b.cmp(a)))
        .map(|(value, _)| value)
}

/// Counts of every distinct non-null value, most frequent first.
///
/// Equal counts are ordered by value ascending.
pub fn value_counts<T, I>(values: I) -> Vec<ValueCount<T>>
where
    T: Hash + Eq + Ord,
    I: IntoIterator<Item = Option<T>>,
{
    let mut counts: Vec<ValueCount<T>> = count_values(values)
        .into_iter()
        .map(|(value, count)| ValueCount { value, count })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    counts
}

// =============================================================================
// Column Access
// =============================================================================

/// Look up a column as a materialized Series, mapping absence to a typed error.
pub fn series<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|col| col.as_materialized_series())
        .map_err(|_| ExplorerError::MissingColumn(name.to_string()))
}

/// Check whether a frame carries a column.
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|col| col.as_str() == name)
}

/// Cast a column to a numeric type, failing on the first value that does not parse.
///
/// Text columns go through `Float64` first so `"1989.0"` still reads as a
/// whole number. Nulls stay null; only non-null values that turn into null
/// are rejected.
pub fn cast_numeric(series: &Series, dtype: &DataType) -> Result<Series> {
    let cast = if series.dtype() == &DataType::String {
        series.cast(&DataType::Float64)?.cast(dtype)?
    } else {
        series.cast(dtype)?
    };
    if cast.null_count() == series.null_count() {
        return Ok(cast);
    }

    let text = series.cast(&DataType::String)?;
    let became_null = cast.is_null();
    let bad = text
        .str()?
        .into_iter()
        .zip(&became_null)
        .enumerate()
        .find_map(|(row, pair)| match pair {
            (Some(raw), Some(true)) => Some((row, raw.to_string())),
            _ => None,
        });

    match bad {
        Some((row, value)) => Err(ExplorerError::InvalidValue {
            column: series.name().to_string(),
            row,
            value,
        }),
        None => Ok(cast),
    }
}

/// Mode of a string column.
pub fn string_mode(series: &Series) -> Result<Option<String>> {
    Ok(mode(series.str()?.into_iter()).map(str::to_string))
}

/// Mode of an integer column.
pub fn int_mode(series: &Series) -> Result<Option<i64>> {
    let ints = series.cast(&DataType::Int64)?;
    Ok(mode(ints.i64()?.into_iter()))
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill null values in a string Series with a specific value.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let filled: Vec<&str> = series
        .str()?
        .into_iter()
        .map(|val| val.unwrap_or(fill_value))
        .collect();

    Ok(Series::new(series.name().clone(), filled))
}

/// Fill null values in an integer Series with a specific value.
pub fn fill_int_nulls(series: &Series, fill_value: i64) -> PolarsResult<Series> {
    let ints = series.cast(&DataType::Int64)?;
    let filled: Vec<i64> = ints
        .i64()?
        .into_iter()
        .map(|val| val.unwrap_or(fill_value))
        .collect();

    Ok(Series::new(series.name().clone(), filled))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mode_picks_most_frequent() {
        let values = [Some("b"), Some("a"), Some("b"), None, None, None];
        assert_eq!(mode(values), Some("b"));
    }

    #[test]
    fn test_mode_tie_breaks_to_smallest() {
        assert_eq!(mode([Some("Subscriber"), Some("Customer")]), Some("Customer"));
        assert_eq!(mode([Some(1992), Some(1985), Some(1992), Some(1985)]), Some(1985));
    }

    #[test]
    fn test_mode_of_nothing() {
        assert_eq!(mode(Vec::<Option<i64>>::new()), None);
        assert_eq!(mode([Option::<i64>::None, None]), None);
    }

    #[test]
    fn test_value_counts_ordering() {
        let counts = value_counts([Some("Male"), Some("Female"), Some("Male"), None, Some("Other")]);
        assert_eq!(
            counts,
            vec![
                ValueCount { value: "Male", count: 2 },
                ValueCount { value: "Female", count: 1 },
                ValueCount { value: "Other", count: 1 },
            ]
        );
    }

    #[test]
    fn test_fill_string_nulls() {
        let series = Series::new("test".into(), &[Some("a"), None, Some("b")]);
        let filled = fill_string_nulls(&series, "z").unwrap();

        let values: Vec<Option<&str>> = filled.str().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some("a"), Some("z"), Some("b")]);
        assert_eq!(filled.name().as_str(), "test");
    }

    #[test]
    fn test_fill_int_nulls_from_float() {
        let series = Series::new("years".into(), &[Some(1990.0), None, Some(1985.0)]);
        let filled = fill_int_nulls(&series, 2000).unwrap();

        assert_eq!(filled.dtype(), &DataType::Int64);
        let values: Vec<Option<i64>> = filled.i64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1990), Some(2000), Some(1985)]);
    }

    #[test]
    fn test_cast_numeric_keeps_nulls() {
        let durations = Series::new("Trip Duration".into(), &[Some("720"), None, Some("489.5")]);
        let cast = cast_numeric(&durations, &DataType::Float64).unwrap();
        let values: Vec<Option<f64>> = cast.f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(720.0), None, Some(489.5)]);
    }

    #[test]
    fn test_cast_numeric_names_bad_row() {
        let durations = Series::new("Trip Duration".into(), &[Some("720"), Some("840"), Some("abc")]);
        let err = cast_numeric(&durations, &DataType::Float64).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value 'abc' in column 'Trip Duration' at row 2"
        );
    }

    #[test]
    fn test_series_lookup() {
        let df = df!["a" => [1, 2]].unwrap();
        assert!(series(&df, "a").is_ok());
        assert!(matches!(
            series(&df, "b"),
            Err(ExplorerError::MissingColumn(name)) if name == "b"
        ));
        assert!(has_column(&df, "a"));
        assert!(!has_column(&df, "b"));
    }
}
