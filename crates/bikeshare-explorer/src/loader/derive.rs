//! Timestamp parsing and derived calendar columns.

use crate::error::{ExplorerError, Result};
use crate::types::{DAY_OF_WEEK, END_STATION, HOUR, MONTH, ROUTE, START_STATION, START_TIME, weekday_name};
use crate::utils::series;
use chrono::{Datelike, NaiveDateTime, Timelike};
use polars::prelude::*;

/// Timestamp layouts seen across the city exports.
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
];

/// Parse a single start timestamp.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

/// Parse every value of a string column, failing on the first bad row.
pub fn parse_timestamps(column: &Series) -> Result<Vec<NaiveDateTime>> {
    let text = column.cast(&DataType::String)?;
    text.str()?
        .into_iter()
        .enumerate()
        .map(|(row, raw)| {
            raw.and_then(parse_timestamp)
                .ok_or_else(|| ExplorerError::TimestampParse {
                    row,
                    value: raw.unwrap_or("<missing>").to_string(),
                })
        })
        .collect()
}

/// Join start and end stations into a route label.
pub fn route_label(start: &str, end: &str) -> String {
    format!("{start} and {end}")
}

fn route_column(df: &DataFrame) -> Result<Series> {
    let start = series(df, START_STATION)?.cast(&DataType::String)?;
    let end = series(df, END_STATION)?.cast(&DataType::String)?;

    let routes: Vec<Option<String>> = start
        .str()?
        .into_iter()
        .zip(end.str()?)
        .map(|pair| match pair {
            (Some(start), Some(end)) => Some(route_label(start, end)),
            _ => None,
        })
        .collect();

    Ok(Series::new(ROUTE.into(), routes))
}

/// Replace `Start Time` with a parsed datetime column and append
/// `month`, `day_of_week`, `hour` and `route`.
pub fn add_derived_columns(df: &mut DataFrame) -> Result<()> {
    let times = parse_timestamps(series(df, START_TIME)?)?;

    let months: Vec<i32> = times.iter().map(|t| t.month() as i32).collect();
    let days: Vec<&str> = times.iter().map(|t| weekday_name(t.weekday())).collect();
    let hours: Vec<i32> = times.iter().map(|t| t.hour() as i32).collect();
    let millis: Vec<i64> = times
        .iter()
        .map(|t| t.and_utc().timestamp_millis())
        .collect();

    let parsed = Series::new(START_TIME.into(), millis)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
    let routes = route_column(df)?;

    df.replace(START_TIME, parsed)?;
    df.with_column(Series::new(MONTH.into(), months))?;
    df.with_column(Series::new(DAY_OF_WEEK.into(), days))?;
    df.with_column(Series::new(HOUR.into(), hours))?;
    df.with_column(routes)?;

    Ok(())
}
