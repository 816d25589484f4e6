//! Total and average trip duration.

use super::{ReportSection, timed};
use crate::error::Result;
use crate::loader::TripData;
use crate::types::TRIP_DURATION;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Duration totals for a selection.
///
/// `total_seconds` and `mean_seconds` are `None` when no trip in the
/// selection has a duration; that is reported as "no data", not as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationStats {
    pub trip_count: usize,
    pub total_seconds: Option<f64>,
    pub mean_seconds: Option<f64>,
    pub elapsed_secs: f64,
}

impl DurationStats {
    pub fn has_data(&self) -> bool {
        self.total_seconds.is_some()
    }
}

pub fn duration_stats(data: &TripData) -> Result<DurationStats> {
    let ((count, total), elapsed_secs) = timed(|| {
        let seconds = data.column(TRIP_DURATION)?.cast(&DataType::Float64)?;
        let (count, total) = seconds
            .f64()?
            .into_iter()
            .flatten()
            .fold((0usize, 0.0f64), |(n, sum), v| (n + 1, sum + v));
        Ok((count, total))
    })?;

    let (total_seconds, mean_seconds) = if count == 0 {
        (None, None)
    } else {
        (Some(total), Some(total / count as f64))
    };

    Ok(DurationStats {
        trip_count: data.height(),
        total_seconds,
        mean_seconds,
        elapsed_secs,
    })
}

/// Human-readable rendering of a number of seconds, e.g. `1d 2h 3m 4s`.
pub fn format_duration(seconds: f64) -> String {
    let whole = seconds.max(0.0).round() as u64;
    let (days, rest) = (whole / 86_400, whole % 86_400);
    let (hours, rest) = (rest / 3_600, rest % 3_600);
    let (minutes, secs) = (rest / 60, rest % 60);

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if secs > 0 || parts.is_empty() {
        parts.push(format!("{secs}s"));
    }
    parts.join(" ")
}

impl fmt::Display for DurationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.total_seconds, self.mean_seconds) {
            (Some(total), Some(mean)) => {
                writeln!(
                    f,
                    "The total travel time is {:.0} seconds ({})",
                    total,
                    format_duration(total)
                )?;
                writeln!(
                    f,
                    "The mean travel time is {:.2} seconds ({})",
                    mean,
                    format_duration(mean)
                )
            }
            _ => writeln!(f, "No trip data available for the selected filters."),
        }
    }
}

impl ReportSection for DurationStats {
    fn heading(&self) -> &'static str {
        "Calculating Trip Duration..."
    }

    fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }
}
