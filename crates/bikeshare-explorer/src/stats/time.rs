//! Most frequent times of travel.

use super::{OrNoData, ReportSection, timed};
use crate::error::Result;
use crate::loader::TripData;
use crate::types::{DAY_OF_WEEK, HOUR, MONTH};
use crate::utils::{mode, string_mode};
use serde::{Deserialize, Serialize};
use std::fmt;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// `5` -> `"5 (May)"`; out-of-range numbers are printed bare.
pub fn month_label(month: i32) -> String {
    match usize::try_from(month - 1).ok().and_then(|i| MONTH_NAMES.get(i)) {
        Some(name) => format!("{month} ({name})"),
        None => month.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeStats {
    pub most_common_month: Option<i32>,
    pub most_common_day: Option<String>,
    pub most_common_hour: Option<i32>,
    pub elapsed_secs: f64,
}

/// Mode of the derived month, weekday and hour columns.
pub fn time_stats(data: &TripData) -> Result<TimeStats> {
    let ((month, day, hour), elapsed_secs) = timed(|| {
        let month = mode(data.column(MONTH)?.i32()?.into_iter());
        let day = string_mode(data.column(DAY_OF_WEEK)?)?;
        let hour = mode(data.column(HOUR)?.i32()?.into_iter());
        Ok((month, day, hour))
    })?;

    Ok(TimeStats {
        most_common_month: month,
        most_common_day: day,
        most_common_hour: hour,
        elapsed_secs,
    })
}

impl fmt::Display for TimeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let month = self.most_common_month.map(month_label);
        writeln!(f, "The most common month is {}", OrNoData(&month))?;
        writeln!(
            f,
            "The most common day of the week is {}",
            OrNoData(&self.most_common_day)
        )?;
        writeln!(
            f,
            "The most common start hour is {}",
            OrNoData(&self.most_common_hour)
        )
    }
}

impl ReportSection for TimeStats {
    fn heading(&self) -> &'static str {
        "Calculating The Most Frequent Times of Travel..."
    }

    fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_label() {
        assert_eq!(month_label(5), "5 (May)");
        assert_eq!(month_label(12), "12 (December)");
        assert_eq!(month_label(0), "0");
        assert_eq!(month_label(13), "13");
    }

    #[test]
    fn test_display_no_data() {
        let stats = TimeStats {
            most_common_month: None,
            most_common_day: None,
            most_common_hour: None,
            elapsed_secs: 0.0,
        };
        let text = stats.to_string();
        assert_eq!(text.matches("no data").count(), 3);
    }

    #[test]
    fn test_display_values() {
        let stats = TimeStats {
            most_common_month: Some(6),
            most_common_day: Some("Friday".to_string()),
            most_common_hour: Some(17),
            elapsed_secs: 0.0,
        };
        let text = stats.to_string();
        assert!(text.contains("month is 6 (June)"));
        assert!(text.contains("week is Friday"));
        assert!(text.contains("hour is 17"));
    }
}
