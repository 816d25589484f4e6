//! Most popular stations and trip.

use super::{OrNoData, ReportSection, timed};
use crate::error::Result;
use crate::loader::TripData;
use crate::types::{END_STATION, ROUTE, START_STATION};
use crate::utils::string_mode;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationStats {
    pub most_common_start_station: Option<String>,
    pub most_common_end_station: Option<String>,
    pub most_common_route: Option<String>,
    pub elapsed_secs: f64,
}

pub fn station_stats(data: &TripData) -> Result<StationStats> {
    let ((start, end, route), elapsed_secs) = timed(|| {
        Ok((
            string_mode(data.column(START_STATION)?)?,
            string_mode(data.column(END_STATION)?)?,
            string_mode(data.column(ROUTE)?)?,
        ))
    })?;

    Ok(StationStats {
        most_common_start_station: start,
        most_common_end_station: end,
        most_common_route: route,
        elapsed_secs,
    })
}

impl fmt::Display for StationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "The most commonly used start station is {}",
            OrNoData(&self.most_common_start_station)
        )?;
        writeln!(
            f,
            "The most commonly used end station is {}",
            OrNoData(&self.most_common_end_station)
        )?;
        writeln!(
            f,
            "The most frequent combination of start and end station is {}",
            OrNoData(&self.most_common_route)
        )
    }
}

impl ReportSection for StationStats {
    fn heading(&self) -> &'static str {
        "Calculating The Most Popular Stations and Trip..."
    }

    fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_values() {
        let stats = StationStats {
            most_common_start_station: Some("Clark St & Lake St".to_string()),
            most_common_end_station: Some("Canal St & Adams St".to_string()),
            most_common_route: Some("Clark St & Lake St and Canal St & Adams St".to_string()),
            elapsed_secs: 0.0,
        };
        let text = stats.to_string();
        assert!(text.contains("start station is Clark St & Lake St\n"));
        assert!(text.contains("end station is Canal St & Adams St\n"));
        assert!(text.contains("start and end station is Clark St & Lake St and Canal St & Adams St"));
    }

    #[test]
    fn test_display_no_data() {
        let stats = StationStats {
            most_common_start_station: None,
            most_common_end_station: None,
            most_common_route: None,
            elapsed_secs: 0.0,
        };
        assert_eq!(stats.to_string().matches("no data").count(), 3);
    }
}
