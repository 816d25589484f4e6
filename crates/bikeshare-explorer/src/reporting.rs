//! Full statistics report for one selection.
//!
//! [`SessionReport`] runs the four reporters in their fixed order and keeps
//! the results together for terminal rendering or `--json` output.

use crate::error::Result;
use crate::loader::TripData;
use crate::stats::{
    DurationStats, ReportSection, StationStats, TimeStats, UserStats, duration_stats, render,
    station_stats, time_stats, user_stats,
};
use crate::types::FilterSelection;
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    pub selection: FilterSelection,
    /// Rows in the source file
    pub source_rows: usize,
    /// Rows left after filtering
    pub selected_rows: usize,
    /// Missing-value fills applied while loading
    pub cleaning_actions: Vec<String>,
    pub time: TimeStats,
    pub stations: StationStats,
    pub durations: DurationStats,
    pub users: UserStats,
}

impl SessionReport {
    pub fn build(data: &TripData) -> Result<Self> {
        let time = time_stats(data)?;
        let stations = station_stats(data)?;
        let durations = duration_stats(data)?;
        let users = user_stats(data)?;
        debug!(
            "Report sections took {:.6}s, {:.6}s, {:.6}s, {:.6}s",
            time.elapsed_secs, stations.elapsed_secs, durations.elapsed_secs, users.elapsed_secs
        );

        Ok(Self {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            selection: data.selection(),
            source_rows: data.source_rows(),
            selected_rows: data.height(),
            cleaning_actions: data.fill_steps().to_vec(),
            time,
            stations,
            durations,
            users,
        })
    }

    /// Sections in print order.
    pub fn sections(&self) -> [&dyn ReportSection; 4] {
        [&self.time, &self.stations, &self.durations, &self.users]
    }

    /// The whole report as terminal text.
    pub fn render(&self, show_timings: bool) -> String {
        self.sections()
            .into_iter()
            .map(|section| render(section, show_timings))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
