//! Descriptive statistics over a loaded selection.
//!
//! Four independent reporters, each a pure function of [`TripData`]:
//!
//! - [`time_stats`] - most common month, weekday and start hour
//! - [`station_stats`] - most used start/end stations and route
//! - [`duration_stats`] - total and mean trip duration
//! - [`user_stats`] - user type counts and, where recorded, demographics
//!
//! Each result implements [`ReportSection`] for terminal rendering and
//! `Serialize` for JSON output.
//!
//! [`TripData`]: crate::loader::TripData

mod duration;
mod station;
mod time;
mod users;

pub use duration::{DurationStats, duration_stats, format_duration};
pub use station::{StationStats, station_stats};
pub use time::{TimeStats, month_label, time_stats};
pub use users::{Demographics, UserStats, user_stats};

use crate::error::Result;
use crate::prompt::separator;
use std::fmt::{self, Display};
use std::time::Instant;

/// One printable block of the statistics report.
pub trait ReportSection: Display {
    /// Line announcing the section.
    fn heading(&self) -> &'static str;

    /// Seconds the computation took.
    fn elapsed_secs(&self) -> f64;
}

/// Render a section the way the terminal report shows it.
pub fn render(section: &dyn ReportSection, show_timings: bool) -> String {
    let timing = if show_timings {
        format!("\nThis took {:.6} seconds.\n", section.elapsed_secs())
    } else {
        String::new()
    };
    format!(
        "\n{}\n\n{section}{timing}{}",
        section.heading(),
        separator()
    )
}

/// Run a computation and measure it.
pub(crate) fn timed<T>(compute: impl FnOnce() -> Result<T>) -> Result<(T, f64)> {
    let start = Instant::now();
    let value = compute()?;
    Ok((value, start.elapsed().as_secs_f64()))
}

/// Displays an optional statistic, or "no data" when the selection is empty.
pub(crate) struct OrNoData<'a, T>(pub &'a Option<T>);

impl<T: Display> Display for OrNoData<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => value.fmt(f),
            None => f.write_str("no data"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl Display for Fixed {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            writeln!(f, "body line")
        }
    }

    impl ReportSection for Fixed {
        fn heading(&self) -> &'static str {
            "Calculating Something..."
        }

        fn elapsed_secs(&self) -> f64 {
            0.25
        }
    }

    #[test]
    fn test_render_with_timings() {
        let text = render(&Fixed, true);
        assert!(text.starts_with("\nCalculating Something...\n\nbody line\n"));
        assert!(text.contains("This took 0.250000 seconds."));
        assert!(text.ends_with(&"-".repeat(40)));
    }

    #[test]
    fn test_render_without_timings() {
        let text = render(&Fixed, false);
        assert!(!text.contains("This took"));
    }

    #[test]
    fn test_or_no_data() {
        assert_eq!(OrNoData(&Some(5)).to_string(), "5");
        assert_eq!(OrNoData(&Option::<i32>::None).to_string(), "no data");
    }
}
