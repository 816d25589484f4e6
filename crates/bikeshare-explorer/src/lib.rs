//! US Bikeshare Explorer Library
//!
//! Interactive descriptive statistics over bike share trip data for
//! Chicago, New York City and Washington, built on Polars.
//!
//! # Overview
//!
//! A session runs the same steps on every iteration:
//!
//! - **Input Collection**: city, month and day are asked for until valid
//! - **Loading**: the city's CSV is read, start times parsed and derived
//!   columns added, missing user data filled with the column mode
//! - **Filtering**: rows are kept by month, then by weekday
//! - **Reporting**: time, station, duration and user statistics
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use bikeshare_explorer::{ExplorerConfig, Session};
//! use std::io;
//!
//! let config = ExplorerConfig::builder()
//!     .data_dir("data")
//!     .preview_rows(5)
//!     .build()?;
//!
//! let stdin = io::stdin();
//! let mut session = Session::new(config, stdin.lock(), io::stdout());
//! session.run()?;
//! ```
//!
//! # Non-interactive use
//!
//! ```rust,ignore
//! use bikeshare_explorer::{City, DatasetLoader, FilterSelection, SessionReport};
//!
//! let loader = DatasetLoader::new(ExplorerConfig::default());
//! let data = loader.load(FilterSelection::unfiltered(City::Washington))?;
//! let report = SessionReport::build(&data)?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```

pub mod config;
pub mod error;
pub mod imputers;
pub mod loader;
pub mod prompt;
pub mod reporting;
pub mod session;
pub mod stats;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{ConfigValidationError, ExplorerConfig, ExplorerConfigBuilder};
pub use error::{ExplorerError, Result as ExplorerResult, ResultExt};
pub use imputers::StatisticalImputer;
pub use loader::{DatasetLoader, TripData, apply_filters};
pub use prompt::{Prompter, collect_filters};
pub use reporting::SessionReport;
pub use session::{Session, SessionState};
pub use stats::{
    Demographics, DurationStats, ReportSection, StationStats, TimeStats, UserStats,
    duration_stats, station_stats, time_stats, user_stats,
};
pub use types::{City, DayFilter, FilterSelection, Month, MonthFilter, TripSchema};
pub use utils::{ValueCount, mode, value_counts};
