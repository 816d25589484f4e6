//! Dataset loading for a city selection.
//!
//! Loading runs as a fixed sequence of whole-frame steps:
//! 1. Read the city's CSV
//! 2. Optionally page through raw rows
//! 3. Parse start times and derive month, weekday, hour and route
//! 4. Fill missing user type (and gender/birth year where present) with the mode
//! 5. Filter by month, then by day
//!
//! Row order from the source file is preserved throughout.

mod derive;
mod preview;

pub use derive::{add_derived_columns, parse_timestamp, parse_timestamps, route_label};
pub use preview::page_through;

use crate::config::ExplorerConfig;
use crate::error::{ExplorerError, Result, ResultExt};
use crate::imputers::StatisticalImputer;
use crate::prompt::Prompter;
use crate::types::{
    City, DAY_OF_WEEK, FilterSelection, MONTH, MonthFilter, REQUIRED_COLUMNS, TRIP_DURATION,
    TripSchema, USER_TYPE,
};
use crate::utils::{cast_numeric, has_column, series};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::io::{BufRead, Write};
use tracing::{debug, info};

/// Trips for one selection, cleaned and filtered.
#[derive(Debug, Clone)]
pub struct TripData {
    frame: DataFrame,
    schema: TripSchema,
    selection: FilterSelection,
    source_rows: usize,
    fill_steps: Vec<String>,
}

impl TripData {
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn schema(&self) -> &TripSchema {
        &self.schema
    }

    pub fn selection(&self) -> FilterSelection {
        self.selection
    }

    /// Rows after filtering.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Rows in the file before filtering.
    pub fn source_rows(&self) -> usize {
        self.source_rows
    }

    /// Missing-value fills applied while loading.
    pub fn fill_steps(&self) -> &[String] {
        &self.fill_steps
    }

    /// Look up a column, failing with [`ExplorerError::MissingColumn`].
    pub fn column(&self, name: &str) -> Result<&Series> {
        series(&self.frame, name)
    }
}

/// Reads and prepares trip data using the configured source map.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    config: ExplorerConfig,
}

impl DatasetLoader {
    pub fn new(config: ExplorerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Read a city's file as-is.
    pub fn read_source(&self, city: City) -> Result<DataFrame> {
        let path = self.config.source_path(city);
        if !path.exists() {
            return Err(ExplorerError::SourceNotFound {
                city: city.to_string(),
                path,
            });
        }

        info!("Loading {} trips from {}", city, path.display());
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .try_into_reader_with_file_path(Some(path.clone()))
            .context(format!("Opening {}", path.display()))?
            .finish()
            .context(format!("Reading {}", path.display()))?;

        for required in REQUIRED_COLUMNS {
            if !has_column(&df, required) {
                return Err(ExplorerError::MissingColumn(required.to_string())
                    .with_context(format!("Loading {city}")));
            }
        }

        debug!("Read {:?} from {}", df.shape(), path.display());
        Ok(df)
    }

    /// Clean, derive and filter a raw frame.
    pub fn prepare(&self, raw: DataFrame, selection: FilterSelection) -> Result<TripData> {
        let source_rows = raw.height();
        let schema = TripSchema::detect(raw.get_column_names().iter().map(|name| name.as_str()));
        let mut df = raw;
        let mut fill_steps = Vec::new();

        add_derived_columns(&mut df).context(format!("Loading {}", selection.city))?;

        let duration = cast_numeric(series(&df, TRIP_DURATION)?, &DataType::Float64)?;
        df.replace(TRIP_DURATION, duration)?;

        StatisticalImputer::apply_string_mode(&mut df, USER_TYPE, &mut fill_steps)?;
        if let Some(demographics) = &schema.demographics {
            StatisticalImputer::apply_string_mode(&mut df, &demographics.gender, &mut fill_steps)?;
            StatisticalImputer::apply_int_mode(&mut df, &demographics.birth_year, &mut fill_steps)?;
        }

        let frame = apply_filters(df, selection)?;
        info!(
            "Selected {} of {} {} trips (month: {}, day: {})",
            frame.height(),
            source_rows,
            selection.city,
            selection.month,
            selection.day
        );

        Ok(TripData {
            frame,
            schema,
            selection,
            source_rows,
            fill_steps,
        })
    }

    /// Load a selection without any interaction.
    pub fn load(&self, selection: FilterSelection) -> Result<TripData> {
        let raw = self.read_source(selection.city)?;
        self.prepare(raw, selection)
    }

    /// Load a selection, offering the raw-row preview first when enabled.
    pub fn load_interactive<R: BufRead, W: Write>(
        &self,
        selection: FilterSelection,
        prompter: &mut Prompter<R, W>,
    ) -> Result<TripData> {
        let raw = self.read_source(selection.city)?;
        if self.config.show_preview {
            page_through(prompter, &raw, selection.city, self.config.preview_rows)?;
        }
        self.prepare(raw, selection)
    }
}

/// Keep only rows matching the month and day filters.
pub fn apply_filters(df: DataFrame, selection: FilterSelection) -> Result<DataFrame> {
    let mut df = df;

    if let MonthFilter::Only(month) = selection.month {
        let wanted = month.number();
        let mask: Vec<bool> = series(&df, MONTH)?
            .i32()?
            .into_iter()
            .map(|value| value == Some(wanted))
            .collect();
        df = df.filter(&BooleanChunked::from_slice("mask".into(), &mask))?;
        debug!("{} rows left after month filter", df.height());
    }

    if let Some(day) = selection.day.title() {
        let mask: Vec<bool> = series(&df, DAY_OF_WEEK)?
            .str()?
            .into_iter()
            .map(|value| value == Some(day))
            .collect();
        df = df.filter(&BooleanChunked::from_slice("mask".into(), &mask))?;
        debug!("{} rows left after day filter", df.height());
    }

    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DayFilter, Month};
    use chrono::Weekday;

    fn raw_trips(with_demographics: bool) -> DataFrame {
        let mut df = df![
            "Start Time" => [
                "2017-05-01 08:00:00",
                "2017-05-06 08:30:00",
                "2017-06-05 17:10:00",
                "2017-05-08 08:05:00",
            ],
            "End Time" => [
                "2017-05-01 08:20:00",
                "2017-05-06 08:45:00",
                "2017-06-05 17:40:00",
                "2017-05-08 08:25:00",
            ],
            "Trip Duration" => [1200i64, 900, 1800, 1200],
            "Start Station" => ["A", "B", "A", "A"],
            "End Station" => ["B", "A", "C", "B"],
            "User Type" => [Some("Subscriber"), None, Some("Customer"), Some("Subscriber")],
        ]
        .unwrap();

        if with_demographics {
            df.with_column(Series::new(
                "Gender".into(),
                &[Some("Male"), Some("Female"), None, Some("Male")],
            ))
            .unwrap();
            df.with_column(Series::new(
                "Birth Year".into(),
                &[Some(1990.0), None, Some(1985.0), Some(1990.0)],
            ))
            .unwrap();
        }
        df
    }

    fn loader() -> DatasetLoader {
        DatasetLoader::new(ExplorerConfig::default())
    }

    #[test]
    fn test_prepare_unfiltered_keeps_every_row() {
        let data = loader()
            .prepare(raw_trips(true), FilterSelection::unfiltered(City::Chicago))
            .unwrap();

        assert_eq!(data.height(), 4);
        assert_eq!(data.source_rows(), 4);
        assert!(data.schema().has_demographics());
        assert_eq!(data.column("User Type").unwrap().null_count(), 0);
        assert_eq!(data.column("Gender").unwrap().null_count(), 0);
        assert_eq!(data.column("Birth Year").unwrap().null_count(), 0);
        assert_eq!(data.fill_steps().len(), 3);
        assert_eq!(data.column("Trip Duration").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_prepare_month_filter() {
        let selection = FilterSelection::new(City::Chicago, MonthFilter::Only(Month::May), DayFilter::All);
        let data = loader().prepare(raw_trips(true), selection).unwrap();

        assert_eq!(data.height(), 3);
        assert!(data.column("month").unwrap().i32().unwrap().into_iter().all(|m| m == Some(5)));
        assert_eq!(data.source_rows(), 4);
    }

    #[test]
    fn test_prepare_month_and_day_filter() {
        let selection = FilterSelection::new(
            City::Chicago,
            MonthFilter::Only(Month::May),
            DayFilter::Only(Weekday::Mon),
        );
        let data = loader().prepare(raw_trips(true), selection).unwrap();

        assert_eq!(data.height(), 2);
        assert!(data
            .column("day_of_week")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .all(|d| d == Some("Monday")));
    }

    #[test]
    fn test_prepare_filter_to_nothing() {
        let selection = FilterSelection::new(
            City::Chicago,
            MonthFilter::Only(Month::January),
            DayFilter::All,
        );
        let data = loader().prepare(raw_trips(true), selection).unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_prepare_without_demographics() {
        let data = loader()
            .prepare(raw_trips(false), FilterSelection::unfiltered(City::Washington))
            .unwrap();

        assert!(!data.schema().has_demographics());
        assert_eq!(data.fill_steps().len(), 1);
    }

    #[test]
    fn test_prepare_bad_timestamp_is_fatal() {
        let raw = df![
            "Start Time" => ["2017-05-01 08:00:00", "soon"],
            "Start Station" => ["A", "B"],
            "End Station" => ["B", "A"],
            "Trip Duration" => [1.0, 2.0],
            "User Type" => ["Subscriber", "Customer"],
        ]
        .unwrap();

        let err = loader()
            .prepare(raw, FilterSelection::unfiltered(City::Chicago))
            .unwrap_err();
        assert_eq!(err.error_code(), "TIMESTAMP_PARSE");
    }

    #[test]
    fn test_read_source_missing_file() {
        let config = ExplorerConfig::builder()
            .data_dir("/definitely/not/here")
            .build()
            .unwrap();
        let err = DatasetLoader::new(config).read_source(City::Chicago).unwrap_err();
        assert!(matches!(err, ExplorerError::SourceNotFound { .. }));
    }
}
