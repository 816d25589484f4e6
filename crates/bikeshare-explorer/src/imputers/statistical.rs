//! Mode imputation for trip columns.

use crate::error::Result;
use crate::utils::{
    cast_numeric, fill_int_nulls, fill_string_nulls, has_column, int_mode, string_mode,
};
use polars::prelude::*;
use tracing::debug;

/// Fills missing values with the column's most frequent value.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill a text column with its mode.
    ///
    /// Columns without nulls, without any values, or absent from the frame
    /// are left alone.
    pub fn apply_string_mode(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<()> {
        if !has_column(df, col_name) {
            return Ok(());
        }

        let series = df.column(col_name)?.cast(&DataType::String)?;
        let series = series.as_materialized_series();
        let nulls = series.null_count();
        if nulls == 0 {
            return Ok(());
        }

        if let Some(mode_val) = string_mode(series)? {
            let filled = fill_string_nulls(series, &mode_val)?;
            df.replace(col_name, filled)?;

            debug!("Filled {} nulls in '{}' with '{}'", nulls, col_name, mode_val);
            processing_steps.push(format!(
                "Filled {} missing '{}' values with mode: '{}'",
                nulls, col_name, mode_val
            ));
        }

        Ok(())
    }

    /// Fill an integer-like column with its mode.
    ///
    /// Float columns holding whole numbers (birth years read as `1989.0`)
    /// come out as `Int64`. A value that is present but not a number is an
    /// error, never a fill target.
    pub fn apply_int_mode(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<()> {
        if !has_column(df, col_name) {
            return Ok(());
        }

        let series = cast_numeric(df.column(col_name)?.as_materialized_series(), &DataType::Int64)?;
        let nulls = series.null_count();

        match int_mode(&series)? {
            Some(mode_val) if nulls > 0 => {
                let filled = fill_int_nulls(&series, mode_val)?;
                df.replace(col_name, filled)?;

                debug!("Filled {} nulls in '{}' with {}", nulls, col_name, mode_val);
                processing_steps.push(format!(
                    "Filled {} missing '{}' values with mode: {}",
                    nulls, col_name, mode_val
                ));
            }
            _ => {
                df.replace(col_name, series)?;
            }
        }

        Ok(())
    }
}
