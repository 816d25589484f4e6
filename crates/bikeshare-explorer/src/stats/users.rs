//! Statistics on bikeshare users.

use super::{OrNoData, ReportSection, timed};
use crate::error::Result;
use crate::loader::TripData;
use crate::types::{City, DemographicColumns, USER_TYPE};
use crate::utils::{ValueCount, mode, value_counts};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Gender and birth year figures for cities that record them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    pub genders: Vec<ValueCount<String>>,
    pub earliest_birth_year: Option<i64>,
    pub most_recent_birth_year: Option<i64>,
    pub most_common_birth_year: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub city: City,
    pub user_types: Vec<ValueCount<String>>,
    /// `None` when the source file has no gender/birth year columns.
    pub demographics: Option<Demographics>,
    pub elapsed_secs: f64,
}

fn owned_counts(series: &Series) -> Result<Vec<ValueCount<String>>> {
    let text = series.cast(&DataType::String)?;
    Ok(value_counts(text.str()?.into_iter())
        .into_iter()
        .map(|vc| ValueCount {
            value: vc.value.to_string(),
            count: vc.count,
        })
        .collect())
}

fn demographic_stats(data: &TripData, columns: &DemographicColumns) -> Result<Demographics> {
    let genders = owned_counts(data.column(&columns.gender)?)?;

    let years = data.column(&columns.birth_year)?.cast(&DataType::Int64)?;
    let years: Vec<i64> = years.i64()?.into_iter().flatten().collect();

    Ok(Demographics {
        genders,
        earliest_birth_year: years.iter().min().copied(),
        most_recent_birth_year: years.iter().max().copied(),
        most_common_birth_year: mode(years.iter().copied().map(Some)),
    })
}

pub fn user_stats(data: &TripData) -> Result<UserStats> {
    let ((user_types, demographics), elapsed_secs) = timed(|| {
        let user_types = owned_counts(data.column(USER_TYPE)?)?;
        let demographics = match &data.schema().demographics {
            Some(columns) => Some(demographic_stats(data, columns)?),
            None => None,
        };
        Ok((user_types, demographics))
    })?;

    Ok(UserStats {
        city: data.selection().city,
        user_types,
        demographics,
        elapsed_secs,
    })
}

fn write_counts(f: &mut fmt::Formatter<'_>, counts: &[ValueCount<String>]) -> fmt::Result {
    if counts.is_empty() {
        return writeln!(f, "  no data");
    }
    for vc in counts {
        writeln!(f, "  {:<12} {}", vc.value, vc.count)?;
    }
    Ok(())
}

impl fmt::Display for UserStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "The counts of the user types are")?;
        write_counts(f, &self.user_types)?;
        writeln!(f)?;

        match &self.demographics {
            Some(demo) => {
                writeln!(f, "The counts of gender are")?;
                write_counts(f, &demo.genders)?;
                writeln!(f)?;
                writeln!(
                    f,
                    "The earliest year of birth is {}",
                    OrNoData(&demo.earliest_birth_year)
                )?;
                writeln!(
                    f,
                    "The most recent year of birth is {}",
                    OrNoData(&demo.most_recent_birth_year)
                )?;
                writeln!(
                    f,
                    "The most common year of birth is {}",
                    OrNoData(&demo.most_common_birth_year)
                )
            }
            None => {
                writeln!(f, "Gender statistics are not available for {}", self.city)?;
                writeln!(f, "Birth year statistics are not available for {}", self.city)
            }
        }
    }
}

impl ReportSection for UserStats {
    fn heading(&self) -> &'static str {
        "Calculating User Stats..."
    }

    fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }
}
