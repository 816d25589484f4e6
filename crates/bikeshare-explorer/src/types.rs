use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Column names
// ============================================================================

pub const START_TIME: &str = "Start Time";
pub const END_TIME: &str = "End Time";
pub const TRIP_DURATION: &str = "Trip Duration";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

pub const MONTH: &str = "month";
pub const DAY_OF_WEEK: &str = "day_of_week";
pub const HOUR: &str = "hour";
pub const ROUTE: &str = "route";

/// Columns every city file must carry.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    START_TIME,
    END_TIME,
    TRIP_DURATION,
    START_STATION,
    END_STATION,
    USER_TYPE,
];

// ============================================================================
// Filter selection
// ============================================================================

/// Returned when a typed answer is not one of the allowed choices.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{input}' is not a valid {kind}")]
pub struct UnknownChoice {
    pub kind: &'static str,
    pub input: String,
}

impl UnknownChoice {
    fn new(kind: &'static str, input: &str) -> Self {
        Self {
            kind,
            input: input.to_string(),
        }
    }
}

fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    /// Lowercase name as typed at the prompt.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Chicago => "chicago",
            Self::NewYorkCity => "new york city",
            Self::Washington => "washington",
        }
    }

    /// File name of the city's trip data inside the data directory.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            Self::Chicago => "chicago.csv",
            Self::NewYorkCity => "new_york_city.csv",
            Self::Washington => "washington.csv",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for City {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        City::ALL
            .into_iter()
            .find(|city| city.name() == wanted)
            .ok_or_else(|| UnknownChoice::new("city", s))
    }
}

/// Months covered by the source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
}

impl Month {
    pub const ALL: [Month; 6] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
    ];

    /// 1-based calendar month number.
    pub fn number(&self) -> i32 {
        *self as i32 + 1
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::January => "january",
            Self::February => "february",
            Self::March => "march",
            Self::April => "april",
            Self::May => "may",
            Self::June => "june",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthFilter {
    #[default]
    All,
    Only(Month),
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(month) => f.write_str(month.name()),
        }
    }
}

impl FromStr for MonthFilter {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        if wanted == "all" {
            return Ok(Self::All);
        }
        Month::ALL
            .into_iter()
            .find(|month| month.name() == wanted)
            .map(Self::Only)
            .ok_or_else(|| UnknownChoice::new("month", s))
    }
}

/// Full English name of a weekday, as stored in the `day_of_week` column.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayFilter {
    #[default]
    All,
    Only(Weekday),
}

impl DayFilter {
    /// Title-cased weekday name the filter matches against, if any.
    pub fn title(&self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Only(day) => Some(weekday_name(*day)),
        }
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.title() {
            None => f.write_str("all"),
            Some(name) => f.write_str(&name.to_lowercase()),
        }
    }
}

impl FromStr for DayFilter {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        if wanted == "all" {
            return Ok(Self::All);
        }
        WEEKDAYS
            .into_iter()
            .find(|day| weekday_name(*day).to_lowercase() == wanted)
            .map(Self::Only)
            .ok_or_else(|| UnknownChoice::new("day", s))
    }
}

/// Filters serialize as the same words typed at the prompt.
macro_rules! serde_via_str {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

serde_via_str!(MonthFilter);
serde_via_str!(DayFilter);

/// The city, month and day chosen for one pass through the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub city: City,
    pub month: MonthFilter,
    pub day: DayFilter,
}

impl FilterSelection {
    pub fn new(city: City, month: MonthFilter, day: DayFilter) -> Self {
        Self { city, month, day }
    }

    /// Whole-dataset selection for a city.
    pub fn unfiltered(city: City) -> Self {
        Self::new(city, MonthFilter::All, DayFilter::All)
    }
}

// ============================================================================
// Schema
// ============================================================================

/// Column names of the optional demographic pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemographicColumns {
    pub gender: String,
    pub birth_year: String,
}

impl Default for DemographicColumns {
    fn default() -> Self {
        Self {
            gender: GENDER.to_string(),
            birth_year: BIRTH_YEAR.to_string(),
        }
    }
}

/// Shape of a loaded trip file.
///
/// Demographics are detected from the headers, so reporters never need to
/// know which city a dataset came from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TripSchema {
    pub demographics: Option<DemographicColumns>,
}

impl TripSchema {
    /// Build the schema from a file's column names.
    pub fn detect<'a>(columns: impl IntoIterator<Item = &'a str>) -> Self {
        let (mut gender, mut birth_year) = (false, false);
        for name in columns {
            gender |= name == GENDER;
            birth_year |= name == BIRTH_YEAR;
        }
        Self {
            demographics: (gender && birth_year).then(DemographicColumns::default),
        }
    }

    pub fn has_demographics(&self) -> bool {
        self.demographics.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_parsing_normalizes_input() {
        assert_eq!("  Chicago ".parse::<City>(), Ok(City::Chicago));
        assert_eq!("NEW YORK CITY".parse::<City>(), Ok(City::NewYorkCity));
        assert!("Chcago".parse::<City>().is_err());
        assert!("new york".parse::<City>().is_err());
    }

    #[test]
    fn test_month_filter_parsing() {
        assert_eq!("all".parse::<MonthFilter>(), Ok(MonthFilter::All));
        assert_eq!(
            " May".parse::<MonthFilter>(),
            Ok(MonthFilter::Only(Month::May))
        );
        // The data stops at June
        assert!("july".parse::<MonthFilter>().is_err());
    }

    #[test]
    fn test_month_numbers() {
        assert_eq!(Month::January.number(), 1);
        assert_eq!(Month::May.number(), 5);
        assert_eq!(Month::June.number(), 6);
    }

    #[test]
    fn test_day_filter_parsing_and_title() {
        let day: DayFilter = "FRIDAY".parse().unwrap();
        assert_eq!(day, DayFilter::Only(Weekday::Fri));
        assert_eq!(day.title(), Some("Friday"));
        assert_eq!(DayFilter::All.title(), None);
        assert!("fri".parse::<DayFilter>().is_err());
    }

    #[test]
    fn test_selection_serialization() {
        let selection = FilterSelection::new(
            City::NewYorkCity,
            MonthFilter::Only(Month::March),
            DayFilter::Only(Weekday::Sun),
        );
        let json = serde_json::to_string(&selection).unwrap();
        assert!(json.contains("new_york_city"));
        assert!(json.contains("march"));
        assert!(json.contains("sunday"));

        let back: FilterSelection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, selection);
    }

    #[test]
    fn test_schema_detection() {
        let with = TripSchema::detect(["Start Time", "Gender", "Birth Year"]);
        assert!(with.has_demographics());

        let without = TripSchema::detect(["Start Time", "User Type"]);
        assert!(!without.has_demographics());

        // Both halves of the pair are needed
        let half = TripSchema::detect(["Gender"]);
        assert!(!half.has_demographics());
    }
}
