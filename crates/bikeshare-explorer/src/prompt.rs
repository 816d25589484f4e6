//! Interactive input collection.
//!
//! [`Prompter`] wraps any reader/writer pair so sessions can be driven by a
//! terminal or by a scripted buffer in tests.

use crate::error::{ExplorerError, Result};
use crate::types::{City, DayFilter, FilterSelection, MonthFilter};
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::debug;

/// Horizontal rule printed between sections.
pub fn separator() -> String {
    "-".repeat(40)
}

/// Line-oriented question/answer channel.
pub struct Prompter<R, W> {
    input: R,
    output: W,
    max_attempts: Option<usize>,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            max_attempts: None,
        }
    }

    /// Fail a prompt after this many invalid answers instead of asking forever.
    pub fn with_max_attempts(mut self, max_attempts: Option<usize>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Give back the underlying reader and writer.
    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }

    /// Print one line.
    pub fn say(&mut self, line: impl Display) -> Result<()> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    /// Print a prompt and read one line, or `None` at end of input.
    pub fn read_answer(&mut self, prompt: &str) -> Result<Option<String>> {
        writeln!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Ask until the answer parses.
    ///
    /// The first question uses `prompt`, every retry uses `retry_prompt`.
    /// End of input is fatal; so is exceeding the configured attempt limit.
    pub fn select<T: FromStr>(&mut self, field: &str, prompt: &str, retry_prompt: &str) -> Result<T> {
        let mut question = prompt;
        let mut invalid = 0usize;

        loop {
            let answer = self
                .read_answer(question)?
                .ok_or_else(|| ExplorerError::InputExhausted {
                    field: field.to_string(),
                })?;

            if let Ok(value) = answer.parse::<T>() {
                return Ok(value);
            }

            invalid += 1;
            debug!("Rejected {} answer {:?} (attempt {})", field, answer, invalid);
            if self.max_attempts.is_some_and(|max| invalid >= max) {
                return Err(ExplorerError::TooManyAttempts {
                    field: field.to_string(),
                    attempts: invalid,
                });
            }
            question = retry_prompt;
        }
    }

    /// Yes/no question where only "yes" counts as yes, ignoring case and
    /// surrounding whitespace.
    ///
    /// End of input counts as "no".
    pub fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(self
            .read_answer(prompt)?
            .is_some_and(|answer| answer.trim().eq_ignore_ascii_case("yes")))
    }

    /// Like [`confirm`](Self::confirm), but the line must be exactly "yes"
    /// in any case. `"yes "` is a no.
    pub fn confirm_exact(&mut self, prompt: &str) -> Result<bool> {
        Ok(self
            .read_answer(prompt)?
            .is_some_and(|answer| answer.eq_ignore_ascii_case("yes")))
    }
}

/// Ask for city, month and day.
pub fn collect_filters<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
) -> Result<FilterSelection> {
    prompter.say("Hello! Let's explore some US bikeshare data!")?;

    let city: City = prompter.select(
        "city",
        "Please enter a city chicago, new york city or washington",
        "Please enter a valid city",
    )?;
    prompter.say(format!(
        "We will calculate statistics of bikeshare data for {city}"
    ))?;

    let month: MonthFilter = prompter.select(
        "month",
        "Please enter a month from january to june or 'all' for all months",
        "Please enter a valid month",
    )?;
    prompter.say(format!(
        "Summary statistics will be displayed for the month of {month}"
    ))?;

    let day: DayFilter = prompter.select(
        "day",
        "Please enter a day from monday to sunday or 'all' for all days",
        "Please enter a valid day",
    )?;
    prompter.say(format!("Summary statistics will be displayed for {day}"))?;

    prompter.say(separator())?;
    Ok(FilterSelection::new(city, month, day))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Month;
    use chrono::Weekday;
    use std::io::Cursor;

    fn prompter(script: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    fn transcript(prompter: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(prompter.into_parts().1).unwrap()
    }

    #[test]
    fn test_collect_filters_happy_path() {
        let mut p = prompter("Chicago\n  MAY \nall\n");
        let selection = collect_filters(&mut p).unwrap();

        assert_eq!(
            selection,
            FilterSelection::new(City::Chicago, MonthFilter::Only(Month::May), DayFilter::All)
        );
        let out = transcript(p);
        assert!(out.contains("for chicago"));
        assert!(out.contains("for the month of may"));
        assert!(out.contains(&"-".repeat(40)));
    }

    #[test]
    fn test_invalid_city_reprompts_once() {
        let mut p = prompter("Chcago\nchicago\nall\nsunday\n");
        let selection = collect_filters(&mut p).unwrap();

        assert_eq!(selection.city, City::Chicago);
        assert_eq!(selection.day, DayFilter::Only(Weekday::Sun));
        let out = transcript(p);
        assert_eq!(out.matches("Please enter a valid city").count(), 1);
        assert_eq!(out.matches("Please enter a valid month").count(), 0);
    }

    #[test]
    fn test_end_of_input_is_fatal() {
        let mut p = prompter("washington\njuly\n");
        let err = collect_filters(&mut p).unwrap_err();
        assert!(matches!(
            err,
            ExplorerError::InputExhausted { ref field } if field == "month"
        ));
    }

    #[test]
    fn test_attempt_limit() {
        let mut p = prompter("x\ny\nz\nchicago\n").with_max_attempts(Some(2));
        let err = p
            .select::<City>("city", "city?", "valid city?")
            .unwrap_err();
        assert!(matches!(
            err,
            ExplorerError::TooManyAttempts { attempts: 2, .. }
        ));
    }

    #[test]
    fn test_confirm() {
        let mut p = prompter("YES\n yes \nyep\n\n");
        assert!(p.confirm("again?").unwrap());
        assert!(p.confirm("again?").unwrap());
        assert!(!p.confirm("again?").unwrap());
        assert!(!p.confirm("again?").unwrap());
        // Input is used up
        assert!(!p.confirm("again?").unwrap());
    }

    #[test]
    fn test_confirm_exact() {
        let mut p = prompter("YES\nyes \n yes\nYeS\r\n");
        assert!(p.confirm_exact("restart?").unwrap());
        assert!(!p.confirm_exact("restart?").unwrap());
        assert!(!p.confirm_exact("restart?").unwrap());
        assert!(p.confirm_exact("restart?").unwrap());
        assert!(!p.confirm_exact("restart?").unwrap());
    }

    #[test]
    fn test_windows_line_endings() {
        let mut p = prompter("new york city\r\n");
        let city: City = p.select("city", "?", "?").unwrap();
        assert_eq!(city, City::NewYorkCity);
    }
}
