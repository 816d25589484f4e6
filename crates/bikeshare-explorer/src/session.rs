//! Interactive session loop.
//!
//! Each iteration collects a selection, loads it, prints the four report
//! sections and asks whether to go again. Nothing is carried over between
//! iterations.

use crate::config::ExplorerConfig;
use crate::error::Result;
use crate::loader::DatasetLoader;
use crate::prompt::{Prompter, collect_filters};
use crate::reporting::SessionReport;
use crate::types::FilterSelection;
use std::io::{BufRead, Write};
use tracing::{debug, info};

pub const RESTART_PROMPT: &str = "\nWould you like to restart? Enter yes or no.\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Done,
}

impl SessionState {
    pub fn display_name(&self) -> &'static str {
        match self {
            SessionState::Running => "Running",
            SessionState::Done => "Done",
        }
    }
}

pub struct Session<R, W> {
    loader: DatasetLoader,
    prompter: Prompter<R, W>,
    state: SessionState,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(config: ExplorerConfig, input: R, output: W) -> Self {
        let prompter = Prompter::new(input, output).with_max_attempts(config.max_prompt_attempts);
        Self {
            loader: DatasetLoader::new(config),
            prompter,
            state: SessionState::Running,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Give back the reader and writer, mainly so tests can inspect output.
    pub fn into_parts(self) -> (R, W) {
        self.prompter.into_parts()
    }

    /// Run until the user declines to restart. Returns the number of
    /// completed iterations.
    pub fn run(&mut self) -> Result<usize> {
        let mut iterations = 0usize;
        self.state = SessionState::Running;

        while self.state == SessionState::Running {
            let selection = collect_filters(&mut self.prompter)?;
            let data = self.loader.load_interactive(selection, &mut self.prompter)?;
            let report = SessionReport::build(&data)?;
            self.print_report(&report)?;
            iterations += 1;

            if !self.prompter.confirm_exact(RESTART_PROMPT)? {
                self.state = SessionState::Done;
            }
            debug!("Iteration {} finished, state {}", iterations, self.state.display_name());
        }

        info!("Session ended after {} iteration(s)", iterations);
        Ok(iterations)
    }

    /// One iteration for a fixed selection: no prompts, no preview.
    pub fn run_once(&mut self, selection: FilterSelection) -> Result<SessionReport> {
        let report = self.report(selection)?;
        self.print_report(&report)?;
        self.state = SessionState::Done;
        Ok(report)
    }

    /// Build the report for a selection without printing anything.
    pub fn report(&self, selection: FilterSelection) -> Result<SessionReport> {
        let data = self.loader.load(selection)?;
        SessionReport::build(&data)
    }

    fn print_report(&mut self, report: &SessionReport) -> Result<()> {
        let text = report.render(self.loader.config().show_timings);
        self.prompter.say(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_names() {
        assert_eq!(SessionState::Running.display_name(), "Running");
        assert_eq!(SessionState::Done.display_name(), "Done");
    }

    #[test]
    fn test_end_of_input_before_selection_is_fatal() {
        let config = ExplorerConfig::default();
        let mut session = Session::new(config, std::io::Cursor::new(""), Vec::new());
        assert_eq!(session.state(), SessionState::Running);
        let err = session.run().unwrap_err();
        assert_eq!(err.error_code(), "INPUT_EXHAUSTED");
    }

    #[test]
    fn test_retry_limit_from_config() {
        let config = ExplorerConfig::builder().max_prompt_attempts(2).build().unwrap();
        let input = std::io::Cursor::new("paris\nlondon\nchicago\n");
        let mut session = Session::new(config, input, Vec::new());
        let err = session.run().unwrap_err();
        assert_eq!(err.error_code(), "TOO_MANY_ATTEMPTS");
    }
}
