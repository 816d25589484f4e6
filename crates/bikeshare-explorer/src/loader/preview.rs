//! Paging through raw rows before any cleaning happens.

use crate::error::Result;
use crate::prompt::Prompter;
use crate::types::City;
use polars::prelude::*;
use std::io::{BufRead, Write};

/// Show `page_rows` raw rows at a time for as long as the user answers "yes".
///
/// Returns how many rows were shown.
pub fn page_through<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    df: &DataFrame,
    city: City,
    page_rows: usize,
) -> Result<usize> {
    let question = format!(
        "Enter yes or no if you want to see {page_rows} rows of the {city} dataset?"
    );
    let mut offset = 0usize;

    while offset < df.height() {
        if !prompter.confirm(&question)? {
            break;
        }
        let page = df.slice(offset as i64, page_rows);
        prompter.say(&page)?;
        offset += page.height();
    }

    if offset > 0 && offset >= df.height() {
        prompter.say(format!("That was all {} rows of the {city} dataset.", df.height()))?;
    }

    Ok(offset)
}
