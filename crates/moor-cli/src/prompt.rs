//! Synchronous prompt helpers shared by the interactive flows. The parsing
//! of numeric table selections is pure so it can be tested without a
//! terminal.

use color_eyre::Result;
use dialoguer::{Confirm, Input, Password, Select};
use thiserror::Error;

/// Invalid interactive input; recovered at the command boundary with a
/// printed message, never propagated past one invocation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("please enter a valid number")]
    NotANumber,
    #[error("selection {index} is out of range (1-{len})")]
    OutOfRange { index: usize, len: usize },
}

/// Outcome of a numeric index pick over a listed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Index(usize),
    Quit,
}

/// Parse a 1-based selection over `len` rows; `q` (any case) or an empty
/// answer quits. Returns the 0-based index.
pub fn parse_selection(raw: &str, len: usize) -> Result<Selection, SelectionError> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("q") {
        return Ok(Selection::Quit);
    }
    let index: usize = raw.parse().map_err(|_| SelectionError::NotANumber)?;
    if index == 0 || index > len {
        return Err(SelectionError::OutOfRange { index, len });
    }
    Ok(Selection::Index(index - 1))
}

/// Prompt for a selection over `len` rows and parse it.
pub fn select_index(prompt: &str, len: usize) -> Result<Result<Selection, SelectionError>> {
    let raw: String = Input::new()
        .with_prompt(format!("{prompt} (or 'q' to quit)"))
        .default("q".to_string())
        .interact_text()?;
    Ok(parse_selection(&raw, len))
}

pub fn input(prompt: &str) -> Result<String> {
    Ok(Input::<String>::new().with_prompt(prompt).interact_text()?)
}

pub fn input_with_default(prompt: &str, default: &str) -> Result<String> {
    Ok(Input::<String>::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?)
}

/// Yes/no confirmation, defaulting to no.
pub fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

pub fn password(prompt: &str) -> Result<String> {
    Ok(Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()?)
}

/// Pick one of `items`, returning its index.
pub fn choose(prompt: &str, items: &[&str], default: usize) -> Result<usize> {
    Ok(Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(default)
        .interact()?)
}
