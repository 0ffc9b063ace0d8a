//! Parsing of menu answers.

use crate::error::{GameError, Result};

/// A recognized answer at any menu
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Choice {
    Select(u32),
    Exit,
    Help,
}

/// Parse one line typed at a menu whose numeric options are `0..bound`
pub fn parse_choice(input: &str, bound: u32) -> Result<Choice> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("x") {
        return Ok(Choice::Exit);
    }
    if input == "?" {
        return Ok(Choice::Help);
    }

    let digits = !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit());
    match input.parse::<u32>() {
        Ok(value) if digits && value < bound => Ok(Choice::Select(value)),
        _ => Err(GameError::invalid(format!(
            "Invalid input. Please enter a number between 0 and {}, X, or ?.",
            bound.saturating_sub(1)
        ))),
    }
}
