//! Parsing of command-line dice definitions.
//!
//! Each argument is one die written as comma-separated face values, for
//! example `"2,2,4,4,9,9"`. All problems across all arguments are collected
//! and reported together.

use crate::dice::{validate_dice_set, Die, MIN_DICE};
use crate::error::{GameError, Result};

/// Face count used when none is configured
pub const DEFAULT_FACE_COUNT: usize = 6;

const USAGE_EXAMPLE: &str = "Example: \"2,2,4,4,9,9\" \"6,8,1,1,8,6\" \"7,5,3,7,5,3\"";

/// Parser for dice given as command-line arguments
#[derive(Clone, Copy, Debug)]
pub struct DiceParser {
    required_face_count: usize,
}

impl Default for DiceParser {
    fn default() -> Self {
        Self {
            required_face_count: DEFAULT_FACE_COUNT,
        }
    }
}

impl DiceParser {
    /// Create a parser that requires every die to have `required_face_count` faces
    pub fn new(required_face_count: usize) -> Result<Self> {
        if required_face_count == 0 {
            return Err(GameError::invalid(
                "Required face count must be a positive integer.",
            ));
        }
        Ok(Self {
            required_face_count,
        })
    }

    pub fn required_face_count(&self) -> usize {
        self.required_face_count
    }

    /// Parse every argument into a die
    pub fn parse<S: AsRef<str>>(&self, args: &[S]) -> Result<Vec<Die>> {
        if args.len() < MIN_DICE {
            return Err(GameError::invalid(format!(
                "At least {} dice are required. {}. Use quotes around each dice argument to avoid parsing issues.",
                MIN_DICE, USAGE_EXAMPLE
            )));
        }

        let mut dice = Vec::with_capacity(args.len());
        let mut errors = Vec::new();

        for arg in args {
            match self.parse_one(arg.as_ref()) {
                Ok(die) => dice.push(die),
                Err(message) => errors.push(message),
            }
        }

        if !errors.is_empty() {
            return Err(GameError::invalid(format!(
                "Validation failed:\n{}\nAll dice faces must be positive integers greater than zero. {}.",
                errors.join("\n"),
                USAGE_EXAMPLE
            )));
        }

        validate_dice_set(&dice)?;
        Ok(dice)
    }

    fn parse_one(&self, arg: &str) -> std::result::Result<Die, String> {
        if arg.trim().is_empty() {
            return Err(format!("Empty or whitespace input for dice: \"{}\".", arg));
        }

        let parts: Vec<&str> = arg
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();

        if parts.len() != self.required_face_count {
            return Err(format!(
                "Invalid face count ({}) for input: \"{}\". Each dice must have {} numbers.",
                parts.len(),
                arg,
                self.required_face_count
            ));
        }

        let mut faces = Vec::with_capacity(parts.len());
        let mut invalid = Vec::new();
        for part in parts {
            match part.parse::<i64>() {
                Err(_) => invalid.push(format!("\"{}\" (not an integer)", part)),
                Ok(value) if value <= 0 => invalid.push(format!("\"{}\" (non-positive)", part)),
                Ok(value) => match u32::try_from(value) {
                    Ok(face) => faces.push(face),
                    Err(_) => invalid.push(format!("\"{}\" (too large)", part)),
                },
            }
        }

        if !invalid.is_empty() {
            return Err(format!(
                "Invalid values: {} in input: \"{}\".",
                invalid.join(", "),
                arg
            ));
        }

        Die::new(faces).map_err(|e| e.to_string())
    }
}
