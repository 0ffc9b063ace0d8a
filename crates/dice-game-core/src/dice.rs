//! The die entity and the invariants a set of dice must satisfy.

use crate::error::{GameError, Result};
use serde::Serialize;
use std::fmt;

/// Fewest dice a session can be played with
pub const MIN_DICE: usize = 3;

/// An ordered, immutable sequence of positive face values
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Die {
    faces: Vec<u32>,
}

impl Die {
    /// Create a die from its face values
    pub fn new(faces: Vec<u32>) -> Result<Self> {
        if faces.is_empty() {
            return Err(GameError::invalid("A die must have at least one face."));
        }
        if faces.contains(&0) {
            return Err(GameError::invalid(format!(
                "Face values must be positive integers: [{}]",
                join_faces(&faces)
            )));
        }
        Ok(Self { faces })
    }

    /// Value on the face at `index`
    pub fn face(&self, index: usize) -> Result<u32> {
        self.faces.get(index).copied().ok_or_else(|| {
            GameError::invalid(format!(
                "Face index {} is out of range: expected 0 to {}",
                index,
                self.faces.len() - 1
            ))
        })
    }

    pub fn faces(&self) -> &[u32] {
        &self.faces
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", join_faces(&self.faces))
    }
}

fn join_faces(faces: &[u32]) -> String {
    faces
        .iter()
        .map(|face| face.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Check that a set of dice can be played: at least [`MIN_DICE`] dice, all
/// with the same face count. Returns the shared face count.
pub fn validate_dice_set(dice: &[Die]) -> Result<usize> {
    if dice.len() < MIN_DICE {
        return Err(GameError::invalid(format!(
            "At least {} dice are required, got {}. Example: \"2,2,4,4,9,9\" \"6,8,1,1,8,6\" \"7,5,3,7,5,3\"",
            MIN_DICE,
            dice.len()
        )));
    }

    let face_count = dice[0].face_count();
    if let Some((index, die)) = dice
        .iter()
        .enumerate()
        .find(|(_, die)| die.face_count() != face_count)
    {
        return Err(GameError::invalid(format!(
            "Dice #{} has {} faces but dice #0 has {}. All dice must have the same face count.",
            index,
            die.face_count(),
            face_count
        )));
    }

    Ok(face_count)
}
