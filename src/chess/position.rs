use super::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A square on the board. Row 0 is rank 8 (black's back rank), column 0 is
/// the a-file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub fn new(row: u8, col: u8) -> Result<Self, EngineError> {
        if row > 7 {
            return Err(EngineError::InvalidPosition(format!(
                "Row must be 0-7, got {}",
                row
            )));
        }
        if col > 7 {
            return Err(EngineError::InvalidPosition(format!(
                "Column must be 0-7, got {}",
                col
            )));
        }

        Ok(Self { row, col })
    }

    /// Create position without validation (for internal use when bounds are guaranteed)
    pub const fn new_unchecked(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    pub fn in_bounds(&self) -> bool {
        self.row < 8 && self.col < 8
    }

    /// Step by a signed delta, returning `None` when it leaves the board
    pub fn offset(&self, d_row: i8, d_col: i8) -> Option<Position> {
        let row = self.row as i8 + d_row;
        let col = self.col as i8 + d_col;
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Position::new_unchecked(row as u8, col as u8))
        } else {
            None
        }
    }

    /// Create position from file and rank characters
    pub fn from_chars(file: char, rank: char) -> Result<Self, EngineError> {
        let file_lower = file.to_ascii_lowercase();
        if !('a'..='h').contains(&file_lower) {
            return Err(EngineError::InvalidPosition(format!(
                "Invalid file '{}'. Must be a-h.",
                file
            )));
        }

        if !('1'..='8').contains(&rank) {
            return Err(EngineError::InvalidPosition(format!(
                "Invalid rank '{}'. Must be 1-8.",
                rank
            )));
        }

        Ok(Position {
            row: b'8' - rank as u8,
            col: file_lower as u8 - b'a',
        })
    }

    pub fn file_char(&self) -> char {
        (self.col + b'a') as char
    }

    pub fn rank_char(&self) -> char {
        (b'8' - self.row) as char
    }

    /// Get all positions on the board, row-major from a8
    pub fn all_positions() -> impl Iterator<Item = Position> {
        (0..8).flat_map(|row| (0..8).map(move |col| Position { row, col }))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl FromStr for Position {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => Self::from_chars(file, rank),
            _ => Err(EngineError::InvalidPosition(format!(
                "Position must be exactly 2 characters (e.g., 'e4'), got '{}'",
                s
            ))),
        }
    }
}
