use super::error::EngineError;
use super::piece::{Color, Piece, PieceType};
use super::position::Position;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Piece a pawn becomes when a move reaches the last rank without naming one.
pub const DEFAULT_PROMOTION: PieceType = PieceType::Queen;

/// A completed move as stored in the game history. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    /// The piece as it stood before moving
    pub piece: Piece,
    pub captured_piece: Option<Piece>,
    pub is_en_passant: bool,
    pub is_castling: bool,
    pub is_promotion: bool,
    pub promotion_piece: Option<PieceType>,
    /// Standard algebraic notation, including check/mate suffix
    pub san: String,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.san)
    }
}

/// A move as asked for by a player or the AI, before it is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRequest {
    pub from: Position,
    pub to: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion_piece: Option<PieceType>,
}

impl MoveRequest {
    /// Create a new move request with validation
    pub fn new(
        from: Position,
        to: Position,
        promotion_piece: Option<PieceType>,
    ) -> Result<Self, EngineError> {
        if from == to {
            return Err(EngineError::InvalidMove(
                "Source and destination positions cannot be the same".to_string(),
            ));
        }

        if let Some(piece_type) = promotion_piece {
            if !piece_type.is_promotion_target() {
                return Err(EngineError::InvalidMove(
                    "Cannot promote to King or Pawn".to_string(),
                ));
            }
        }

        Ok(Self {
            from,
            to,
            promotion_piece,
        })
    }

    pub const fn new_unchecked(
        from: Position,
        to: Position,
        promotion_piece: Option<PieceType>,
    ) -> Self {
        Self {
            from,
            to,
            promotion_piece,
        }
    }

    /// Parse move text with color context so castling lands on the right rank.
    ///
    /// Accepts `e2e4`, `e7e8q` and `O-O` / `O-O-O` (or the `0-0` spellings).
    pub fn parse_for(s: &str, color: Color) -> Result<Self, EngineError> {
        let s = s.trim();
        let rank = color.back_rank();

        match s.to_uppercase().as_str() {
            "O-O" | "0-0" => {
                return Ok(Self::new_unchecked(
                    Position::new_unchecked(rank, 4),
                    Position::new_unchecked(rank, 6),
                    None,
                ));
            }
            "O-O-O" | "0-0-0" => {
                return Ok(Self::new_unchecked(
                    Position::new_unchecked(rank, 4),
                    Position::new_unchecked(rank, 2),
                    None,
                ));
            }
            _ => {}
        }

        if !s.is_ascii() || !(s.len() == 4 || s.len() == 5) {
            return Err(EngineError::InvalidMove(format!(
                "Invalid move format '{s}'. Expected 'e2e4', 'e7e8q' for promotion, or 'O-O'/'O-O-O' for castling."
            )));
        }

        let from = s[0..2].parse::<Position>()?;
        let to = s[2..4].parse::<Position>()?;
        let promotion = match s.get(4..5) {
            Some(letter) => Some(letter.parse::<PieceType>()?),
            None => None,
        };

        Self::new(from, to, promotion)
    }
}

impl fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion_piece {
            write!(f, "{}", promotion.to_string().to_lowercase())?;
        }
        Ok(())
    }
}

impl FromStr for MoveRequest {
    type Err = EngineError;

    /// Castling text is read from white's side; use [`MoveRequest::parse_for`]
    /// when the mover is known.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_for(s, Color::White)
    }
}
