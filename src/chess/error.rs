use super::state::GameEndReason;
use thiserror::Error;

/// Errors surfaced by the rules engine.
///
/// `InvalidMove` and `GameOver` are caller-contract violations: the caller
/// asked for something the current position does not allow. `CorruptState`
/// means a board invariant was broken elsewhere and should never be absorbed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid piece type: {0}")]
    InvalidPieceType(String),

    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    #[error("Invalid move: {0}")]
    InvalidMove(String),

    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    #[error("Corrupt state: {0}")]
    CorruptState(String),

    #[error("Game is already over: {0}")]
    GameOver(GameEndReason),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
