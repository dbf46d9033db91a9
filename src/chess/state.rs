use super::board::Board;
use super::moves::Move;
use super::piece::Color;
use super::position::Position;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::info;

/// Why a game finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameEndReason {
    Checkmate,
    Stalemate,
    FiftyMoveRule,
    ThreefoldRepetition,
    /// The named color resigned
    Resignation(Color),
    DrawAgreement,
    /// The named color ran out of time
    Timeout(Color),
}

impl GameEndReason {
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            GameEndReason::Stalemate
                | GameEndReason::FiftyMoveRule
                | GameEndReason::ThreefoldRepetition
                | GameEndReason::DrawAgreement
        )
    }
}

impl fmt::Display for GameEndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEndReason::Checkmate => write!(f, "checkmate"),
            GameEndReason::Stalemate => write!(f, "stalemate"),
            GameEndReason::FiftyMoveRule => write!(f, "fifty-move rule"),
            GameEndReason::ThreefoldRepetition => write!(f, "threefold repetition"),
            GameEndReason::Resignation(color) => write!(f, "{} resigned", color),
            GameEndReason::DrawAgreement => write!(f, "draw by agreement"),
            GameEndReason::Timeout(color) => write!(f, "{} ran out of time", color),
        }
    }
}

/// Coarse game status, derived from the flags on [`GameState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Playing,
    Check,
    Checkmate,
    Stalemate,
    Draw,
    Resigned,
    TimedOut,
}

/// Moved flags for kings and corner rooks.
///
/// These duplicate `Piece::has_moved` on purpose: a rook captured on its
/// corner loses its castling right even though no piece "moved" there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CastlingFlags {
    pub white_king_moved: bool,
    pub black_king_moved: bool,
    pub white_rook_a_moved: bool,
    pub white_rook_h_moved: bool,
    pub black_rook_a_moved: bool,
    pub black_rook_h_moved: bool,
}

impl CastlingFlags {
    pub fn king_moved(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_king_moved,
            Color::Black => self.black_king_moved,
        }
    }

    /// Rook flag for the a-file (`kingside == false`) or h-file rook
    pub fn rook_moved(&self, color: Color, kingside: bool) -> bool {
        match (color, kingside) {
            (Color::White, false) => self.white_rook_a_moved,
            (Color::White, true) => self.white_rook_h_moved,
            (Color::Black, false) => self.black_rook_a_moved,
            (Color::Black, true) => self.black_rook_h_moved,
        }
    }

    pub fn can_castle(&self, color: Color, kingside: bool) -> bool {
        !self.king_moved(color) && !self.rook_moved(color, kingside)
    }

    pub fn mark_king_moved(&mut self, color: Color) {
        match color {
            Color::White => self.white_king_moved = true,
            Color::Black => self.black_king_moved = true,
        }
    }

    /// Mark the rook that starts on `square` as gone; other squares are ignored
    pub fn mark_rook_square(&mut self, square: Position) {
        match (square.row, square.col) {
            (7, 0) => self.white_rook_a_moved = true,
            (7, 7) => self.white_rook_h_moved = true,
            (0, 0) => self.black_rook_a_moved = true,
            (0, 7) => self.black_rook_h_moved = true,
            _ => {}
        }
    }

    /// Castling field of a FEN string (`KQkq`, `-`, ...)
    pub fn to_fen(&self) -> String {
        let mut result = String::new();
        if self.can_castle(Color::White, true) {
            result.push('K');
        }
        if self.can_castle(Color::White, false) {
            result.push('Q');
        }
        if self.can_castle(Color::Black, true) {
            result.push('k');
        }
        if self.can_castle(Color::Black, false) {
            result.push('q');
        }
        if result.is_empty() {
            "-".to_string()
        } else {
            result
        }
    }
}

/// Complete state of one game. Every accepted move produces a new value;
/// a `GameState` is never edited in place once handed out.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub board: Board,
    pub current_player: Color,
    /// UI selection; not consulted by the rules
    pub selected_square: Option<Position>,
    /// Cached legal destinations for `selected_square`
    pub valid_moves: Vec<Position>,
    pub move_history: Vec<Move>,
    pub is_check: bool,
    pub is_checkmate: bool,
    pub is_stalemate: bool,
    pub is_draw: bool,
    pub game_end_reason: Option<GameEndReason>,
    /// Square skipped by the last pawn double step; lives for one ply
    pub en_passant_target: Option<Position>,
    pub castling: CastlingFlags,
    /// Plies since the last capture or pawn move
    pub half_move_clock: u32,
    /// Occurrence count per position fingerprint
    pub position_history: HashMap<String, u32>,
    /// Plies played before `move_history[0]` (non-zero only for FEN setups)
    pub initial_ply: u32,
}

impl GameState {
    /// Standard starting position, white to move, no history
    pub fn new() -> Self {
        let mut state = Self {
            board: Board::new(),
            current_player: Color::White,
            selected_square: None,
            valid_moves: Vec::new(),
            move_history: Vec::new(),
            is_check: false,
            is_checkmate: false,
            is_stalemate: false,
            is_draw: false,
            game_end_reason: None,
            en_passant_target: None,
            castling: CastlingFlags::default(),
            half_move_clock: 0,
            position_history: HashMap::new(),
            initial_ply: 0,
        };
        state.record_position();
        state
    }

    /// Canonical key for repetition detection: placement, side to move,
    /// castling rights and en passant square. Move counters are excluded.
    pub fn fingerprint(&self) -> String {
        let side = match self.current_player {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let en_passant = self
            .en_passant_target
            .map(|pos| pos.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{} {} {} {}",
            self.board.placement_fen(),
            side,
            self.castling.to_fen(),
            en_passant
        )
    }

    pub(crate) fn record_position(&mut self) -> u32 {
        let count = self.position_history.entry(self.fingerprint()).or_insert(0);
        *count += 1;
        *count
    }

    /// How many times the current position has occurred
    pub fn repetition_count(&self) -> u32 {
        self.position_history
            .get(&self.fingerprint())
            .copied()
            .unwrap_or(0)
    }

    /// Total plies played, counting any FEN prefix
    pub fn ply(&self) -> u32 {
        let played = u32::try_from(self.move_history.len()).unwrap_or(u32::MAX);
        self.initial_ply.saturating_add(played)
    }

    /// Full-move number as written in FEN and PGN
    pub fn fullmove_number(&self) -> u32 {
        self.ply() / 2 + 1
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.move_history.last()
    }

    pub fn is_game_over(&self) -> bool {
        self.is_checkmate || self.is_stalemate || self.is_draw || self.game_end_reason.is_some()
    }

    /// End reason, inferred from the flags when only those were set
    pub fn end_reason(&self) -> Option<GameEndReason> {
        if let Some(reason) = self.game_end_reason {
            return Some(reason);
        }
        if self.is_checkmate {
            Some(GameEndReason::Checkmate)
        } else if self.is_stalemate {
            Some(GameEndReason::Stalemate)
        } else if self.is_draw {
            Some(GameEndReason::DrawAgreement)
        } else {
            None
        }
    }

    pub fn status(&self) -> GameStatus {
        match self.end_reason() {
            Some(GameEndReason::Checkmate) => GameStatus::Checkmate,
            Some(GameEndReason::Stalemate) => GameStatus::Stalemate,
            Some(GameEndReason::Resignation(_)) => GameStatus::Resigned,
            Some(GameEndReason::Timeout(_)) => GameStatus::TimedOut,
            Some(_) => GameStatus::Draw,
            None if self.is_check => GameStatus::Check,
            None => GameStatus::Playing,
        }
    }

    /// Winning color, if the game ended decisively
    pub fn winner(&self) -> Option<Color> {
        match self.end_reason()? {
            GameEndReason::Checkmate => Some(self.current_player.opposite()),
            GameEndReason::Resignation(loser) | GameEndReason::Timeout(loser) => {
                Some(loser.opposite())
            }
            _ => None,
        }
    }

    /// `color` resigns. An override, not a move: history is untouched.
    pub fn resign(&self, color: Color) -> GameState {
        info!("{} resigns", color);
        self.concluded(GameEndReason::Resignation(color))
    }

    /// Both sides agree to a draw
    pub fn agree_draw(&self) -> GameState {
        info!("Draw agreed");
        let mut next = self.concluded(GameEndReason::DrawAgreement);
        next.is_draw = true;
        next
    }

    /// `color`'s clock ran out
    pub fn flag_timeout(&self, color: Color) -> GameState {
        info!("{} lost on time", color);
        self.concluded(GameEndReason::Timeout(color))
    }

    fn concluded(&self, reason: GameEndReason) -> GameState {
        let mut next = self.clone();
        next.game_end_reason = Some(reason);
        next.selected_square = None;
        next.valid_moves.clear();
        next
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Fresh game at the standard starting position
pub fn create_initial_game_state() -> GameState {
    GameState::new()
}
