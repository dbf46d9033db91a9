//! Static evaluation: material, piece-square tables, center control,
//! development and check status. Deterministic for a given state.

use super::config::AiLevelConfig;
use crate::chess::{Board, Color, GameState, Piece, PieceType, Position};
use serde::{Deserialize, Serialize};

// Tables are laid out from white's side: row 0 is rank 8. Black reads them
// mirrored vertically.
const PAWN_TABLE: [[i32; 8]; 8] = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [50, 50, 50, 50, 50, 50, 50, 50],
    [10, 10, 20, 30, 30, 20, 10, 10],
    [5, 5, 10, 25, 25, 10, 5, 5],
    [0, 0, 0, 20, 20, 0, 0, 0],
    [5, -5, -10, 0, 0, -10, -5, 5],
    [5, 10, 10, -20, -20, 10, 10, 5],
    [0, 0, 0, 0, 0, 0, 0, 0],
];

const KNIGHT_TABLE: [[i32; 8]; 8] = [
    [-50, -40, -30, -30, -30, -30, -40, -50],
    [-40, -20, 0, 0, 0, 0, -20, -40],
    [-30, 0, 10, 15, 15, 10, 0, -30],
    [-30, 5, 15, 20, 20, 15, 5, -30],
    [-30, 0, 15, 20, 20, 15, 0, -30],
    [-30, 5, 10, 15, 15, 10, 5, -30],
    [-40, -20, 0, 5, 5, 0, -20, -40],
    [-50, -40, -30, -30, -30, -30, -40, -50],
];

const BISHOP_TABLE: [[i32; 8]; 8] = [
    [-20, -10, -10, -10, -10, -10, -10, -20],
    [-10, 0, 0, 0, 0, 0, 0, -10],
    [-10, 0, 5, 10, 10, 5, 0, -10],
    [-10, 5, 5, 10, 10, 5, 5, -10],
    [-10, 0, 10, 10, 10, 10, 0, -10],
    [-10, 10, 10, 10, 10, 10, 10, -10],
    [-10, 5, 0, 0, 0, 0, 5, -10],
    [-20, -10, -10, -10, -10, -10, -10, -20],
];

const ROOK_TABLE: [[i32; 8]; 8] = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [5, 10, 10, 10, 10, 10, 10, 5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [0, 0, 0, 5, 5, 0, 0, 0],
];

const QUEEN_TABLE: [[i32; 8]; 8] = [
    [-20, -10, -10, -5, -5, -10, -10, -20],
    [-10, 0, 0, 0, 0, 0, 0, -10],
    [-10, 0, 5, 5, 5, 5, 0, -10],
    [-5, 0, 5, 5, 5, 5, 0, -5],
    [0, 0, 5, 5, 5, 5, 0, -5],
    [-10, 5, 5, 5, 5, 5, 0, -10],
    [-10, 0, 5, 0, 0, 0, 0, -10],
    [-20, -10, -10, -5, -5, -10, -10, -20],
];

const KING_MIDDLEGAME_TABLE: [[i32; 8]; 8] = [
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-20, -30, -30, -40, -40, -30, -30, -20],
    [-10, -20, -20, -20, -20, -20, -20, -10],
    [20, 20, 0, 0, 0, 0, 20, 20],
    [20, 30, 10, 0, 0, 10, 30, 20],
];

const KING_ENDGAME_TABLE: [[i32; 8]; 8] = [
    [-50, -40, -30, -20, -20, -30, -40, -50],
    [-30, -20, -10, 0, 0, -10, -20, -30],
    [-30, -10, 20, 30, 30, 20, -10, -30],
    [-30, -10, 30, 40, 40, 30, -10, -30],
    [-30, -10, 30, 40, 40, 30, -10, -30],
    [-30, -10, 20, 30, 30, 20, -10, -30],
    [-30, -30, 0, 0, 0, 0, -30, -30],
    [-50, -30, -30, -30, -30, -30, -30, -50],
];

const CENTER_SQUARES: [Position; 4] = [
    Position::new_unchecked(3, 3),
    Position::new_unchecked(3, 4),
    Position::new_unchecked(4, 3),
    Position::new_unchecked(4, 4),
];

/// Plies counted as the opening
pub const OPENING_PLIES: u32 = 10;

const CENTER_BONUS: f64 = 10.0;
const DEVELOPMENT_SCALE: f64 = 5.0;
const CHECK_PENALTY: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    Opening,
    Middlegame,
    Endgame,
}

/// Phase used for pacing the AI: the first ten plies of the game are the opening, then
/// the game is an endgame once few officers remain.
pub fn game_phase(state: &GameState) -> GamePhase {
    if state.ply() < OPENING_PLIES {
        return GamePhase::Opening;
    }

    let mut officers = 0;
    let mut queens = 0;
    let mut minors = 0;
    for (_, piece) in state.board.pieces() {
        match piece.piece_type {
            PieceType::King | PieceType::Pawn => continue,
            PieceType::Queen => queens += 1,
            PieceType::Bishop | PieceType::Knight => minors += 1,
            PieceType::Rook => {}
        }
        officers += 1;
    }

    if officers <= 6 || (queens == 0 && minors <= 2) {
        GamePhase::Endgame
    } else {
        GamePhase::Middlegame
    }
}

/// King-table selector: at most twelve non-king pieces, or no queens at all
pub fn is_endgame(board: &Board) -> bool {
    let mut count = 0;
    let mut queens = 0;
    for (_, piece) in board.pieces() {
        if piece.piece_type == PieceType::King {
            continue;
        }
        count += 1;
        if piece.piece_type == PieceType::Queen {
            queens += 1;
        }
    }
    count <= 12 || queens == 0
}

/// Piece-square bonus for `piece` standing on `pos`
pub fn piece_square_value(piece: &Piece, pos: Position, endgame: bool) -> i32 {
    let row = usize::from(match piece.color {
        Color::White => pos.row,
        Color::Black => 7 - pos.row,
    });
    let col = pos.col as usize;

    let table = match piece.piece_type {
        PieceType::Pawn => &PAWN_TABLE,
        PieceType::Knight => &KNIGHT_TABLE,
        PieceType::Bishop => &BISHOP_TABLE,
        PieceType::Rook => &ROOK_TABLE,
        PieceType::Queen => &QUEEN_TABLE,
        PieceType::King if endgame => &KING_ENDGAME_TABLE,
        PieceType::King => &KING_MIDDLEGAME_TABLE,
    };
    table[row][col]
}

/// Development score for one side: undeveloped minors and an early queen
/// cost points, a castled king earns them.
pub fn development_score(board: &Board, color: Color) -> i32 {
    let back_rank = color.back_rank();
    let mut score = 0;

    for col in [1, 2, 5, 6] {
        let home = Position::new_unchecked(back_rank, col);
        if let Some(piece) = board.get(home) {
            if piece.color == color && !piece.has_moved {
                score -= 10;
            }
        }
    }

    let castled = board.pieces_of(color).any(|(pos, piece)| {
        piece.piece_type == PieceType::King
            && piece.has_moved
            && pos.row == back_rank
            && (pos.col == 2 || pos.col == 6)
    });
    if castled {
        score += 30;
    }

    let queen_home = board
        .get(Position::new_unchecked(back_rank, 3))
        .is_some_and(|p| p.color == color && p.piece_type == PieceType::Queen);
    if !queen_home {
        score -= 15;
    }

    score
}

/// Score `state` from `ai_color`'s point of view. Every term is symmetric:
/// what helps `ai_color` adds, what helps the opponent subtracts.
pub fn evaluate_board(state: &GameState, ai_color: Color, config: &AiLevelConfig) -> f64 {
    let board = &state.board;
    let endgame = is_endgame(board);
    let side = |color: Color| if color == ai_color { 1.0 } else { -1.0 };

    let mut score = 0.0;
    for (pos, piece) in board.pieces() {
        let positional = piece_square_value(&piece, pos, endgame) as f64 * config.strategic_weight;
        score += side(piece.color) * (piece.piece_type.value() as f64 + positional);
    }

    for square in CENTER_SQUARES {
        if let Some(piece) = board.get(square) {
            score += side(piece.color) * CENTER_BONUS * config.center_control_weight;
        }
    }

    if state.ply() < OPENING_PLIES {
        let weight = config.development_weight * DEVELOPMENT_SCALE;
        score += development_score(board, ai_color) as f64 * weight;
        score -= development_score(board, ai_color.opposite()) as f64 * weight;
    }

    if state.is_check {
        score -= side(state.current_player) * CHECK_PENALTY * config.king_safety_weight;
    }

    score
}
