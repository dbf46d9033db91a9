//! Standard algebraic notation and PGN export.

use super::error::EngineResult;
use super::movegen::possible_moves;
use super::piece::{Color, PieceType};
use super::position::Position;
use super::state::{GameEndReason, GameState};
use super::transition::BoardOutcome;

/// SAN for a move, given the state before it and the state after it
pub(crate) fn san_for(
    before: &GameState,
    from: Position,
    to: Position,
    outcome: &BoardOutcome,
    after: &GameState,
) -> EngineResult<String> {
    let mut san = String::new();

    if outcome.is_castling {
        san.push_str(if to.col > from.col { "O-O" } else { "O-O-O" });
    } else {
        let piece = outcome.piece;
        if piece.piece_type == PieceType::Pawn {
            if outcome.captured.is_some() {
                san.push(from.file_char());
            }
        } else {
            san.push_str(piece.piece_type.san_letter());
            san.push_str(&disambiguation(before, from, to)?);
        }

        if outcome.captured.is_some() {
            san.push('x');
        }
        san.push_str(&to.to_string());

        if let Some(promoted) = outcome.promotion {
            san.push('=');
            san.push_str(promoted.san_letter());
        }
    }

    if after.is_checkmate {
        san.push('#');
    } else if after.is_check {
        san.push('+');
    }
    Ok(san)
}

/// File, rank, or both, when another piece of the same kind could also reach `to`
fn disambiguation(before: &GameState, from: Position, to: Position) -> EngineResult<String> {
    let Some(piece) = before.board.get(from) else {
        return Ok(String::new());
    };

    let mut rivals = Vec::new();
    for (square, other) in before.board.pieces_of(piece.color) {
        if square == from || !other.same_kind(&piece) {
            continue;
        }
        if possible_moves(&before.board, square, before)?.contains(&to) {
            rivals.push(square);
        }
    }

    if rivals.is_empty() {
        return Ok(String::new());
    }
    if rivals.iter().all(|r| r.col != from.col) {
        return Ok(from.file_char().to_string());
    }
    if rivals.iter().all(|r| r.row != from.row) {
        return Ok(from.rank_char().to_string());
    }
    Ok(from.to_string())
}

/// PGN result token for a state
pub fn result_token(state: &GameState) -> &'static str {
    match state.end_reason() {
        None => "*",
        Some(reason) if reason.is_draw() => "1/2-1/2",
        Some(_) => match state.winner() {
            Some(Color::White) => "1-0",
            Some(Color::Black) => "0-1",
            None => "*",
        },
    }
}

/// Seven Tag Roster values. Missing values fall back to PGN's unknown markers.
#[derive(Debug, Clone)]
pub struct PgnHeaders {
    pub event: String,
    pub site: String,
    /// `YYYY.MM.DD`
    pub date: Option<String>,
    pub round: String,
    pub white: String,
    pub black: String,
}

impl Default for PgnHeaders {
    fn default() -> Self {
        Self {
            event: "Casual game".to_string(),
            site: "knightfall".to_string(),
            date: None,
            round: "?".to_string(),
            white: "White".to_string(),
            black: "Black".to_string(),
        }
    }
}

/// Render the game as PGN: headers, a blank line, then the movetext with a
/// line break every eight full moves, ending with the result token.
pub fn to_pgn(state: &GameState, headers: &PgnHeaders) -> String {
    let result = result_token(state);
    let date = headers.date.as_deref().unwrap_or("????.??.??");

    let mut pgn = String::new();
    for (tag, value) in [
        ("Event", headers.event.as_str()),
        ("Site", headers.site.as_str()),
        ("Date", date),
        ("Round", headers.round.as_str()),
        ("White", headers.white.as_str()),
        ("Black", headers.black.as_str()),
        ("Result", result),
    ] {
        pgn.push_str(&format!("[{tag} \"{value}\"]\n"));
    }
    if let Some(reason) = state.end_reason() {
        if matches!(reason, GameEndReason::Timeout(_)) {
            pgn.push_str("[Termination \"time forfeit\"]\n");
        }
    }
    pgn.push('\n');

    let mut movetext = String::new();
    let mut ply = state.initial_ply;
    for (i, mv) in state.move_history.iter().enumerate() {
        let number = ply / 2 + 1;
        if ply % 2 == 0 {
            movetext.push_str(&format!("{number}. "));
        } else if i == 0 {
            movetext.push_str(&format!("{number}... "));
        }
        movetext.push_str(&mv.san);
        movetext.push(' ');
        ply += 1;
        if ply % 16 == 0 {
            movetext.push('\n');
        }
    }
    movetext.push_str(result);

    pgn.push_str(&movetext);
    pgn.push('\n');
    pgn
}
