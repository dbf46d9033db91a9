//! Shared helpers for the integration tests

#![allow(dead_code)]

use knightfall::chess::{execute_move, GameState, PieceType, Position};

/// Parse an algebraic square, panicking on typos in the test itself
pub fn sq(s: &str) -> Position {
    s.parse()
        .unwrap_or_else(|e| panic!("bad square {s:?} in test: {e}"))
}

/// Play a sequence of coordinate moves (`e2e4`, `e7e8n`) from `state`
pub fn play(state: &GameState, moves: &[&str]) -> GameState {
    let mut current = state.clone();
    for mv in moves {
        let promotion = mv.get(4..5).map(|p| {
            p.parse::<PieceType>()
                .unwrap_or_else(|e| panic!("bad promotion in {mv:?}: {e}"))
        });
        current = execute_move(&current, sq(&mv[0..2]), sq(&mv[2..4]), promotion)
            .unwrap_or_else(|e| panic!("move {mv} failed: {e}"));
    }
    current
}

/// Play a sequence from the initial position
pub fn play_from_start(moves: &[&str]) -> GameState {
    play(&GameState::new(), moves)
}

pub fn from_fen(fen: &str) -> GameState {
    GameState::from_fen(fen).unwrap_or_else(|e| panic!("bad FEN {fen:?}: {e}"))
}

/// Sorted algebraic destinations for the piece on `square`
pub fn destinations(state: &GameState, square: &str) -> Vec<String> {
    let mut moves: Vec<String> =
        knightfall::chess::possible_moves(&state.board, sq(square), state)
            .unwrap()
            .into_iter()
            .map(|p| p.to_string())
            .collect();
    moves.sort();
    moves
}
