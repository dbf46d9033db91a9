use crate::ai::AiLevel;
use crate::chess::{Color, GameState, GameStatus, Piece, Position};
use std::fmt::Write;

/// How the board is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardStyle {
    pub unicode: bool,
    /// Side shown at the bottom
    pub perspective: Color,
}

fn piece_symbol(piece: &Piece, unicode: bool) -> String {
    if unicode {
        piece.to_string()
    } else {
        piece.fen_char().to_string()
    }
}

/// Render the board. The selected square is bracketed and its legal
/// destinations are marked with a dot (or `*` when a capture is possible).
pub fn render_board(state: &GameState, style: BoardStyle) -> String {
    let mut out = String::new();

    let rows: Vec<u8> = match style.perspective {
        Color::White => (0..8).collect(),
        Color::Black => (0..8).rev().collect(),
    };
    let cols: Vec<u8> = match style.perspective {
        Color::White => (0..8).collect(),
        Color::Black => (0..8).rev().collect(),
    };
    let files: String = cols
        .iter()
        .map(|&col| format!(" {} ", Position::new_unchecked(0, col).file_char()))
        .collect();

    let _ = writeln!(out, "   {}", files);
    let _ = writeln!(out, "  ┌{}┐", "─".repeat(24));
    for &row in &rows {
        let rank = Position::new_unchecked(row, 0).rank_char();
        let _ = write!(out, "{} │", rank);
        for &col in &cols {
            let pos = Position::new_unchecked(row, col);
            let symbol = state
                .board
                .get(pos)
                .map(|piece| piece_symbol(&piece, style.unicode));
            let target = state.valid_moves.contains(&pos);
            let cell = match (state.selected_square == Some(pos), symbol, target) {
                (true, Some(s), _) => format!("[{}]", s),
                (_, Some(s), true) => format!("*{} ", s),
                (_, Some(s), false) => format!(" {} ", s),
                (_, None, true) => " · ".to_string(),
                (_, None, false) => "   ".to_string(),
            };
            out.push_str(&cell);
        }
        let _ = writeln!(out, "│ {}", rank);
    }
    let _ = writeln!(out, "  └{}┘", "─".repeat(24));
    let _ = writeln!(out, "   {}", files);
    out
}

/// One-line status for the side to move
pub fn render_status(state: &GameState) -> String {
    if let Some(reason) = state.end_reason() {
        return match state.winner() {
            Some(winner) => format!("Game over: {} ({} wins)", reason, winner),
            None => format!("Game over: {}", reason),
        };
    }

    let mut line = format!(
        "Move {}: {} to move",
        state.fullmove_number(),
        state.current_player
    );
    if state.status() == GameStatus::Check {
        line.push_str(" (check)");
    }
    if state.half_move_clock > 0 {
        let _ = write!(line, " | halfmove clock {}", state.half_move_clock);
    }
    line
}

/// Move history as a numbered White/Black table
pub fn render_move_history(state: &GameState) -> String {
    if state.move_history.is_empty() {
        return "No moves yet.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "┌──────┬─────────┬─────────┐");
    let _ = writeln!(out, "│ Move │  White  │  Black  │");
    let _ = writeln!(out, "├──────┼─────────┼─────────┤");

    // A game imported from FEN with Black to move starts with an empty white cell
    let mut sans: Vec<&str> = Vec::new();
    if state.initial_ply % 2 == 1 {
        sans.push("...");
    }
    sans.extend(state.move_history.iter().map(|m| m.san.as_str()));

    let first = state.initial_ply / 2 + 1;
    for (i, pair) in sans.chunks(2).enumerate() {
        let white = pair.first().copied().unwrap_or("-");
        let black = pair.get(1).copied().unwrap_or("-");
        let _ = writeln!(
            out,
            "│ {:>4} │ {:^7} │ {:^7} │",
            first as usize + i,
            white,
            black
        );
    }
    let _ = writeln!(out, "└──────┴─────────┴─────────┘");
    out
}

/// Table of AI levels
pub fn render_levels() -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<6} {:<14} {:>8} {:>8}  {}",
        "ELO", "NAME", "BLUNDER", "THINK", "DESCRIPTION"
    );
    let _ = writeln!(out, "{}", "-".repeat(72));
    for level in AiLevel::ALL {
        let config = level.config();
        let _ = writeln!(
            out,
            "{:<6} {:<14} {:>7.0}% {:>6}ms  {}",
            config.elo,
            config.name,
            config.blunder_probability * 100.0,
            config.base_think_ms,
            config.description
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::{execute_move, possible_moves};

    fn sq(s: &str) -> Position {
        s.parse().unwrap()
    }

    #[test]
    fn test_render_board_white_perspective() {
        let state = GameState::new();
        let text = render_board(
            &state,
            BoardStyle {
                unicode: false,
                perspective: Color::White,
            },
        );
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].contains("a  b  c"));
        assert!(lines[2].starts_with("8 │ r  n  b  q  k  b  n  r"));
        assert!(lines[9].starts_with("1 │ R  N  B  Q  K  B  N  R"));
    }

    #[test]
    fn test_render_board_black_perspective() {
        let state = GameState::new();
        let text = render_board(
            &state,
            BoardStyle {
                unicode: false,
                perspective: Color::Black,
            },
        );
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].contains("h  g  f"));
        assert!(lines[2].starts_with("1 │ R  N  B  K  Q  B  N  R"));
    }

    #[test]
    fn test_render_board_marks_selection() {
        let mut state = GameState::new();
        state.selected_square = Some(sq("e2"));
        state.valid_moves = possible_moves(&state.board, sq("e2"), &state).unwrap();
        let text = render_board(
            &state,
            BoardStyle {
                unicode: false,
                perspective: Color::White,
            },
        );
        assert!(text.contains("[P]"));
        assert_eq!(text.matches(" · ").count(), 2);
    }

    #[test]
    fn test_status_and_history() {
        let state = GameState::new();
        assert_eq!(render_status(&state), "Move 1: White to move");
        assert_eq!(render_move_history(&state), "No moves yet.\n");

        let state = execute_move(&state, sq("e2"), sq("e4"), None).unwrap();
        let state = execute_move(&state, sq("e7"), sq("e5"), None).unwrap();
        let history = render_move_history(&state);
        assert!(history.contains("│    1 │   e4    │   e5    │"));
    }

    #[test]
    fn test_levels_table_lists_every_level() {
        let table = render_levels();
        for level in AiLevel::ALL {
            assert!(table.contains(level.config().name));
        }
    }
}
