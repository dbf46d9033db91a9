mod common;

use common::{destinations, from_fen, play, play_from_start, sq};
use knightfall::chess::{
    all_legal_moves, find_king_position, is_in_check, is_square_attacked, possible_moves, Color,
    GameState, PieceType,
};

#[test]
fn test_initial_position_has_twenty_moves() {
    let state = GameState::new();
    assert_eq!(all_legal_moves(&state, Color::White).unwrap().len(), 20);
    assert_eq!(all_legal_moves(&state, Color::Black).unwrap().len(), 20);
    assert_eq!(destinations(&state, "e2"), vec!["e3", "e4"]);
    assert_eq!(destinations(&state, "g1"), vec!["f3", "h3"]);
    assert!(destinations(&state, "a1").is_empty());
}

#[test]
fn test_empty_square_has_no_moves() {
    let state = GameState::new();
    assert!(destinations(&state, "e4").is_empty());
}

#[test]
fn test_pinned_piece_cannot_move() {
    let state = from_fen("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1");
    assert!(destinations(&state, "e2").is_empty());
}

#[test]
fn test_pinned_rook_may_slide_along_pin() {
    let state = from_fen("4k3/4r3/8/8/8/8/4R3/4K3 w - - 0 1");
    assert_eq!(
        destinations(&state, "e2"),
        vec!["e3", "e4", "e5", "e6", "e7"]
    );
}

#[test]
fn test_king_cannot_walk_into_check() {
    let state = from_fen("4k3/8/8/8/8/8/3r4/4K3 w - - 0 1");
    assert_eq!(destinations(&state, "e1"), vec!["d2", "f1"]);
}

#[test]
fn test_must_answer_check() {
    // Rook gives check on the e-file; only blocking or stepping aside is legal
    let state = from_fen("4k3/4r3/8/8/8/8/3B4/4K3 w - - 0 1");
    assert!(state.is_check);
    assert_eq!(destinations(&state, "d2"), vec!["e3"]);
    assert_eq!(destinations(&state, "e1"), vec!["d1", "f1", "f2"]);
}

#[test]
fn test_attack_detection() {
    let state = GameState::new();
    assert!(is_square_attacked(&state.board, sq("f3"), Color::White));
    assert!(!is_square_attacked(&state.board, sq("e4"), Color::White));
    assert!(is_square_attacked(&state.board, sq("f6"), Color::Black));
    assert!(!is_in_check(&state.board, Color::White).unwrap());
    assert_eq!(find_king_position(&state.board, Color::Black).unwrap(), sq("e8"));
}

mod castling {
    use super::*;

    const OPEN: &str = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";

    #[test]
    fn test_both_sides_available() {
        let state = from_fen(OPEN);
        assert_eq!(
            destinations(&state, "e1"),
            vec!["c1", "d1", "d2", "e2", "f1", "f2", "g1"]
        );
    }

    #[test]
    fn test_requires_right() {
        let state = from_fen("r3k2r/8/8/8/8/8/8/R3K2R w Qkq - 0 1");
        let moves = destinations(&state, "e1");
        assert!(!moves.contains(&"g1".to_string()));
        assert!(moves.contains(&"c1".to_string()));
    }

    #[test]
    fn test_blocked_path() {
        let state = from_fen("r3k2r/8/8/8/8/8/8/R3KB1R w KQkq - 0 1");
        let moves = destinations(&state, "e1");
        assert!(!moves.contains(&"g1".to_string()));

        let state = from_fen("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1");
        let moves = destinations(&state, "e1");
        assert!(!moves.contains(&"c1".to_string()));
    }

    #[test]
    fn test_not_out_of_check() {
        let state = from_fen("4k3/8/8/4r3/8/8/8/R3K2R w KQ - 0 1");
        assert!(state.is_check);
        let moves = destinations(&state, "e1");
        assert!(!moves.contains(&"g1".to_string()));
        assert!(!moves.contains(&"c1".to_string()));
    }

    #[test]
    fn test_not_through_attacked_square() {
        let state = from_fen("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        let moves = destinations(&state, "e1");
        assert!(!moves.contains(&"g1".to_string()));
        assert!(moves.contains(&"c1".to_string()));
    }

    #[test]
    fn test_not_into_check() {
        let state = from_fen("4k1r1/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        let moves = destinations(&state, "e1");
        assert!(!moves.contains(&"g1".to_string()));
    }

    #[test]
    fn test_attacked_b_file_does_not_block_queenside() {
        // b1 is crossed by the rook, not the king
        let state = from_fen("1r2k3/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(destinations(&state, "e1").contains(&"c1".to_string()));
    }

    #[test]
    fn test_rook_that_moved_and_returned() {
        let state = from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1");
        assert!(destinations(&state, "e1").contains(&"g1".to_string()));

        let state = play(&state, &["h1h2", "e8d8", "h2h1", "d8e8"]);
        assert!(!destinations(&state, "e1").contains(&"g1".to_string()));
        assert_eq!(state.to_fen(), "4k3/8/8/8/8/8/8/4K2R w - - 4 3");
    }

    #[test]
    fn test_king_move_forfeits_both_sides() {
        let state = play(&from_fen(OPEN), &["e1d1", "e8d8", "d1e1", "d8e8"]);
        let moves = destinations(&state, "e1");
        assert!(!moves.contains(&"g1".to_string()));
        assert!(!moves.contains(&"c1".to_string()));
    }

    #[test]
    fn test_castling_moves_the_rook() {
        let state = play(&from_fen(OPEN), &["e1g1"]);
        assert_eq!(state.board.get(sq("g1")).unwrap().piece_type, PieceType::King);
        assert_eq!(state.board.get(sq("f1")).unwrap().piece_type, PieceType::Rook);
        assert!(state.board.get(sq("h1")).is_none());
        assert!(state.board.get(sq("e1")).is_none());

        let last = state.last_move().unwrap();
        assert!(last.is_castling);
        assert_eq!(last.san, "O-O");
        assert_eq!(state.to_fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1");

        let state = play(&state, &["e8c8"]);
        assert_eq!(state.board.get(sq("d8")).unwrap().piece_type, PieceType::Rook);
        assert!(state.board.get(sq("a8")).is_none());
        assert_eq!(state.last_move().unwrap().san, "O-O-O");
    }

    #[test]
    fn test_capturing_a_corner_rook_removes_the_right() {
        let state = from_fen("r3k2r/8/8/8/8/8/6b1/R3K2R b KQkq - 0 1");
        let state = play(&state, &["g2h1"]);
        assert_eq!(state.castling.to_fen(), "Qkq");
    }
}

mod en_passant {
    use super::*;

    #[test]
    fn test_capture_available_right_after_double_step() {
        let state = play_from_start(&["e2e4", "a7a6", "e4e5", "d7d5"]);
        assert_eq!(state.en_passant_target, Some(sq("d6")));
        assert!(destinations(&state, "e5").contains(&"d6".to_string()));

        let state = play(&state, &["e5d6"]);
        assert!(state.board.get(sq("d5")).is_none());
        assert_eq!(state.board.get(sq("d6")).unwrap().piece_type, PieceType::Pawn);

        let last = state.last_move().unwrap();
        assert!(last.is_en_passant);
        assert_eq!(last.captured_piece.unwrap().color, Color::Black);
        assert_eq!(last.san, "exd6");
        assert_eq!(state.half_move_clock, 0);
    }

    #[test]
    fn test_right_expires_after_one_move() {
        let state = play_from_start(&["e2e4", "a7a6", "e4e5", "d7d5", "a2a3", "a6a5"]);
        assert_eq!(state.en_passant_target, None);
        assert!(!destinations(&state, "e5").contains(&"d6".to_string()));
    }

    #[test]
    fn test_capture_that_exposes_king_is_illegal() {
        let state = from_fen("8/8/8/K2pP2r/8/8/8/4k3 w - d6 0 1");
        assert_eq!(destinations(&state, "e5"), vec!["e6"]);
    }

    #[test]
    fn test_single_step_sets_no_target() {
        let state = play_from_start(&["e2e3"]);
        assert_eq!(state.en_passant_target, None);
    }

    #[test]
    fn test_possible_moves_does_not_touch_state() {
        let state = play_from_start(&["e2e4", "a7a6", "e4e5", "d7d5"]);
        let before = state.clone();
        let _ = possible_moves(&state.board, sq("e5"), &state).unwrap();
        assert_eq!(state, before);
    }
}
