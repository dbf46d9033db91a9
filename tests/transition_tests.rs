mod common;

use common::{from_fen, play, play_from_start, sq};
use knightfall::chess::{
    create_initial_game_state, execute_move, Color, EngineError, GameEndReason, GameState,
    GameStatus, PieceType, STARTING_FEN,
};

#[test]
fn test_initial_state() {
    let state = create_initial_game_state();
    assert_eq!(state.current_player, Color::White);
    assert!(state.move_history.is_empty());
    assert!(!state.is_check && !state.is_checkmate && !state.is_stalemate && !state.is_draw);
    assert_eq!(state.status(), GameStatus::Playing);
    assert_eq!(state.to_fen(), STARTING_FEN);
    assert_eq!(state.repetition_count(), 1);
}

#[test]
fn test_turns_alternate_and_history_grows() {
    let state = play_from_start(&["e2e4"]);
    assert_eq!(state.current_player, Color::Black);
    assert_eq!(state.move_history.len(), 1);

    let state = play(&state, &["e7e5"]);
    assert_eq!(state.current_player, Color::White);
    assert_eq!(state.move_history.len(), 2);
    assert_eq!(state.fullmove_number(), 2);
    assert_eq!(
        state.to_fen(),
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2"
    );
}

#[test]
fn test_input_state_is_untouched() {
    let state = GameState::new();
    let snapshot = state.clone();
    let next = execute_move(&state, sq("g1"), sq("f3"), None).unwrap();
    assert_eq!(state, snapshot);
    assert_ne!(next.board, state.board);
}

#[test]
fn test_moved_piece_is_flagged() {
    let state = play_from_start(&["g1f3"]);
    let knight = state.board.get(sq("f3")).unwrap();
    assert!(knight.has_moved);
    assert_eq!(state.half_move_clock, 1);
}

mod rejected {
    use super::*;

    #[test]
    fn test_empty_source() {
        let err = execute_move(&GameState::new(), sq("e4"), sq("e5"), None).unwrap_err();
        assert!(matches!(err, EngineError::InvalidMove(_)));
    }

    #[test]
    fn test_wrong_color() {
        let err = execute_move(&GameState::new(), sq("e7"), sq("e5"), None).unwrap_err();
        assert!(matches!(err, EngineError::InvalidMove(_)));
    }

    #[test]
    fn test_illegal_destination() {
        let err = execute_move(&GameState::new(), sq("e2"), sq("e5"), None).unwrap_err();
        assert!(matches!(err, EngineError::InvalidMove(_)));
    }

    #[test]
    fn test_move_into_check() {
        let state = from_fen("4k3/8/8/8/8/8/3r4/4K3 w - - 0 1");
        let err = execute_move(&state, sq("e1"), sq("e2"), None).unwrap_err();
        assert!(matches!(err, EngineError::InvalidMove(_)));
    }

    #[test]
    fn test_promotion_piece_on_ordinary_move() {
        let err = execute_move(&GameState::new(), sq("e2"), sq("e4"), Some(PieceType::Queen))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidMove(_)));
    }
}

mod promotion {
    use super::*;

    const READY: &str = "8/4P3/8/8/8/8/k7/4K3 w - - 0 1";

    #[test]
    fn test_defaults_to_queen() {
        let state = play(&from_fen(READY), &["e7e8"]);
        let piece = state.board.get(sq("e8")).unwrap();
        assert_eq!(piece.piece_type, PieceType::Queen);
        assert_eq!(piece.color, Color::White);

        let last = state.last_move().unwrap();
        assert!(last.is_promotion);
        assert_eq!(last.promotion_piece, Some(PieceType::Queen));
        assert_eq!(last.san, "e8=Q");
    }

    #[test]
    fn test_underpromotion() {
        let state = play(&from_fen(READY), &["e7e8n"]);
        assert_eq!(state.board.get(sq("e8")).unwrap().piece_type, PieceType::Knight);
        assert_eq!(state.last_move().unwrap().san, "e8=N");
    }

    #[test]
    fn test_cannot_promote_to_king_or_pawn() {
        let state = from_fen(READY);
        for choice in [PieceType::King, PieceType::Pawn] {
            let err = execute_move(&state, sq("e7"), sq("e8"), Some(choice)).unwrap_err();
            assert!(matches!(err, EngineError::InvalidMove(_)));
        }
    }

    #[test]
    fn test_black_promotes_on_first_rank() {
        let state = from_fen("4k3/8/8/8/8/8/p7/4K3 b - - 0 1");
        let state = play(&state, &["a2a1r"]);
        let piece = state.board.get(sq("a1")).unwrap();
        assert_eq!(piece.piece_type, PieceType::Rook);
        assert_eq!(piece.color, Color::Black);
        assert_eq!(state.last_move().unwrap().san, "a1=R+");
    }
}

mod endings {
    use super::*;

    #[test]
    fn test_fools_mate() {
        let state = play_from_start(&["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert!(state.is_check);
        assert!(state.is_checkmate);
        assert!(!state.is_stalemate);
        assert_eq!(state.end_reason(), Some(GameEndReason::Checkmate));
        assert_eq!(state.status(), GameStatus::Checkmate);
        assert_eq!(state.winner(), Some(Color::Black));
        assert_eq!(state.last_move().unwrap().san, "Qh4#");

        let err = execute_move(&state, sq("a2"), sq("a3"), None).unwrap_err();
        assert_eq!(err, EngineError::GameOver(GameEndReason::Checkmate));
    }

    #[test]
    fn test_stalemate() {
        let state = from_fen("8/8/8/8/2q5/k7/8/K7 b - - 0 1");
        let state = play(&state, &["c4b3"]);
        assert!(state.is_stalemate);
        assert!(!state.is_check);
        assert!(!state.is_checkmate);
        assert_eq!(state.end_reason(), Some(GameEndReason::Stalemate));
        assert_eq!(state.winner(), None);
        assert_eq!(state.last_move().unwrap().san, "Qb3");
    }

    #[test]
    fn test_stalemate_detected_on_import() {
        let state = from_fen("8/8/8/8/8/kq6/8/K7 w - - 0 1");
        assert!(state.is_stalemate);
        assert!(state.is_game_over());
    }

    #[test]
    fn test_fifty_move_rule() {
        let state = from_fen("4k3/8/8/8/8/8/8/4K1N1 w - - 98 60");
        let state = play(&state, &["g1f3"]);
        assert!(!state.is_game_over());
        assert_eq!(state.half_move_clock, 99);

        let state = play(&state, &["e8d8"]);
        assert_eq!(state.half_move_clock, 100);
        assert!(state.is_draw);
        assert_eq!(state.end_reason(), Some(GameEndReason::FiftyMoveRule));
        assert_eq!(state.status(), GameStatus::Draw);
    }

    #[test]
    fn test_pawn_move_resets_clock() {
        let state = from_fen("4k3/8/8/8/8/8/4P3/4K1N1 w - - 99 60");
        let state = play(&state, &["e2e3"]);
        assert_eq!(state.half_move_clock, 0);
        assert!(!state.is_game_over());
    }

    #[test]
    fn test_threefold_repetition() {
        let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];

        let state = play_from_start(&shuffle);
        assert_eq!(state.repetition_count(), 2);
        assert!(!state.is_game_over());

        let state = play(&state, &shuffle);
        assert_eq!(state.repetition_count(), 3);
        assert!(state.is_draw);
        assert_eq!(state.end_reason(), Some(GameEndReason::ThreefoldRepetition));
    }

    #[test]
    fn test_resignation() {
        let state = play_from_start(&["e2e4"]);
        let state = state.resign(Color::Black);
        assert_eq!(state.end_reason(), Some(GameEndReason::Resignation(Color::Black)));
        assert_eq!(state.winner(), Some(Color::White));
        assert_eq!(state.status(), GameStatus::Resigned);
        assert!(!state.is_checkmate);
        assert_eq!(state.move_history.len(), 1);
        assert!(execute_move(&state, sq("e7"), sq("e5"), None).is_err());
    }

    #[test]
    fn test_draw_agreement_and_timeout() {
        let state = GameState::new().agree_draw();
        assert!(state.is_draw);
        assert_eq!(state.winner(), None);

        let state = GameState::new().flag_timeout(Color::White);
        assert_eq!(state.status(), GameStatus::TimedOut);
        assert_eq!(state.winner(), Some(Color::Black));
    }
}
