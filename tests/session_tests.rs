mod common;

use common::{from_fen, sq};
use knightfall::ai::{AiLevel, AiTurnOutcome, ThinkingConfig};
use knightfall::chess::{Color, GameEndReason, MoveRequest, PieceType};
use knightfall::session::{ClickOutcome, GameSession, SessionError};
use std::time::Duration;

fn versus_black_ai(thinking: ThinkingConfig) -> GameSession {
    GameSession::against_ai(AiLevel::Intermediate, Color::Black, thinking)
}

mod clicks {
    use super::*;

    #[test]
    fn test_select_then_move() {
        let mut session = GameSession::new();

        match session.click(sq("e2")).unwrap() {
            ClickOutcome::Selected {
                square,
                valid_moves,
            } => {
                assert_eq!(square, sq("e2"));
                assert_eq!(valid_moves, vec![sq("e3"), sq("e4")]);
            }
            other => panic!("expected selection, got {other:?}"),
        }
        assert_eq!(session.state().selected_square, Some(sq("e2")));

        match session.click(sq("e4")).unwrap() {
            ClickOutcome::Moved(mv) => assert_eq!(mv.san, "e4"),
            other => panic!("expected a move, got {other:?}"),
        }
        assert_eq!(session.state().current_player, Color::Black);
        assert_eq!(session.state().selected_square, None);
        assert!(session.state().valid_moves.is_empty());
    }

    #[test]
    fn test_reselect_and_deselect() {
        let mut session = GameSession::new();
        session.click(sq("e2")).unwrap();

        assert!(matches!(
            session.click(sq("g1")).unwrap(),
            ClickOutcome::Selected { .. }
        ));
        assert_eq!(session.state().selected_square, Some(sq("g1")));

        assert_eq!(session.click(sq("g1")).unwrap(), ClickOutcome::Deselected);
        assert_eq!(session.state().selected_square, None);

        session.click(sq("g1")).unwrap();
        assert_eq!(session.click(sq("d5")).unwrap(), ClickOutcome::Deselected);
    }

    #[test]
    fn test_opponent_piece_is_ignored() {
        let mut session = GameSession::new();
        assert_eq!(session.click(sq("e7")).unwrap(), ClickOutcome::Ignored);
        assert_eq!(session.click(sq("e4")).unwrap(), ClickOutcome::Ignored);
        assert_eq!(session.generation(), 0);
    }

    #[test]
    fn test_promotion_waits_for_a_choice() {
        let mut session =
            GameSession::from_state(from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1"));
        session.click(sq("e7")).unwrap();
        assert_eq!(
            session.click(sq("e8")).unwrap(),
            ClickOutcome::PromotionRequired {
                from: sq("e7"),
                to: sq("e8"),
            }
        );
        assert_eq!(session.state().current_player, Color::White);

        let mv = session.promote(PieceType::Knight).unwrap();
        assert_eq!(mv.san, "e8=N");
        assert_eq!(session.pending_promotion(), None);
        assert!(matches!(
            session.promote(PieceType::Queen),
            Err(SessionError::NoPendingPromotion)
        ));
    }

    #[test]
    fn test_clicks_ignored_after_game_over() {
        let mut session = GameSession::new();
        session.resign(Color::White);
        assert_eq!(session.click(sq("e2")).unwrap(), ClickOutcome::Ignored);
        assert_eq!(
            session.state().end_reason(),
            Some(GameEndReason::Resignation(Color::White))
        );
    }
}

#[test]
fn test_overrides_bump_generation() {
    let mut session = GameSession::new();
    session.play(MoveRequest::new(sq("d2"), sq("d4"), None).unwrap()).unwrap();
    assert_eq!(session.generation(), 1);

    session.offer_draw();
    assert_eq!(session.generation(), 2);
    assert!(session.state().is_draw);

    session.new_game();
    assert_eq!(session.generation(), 3);
    assert!(session.state().move_history.is_empty());
    assert!(!session.state().is_game_over());

    session.flag_timeout(Color::White);
    assert_eq!(session.state().winner(), Some(Color::Black));
}

#[test]
fn test_illegal_move_is_reported() {
    let mut session = GameSession::new();
    let err = session
        .play(MoveRequest::new(sq("e2"), sq("e5"), None).unwrap())
        .unwrap_err();
    assert!(matches!(err, SessionError::Engine(_)));
    assert_eq!(session.generation(), 0);
}

#[test]
fn test_human_cannot_move_for_the_ai() {
    let mut session = versus_black_ai(ThinkingConfig::instant());
    session
        .play_human(MoveRequest::parse_for("e2e4", Color::White).unwrap())
        .unwrap();
    assert!(session.is_ai_turn());

    let err = session
        .play_human(MoveRequest::parse_for("e7e5", Color::Black).unwrap())
        .unwrap_err();
    assert!(matches!(err, SessionError::NotYourTurn(Color::Black)));
    assert_eq!(session.click(sq("e7")).unwrap(), ClickOutcome::Ignored);
}

#[test]
fn test_ai_turn_without_opponent() {
    let session = GameSession::new();
    assert!(matches!(
        session.start_ai_turn(),
        Err(SessionError::NoAiOpponent)
    ));
}

#[test]
fn test_ai_reply_on_a_blocking_runtime() {
    let mut session = versus_black_ai(ThinkingConfig::instant());
    session
        .play_human(MoveRequest::parse_for("d2d4", Color::White).unwrap())
        .unwrap();

    let reply = tokio_test::block_on(session.play_ai_turn());
    let mv = tokio_test::assert_ok!(reply).expect("AI has a move");
    assert_eq!(mv.piece.color, Color::Black);
    assert_eq!(session.state().current_player, Color::White);
}

#[tokio::test]
async fn test_ai_turn_is_applied() {
    let mut session = versus_black_ai(ThinkingConfig::instant());
    session
        .play_human(MoveRequest::parse_for("e2e4", Color::White).unwrap())
        .unwrap();
    let generation = session.generation();

    let mut turn = session.start_ai_turn().unwrap();
    assert_eq!(turn.generation(), generation);

    let applied = session.apply_ai_turn(turn.outcome().await).unwrap();
    let mv = applied.expect("AI should have moved");
    assert_eq!(mv.piece.color, Color::Black);
    assert_eq!(session.state().move_history.len(), 2);
    assert_eq!(session.generation(), generation + 1);
    assert!(!session.is_ai_turn());
}

#[tokio::test]
async fn test_stale_ai_result_is_discarded() {
    let mut session = versus_black_ai(ThinkingConfig::instant());
    session
        .play_human(MoveRequest::parse_for("e2e4", Color::White).unwrap())
        .unwrap();

    let mut turn = session.start_ai_turn().unwrap();
    session.new_game();

    let outcome = turn.outcome().await;
    assert!(matches!(outcome, AiTurnOutcome::Ready { .. }));
    assert_eq!(session.apply_ai_turn(outcome).unwrap(), None);
    assert!(session.state().move_history.is_empty());
    assert_eq!(session.state().current_player, Color::White);
}

#[tokio::test]
async fn test_cancelled_ai_turn_changes_nothing() {
    let mut session = versus_black_ai(ThinkingConfig::default());
    session
        .play_human(MoveRequest::parse_for("e2e4", Color::White).unwrap())
        .unwrap();

    let mut turn = session.start_ai_turn().unwrap();
    turn.cancel();
    let outcome = turn.outcome().await;
    assert!(matches!(outcome, AiTurnOutcome::Cancelled));

    assert_eq!(session.apply_ai_turn(outcome).unwrap(), None);
    assert_eq!(session.state().move_history.len(), 1);
    assert!(session.is_ai_turn());
}

#[tokio::test]
async fn test_dropping_the_ai_future_leaves_state_alone() {
    let mut session = versus_black_ai(ThinkingConfig::default());
    session
        .play_human(MoveRequest::parse_for("e2e4", Color::White).unwrap())
        .unwrap();
    let before = session.state().clone();

    let timed_out = tokio::time::timeout(Duration::from_millis(5), session.play_ai_turn()).await;
    assert!(timed_out.is_err());
    assert_eq!(session.state(), &before);
}
