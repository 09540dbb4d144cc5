use renju::board::{Board, Player, Pos, CENTER};
use renju::eval::PositionEvaluator;
use renju::rules::{FifthMove, GameRule, GameState, RuleValidatorFactory};
use renju::search::{legal_candidates, MctsConfig, MonteCarloTreeSearch};
use renju::{AIEngine, Difficulty, EngineKind, GameSession};

/// Drive a session with the engine making every decision.
fn self_play(rule: GameRule, kind: EngineKind, max_moves: usize) -> GameSession {
    let mut game = GameSession::new(rule);
    let mut engine = AIEngine::with_config(*game.validator(), kind, Difficulty::Easy);

    while !game.state().is_over() && game.history().len() < max_moves {
        engine.set_validator(*game.validator());
        let board = *game.board();
        match game.state() {
            GameState::WaitingForSwap => {
                game.resolve_swap(engine.choose_swap(&board)).unwrap();
            }
            GameState::WaitingForFifthMove => {
                let proposals = engine.choose_fifth_proposals(&board).unwrap();
                game.propose_fifth_moves(proposals).unwrap();
            }
            GameState::WaitingForFifthMoveSelection => {
                let Some(FifthMove::Proposed(proposals)) =
                    game.validator().protocol().map(|p| p.fifth())
                else {
                    panic!("selection without proposals");
                };
                let pick = engine.choose_fifth_selection(&board, proposals);
                game.select_fifth_move(pick).unwrap();
            }
            _ => {
                let color = game.side_to_move();
                let pos = engine.get_move(&board, color).expect("a legal move");
                assert!(
                    game.validator().is_valid_move(&board, pos, game.seat_to_move()),
                    "engine proposed illegal {pos} under {rule}"
                );
                game.play(pos).unwrap();
            }
        }
    }
    game
}

#[test]
fn test_board_is_persistent() {
    let before = Board::new().place(CENTER, Player::Black).unwrap();
    let after = before.place(Pos::new(3, 4), Player::White).unwrap();
    assert_eq!(after.get_stone(Pos::new(3, 4)), Some(Player::White));
    assert!(before.is_empty(Pos::new(3, 4)));
    assert_eq!(before.move_count(), 1);
    assert_eq!(after.move_count(), 2);
}

#[test]
fn test_freestyle_self_play_stays_legal() {
    let game = self_play(GameRule::Freestyle, EngineKind::Minimax, 24);
    let moves = game.history();
    assert!(!moves.is_empty());
    for (i, mv) in moves.iter().enumerate() {
        assert_eq!(usize::from(mv.number), i + 1);
        assert_eq!(game.board().get_stone(mv.pos), Some(mv.player));
    }
}

#[test]
fn test_open_renju_self_play_runs_protocol() {
    let game = self_play(GameRule::OpenRenju, EngineKind::Minimax, 8);
    let moves = game.history();
    assert!(moves.len() >= 5);
    assert_eq!(moves[0].pos, CENTER);
    assert_eq!(moves[1].pos.chebyshev(CENTER), 1);
    assert!((1..=2).contains(&moves[2].pos.chebyshev(CENTER)));
    // The fifth stone is the one White kept
    match game.validator().protocol().map(|p| p.fifth()) {
        Some(FifthMove::Selected(pos)) => assert_eq!(moves[4].pos, pos),
        other => panic!("unexpected fifth-move state {other:?}"),
    }
}

#[test]
fn test_standard_renju_self_play_never_forbidden() {
    let game = self_play(GameRule::StandardRenju, EngineKind::Minimax, 16);
    let mut replay = GameSession::new(GameRule::StandardRenju);
    for mv in game.history() {
        replay.play(mv.pos).unwrap();
    }
    assert_eq!(replay.board(), game.board());
}

#[test]
fn test_swap2_self_play_with_mcts() {
    let game = self_play(GameRule::Swap2, EngineKind::Mcts, 8);
    assert_eq!(game.history().len(), 8);
}

#[test]
fn test_surrounded_center_scenario() {
    let mut game = GameSession::new(GameRule::Freestyle);
    game.play(CENTER).unwrap();
    let white = [Pos::new(6, 7), Pos::new(8, 7), Pos::new(7, 6), Pos::new(7, 8)];
    let black_elsewhere = [Pos::new(0, 0), Pos::new(0, 14), Pos::new(14, 0)];
    for (i, pos) in white.iter().enumerate() {
        game.play(*pos).unwrap();
        if let Some(&b) = black_elsewhere.get(i) {
            game.play(b).unwrap();
        }
    }

    let validator = *game.validator();
    let moves = legal_candidates(game.board(), Player::Black, &validator);
    for pos in [(6, 6), (6, 8), (8, 6), (8, 8)] {
        assert!(moves.contains(&Pos::new(pos.0, pos.1)));
    }
    assert!(moves.iter().all(|&p| game.board().is_empty(p)));
}

#[test]
fn test_black_four_evaluation_margin() {
    let mut board = Board::new();
    for c in 3..7 {
        board = board.place(Pos::new(7, c), Player::Black).unwrap();
    }
    board = board.place(Pos::new(7, 2), Player::White).unwrap();
    board = board.place(Pos::new(0, 0), Player::White).unwrap();
    board = board.place(Pos::new(0, 14), Player::White).unwrap();

    let evaluator = PositionEvaluator::for_rule(GameRule::StandardRenju);
    let black = evaluator.evaluate(&board, Player::Black);
    let white = evaluator.evaluate(&board, Player::White);
    assert!(black - white >= 10_000, "margin {} too small", black - white);
}

#[test]
fn test_seeded_mcts_repeatable_across_instances() {
    let validator = RuleValidatorFactory::create(GameRule::StandardRenju);
    let board = Board::new()
        .place(CENTER, Player::Black)
        .and_then(|b| b.place(Pos::new(6, 8), Player::White))
        .unwrap();
    let config = MctsConfig {
        iterations: 200,
        seed: Some(2024),
        ..MctsConfig::default()
    };
    let first = MonteCarloTreeSearch::with_config(validator, config).find_best_move(&board, Player::Black);
    let second = MonteCarloTreeSearch::with_config(validator, config).find_best_move(&board, Player::Black);
    assert!(first.is_some());
    assert_eq!(first, second);
}
