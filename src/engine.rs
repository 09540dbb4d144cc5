//! Main AI engine wrapping the search backends
//!
//! The engine answers in priority order:
//!
//! 1. **Immediate win**: a legal move that completes a winning five
//! 2. **Defense**: block a cell where the opponent would win next move
//! 3. **Search**: minimax or MCTS, depending on [`EngineKind`]
//!
//! # Example
//!
//! ```
//! use renju::board::{Board, Player, Pos};
//! use renju::engine::{AIEngine, Difficulty, EngineKind};
//! use renju::rules::{GameRule, RuleValidatorFactory};
//!
//! let validator = RuleValidatorFactory::create(GameRule::Freestyle);
//! let mut engine = AIEngine::with_config(validator, EngineKind::Minimax, Difficulty::Easy);
//!
//! let board = Board::new().place(Pos::new(7, 7), Player::Black).unwrap();
//! let result = engine.get_move_with_stats(&board, Player::White);
//! println!("Best move: {:?} via {:?}", result.best_move, result.search_type);
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::board::{Board, Player, Pos};
use crate::eval::{PositionEvaluator, WIN_SCORE};
use crate::rules::{RuleValidator, SwapDecision};
use crate::search::{
    neighborhood, root_candidates, MctsConfig, Minimax, MinimaxConfig, MonteCarloTreeSearch,
};

/// Type of search that produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    /// Found an immediate winning move
    ImmediateWin,
    /// Blocked the opponent's winning cell
    Defense,
    /// Negamax with alpha-beta
    Minimax,
    /// Monte Carlo Tree Search
    Mcts,
}

/// Search backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    Minimax,
    Mcts,
}

impl EngineKind {
    pub fn from_name(name: &str) -> Option<EngineKind> {
        match name {
            "minimax" => Some(EngineKind::Minimax),
            "mcts" => Some(EngineKind::Mcts),
            _ => None,
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::Minimax => f.write_str("minimax"),
            EngineKind::Mcts => f.write_str("mcts"),
        }
    }
}

/// Strength presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn from_name(name: &str) -> Option<Difficulty> {
        match name {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "expert" => Some(Difficulty::Expert),
            _ => None,
        }
    }

    pub fn minimax_config(self) -> MinimaxConfig {
        let (depth, width, time_limit) = match self {
            Difficulty::Easy => (1, 6, None),
            Difficulty::Medium => (2, 10, None),
            Difficulty::Hard => (3, 12, Some(Duration::from_secs(5))),
            Difficulty::Expert => (4, 15, Some(Duration::from_secs(10))),
        };
        MinimaxConfig {
            depth,
            width,
            time_limit,
        }
    }

    pub fn mcts_config(self) -> MctsConfig {
        let (iterations, threads, time_limit) = match self {
            Difficulty::Easy => (300, 1, None),
            Difficulty::Medium => (1_000, 1, None),
            Difficulty::Hard => (3_000, 2, Some(Duration::from_secs(5))),
            Difficulty::Expert => (8_000, 4, Some(Duration::from_secs(10))),
        };
        MctsConfig {
            iterations,
            threads,
            time_limit,
            root_candidates: Some(20),
            ..MctsConfig::default()
        }
    }
}

/// Result of a move search with detailed statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveResult {
    /// Best move found, if any
    pub best_move: Option<Pos>,
    /// Minimax score, or MCTS win rate scaled to thousandths
    pub score: i32,
    /// Phase that produced the move
    pub search_type: SearchType,
    /// Time taken in milliseconds
    pub time_ms: u64,
    /// Nodes (minimax) or iterations (MCTS)
    pub nodes: u64,
}

impl MoveResult {
    #[inline]
    fn immediate_win(pos: Pos, time_ms: u64) -> Self {
        Self {
            best_move: Some(pos),
            score: WIN_SCORE,
            search_type: SearchType::ImmediateWin,
            time_ms,
            nodes: 1,
        }
    }

    #[inline]
    fn defense(pos: Pos, time_ms: u64) -> Self {
        Self {
            best_move: Some(pos),
            score: 0,
            search_type: SearchType::Defense,
            time_ms,
            nodes: 1,
        }
    }
}

enum Backend {
    Minimax(Minimax),
    Mcts(MonteCarloTreeSearch),
}

/// Renju AI bound to one game's validator.
pub struct AIEngine {
    backend: Backend,
    validator: RuleValidator,
    evaluator: PositionEvaluator,
    difficulty: Difficulty,
}

impl AIEngine {
    /// Minimax engine at [`Difficulty::Medium`].
    #[must_use]
    pub fn new(validator: RuleValidator) -> Self {
        Self::with_config(validator, EngineKind::Minimax, Difficulty::default())
    }

    #[must_use]
    pub fn with_config(validator: RuleValidator, kind: EngineKind, difficulty: Difficulty) -> Self {
        let backend = match kind {
            EngineKind::Minimax => {
                Backend::Minimax(Minimax::with_config(validator, difficulty.minimax_config()))
            }
            EngineKind::Mcts => Backend::Mcts(MonteCarloTreeSearch::with_config(
                validator,
                difficulty.mcts_config(),
            )),
        };
        Self {
            backend,
            validator,
            evaluator: PositionEvaluator::for_rule(validator.rule()),
            difficulty,
        }
    }

    /// MCTS engine with a fixed RNG seed.
    #[must_use]
    pub fn with_seed(validator: RuleValidator, difficulty: Difficulty, seed: u64) -> Self {
        let config = MctsConfig {
            seed: Some(seed),
            ..difficulty.mcts_config()
        };
        Self {
            backend: Backend::Mcts(MonteCarloTreeSearch::with_config(validator, config)),
            validator,
            evaluator: PositionEvaluator::for_rule(validator.rule()),
            difficulty,
        }
    }

    pub fn kind(&self) -> EngineKind {
        match self.backend {
            Backend::Minimax(_) => EngineKind::Minimax,
            Backend::Mcts(_) => EngineKind::Mcts,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Sync with the game's validator after a protocol decision.
    pub fn set_validator(&mut self, validator: RuleValidator) {
        self.validator = validator;
        match &mut self.backend {
            Backend::Minimax(m) => m.set_validator(validator),
            Backend::Mcts(m) => m.set_validator(validator),
        }
    }

    /// Best move for the `color` stones, or `None` if nothing is playable.
    #[must_use]
    pub fn get_move(&mut self, board: &Board, color: Player) -> Option<Pos> {
        self.get_move_with_stats(board, color).best_move
    }

    /// Best move with search statistics.
    #[must_use]
    pub fn get_move_with_stats(&mut self, board: &Board, color: Player) -> MoveResult {
        let start = Instant::now();
        let elapsed = |start: Instant| start.elapsed().as_millis() as u64;

        let legal = root_candidates(board, color, &self.validator);

        // 1. Our own winning cell
        if let Some(win) = self.find_immediate_win(board, color, &legal) {
            debug!("engine: {color} wins at {win}");
            return MoveResult::immediate_win(win, elapsed(start));
        }

        // 2. Opponent's winning cell, if we may play there
        if let Some(block) = self.find_block(board, color, &legal) {
            debug!("engine: {color} blocks at {block}");
            return MoveResult::defense(block, elapsed(start));
        }

        // 3. Full search
        let result = match &mut self.backend {
            Backend::Minimax(searcher) => {
                let r = searcher.search(board, color);
                MoveResult {
                    best_move: r.best_move,
                    score: r.score,
                    search_type: SearchType::Minimax,
                    time_ms: elapsed(start),
                    nodes: r.nodes,
                }
            }
            Backend::Mcts(searcher) => {
                let r = searcher.search(board, color);
                MoveResult {
                    best_move: r.best_move,
                    score: (r.win_rate * 1_000.0).round() as i32,
                    search_type: SearchType::Mcts,
                    time_ms: elapsed(start),
                    nodes: u64::from(r.iterations),
                }
            }
        };
        info!(
            "engine: {color} -> {:?} ({:?}, score {}, {} nodes, {}ms)",
            result.best_move, result.search_type, result.score, result.nodes, result.time_ms
        );
        result
    }

    /// Swap offer answer for the deciding seat: end up with whichever colour
    /// the position favours.
    pub fn choose_swap(&self, board: &Board) -> SwapDecision {
        let black = self.evaluator.evaluate(board, Player::Black);
        let decider = self
            .validator
            .seat_to_decide(board)
            .unwrap_or_else(|| self.validator.seat_to_place(board));
        let current = self.validator.effective_player(decider);
        let favoured = if black > 0 {
            Player::Black
        } else {
            Player::White
        };
        if current == favoured {
            SwapDecision::Stay
        } else {
            SwapDecision::Swap
        }
    }

    /// Two best fifth-move cells for Black, strongest first.
    pub fn choose_fifth_proposals(&self, board: &Board) -> Option<[Pos; 2]> {
        match self
            .evaluator
            .rank_moves(board, Player::Black, &self.validator, 2)
            .as_slice()
        {
            [(a, _), (b, _)] => Some([*a, *b]),
            _ => None,
        }
    }

    /// White keeps the proposal that leaves Black weaker.
    pub fn choose_fifth_selection(&self, board: &Board, proposals: [Pos; 2]) -> Pos {
        let [a, b] = proposals;
        let score = |p: Pos| self.evaluator.evaluate(&board.placed(p, Player::Black), Player::Black);
        if score(b) < score(a) {
            b
        } else {
            a
        }
    }

    /// A legal cell that wins on the spot.
    fn find_immediate_win(&self, board: &Board, color: Player, legal: &[Pos]) -> Option<Pos> {
        legal.iter().copied().find(|&pos| {
            let next = board.placed(pos, color);
            self.validator.check_win(&next, pos, color).is_over()
        })
    }

    /// A legal cell where the opponent would complete a winning five.
    fn find_block(&self, board: &Board, color: Player, legal: &[Pos]) -> Option<Pos> {
        let opponent = color.opponent();
        neighborhood(board, 1).into_iter().find(|&pos| {
            legal.contains(&pos) && {
                let next = board.placed(pos, opponent);
                self.validator.check_win(&next, pos, opponent).is_over()
            }
        })
    }
}
