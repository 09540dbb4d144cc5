//! Depth-bounded negamax with alpha-beta pruning
//!
//! Leaves are scored by the [`PositionEvaluator`]; moves are filtered by the
//! active [`RuleValidator`] and ordered by the pattern recognizer's cheap
//! point score. Iterative deepening keeps the last fully searched depth as the
//! answer when a deadline interrupts a deeper pass.
//!
//! # Example
//!
//! ```
//! use renju::board::{Board, Player, Pos};
//! use renju::rules::{GameRule, RuleValidatorFactory};
//! use renju::search::{Minimax, MinimaxConfig};
//!
//! let validator = RuleValidatorFactory::create(GameRule::Freestyle);
//! let config = MinimaxConfig { depth: 1, width: 6, time_limit: None };
//! let mut searcher = Minimax::with_config(validator, config);
//!
//! let board = Board::new().place(Pos::new(7, 7), Player::Black).unwrap();
//! let result = searcher.search(&board, Player::White);
//! assert!(result.best_move.is_some());
//! ```

use std::time::{Duration, Instant};

use log::debug;

use crate::board::{Board, Player, Pos};
use crate::eval::{PositionEvaluator, WIN_SCORE};
use crate::rules::RuleValidator;

use super::candidates::{root_candidates, search_candidates};

/// Bound larger than any reachable score
const INF: i32 = WIN_SCORE + 1_000;

/// Deadline is polled once per this many nodes
const TIME_CHECK_INTERVAL: u64 = 256;

/// Minimax settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimaxConfig {
    /// Maximum plies searched
    pub depth: u8,
    /// Moves kept per node after ordering
    pub width: usize,
    pub time_limit: Option<Duration>,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            width: 12,
            time_limit: None,
        }
    }
}

/// Search result containing the best move found and associated statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// Best move found, if any
    pub best_move: Option<Pos>,
    /// Score of the best move from the mover's perspective
    pub score: i32,
    /// Depth completed in iterative deepening
    pub depth: u8,
    /// Total nodes searched
    pub nodes: u64,
}

/// Negamax searcher bound to one game's validator.
pub struct Minimax {
    config: MinimaxConfig,
    validator: RuleValidator,
    evaluator: PositionEvaluator,
    nodes: u64,
    deadline: Option<Instant>,
    stopped: bool,
}

impl Minimax {
    pub fn new(validator: RuleValidator) -> Self {
        Self::with_config(validator, MinimaxConfig::default())
    }

    pub fn with_config(validator: RuleValidator, config: MinimaxConfig) -> Self {
        Self {
            config,
            validator,
            evaluator: PositionEvaluator::for_rule(validator.rule()),
            nodes: 0,
            deadline: None,
            stopped: false,
        }
    }

    pub fn config(&self) -> &MinimaxConfig {
        &self.config
    }

    /// Replace the validator snapshot (e.g. after a swap decision).
    pub fn set_validator(&mut self, validator: RuleValidator) {
        self.validator = validator;
    }

    /// Search for the best move of `color` on `board`.
    pub fn search(&mut self, board: &Board, color: Player) -> SearchResult {
        self.nodes = 0;
        self.stopped = false;
        self.deadline = self.config.time_limit.map(|t| Instant::now() + t);

        let mut order = self.order_moves(board, color, root_candidates(board, color, &self.validator));
        let Some(&first) = order.first() else {
            return SearchResult {
                best_move: None,
                score: 0,
                depth: 0,
                nodes: 0,
            };
        };

        let mut best = SearchResult {
            best_move: Some(first),
            score: -INF,
            depth: 0,
            nodes: 0,
        };

        for depth in 1..=self.config.depth.max(1) {
            let mut alpha = -INF;
            let mut depth_best: Option<(Pos, i32)> = None;

            for &mv in &order {
                let child = board.placed(mv, color);
                let score = if self.validator.check_win(&child, mv, color).is_over() {
                    WIN_SCORE
                } else {
                    -self.negamax(&child, color.opponent(), depth - 1, -INF, -alpha, 1)
                };
                if self.stopped {
                    break;
                }
                if depth_best.is_none() || score > alpha {
                    alpha = score;
                    depth_best = Some((mv, score));
                }
            }

            // An interrupted pass only counts when nothing deeper exists yet
            if self.stopped && best.depth > 0 {
                break;
            }
            if let Some((mv, score)) = depth_best {
                best.best_move = Some(mv);
                best.score = score;
                best.depth = depth;
                if let Some(i) = order.iter().position(|&m| m == mv) {
                    order[..=i].rotate_right(1);
                }
            }
            if self.stopped || best.score >= WIN_SCORE - i32::from(self.config.depth) {
                break;
            }
        }

        best.nodes = self.nodes;
        debug!(
            "minimax: {} -> {:?} score {} depth {} nodes {}",
            color, best.best_move, best.score, best.depth, best.nodes
        );
        best
    }

    fn negamax(
        &mut self,
        board: &Board,
        to_move: Player,
        depth: u8,
        mut alpha: i32,
        beta: i32,
        ply: i32,
    ) -> i32 {
        self.nodes += 1;
        if self.nodes % TIME_CHECK_INTERVAL == 0 {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    self.stopped = true;
                }
            }
        }
        if self.stopped {
            return 0;
        }
        if depth == 0 {
            return self.evaluator.evaluate(board, to_move);
        }

        let moves = self.order_moves(board, to_move, search_candidates(board, to_move, &self.validator));
        if moves.is_empty() {
            // No legal placement left: treat as a draw
            return 0;
        }

        let mut best = -INF;
        for mv in moves {
            let child = board.placed(mv, to_move);
            let score = if self.validator.check_win(&child, mv, to_move).is_over() {
                WIN_SCORE - ply
            } else {
                -self.negamax(&child, to_move.opponent(), depth - 1, -beta, -alpha, ply + 1)
            };
            if score > best {
                best = score;
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                break;
            }
        }
        best
    }

    /// Sort by point score (ties by board index) and keep the configured width.
    fn order_moves(&self, board: &Board, color: Player, moves: Vec<Pos>) -> Vec<Pos> {
        let recognizer = self.evaluator.recognizer();
        let mut scored: Vec<(Pos, i32)> = moves
            .into_iter()
            .map(|p| (p, recognizer.point_score(board, p, color)))
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(self.config.width.max(1));
        scored.into_iter().map(|(p, _)| p).collect()
    }
}
