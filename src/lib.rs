//! Renju AI engine with nine opening/rule variants
//!
//! A Gomoku-family engine on a 15x15 board:
//! - Five in a row wins; Renju Black needs exactly five
//! - Black is barred from double-three, double-four and overline under the
//!   Renju family of rules
//! - Opening protocols: Open Renju geometry, Yamaguchi, Swap, Swap2,
//!   Soosyrv and Taraguchi templates, plus Freestyle and Caro
//!
//! # Architecture
//!
//! The engine is organized into several modules:
//! - [`board`]: Persistent bitboard position and coordinates
//! - [`pattern`]: Line-pattern table and window recognizer
//! - [`rules`]: Win detection, forbidden moves, per-rule validators
//! - [`eval`]: Heuristic position evaluation
//! - [`search`]: Minimax (alpha-beta) and Monte Carlo Tree Search
//! - [`engine`]: AI facade with difficulty presets
//! - [`game`]: Session controller with undo
//!
//! # Quick Start
//!
//! ```
//! use renju::{AIEngine, GameRule, GameSession, Pos};
//!
//! let mut game = GameSession::new(GameRule::StandardRenju);
//! let mut engine = AIEngine::new(*game.validator());
//!
//! game.play(Pos::new(7, 7)).unwrap();
//! if let Some(pos) = engine.get_move(game.board(), game.side_to_move()) {
//!     game.play(pos).unwrap();
//!     println!("AI plays at {pos}");
//! }
//! ```

pub mod board;
pub mod engine;
pub mod error;
pub mod eval;
pub mod game;
pub mod pattern;
pub mod rules;
pub mod search;

// Re-export commonly used types for convenience
pub use board::{Board, Move, Player, Pos, BOARD_SIZE};
pub use engine::{AIEngine, Difficulty, EngineKind, MoveResult, SearchType};
pub use error::{BoardError, GameError};
pub use eval::PositionEvaluator;
pub use game::GameSession;
pub use pattern::PatternRecognizer;
pub use rules::{GameRule, GameState, RuleValidator, RuleValidatorFactory, SwapDecision};
pub use search::{Minimax, MonteCarloTreeSearch};
