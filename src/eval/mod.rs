//! Position evaluation

pub mod heuristic;

pub use heuristic::{EvalWeights, PositionEvaluator, Signals, WIN_SCORE};
