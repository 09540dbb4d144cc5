//! Search module for the renju AI
//!
//! Contains:
//! - Candidate generation near existing stones
//! - Negamax with alpha-beta pruning and iterative deepening
//! - Monte Carlo Tree Search with root parallelism

pub mod candidates;
pub mod mcts;
pub mod minimax;

pub use candidates::{legal_candidates, neighborhood, root_candidates, search_candidates, CANDIDATE_RADIUS};
pub use mcts::{MctsConfig, MctsResult, MonteCarloTreeSearch, RolloutWeights};
pub use minimax::{Minimax, MinimaxConfig, SearchResult};
