//! Game rules for Gomoku and its Renju variants
//!
//! This module implements:
//! - Win conditions (five in a row, exact five for Renju Black)
//! - Forbidden moves (double-three, double-four, overline)
//! - Opening protocols (centre geometry, templates, swaps, fifth moves)
//! - One validator per rule variant, built by `RuleValidatorFactory`

pub mod forbidden;
pub mod opening;
pub mod validator;
pub mod win;

use crate::board::{Player, Pos};

// Re-exports for convenient access
pub use forbidden::{
    count_fours, count_open_threes, forbidden_kind, is_double_four, is_double_three,
    is_forbidden, ForbiddenKind,
};
pub use validator::{
    FifthMove, GameRule, RuleValidator, RuleValidatorFactory, SwapDecision, SwapProtocol,
};
pub use win::{find_five_positions, find_win_line, has_five_at_pos, has_five_in_row};

/// Outcome of the position after a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    Playing,
    /// `line` holds the five winning cells in axis order
    Won { winner: Player, line: [Pos; 5] },
    Draw,
    /// Opening protocol: the side to move may trade colours
    WaitingForSwap,
    /// Open Renju / Yamaguchi: Black must offer two fifth moves
    WaitingForFifthMove,
    /// White must pick one of the offered fifth moves
    WaitingForFifthMoveSelection,
}

impl GameState {
    /// Won or drawn
    #[inline]
    pub fn is_over(&self) -> bool {
        matches!(self, GameState::Won { .. } | GameState::Draw)
    }

    /// Normal turn order is suspended until a decision is made
    #[inline]
    pub fn is_waiting(&self) -> bool {
        matches!(
            self,
            GameState::WaitingForSwap
                | GameState::WaitingForFifthMove
                | GameState::WaitingForFifthMoveSelection
        )
    }

    #[inline]
    pub fn winner(&self) -> Option<Player> {
        match self {
            GameState::Won { winner, .. } => Some(*winner),
            _ => None,
        }
    }
}
