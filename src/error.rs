//! Error types for board mutation and game flow

use thiserror::Error;

use crate::board::Pos;
use crate::rules::{GameState, SwapDecision};

/// Contract violations when writing to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("cell {0} is already occupied")]
    Occupied(Pos),
    #[error("position ({row}, {col}) is off the board")]
    OutOfBounds { row: u8, col: u8 },
}

/// Rejections from the game session controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("game is already over: {0:?}")]
    GameOver(GameState),
    #[error("move at {0} is not allowed by the active rule")]
    IllegalMove(Pos),
    #[error("expected {expected}, but the game is in {actual:?}")]
    WrongPhase {
        expected: &'static str,
        actual: GameState,
    },
    #[error("{0:?} is not available under this rule at this point")]
    UnsupportedDecision(SwapDecision),
    #[error("fifth-move proposals must be two distinct legal cells")]
    InvalidProposal,
    #[error("{0} was not one of the proposed fifth moves")]
    NotProposed(Pos),
    #[error("nothing to undo")]
    NothingToUndo,
    #[error(transparent)]
    Board(#[from] BoardError),
}
