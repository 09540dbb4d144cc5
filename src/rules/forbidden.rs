//! Renju forbidden moves for Black
//!
//! Black may not play a move that creates:
//! - an overline (six or more in a row)
//! - a double-four (two fours at once, in two lines or along one line)
//! - a double-three (two open threes at once)
//!
//! Exception: a move that makes exactly five is always allowed.
//! White has no forbidden moves.

use crate::board::{Board, Player, Pos, DIRECTIONS};
use crate::pattern::{PatternCategory, PatternRecognizer};

use super::win::{makes_exact_five, makes_overline};

/// Why a move is forbidden
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForbiddenKind {
    Overline,
    DoubleFour,
    DoubleThree,
}

/// Per-axis shape created by a hypothetical Black stone
#[derive(Debug, Clone, Copy, Default)]
struct LineShapes {
    fours: u8,
    open_threes: u8,
    forbidden: bool,
}

/// Classify the four axes through `pos`. Each axis contributes at most one
/// four or one three; an in-line double-four counts as two fours.
fn line_shapes(board: &Board, pos: Pos, player: Player) -> LineShapes {
    let recognizer = PatternRecognizer::new();
    let mut shapes = LineShapes::default();

    for dir in 0..DIRECTIONS.len() {
        let matches = recognizer.matches_in_direction(board, pos, player, dir);
        if matches.is_empty() {
            continue;
        }
        if matches
            .iter()
            .any(|p| p.category == PatternCategory::Forbidden && p.name == "double-four")
        {
            shapes.fours += 2;
        } else if matches.iter().any(|p| {
            matches!(
                p.category,
                PatternCategory::Critical | PatternCategory::Forcing
            )
        }) {
            shapes.fours += 1;
        } else if matches
            .iter()
            .any(|p| p.category == PatternCategory::Threatening)
        {
            shapes.open_threes += 1;
        }
        if matches
            .iter()
            .any(|p| p.category == PatternCategory::Forbidden)
        {
            shapes.forbidden = true;
        }
    }
    shapes
}

/// Count how many fours a Black stone at `pos` would create
pub fn count_fours(board: &Board, pos: Pos) -> u8 {
    if !board.is_empty(pos) {
        return 0;
    }
    line_shapes(board, pos, Player::Black).fours
}

/// Count how many open threes a Black stone at `pos` would create
pub fn count_open_threes(board: &Board, pos: Pos) -> u8 {
    if !board.is_empty(pos) {
        return 0;
    }
    line_shapes(board, pos, Player::Black).open_threes
}

/// Reason a Black move at `pos` is forbidden, or `None` if it is allowed.
///
/// Occupied cells return `None`: occupancy is a placement question, not a
/// forbidden shape.
pub fn forbidden_kind(board: &Board, pos: Pos) -> Option<ForbiddenKind> {
    if !board.is_empty(pos) {
        return None;
    }
    // Five wins outright, whatever else the move creates
    if makes_exact_five(board, pos, Player::Black) {
        return None;
    }
    if makes_overline(board, pos, Player::Black) {
        return Some(ForbiddenKind::Overline);
    }

    let shapes = line_shapes(board, pos, Player::Black);
    if shapes.fours >= 2 {
        Some(ForbiddenKind::DoubleFour)
    } else if shapes.open_threes >= 2 {
        Some(ForbiddenKind::DoubleThree)
    } else if shapes.forbidden {
        // Remaining forbidden-table shapes are overlines the run scan missed
        Some(ForbiddenKind::Overline)
    } else {
        None
    }
}

/// Check if a Black move at `pos` is forbidden
#[inline]
pub fn is_forbidden(board: &Board, pos: Pos) -> bool {
    forbidden_kind(board, pos).is_some()
}

/// Check if a Black move at `pos` is a double-three
pub fn is_double_three(board: &Board, pos: Pos) -> bool {
    forbidden_kind(board, pos) == Some(ForbiddenKind::DoubleThree)
}

/// Check if a Black move at `pos` is a double-four
pub fn is_double_four(board: &Board, pos: Pos) -> bool {
    forbidden_kind(board, pos) == Some(ForbiddenKind::DoubleFour)
}
