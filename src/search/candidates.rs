//! Candidate move generation
//!
//! Search only looks at empty cells near existing stones. On an empty board
//! the centre is the sole candidate.

use crate::board::{Board, Player, Pos, CENTER, TOTAL_CELLS};
use crate::rules::opening::TEMPLATE_MOVES;
use crate::rules::RuleValidator;

/// Default proximity radius (Chebyshev rings around stones)
pub const CANDIDATE_RADIUS: i32 = 2;

/// Empty cells within `radius` rings of any stone, in board index order.
pub fn neighborhood(board: &Board, radius: i32) -> Vec<Pos> {
    if board.is_board_empty() {
        return vec![CENTER];
    }
    let mut near = [false; TOTAL_CELLS];
    for stone in board.occupied().iter_ones() {
        for dr in -radius..=radius {
            for dc in -radius..=radius {
                if let Some(p) = stone.offset(dr, dc, 1) {
                    near[p.to_index()] = true;
                }
            }
        }
    }
    (0..TOTAL_CELLS)
        .filter(|&idx| near[idx])
        .map(Pos::from_index)
        .filter(|&p| board.is_empty(p))
        .collect()
}

/// Legal candidates for a `color` stone below the root.
///
/// Falls back to every legal cell on the board when the neighbourhood has
/// none (e.g. every nearby cell is forbidden for Black).
pub fn legal_candidates(board: &Board, color: Player, validator: &RuleValidator) -> Vec<Pos> {
    let near: Vec<Pos> = neighborhood(board, CANDIDATE_RADIUS)
        .into_iter()
        .filter(|&p| validator.is_legal_stone(board, p, color))
        .collect();
    if !near.is_empty() || board.is_full() {
        return near;
    }
    all_cells()
        .filter(|&p| validator.is_legal_stone(board, p, color))
        .collect()
}

/// Root candidates for the colour to move, honouring opening constraints
/// and any pending protocol decision.
pub fn root_candidates(board: &Board, color: Player, validator: &RuleValidator) -> Vec<Pos> {
    let seat = validator.effective_player(color);
    let near: Vec<Pos> = neighborhood(board, CANDIDATE_RADIUS)
        .into_iter()
        .filter(|&p| validator.is_valid_move(board, p, seat))
        .collect();
    if !near.is_empty() || board.is_full() {
        return near;
    }
    all_cells()
        .filter(|&p| validator.is_valid_move(board, p, seat))
        .collect()
}

/// Candidates for an interior search node. Opening placement rules still
/// bind the first stones, after that only legality counts.
pub fn search_candidates(board: &Board, color: Player, validator: &RuleValidator) -> Vec<Pos> {
    if board.move_count() < TEMPLATE_MOVES {
        root_candidates(board, color, validator)
    } else {
        legal_candidates(board, color, validator)
    }
}

fn all_cells() -> impl Iterator<Item = Pos> {
    (0..TOTAL_CELLS).map(Pos::from_index)
}
