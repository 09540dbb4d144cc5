//! Win condition checking
//!
//! Freestyle-style variants win with five or more in a row. Renju-style
//! variants require exactly five for Black; an overline does not count.

use crate::board::{Board, Player, Pos, DIRECTIONS};

/// Count contiguous `player` stones from `pos` along `(dr, dc)`, excluding
/// `pos` itself.
#[inline]
fn run_one_way(board: &Board, pos: Pos, player: Player, dr: i32, dc: i32) -> usize {
    let mut n = 0;
    while let Some(p) = pos.offset(dr, dc, n as i32 + 1) {
        if board.get_stone(p) != Some(player) {
            break;
        }
        n += 1;
    }
    n
}

/// Length of the contiguous run through `pos` along one axis, counting `pos`
/// as a `player` stone whether or not it is on the board yet.
#[inline]
pub fn run_length(board: &Board, pos: Pos, player: Player, dr: i32, dc: i32) -> usize {
    1 + run_one_way(board, pos, player, dr, dc) + run_one_way(board, pos, player, -dr, -dc)
}

/// Longest run through `pos` over the four axes.
pub fn longest_run(board: &Board, pos: Pos, player: Player) -> usize {
    DIRECTIONS
        .iter()
        .map(|&(dr, dc)| run_length(board, pos, player, dr, dc))
        .max()
        .unwrap_or(1)
}

/// True when a stone at `pos` completes a line of exactly five.
#[inline]
pub fn makes_exact_five(board: &Board, pos: Pos, player: Player) -> bool {
    DIRECTIONS
        .iter()
        .any(|&(dr, dc)| run_length(board, pos, player, dr, dc) == 5)
}

/// True when a stone at `pos` completes six or more.
#[inline]
pub fn makes_overline(board: &Board, pos: Pos, player: Player) -> bool {
    DIRECTIONS
        .iter()
        .any(|&(dr, dc)| run_length(board, pos, player, dr, dc) >= 6)
}

/// Five-cell winning line through `pos`, if any.
///
/// `exact` rejects runs longer than five (Renju Black). The returned line is
/// ordered along the axis and always contains `pos`; longer runs are trimmed
/// to the five cells around it.
pub fn find_win_line(board: &Board, pos: Pos, player: Player, exact: bool) -> Option<[Pos; 5]> {
    for &(dr, dc) in &DIRECTIONS {
        let back = run_one_way(board, pos, player, -dr, -dc);
        let fwd = run_one_way(board, pos, player, dr, dc);
        let len = back + 1 + fwd;
        if len < 5 || (exact && len != 5) {
            continue;
        }
        // Index of `pos` inside the run, then the window start that keeps it
        let start = back.saturating_sub(2).min(len - 5);
        let first = start as i32 - back as i32;
        let mut line = [pos; 5];
        for (i, cell) in line.iter_mut().enumerate() {
            *cell = pos.offset(dr, dc, first + i as i32)?;
        }
        return Some(line);
    }
    None
}

/// True when a `player` stone at `pos` is part of a winning run.
#[inline]
pub fn has_five_at_pos(board: &Board, pos: Pos, player: Player, exact: bool) -> bool {
    find_win_line(board, pos, player, exact).is_some()
}

/// First winning line anywhere on the board for `player`.
///
/// Scans only run starts (a stone whose predecessor on the axis is not its
/// own), so each run is measured once.
pub fn find_five_positions(board: &Board, player: Player, exact: bool) -> Option<[Pos; 5]> {
    for pos in board.stones(player).iter_ones() {
        for &(dr, dc) in &DIRECTIONS {
            let prev = pos.offset(-dr, -dc, 1);
            if prev.and_then(|p| board.get_stone(p)) == Some(player) {
                continue;
            }
            let len = 1 + run_one_way(board, pos, player, dr, dc);
            if len >= 5 && (!exact || len == 5) {
                let mut line = [pos; 5];
                for (i, cell) in line.iter_mut().enumerate() {
                    *cell = pos.offset(dr, dc, i as i32)?;
                }
                return Some(line);
            }
        }
    }
    None
}

/// Check if there's a winning line anywhere for `player`
#[inline]
pub fn has_five_in_row(board: &Board, player: Player, exact: bool) -> bool {
    find_five_positions(board, player, exact).is_some()
}
