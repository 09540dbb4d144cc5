//! Opening constraints shared by the professional rule variants
//!
//! Geometry helpers for centre-based openings and the fixed three-move
//! template tables. Template cells are `(row, col)` offsets from the centre;
//! moves alternate Black, White, Black.

use crate::board::{Board, Player, Pos, CENTER};

/// Three-move opening template
pub type OpeningTemplate = [(i8, i8); 3];

/// Soosyrv openings (8). First moves are pairwise distinct.
pub const SOOSYRV_OPENINGS: [OpeningTemplate; 8] = [
    [(0, 0), (-1, 0), (-1, 1)],
    [(-1, 0), (0, 0), (-1, -1)],
    [(1, 0), (0, 0), (1, 1)],
    [(0, -1), (0, 0), (-1, -1)],
    [(0, 1), (0, 0), (1, 1)],
    [(-1, -1), (0, 0), (1, -1)],
    [(-1, 1), (0, 0), (-1, -1)],
    [(1, 1), (0, 0), (1, -1)],
];

/// Taraguchi openings (10). First moves are pairwise distinct.
pub const TARAGUCHI_OPENINGS: [OpeningTemplate; 10] = [
    [(0, 0), (0, 1), (2, 0)],
    [(1, 0), (0, 0), (2, 1)],
    [(-1, 0), (0, 0), (-2, -1)],
    [(0, 1), (0, 0), (1, 2)],
    [(0, -1), (0, 0), (-1, -2)],
    [(1, 1), (0, 0), (2, 2)],
    [(-1, -1), (0, 0), (-2, -2)],
    [(1, -1), (0, 0), (2, -2)],
    [(-1, 1), (0, 0), (-2, 2)],
    [(0, 2), (0, 1), (-1, 1)],
];

/// Number of moves an opening template covers
pub const TEMPLATE_MOVES: usize = 3;

#[inline]
pub fn is_center(pos: Pos) -> bool {
    pos == CENTER
}

/// One of the 8 cells touching the centre
#[inline]
pub fn is_center_neighbor(pos: Pos) -> bool {
    pos.chebyshev(CENTER) == 1
}

/// Inside the 5x5 block around the centre, centre excluded
#[inline]
pub fn in_center_block(pos: Pos) -> bool {
    (1..=2).contains(&pos.chebyshev(CENTER))
}

/// Absolute cell of template step `i`
#[inline]
pub fn template_cell(template: &OpeningTemplate, i: usize) -> Option<Pos> {
    let (dr, dc) = template[i];
    Pos::try_new(
        i32::from(CENTER.row) + i32::from(dr),
        i32::from(CENTER.col) + i32::from(dc),
    )
}

/// Colour of the stone played at template step `i`
#[inline]
fn step_color(i: usize) -> Player {
    if i % 2 == 0 {
        Player::Black
    } else {
        Player::White
    }
}

/// True when the board holds exactly the first `board.move_count()` steps of
/// `template`, each with the right colour.
pub fn board_follows(board: &Board, template: &OpeningTemplate) -> bool {
    let played = board.move_count();
    if played > TEMPLATE_MOVES {
        return false;
    }
    (0..played).all(|i| {
        template_cell(template, i).and_then(|p| board.get_stone(p)) == Some(step_color(i))
    })
}

/// Index of the template the board has locked in, once the first move is on
/// the board.
pub fn locked_template(board: &Board, templates: &[OpeningTemplate]) -> Option<usize> {
    if board.is_board_empty() {
        return None;
    }
    templates.iter().position(|t| board_follows(board, t))
}

/// Check whether `pos` is the next step of some template the board still
/// follows. Past the template length every move is accepted.
pub fn follows_template(board: &Board, pos: Pos, templates: &[OpeningTemplate]) -> bool {
    let step = board.move_count();
    if step >= TEMPLATE_MOVES {
        return true;
    }
    templates
        .iter()
        .filter(|t| board_follows(board, t))
        .any(|t| template_cell(t, step) == Some(pos))
}
