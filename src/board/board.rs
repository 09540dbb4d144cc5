//! Persistent board: placing a stone yields a new board

use std::fmt;

use super::bitboard::Bitboard;
use super::{Move, Player, Pos, BOARD_SIZE, TOTAL_CELLS};
use crate::error::BoardError;

/// Game board.
///
/// The whole grid is a pair of 256-bit sets, so `Board` is `Copy` and every
/// placement returns a fresh value. Search code forks boards freely; no node
/// ever observes a sibling's stones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    black: Bitboard,
    white: Bitboard,
    move_count: u16,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn size(&self) -> usize {
        BOARD_SIZE
    }

    /// Stone at position; `None` for empty or off-board cells.
    #[inline]
    pub fn get_stone(&self, pos: Pos) -> Option<Player> {
        if !pos.in_bounds() {
            return None;
        }
        if self.black.get(pos) {
            Some(Player::Black)
        } else if self.white.get(pos) {
            Some(Player::White)
        } else {
            None
        }
    }

    /// Check if position is empty (off-board cells are never empty)
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        pos.in_bounds() && !self.black.get(pos) && !self.white.get(pos)
    }

    /// Commit a move, returning the successor board.
    pub fn place_stone(&self, mv: &Move) -> Result<Board, BoardError> {
        self.place(mv.pos, mv.player)
    }

    /// Place a stone for `player`, returning the successor board.
    pub fn place(&self, pos: Pos, player: Player) -> Result<Board, BoardError> {
        if !pos.in_bounds() {
            return Err(BoardError::OutOfBounds {
                row: pos.row,
                col: pos.col,
            });
        }
        if !self.is_empty(pos) {
            return Err(BoardError::Occupied(pos));
        }
        Ok(self.placed(pos, player))
    }

    /// Successor board for a cell the caller already knows is empty.
    #[inline]
    pub(crate) fn placed(&self, pos: Pos, player: Player) -> Board {
        debug_assert!(self.is_empty(pos), "cell {pos} already occupied");
        let mut next = *self;
        match player {
            Player::Black => next.black.set(pos),
            Player::White => next.white.set(pos),
        }
        next.move_count += 1;
        next
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.move_count as usize >= TOTAL_CELLS
    }

    /// Number of stones on the board
    #[inline]
    pub fn move_count(&self) -> usize {
        self.move_count as usize
    }

    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.move_count == 0
    }

    /// Bitboard for a color
    #[inline]
    pub fn stones(&self, player: Player) -> &Bitboard {
        match player {
            Player::Black => &self.black,
            Player::White => &self.white,
        }
    }

    /// All occupied cells
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.black.union(&self.white)
    }

    /// Color whose turn it is by stone parity (Black moves first)
    #[inline]
    pub fn next_color(&self) -> Player {
        if self.move_count % 2 == 0 {
            Player::Black
        } else {
            Player::White
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for c in 0..BOARD_SIZE as u8 {
            write!(f, " {}", (b'A' + c) as char)?;
        }
        writeln!(f)?;
        for r in (0..BOARD_SIZE as u8).rev() {
            write!(f, "{:>3}", r + 1)?;
            for c in 0..BOARD_SIZE as u8 {
                let symbol = match self.get_stone(Pos::new(r, c)) {
                    Some(Player::Black) => 'X',
                    Some(Player::White) => 'O',
                    None => '.',
                };
                write!(f, " {symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
