//! Game session controller
//!
//! A [`GameSession`] owns one board lineage together with the validator that
//! judges it. Boards are persistent values, so history is a stack of
//! snapshots and undo is a pop.

use log::{debug, info};

use crate::board::{Board, Move, Player, Pos};
use crate::error::{BoardError, GameError};
use crate::rules::{GameRule, GameState, RuleValidator, RuleValidatorFactory, SwapDecision};

/// State before a committed move
#[derive(Debug, Clone, Copy)]
struct Snapshot {
    board: Board,
    validator: RuleValidator,
    state: GameState,
}

/// One game under one rule.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    validator: RuleValidator,
    state: GameState,
    moves: Vec<Move>,
    history: Vec<Snapshot>,
}

impl GameSession {
    pub fn new(rule: GameRule) -> Self {
        Self::with_validator(RuleValidatorFactory::create(rule))
    }

    pub fn with_validator(validator: RuleValidator) -> Self {
        Self {
            board: Board::new(),
            validator,
            state: GameState::Playing,
            moves: Vec::new(),
            history: Vec::new(),
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn validator(&self) -> &RuleValidator {
        &self.validator
    }

    #[inline]
    pub fn rule(&self) -> GameRule {
        self.validator.rule()
    }

    #[inline]
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Moves played so far, oldest first.
    #[inline]
    pub fn history(&self) -> &[Move] {
        &self.moves
    }

    #[inline]
    pub fn last_move(&self) -> Option<&Move> {
        self.moves.last()
    }

    /// Colour of the next stone (stone parity).
    #[inline]
    pub fn side_to_move(&self) -> Player {
        self.board.next_color()
    }

    /// Seat that places the next stone, after any colour swaps.
    #[inline]
    pub fn seat_to_move(&self) -> Player {
        self.validator.seat_to_place(&self.board)
    }

    /// Seat that owes the pending protocol decision, if one is pending.
    #[inline]
    pub fn seat_to_decide(&self) -> Option<Player> {
        self.validator.seat_to_decide(&self.board)
    }

    /// Place the next stone at `pos`.
    pub fn play(&mut self, pos: Pos) -> Result<GameState, GameError> {
        if self.state.is_over() {
            return Err(GameError::GameOver(self.state));
        }
        if self.state.is_waiting() {
            return Err(GameError::WrongPhase {
                expected: "a stone placement",
                actual: self.state,
            });
        }
        if !pos.in_bounds() {
            return Err(BoardError::OutOfBounds {
                row: pos.row,
                col: pos.col,
            }
            .into());
        }
        if !self.board.is_empty(pos) {
            return Err(BoardError::Occupied(pos).into());
        }

        let color = self.side_to_move();
        if !self.validator.is_valid_move(&self.board, pos, self.seat_to_move()) {
            debug!("{}: {color} rejected at {pos}", self.rule());
            return Err(GameError::IllegalMove(pos));
        }

        let next = self.board.place(pos, color)?;
        let number = self.moves.len() as u16 + 1;
        let mv = Move::new(pos, color, number);

        self.history.push(Snapshot {
            board: self.board,
            validator: self.validator,
            state: self.state,
        });
        self.board = next;
        self.moves.push(mv);
        self.state = self.validator.check_game_state(&self.board, Some(&mv));

        info!("{}: move {number} {color} {pos} -> {:?}", self.rule(), self.state);
        Ok(self.state)
    }

    /// Answer a pending swap offer.
    pub fn resolve_swap(&mut self, decision: SwapDecision) -> Result<GameState, GameError> {
        self.validator.resolve_swap(&self.board, decision)?;
        Ok(self.refresh())
    }

    /// Black offers two fifth-move cells.
    pub fn propose_fifth_moves(&mut self, candidates: [Pos; 2]) -> Result<GameState, GameError> {
        self.validator.propose_fifth_moves(&self.board, candidates)?;
        Ok(self.refresh())
    }

    /// White keeps one of the offered cells. Black must play it next.
    pub fn select_fifth_move(&mut self, pos: Pos) -> Result<GameState, GameError> {
        self.validator.select_fifth_move(&self.board, pos)?;
        Ok(self.refresh())
    }

    /// Take back the last stone, along with any protocol decision made
    /// after it.
    pub fn undo(&mut self) -> Result<Move, GameError> {
        let snapshot = self.history.pop().ok_or(GameError::NothingToUndo)?;
        let mv = self.moves.pop().ok_or(GameError::NothingToUndo)?;
        self.board = snapshot.board;
        self.validator = snapshot.validator;
        self.state = snapshot.state;
        debug!("{}: undo move {} {}", self.rule(), mv.number, mv.pos);
        Ok(mv)
    }

    fn refresh(&mut self) -> GameState {
        self.state = self
            .validator
            .check_game_state(&self.board, self.moves.last());
        debug!("{}: state now {:?}", self.rule(), self.state);
        self.state
    }
}
