//! Rule validators, one per game rule
//!
//! `RuleValidator` is a closed set of variants. Stateless rules are unit
//! variants; swap-style openings carry a [`SwapProtocol`] owned by the one
//! game they validate.
//!
//! Seats vs colours: `is_valid_move` takes the *seat* that opened the game as
//! Black or White. After an odd number of swaps the seats trade colours, and
//! `effective_player` maps a seat to the colour it now plays. Win checks and
//! search-side legality work on stone colours directly.

use std::fmt;

use log::debug;

use crate::board::{Board, Move, Player, Pos};
use crate::error::GameError;

use super::forbidden;
use super::opening::{
    follows_template, in_center_block, is_center, is_center_neighbor, SOOSYRV_OPENINGS,
    TARAGUCHI_OPENINGS,
};
use super::win::find_win_line;
use super::GameState;

/// Rule variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameRule {
    StandardRenju,
    OpenRenju,
    Yamaguchi,
    Swap,
    Swap2,
    Soosyrv,
    Taraguchi,
    Freestyle,
    Caro,
}

impl GameRule {
    pub const ALL: [GameRule; 9] = [
        GameRule::StandardRenju,
        GameRule::OpenRenju,
        GameRule::Yamaguchi,
        GameRule::Swap,
        GameRule::Swap2,
        GameRule::Soosyrv,
        GameRule::Taraguchi,
        GameRule::Freestyle,
        GameRule::Caro,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GameRule::StandardRenju => "standard-renju",
            GameRule::OpenRenju => "open-renju",
            GameRule::Yamaguchi => "yamaguchi",
            GameRule::Swap => "swap",
            GameRule::Swap2 => "swap2",
            GameRule::Soosyrv => "soosyrv",
            GameRule::Taraguchi => "taraguchi",
            GameRule::Freestyle => "freestyle",
            GameRule::Caro => "caro",
        }
    }

    /// Inverse of [`GameRule::name`].
    pub fn from_name(name: &str) -> Option<GameRule> {
        GameRule::ALL.into_iter().find(|r| r.name() == name)
    }

    /// Renju family: Black has forbidden moves and needs exactly five.
    #[inline]
    pub fn has_forbidden_moves(self) -> bool {
        !matches!(self, GameRule::Freestyle | GameRule::Caro)
    }
}

impl fmt::Display for GameRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Answer to a swap offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapDecision {
    /// Keep colours
    Stay,
    /// Trade colours
    Swap,
    /// Swap2 only: place two more stones and hand the choice back
    PlaceTwoMore,
}

/// Fifth-move protocol progress (Open Renju, Yamaguchi)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FifthMove {
    #[default]
    Pending,
    /// Black offered two cells; White picks one
    Proposed([Pos; 2]),
    /// White picked; the next stone must go here
    Selected(Pos),
}

/// Decision bookkeeping for swap-style openings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwapProtocol {
    swapped: bool,
    decisions: u8,
    extended: bool,
    fifth: FifthMove,
}

impl SwapProtocol {
    #[inline]
    pub fn is_swapped(&self) -> bool {
        self.swapped
    }

    #[inline]
    pub fn fifth(&self) -> FifthMove {
        self.fifth
    }

    /// Seat that answers the next swap offer. The second player answers
    /// the first; after a Swap2 `PlaceTwoMore` the opener answers.
    #[inline]
    pub fn decider(&self) -> Player {
        if self.decisions == 0 {
            Player::White
        } else {
            Player::Black
        }
    }
}

/// Stones on the board when the (first) swap decision is due
const SWAP_POINT: usize = 3;
/// Swap2: second decision after two more stones
const SWAP2_SECOND_POINT: usize = 5;
/// Stones on the board when Black proposes fifth moves
const FIFTH_POINT: usize = 4;

/// Per-game rule validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleValidator {
    StandardRenju,
    OpenRenju(SwapProtocol),
    Yamaguchi(SwapProtocol),
    Swap(SwapProtocol),
    Swap2(SwapProtocol),
    Soosyrv,
    Taraguchi,
    Freestyle,
    Caro,
}

/// Maps a rule tag to a fresh validator
pub struct RuleValidatorFactory;

impl RuleValidatorFactory {
    pub fn create(rule: GameRule) -> RuleValidator {
        match rule {
            GameRule::StandardRenju => RuleValidator::StandardRenju,
            GameRule::OpenRenju => RuleValidator::OpenRenju(SwapProtocol::default()),
            GameRule::Yamaguchi => RuleValidator::Yamaguchi(SwapProtocol::default()),
            GameRule::Swap => RuleValidator::Swap(SwapProtocol::default()),
            GameRule::Swap2 => RuleValidator::Swap2(SwapProtocol::default()),
            GameRule::Soosyrv => RuleValidator::Soosyrv,
            GameRule::Taraguchi => RuleValidator::Taraguchi,
            GameRule::Freestyle => RuleValidator::Freestyle,
            GameRule::Caro => RuleValidator::Caro,
        }
    }
}

impl RuleValidator {
    pub fn rule(&self) -> GameRule {
        match self {
            RuleValidator::StandardRenju => GameRule::StandardRenju,
            RuleValidator::OpenRenju(_) => GameRule::OpenRenju,
            RuleValidator::Yamaguchi(_) => GameRule::Yamaguchi,
            RuleValidator::Swap(_) => GameRule::Swap,
            RuleValidator::Swap2(_) => GameRule::Swap2,
            RuleValidator::Soosyrv => GameRule::Soosyrv,
            RuleValidator::Taraguchi => GameRule::Taraguchi,
            RuleValidator::Freestyle => GameRule::Freestyle,
            RuleValidator::Caro => GameRule::Caro,
        }
    }

    pub fn protocol(&self) -> Option<&SwapProtocol> {
        match self {
            RuleValidator::OpenRenju(p)
            | RuleValidator::Yamaguchi(p)
            | RuleValidator::Swap(p)
            | RuleValidator::Swap2(p) => Some(p),
            _ => None,
        }
    }

    fn protocol_mut(&mut self) -> Option<&mut SwapProtocol> {
        match self {
            RuleValidator::OpenRenju(p)
            | RuleValidator::Yamaguchi(p)
            | RuleValidator::Swap(p)
            | RuleValidator::Swap2(p) => Some(p),
            _ => None,
        }
    }

    #[inline]
    fn has_fifth_move_protocol(&self) -> bool {
        matches!(self, RuleValidator::OpenRenju(_) | RuleValidator::Yamaguchi(_))
    }

    #[inline]
    pub fn is_swapped(&self) -> bool {
        self.protocol().is_some_and(SwapProtocol::is_swapped)
    }

    /// Colour played by `seat`. Also maps a colour back to its seat.
    #[inline]
    pub fn effective_player(&self, seat: Player) -> Player {
        if self.is_swapped() {
            seat.opponent()
        } else {
            seat
        }
    }

    /// Swap2 after `PlaceTwoMore`: stones 4 and 5 both belong to the seat
    /// that asked for them.
    fn in_swap2_extension(&self, board: &Board) -> bool {
        match self {
            RuleValidator::Swap2(p) => {
                p.extended
                    && p.decisions == 1
                    && (SWAP_POINT..SWAP2_SECOND_POINT).contains(&board.move_count())
            }
            _ => false,
        }
    }

    /// Seat that places the next stone on `board`.
    pub fn seat_to_place(&self, board: &Board) -> Player {
        if self.in_swap2_extension(board) {
            Player::White
        } else {
            self.effective_player(board.next_color())
        }
    }

    /// Seat that owes the decision `board` is waiting on, if any.
    pub fn seat_to_decide(&self, board: &Board) -> Option<Player> {
        match self.pending_decision(board)? {
            GameState::WaitingForSwap => self.protocol().map(SwapProtocol::decider),
            GameState::WaitingForFifthMove => Some(self.effective_player(Player::Black)),
            GameState::WaitingForFifthMoveSelection => Some(self.effective_player(Player::White)),
            _ => None,
        }
    }

    /// Colour of the stone `seat` would place next.
    fn stone_color(&self, board: &Board, seat: Player) -> Player {
        if self.in_swap2_extension(board) {
            board.next_color()
        } else {
            self.effective_player(seat)
        }
    }

    /// Forbidden-shape check for a stone of `color`.
    #[inline]
    fn forbids(&self, board: &Board, pos: Pos, color: Player) -> bool {
        self.rule().has_forbidden_moves()
            && color == Player::Black
            && forbidden::is_forbidden(board, pos)
    }

    /// Double-three check for `seat`; always false without forbidden moves.
    pub fn is_double_three(&self, board: &Board, pos: Pos, seat: Player) -> bool {
        self.rule().has_forbidden_moves()
            && self.effective_player(seat) == Player::Black
            && forbidden::is_double_three(board, pos)
    }

    /// Double-four check for `seat`; always false without forbidden moves.
    pub fn is_double_four(&self, board: &Board, pos: Pos, seat: Player) -> bool {
        self.rule().has_forbidden_moves()
            && self.effective_player(seat) == Player::Black
            && forbidden::is_double_four(board, pos)
    }

    /// Placement legality of a `color` stone, ignoring opening phases.
    ///
    /// This is what search uses below the root: empty cell and no forbidden
    /// shape.
    #[inline]
    pub fn is_legal_stone(&self, board: &Board, pos: Pos, color: Player) -> bool {
        board.is_empty(pos) && !self.forbids(board, pos, color)
    }

    /// Opening-phase placement constraints.
    fn opening_allows(&self, board: &Board, pos: Pos, seat: Player) -> bool {
        let step = board.move_count();
        match self {
            RuleValidator::OpenRenju(_) => match step {
                0 => is_center(pos) && self.effective_player(seat) == Player::Black,
                1 => is_center_neighbor(pos),
                2 => in_center_block(pos),
                _ => self.fifth_allows(step, pos),
            },
            RuleValidator::Yamaguchi(_) => self.fifth_allows(step, pos),
            RuleValidator::Soosyrv => follows_template(board, pos, &SOOSYRV_OPENINGS),
            RuleValidator::Taraguchi => follows_template(board, pos, &TARAGUCHI_OPENINGS),
            _ => true,
        }
    }

    /// After a fifth-move selection the next stone must be the chosen cell.
    fn fifth_allows(&self, step: usize, pos: Pos) -> bool {
        match self.protocol().map(SwapProtocol::fifth) {
            Some(FifthMove::Selected(chosen)) if step == FIFTH_POINT => pos == chosen,
            _ => true,
        }
    }

    /// Waiting state the protocol is in, if a decision is outstanding.
    pub fn pending_decision(&self, board: &Board) -> Option<GameState> {
        let p = self.protocol()?;
        let stones = board.move_count();

        if stones == SWAP_POINT && p.decisions == 0 {
            return Some(GameState::WaitingForSwap);
        }
        if matches!(self, RuleValidator::Swap2(_))
            && stones == SWAP2_SECOND_POINT
            && p.extended
            && p.decisions == 1
        {
            return Some(GameState::WaitingForSwap);
        }
        if self.has_fifth_move_protocol() && stones == FIFTH_POINT {
            return match p.fifth {
                FifthMove::Pending => Some(GameState::WaitingForFifthMove),
                FifthMove::Proposed(_) => Some(GameState::WaitingForFifthMoveSelection),
                FifthMove::Selected(_) => None,
            };
        }
        None
    }

    /// Can `seat` place a stone at `pos` right now?
    pub fn is_valid_move(&self, board: &Board, pos: Pos, seat: Player) -> bool {
        if !board.is_empty(pos) {
            return false;
        }
        if self.pending_decision(board).is_some() {
            return false;
        }
        if !self.opening_allows(board, pos, seat) {
            return false;
        }
        !self.forbids(board, pos, self.stone_color(board, seat))
    }

    /// Win check for a `color` stone at `pos`. The reported winner is the
    /// colour of the winning stones.
    pub fn check_win(&self, board: &Board, pos: Pos, color: Player) -> GameState {
        let exact = self.rule().has_forbidden_moves() && color == Player::Black;
        match find_win_line(board, pos, color, exact) {
            Some(line) => GameState::Won {
                winner: color,
                line,
            },
            None => GameState::Playing,
        }
    }

    /// Game state after `last_move` (a win beats a full board, which beats an
    /// outstanding protocol decision).
    pub fn check_game_state(&self, board: &Board, last_move: Option<&Move>) -> GameState {
        if let Some(mv) = last_move {
            let state = self.check_win(board, mv.pos, mv.player);
            if state.is_over() {
                return state;
            }
        }
        if board.is_full() {
            return GameState::Draw;
        }
        self.pending_decision(board).unwrap_or(GameState::Playing)
    }

    fn expect_phase(
        &self,
        board: &Board,
        wanted: GameState,
        expected: &'static str,
    ) -> Result<(), GameError> {
        let actual = self.check_game_state(board, None);
        if actual == wanted {
            Ok(())
        } else {
            Err(GameError::WrongPhase { expected, actual })
        }
    }

    /// Apply a swap decision while `WaitingForSwap`.
    pub fn resolve_swap(&mut self, board: &Board, decision: SwapDecision) -> Result<(), GameError> {
        self.expect_phase(board, GameState::WaitingForSwap, "a swap decision")?;
        let rule = self.rule();
        let p = self
            .protocol_mut()
            .ok_or(GameError::UnsupportedDecision(decision))?;

        match decision {
            SwapDecision::Stay => {}
            SwapDecision::Swap => p.swapped = !p.swapped,
            SwapDecision::PlaceTwoMore => {
                if rule != GameRule::Swap2 || p.decisions > 0 {
                    return Err(GameError::UnsupportedDecision(decision));
                }
                p.extended = true;
            }
        }
        p.decisions += 1;
        debug!(
            "{rule}: swap decision {decision:?} after {} stones (swapped={})",
            board.move_count(),
            p.swapped
        );
        Ok(())
    }

    /// Black offers two candidate fifth moves while `WaitingForFifthMove`.
    pub fn propose_fifth_moves(
        &mut self,
        board: &Board,
        candidates: [Pos; 2],
    ) -> Result<(), GameError> {
        self.expect_phase(board, GameState::WaitingForFifthMove, "fifth-move proposals")?;
        let [a, b] = candidates;
        if a == b
            || !self.is_legal_stone(board, a, Player::Black)
            || !self.is_legal_stone(board, b, Player::Black)
        {
            return Err(GameError::InvalidProposal);
        }
        if let Some(p) = self.protocol_mut() {
            p.fifth = FifthMove::Proposed(candidates);
        }
        debug!("{}: fifth-move proposals {a} and {b}", self.rule());
        Ok(())
    }

    /// White keeps one proposal. Returns the cell Black must now play.
    pub fn select_fifth_move(&mut self, board: &Board, pos: Pos) -> Result<Pos, GameError> {
        self.expect_phase(
            board,
            GameState::WaitingForFifthMoveSelection,
            "a fifth-move selection",
        )?;
        let p = self.protocol_mut().ok_or(GameError::NotProposed(pos))?;
        match p.fifth {
            FifthMove::Proposed(candidates) if candidates.contains(&pos) => {
                p.fifth = FifthMove::Selected(pos);
                Ok(pos)
            }
            _ => Err(GameError::NotProposed(pos)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CENTER;

    fn play(board: Board, cells: &[(u8, u8)]) -> Board {
        cells.iter().fold(board, |b, &(r, c)| {
            let color = b.next_color();
            b.place(Pos::new(r, c), color).unwrap()
        })
    }

    fn board_with(black: &[(u8, u8)], white: &[(u8, u8)]) -> Board {
        let mut board = Board::new();
        for &(r, c) in black {
            board = board.place(Pos::new(r, c), Player::Black).unwrap();
        }
        for &(r, c) in white {
            board = board.place(Pos::new(r, c), Player::White).unwrap();
        }
        board
    }

    #[test]
    fn test_factory_covers_all_rules() {
        for rule in GameRule::ALL {
            assert_eq!(RuleValidatorFactory::create(rule).rule(), rule);
            assert_eq!(GameRule::from_name(rule.name()), Some(rule));
        }
        assert_eq!(GameRule::from_name("gomoku"), None);
    }

    #[test]
    fn test_open_renju_first_move_only_center() {
        let v = RuleValidatorFactory::create(GameRule::OpenRenju);
        let board = Board::new();
        for idx in 0..crate::board::TOTAL_CELLS {
            let pos = Pos::from_index(idx);
            assert_eq!(v.is_valid_move(&board, pos, Player::Black), pos == CENTER);
        }
        assert!(!v.is_valid_move(&board, CENTER, Player::White));
    }

    #[test]
    fn test_open_renju_second_move_neighbors() {
        let v = RuleValidatorFactory::create(GameRule::OpenRenju);
        let board = play(Board::new(), &[(7, 7)]);
        let legal: Vec<Pos> = (0..crate::board::TOTAL_CELLS)
            .map(Pos::from_index)
            .filter(|&p| v.is_valid_move(&board, p, Player::White))
            .collect();
        assert_eq!(legal.len(), 8);
        assert!(legal.iter().all(|p| p.chebyshev(CENTER) == 1));
        assert!(!v.is_valid_move(&board, CENTER, Player::White));
    }

    #[test]
    fn test_open_renju_third_move_block() {
        let v = RuleValidatorFactory::create(GameRule::OpenRenju);
        let board = play(Board::new(), &[(7, 7), (7, 8)]);
        assert!(v.is_valid_move(&board, Pos::new(9, 9), Player::Black));
        assert!(!v.is_valid_move(&board, Pos::new(10, 7), Player::Black));
    }

    #[test]
    fn test_open_renju_protocol() {
        let mut v = RuleValidatorFactory::create(GameRule::OpenRenju);
        let board = play(Board::new(), &[(7, 7), (7, 8), (8, 9)]);
        let last = Move::new(Pos::new(8, 9), Player::Black, 3);
        assert_eq!(v.check_game_state(&board, Some(&last)), GameState::WaitingForSwap);
        assert!(!v.is_valid_move(&board, Pos::new(0, 0), Player::White));

        v.resolve_swap(&board, SwapDecision::Swap).unwrap();
        assert!(v.is_swapped());
        // The seat that opened as Black now plays White
        assert_eq!(v.effective_player(Player::Black), Player::White);
        assert!(v.is_valid_move(&board, Pos::new(0, 0), Player::Black));

        let board = play(board, &[(6, 6)]);
        assert_eq!(v.check_game_state(&board, None), GameState::WaitingForFifthMove);

        let a = Pos::new(9, 9);
        let b = Pos::new(5, 5);
        assert_eq!(
            v.select_fifth_move(&board, a),
            Err(GameError::WrongPhase {
                expected: "a fifth-move selection",
                actual: GameState::WaitingForFifthMove,
            })
        );
        assert_eq!(v.propose_fifth_moves(&board, [a, a]), Err(GameError::InvalidProposal));
        v.propose_fifth_moves(&board, [a, b]).unwrap();
        assert_eq!(
            v.check_game_state(&board, None),
            GameState::WaitingForFifthMoveSelection
        );
        assert_eq!(
            v.select_fifth_move(&board, Pos::new(1, 1)),
            Err(GameError::NotProposed(Pos::new(1, 1)))
        );
        assert_eq!(v.select_fifth_move(&board, b), Ok(b));
        assert_eq!(v.check_game_state(&board, None), GameState::Playing);

        // Only the selected cell may be played next
        let black_seat = v.effective_player(Player::Black);
        assert!(!v.is_valid_move(&board, a, black_seat));
        assert!(v.is_valid_move(&board, b, black_seat));
    }

    #[test]
    fn test_standard_renju_open_four_legal() {
        let v = RuleValidatorFactory::create(GameRule::StandardRenju);
        let board = board_with(&[(7, 5), (7, 6), (7, 7), (7, 8)], &[(0, 0), (0, 2), (0, 4)]);
        assert!(v.is_valid_move(&board, Pos::new(7, 4), Player::Black));
        assert!(v.is_valid_move(&board, Pos::new(7, 9), Player::Black));
    }

    #[test]
    fn test_standard_renju_double_three_rejected() {
        let v = RuleValidatorFactory::create(GameRule::StandardRenju);
        let board = board_with(&[(7, 6), (7, 8), (6, 7), (8, 7)], &[(0, 0), (0, 2), (0, 4)]);
        assert!(!v.is_valid_move(&board, CENTER, Player::Black));
        assert!(v.is_double_three(&board, CENTER, Player::Black));
        // White has no restrictions
        assert!(v.is_valid_move(&board, CENTER, Player::White));
    }

    #[test]
    fn test_caro_disables_forbidden_checks() {
        let v = RuleValidatorFactory::create(GameRule::Caro);
        let board = board_with(&[(7, 6), (7, 8), (6, 7), (8, 7)], &[]);
        assert!(!v.is_double_three(&board, CENTER, Player::Black));
        assert!(!v.is_double_four(&board, CENTER, Player::Black));
        assert!(v.is_valid_move(&board, CENTER, Player::Black));
    }

    #[test]
    fn test_freestyle_overline_wins() {
        let v = RuleValidatorFactory::create(GameRule::Freestyle);
        let board = board_with(&[(7, 2), (7, 3), (7, 4), (7, 5), (7, 6), (7, 7)], &[]);
        let state = v.check_win(&board, CENTER, Player::Black);
        assert!(matches!(state, GameState::Won { winner: Player::Black, .. }));

        let renju = RuleValidatorFactory::create(GameRule::StandardRenju);
        assert_eq!(renju.check_win(&board, CENTER, Player::Black), GameState::Playing);
        // White overline still wins under Renju
        let white = board_with(&[], &[(7, 2), (7, 3), (7, 4), (7, 5), (7, 6), (7, 7)]);
        assert!(renju.check_win(&white, CENTER, Player::White).is_over());
    }

    #[test]
    fn test_swap2_place_two_more() {
        let mut v = RuleValidatorFactory::create(GameRule::Swap2);
        let board = play(Board::new(), &[(0, 0), (14, 14), (3, 3)]);
        assert_eq!(v.check_game_state(&board, None), GameState::WaitingForSwap);
        v.resolve_swap(&board, SwapDecision::PlaceTwoMore).unwrap();
        assert_eq!(v.check_game_state(&board, None), GameState::Playing);

        let board = play(board, &[(5, 5), (6, 6)]);
        assert_eq!(v.check_game_state(&board, None), GameState::WaitingForSwap);
        assert_eq!(
            v.resolve_swap(&board, SwapDecision::PlaceTwoMore),
            Err(GameError::UnsupportedDecision(SwapDecision::PlaceTwoMore))
        );
        v.resolve_swap(&board, SwapDecision::Swap).unwrap();
        assert!(v.is_swapped());
        assert_eq!(v.check_game_state(&board, None), GameState::Playing);
    }

    #[test]
    fn test_swap2_extension_seats() {
        let mut v = RuleValidatorFactory::create(GameRule::Swap2);
        let board = play(Board::new(), &[(7, 7), (7, 8), (8, 8)]);
        // The second player answers the first offer
        assert_eq!(v.seat_to_decide(&board), Some(Player::White));
        v.resolve_swap(&board, SwapDecision::PlaceTwoMore).unwrap();

        // ...and places both extra stones, White then Black
        assert_eq!(v.seat_to_place(&board), Player::White);
        let board = play(board, &[(6, 6)]);
        assert_eq!(board.next_color(), Player::Black);
        assert_eq!(v.seat_to_place(&board), Player::White);
        assert!(v.is_valid_move(&board, Pos::new(9, 9), Player::White));

        // The opener makes the final colour choice
        let board = play(board, &[(9, 9)]);
        assert_eq!(v.seat_to_decide(&board), Some(Player::Black));
        v.resolve_swap(&board, SwapDecision::Swap).unwrap();
        assert_eq!(v.seat_to_decide(&board), None);
        // Opener now plays White, which moves next
        assert_eq!(v.seat_to_place(&board), Player::Black);
    }

    #[test]
    fn test_yamaguchi_swap_then_fifth_move() {
        let mut v = RuleValidatorFactory::create(GameRule::Yamaguchi);
        // No opening geometry: any first stone is fine
        assert!(v.is_valid_move(&Board::new(), Pos::new(2, 3), Player::Black));

        let board = play(Board::new(), &[(7, 7), (6, 8), (8, 6)]);
        assert_eq!(v.check_game_state(&board, None), GameState::WaitingForSwap);
        assert_eq!(v.seat_to_decide(&board), Some(Player::White));
        v.resolve_swap(&board, SwapDecision::Stay).unwrap();

        let board = play(board, &[(9, 9)]);
        assert_eq!(v.check_game_state(&board, None), GameState::WaitingForFifthMove);
        assert_eq!(v.seat_to_decide(&board), Some(Player::Black));
        let (a, b) = (Pos::new(5, 5), Pos::new(10, 4));
        v.propose_fifth_moves(&board, [a, b]).unwrap();
        assert_eq!(v.seat_to_decide(&board), Some(Player::White));
        assert_eq!(v.select_fifth_move(&board, a), Ok(a));

        assert_eq!(v.check_game_state(&board, None), GameState::Playing);
        assert!(v.is_valid_move(&board, a, Player::Black));
        assert!(!v.is_valid_move(&board, b, Player::Black));
        // Past the fifth stone placement is free again
        let board = play(board, &[(5, 5), (0, 0)]);
        assert!(v.is_valid_move(&board, b, Player::Black));
    }

    #[test]
    fn test_soosyrv_template_locking() {
        let v = RuleValidatorFactory::create(GameRule::Soosyrv);
        let board = Board::new();
        assert!(v.is_valid_move(&board, Pos::new(8, 8), Player::Black));
        assert!(!v.is_valid_move(&board, Pos::new(9, 9), Player::Black));

        // (+1, +1) locks the template continuing centre, then (+1, -1)
        let board = play(board, &[(8, 8)]);
        assert!(v.is_valid_move(&board, CENTER, Player::White));
        assert!(!v.is_valid_move(&board, Pos::new(8, 7), Player::White));

        let board = play(board, &[(7, 7)]);
        assert!(v.is_valid_move(&board, Pos::new(8, 6), Player::Black));
        assert!(!v.is_valid_move(&board, Pos::new(6, 6), Player::Black));

        // Template complete: placement is free
        let board = play(board, &[(8, 6)]);
        assert!(v.is_valid_move(&board, Pos::new(0, 0), Player::White));
    }

    #[test]
    fn test_swap_rejects_place_two_more() {
        let mut v = RuleValidatorFactory::create(GameRule::Swap);
        let board = play(Board::new(), &[(7, 7), (7, 8), (8, 8)]);
        assert_eq!(
            v.resolve_swap(&board, SwapDecision::PlaceTwoMore),
            Err(GameError::UnsupportedDecision(SwapDecision::PlaceTwoMore))
        );
        v.resolve_swap(&board, SwapDecision::Stay).unwrap();
        assert!(!v.is_swapped());
        let board = play(board, &[(9, 9)]);
        // Plain Swap has no fifth-move step
        assert_eq!(v.check_game_state(&board, None), GameState::Playing);
    }

    #[test]
    fn test_resolve_swap_wrong_phase() {
        let mut v = RuleValidatorFactory::create(GameRule::StandardRenju);
        let board = Board::new();
        assert!(matches!(
            v.resolve_swap(&board, SwapDecision::Swap),
            Err(GameError::WrongPhase { .. })
        ));
    }

    #[test]
    fn test_taraguchi_template_locking() {
        let v = RuleValidatorFactory::create(GameRule::Taraguchi);
        let board = Board::new();
        assert!(v.is_valid_move(&board, CENTER, Player::Black));
        assert!(!v.is_valid_move(&board, Pos::new(3, 3), Player::Black));

        let board = play(board, &[(7, 7)]);
        assert!(v.is_valid_move(&board, Pos::new(7, 8), Player::White));
        assert!(!v.is_valid_move(&board, Pos::new(6, 7), Player::White));
    }

    #[test]
    fn test_draw_on_full_board() {
        let v = RuleValidatorFactory::create(GameRule::Freestyle);
        // Pattern with no five in any direction: rows shifted in pairs
        let mut board = Board::new();
        for idx in 0..crate::board::TOTAL_CELLS {
            let pos = Pos::from_index(idx);
            let band = (pos.col as usize / 2 + pos.row as usize) % 2;
            let color = if band == 0 { Player::Black } else { Player::White };
            board = board.place(pos, color).unwrap();
        }
        assert!(board.is_full());
        assert_eq!(v.check_game_state(&board, None), GameState::Draw);
    }
}
