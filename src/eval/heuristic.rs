//! Heuristic evaluation function for board positions
//!
//! The score combines five signals, each measured as own minus opponent:
//! - Pattern score (template matches plus a threat-level bonus)
//! - Influence (stones radiate decaying influence up to Manhattan distance 3)
//! - Connectivity (squared count of adjacent friendly stones)
//! - Territory (empty cells one side dominates)
//! - Mobility (promising empty cells next to stones)
//!
//! Every signal is antisymmetric, so `evaluate(b, Black) == -evaluate(b, White)`
//! as negamax requires.

use crate::board::{Board, Player, Pos, TOTAL_CELLS};
use crate::pattern::{CategoryCounts, PatternRecognizer, ThreatLevel};
use crate::rules::{has_five_in_row, GameRule, RuleValidator};
use crate::search::candidates::neighborhood;

/// Terminal score for a decided game
pub const WIN_SCORE: i32 = 10_000_000;

/// Influence radius (Manhattan)
const INFLUENCE_RADIUS: i32 = 3;
/// A side claims a cell when its influence exceeds this multiple of the other's
const TERRITORY_RATIO: i32 = 2;
/// Value of one claimed cell
const TERRITORY_CELL: i32 = 10;
/// Own influence an empty cell needs to count as a promising move
const MOBILITY_THRESHOLD: i32 = 6;
/// Value of one promising cell
const MOBILITY_CELL: i32 = 10;

/// Signal weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalWeights {
    pub pattern: f64,
    pub influence: f64,
    pub connectivity: f64,
    pub territory: f64,
    pub mobility: f64,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            pattern: 1.0,
            influence: 0.3,
            connectivity: 0.5,
            territory: 0.2,
            mobility: 0.1,
        }
    }
}

/// Bonus for the threat level a side can reach
#[inline]
fn threat_bonus(level: ThreatLevel) -> i32 {
    match level {
        ThreatLevel::ImmediateWin => 50_000,
        ThreatLevel::Double => 20_000,
        ThreatLevel::Single => 5_000,
        ThreatLevel::ForcingSequence => 1_000,
        ThreatLevel::Minor => 100,
        ThreatLevel::None => 0,
    }
}

/// Unweighted signal values, own minus opponent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signals {
    pub pattern: i32,
    pub influence: i32,
    pub connectivity: i32,
    pub territory: i32,
    pub mobility: i32,
}

/// Position evaluator for one rule set.
#[derive(Debug, Clone, Copy)]
pub struct PositionEvaluator {
    recognizer: PatternRecognizer,
    weights: EvalWeights,
    /// Black needs exactly five (Renju family)
    exact_black: bool,
}

impl Default for PositionEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionEvaluator {
    /// Evaluator for standard Renju scoring.
    pub fn new() -> Self {
        Self::for_rule(GameRule::StandardRenju)
    }

    pub fn for_rule(rule: GameRule) -> Self {
        Self::with_weights(rule, EvalWeights::default())
    }

    pub fn with_weights(rule: GameRule, weights: EvalWeights) -> Self {
        Self {
            recognizer: PatternRecognizer::new(),
            weights,
            exact_black: rule.has_forbidden_moves(),
        }
    }

    #[inline]
    pub fn weights(&self) -> &EvalWeights {
        &self.weights
    }

    #[inline]
    pub fn recognizer(&self) -> &PatternRecognizer {
        &self.recognizer
    }

    /// Does `player` already have a winning line on `board`?
    #[inline]
    pub fn has_won(&self, board: &Board, player: Player) -> bool {
        let exact = self.exact_black && player == Player::Black;
        has_five_in_row(board, player, exact)
    }

    /// Evaluate the board from the perspective of `player`.
    ///
    /// Returns `WIN_SCORE` / `-WIN_SCORE` for decided games, 0 for a full
    /// board, otherwise the weighted signal sum.
    #[must_use]
    pub fn evaluate(&self, board: &Board, player: Player) -> i32 {
        let opponent = player.opponent();
        if self.has_won(board, player) {
            return WIN_SCORE;
        }
        if self.has_won(board, opponent) {
            return -WIN_SCORE;
        }
        if board.is_full() {
            return 0;
        }
        if board.is_board_empty() {
            return 0;
        }

        let s = self.signals(board, player);
        let w = &self.weights;
        let total = w.pattern * f64::from(s.pattern)
            + w.influence * f64::from(s.influence)
            + w.connectivity * f64::from(s.connectivity)
            + w.territory * f64::from(s.territory)
            + w.mobility * f64::from(s.mobility);
        total.round() as i32
    }

    /// Raw signals for `player` (own minus opponent).
    pub fn signals(&self, board: &Board, player: Player) -> Signals {
        let opponent = player.opponent();
        let own_map = influence_map(board, player);
        let opp_map = influence_map(board, opponent);

        let (own_territory, opp_territory) = territory(board, &own_map, &opp_map);

        Signals {
            pattern: self.pattern_score(board, player) - self.pattern_score(board, opponent),
            influence: own_map.iter().sum::<i32>() - opp_map.iter().sum::<i32>(),
            connectivity: connectivity(board, player) - connectivity(board, opponent),
            territory: (own_territory - opp_territory) * TERRITORY_CELL,
            mobility: (mobility(board, &own_map) - mobility(board, &opp_map)) * MOBILITY_CELL,
        }
    }

    /// Offensive pattern score plus threat bonus for one side.
    fn pattern_score(&self, board: &Board, player: Player) -> i32 {
        let matches = self.recognizer.find_all_patterns(board, player);
        let mut counts = CategoryCounts::default();
        let mut score = 0;
        for m in matches.iter().filter(|m| m.category().is_offensive()) {
            score += m.score();
            counts.add(m.category());
        }
        score + threat_bonus(counts.threat_level())
    }

    /// Rank legal candidates for `player` by the evaluation of the resulting
    /// board, best first, keeping at most `limit`.
    pub fn rank_moves(
        &self,
        board: &Board,
        player: Player,
        validator: &RuleValidator,
        limit: usize,
    ) -> Vec<(Pos, i32)> {
        let mut ranked: Vec<(Pos, i32)> = neighborhood(board, 2)
            .into_iter()
            .filter(|&pos| validator.is_legal_stone(board, pos, player))
            .map(|pos| {
                let next = board.placed(pos, player);
                (pos, self.evaluate(&next, player))
            })
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(limit);
        ranked
    }
}

/// Influence each cell receives from `player`'s stones.
fn influence_map(board: &Board, player: Player) -> [i32; TOTAL_CELLS] {
    let mut map = [0i32; TOTAL_CELLS];
    for stone in board.stones(player).iter_ones() {
        for dr in -INFLUENCE_RADIUS..=INFLUENCE_RADIUS {
            let reach = INFLUENCE_RADIUS - dr.abs();
            for dc in -reach..=reach {
                if let Some(p) = stone.offset(dr, dc, 1) {
                    map[p.to_index()] += INFLUENCE_RADIUS + 1 - (dr.abs() + dc.abs());
                }
            }
        }
    }
    map
}

/// Sum over stones of (adjacent friendly stones)^2.
fn connectivity(board: &Board, player: Player) -> i32 {
    board
        .stones(player)
        .iter_ones()
        .map(|stone| {
            let n = neighbors(stone)
                .filter(|&p| board.get_stone(p) == Some(player))
                .count() as i32;
            n * n
        })
        .sum()
}

/// Empty cells claimed by each side.
fn territory(board: &Board, own: &[i32; TOTAL_CELLS], opp: &[i32; TOTAL_CELLS]) -> (i32, i32) {
    let mut mine = 0;
    let mut theirs = 0;
    for idx in 0..TOTAL_CELLS {
        if !board.is_empty(Pos::from_index(idx)) {
            continue;
        }
        if own[idx] > TERRITORY_RATIO * opp[idx] {
            mine += 1;
        } else if opp[idx] > TERRITORY_RATIO * own[idx] {
            theirs += 1;
        }
    }
    (mine, theirs)
}

/// Empty stone-adjacent cells where `map` reaches the mobility threshold.
fn mobility(board: &Board, map: &[i32; TOTAL_CELLS]) -> i32 {
    (0..TOTAL_CELLS)
        .map(Pos::from_index)
        .filter(|&p| board.is_empty(p))
        .filter(|&p| neighbors(p).any(|n| !board.is_empty(n)))
        .filter(|&p| map[p.to_index()] >= MOBILITY_THRESHOLD)
        .count() as i32
}

/// The up to 8 on-board cells touching `pos`.
fn neighbors(pos: Pos) -> impl Iterator<Item = Pos> {
    (-1..=1)
        .flat_map(|dr| (-1..=1).map(move |dc| (dr, dc)))
        .filter(|&(dr, dc)| dr != 0 || dc != 0)
        .filter_map(move |(dr, dc)| pos.offset(dr, dc, 1))
}
