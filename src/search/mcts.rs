//! Monte Carlo Tree Search
//!
//! Each iteration runs four phases:
//! 1. Selection: descend through fully expanded nodes by UCT
//! 2. Expansion: a node visited before gains one untried child
//! 3. Simulation: greedy/random playout up to a ply cap
//! 4. Backpropagation: visits and wins flow back to the root
//!
//! Nodes live in an arena (`Vec<Node>`) and refer to each other by index;
//! the parent link is only walked upward during backpropagation. The whole
//! arena is dropped after a decision.
//!
//! With `threads > 1` several independent trees are grown in parallel (root
//! parallelism) from private board copies, and their root visit counts are
//! summed.

use std::collections::HashMap;
use std::f64::consts::SQRT_2;
use std::time::{Duration, Instant};

use log::{debug, trace};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::board::{Board, Player, Pos, CENTER, DIRECTIONS};
use crate::eval::PositionEvaluator;
use crate::rules::win::run_length;
use crate::rules::RuleValidator;

use super::candidates::{neighborhood, root_candidates, search_candidates, CANDIDATE_RADIUS};

/// Index into the node arena
pub type NodeId = usize;

const ROOT: NodeId = 0;

/// Seed offset between root-parallel workers
const WORKER_SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Playout move heuristic weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RolloutWeights {
    /// Score of a move that wins on the spot
    pub win: f64,
    /// Per adjacent friendly stone
    pub adjacency: f64,
    /// Per ring closer to the centre
    pub center: f64,
}

impl Default for RolloutWeights {
    fn default() -> Self {
        Self {
            win: 1_000_000.0,
            adjacency: 10.0,
            center: 1.0,
        }
    }
}

/// MCTS settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MctsConfig {
    /// Iteration cap (per worker)
    pub iterations: u32,
    pub time_limit: Option<Duration>,
    /// UCT exploration constant
    pub exploration: f64,
    /// Share of playout moves chosen greedily
    pub greedy_ratio: f64,
    /// Playout ply cap; reaching it scores as a draw
    pub rollout_cap: usize,
    /// Fixed seed for reproducible searches
    pub seed: Option<u64>,
    /// Independent trees grown in parallel
    pub threads: usize,
    /// Keep only the top-N root moves by evaluator ranking
    pub root_candidates: Option<usize>,
    pub weights: RolloutWeights,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: 2_000,
            time_limit: None,
            exploration: SQRT_2,
            greedy_ratio: 0.8,
            rollout_cap: 50,
            seed: None,
            threads: 1,
            root_candidates: None,
            weights: RolloutWeights::default(),
        }
    }
}

/// Playout outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Win(Player),
    Draw,
}

struct Node {
    board: Board,
    /// Colour to move at this node
    to_move: Player,
    parent: Option<NodeId>,
    /// Move that produced this node
    mv: Option<Pos>,
    children: Vec<NodeId>,
    /// Legal moves not yet expanded; `None` until first needed
    untried: Option<Vec<Pos>>,
    visits: u32,
    wins: f64,
    terminal: Option<Outcome>,
}

impl Node {
    fn new(board: Board, to_move: Player, parent: Option<NodeId>, mv: Option<Pos>) -> Self {
        Self {
            board,
            to_move,
            parent,
            mv,
            children: Vec::new(),
            untried: None,
            visits: 0,
            wins: 0.0,
            terminal: None,
        }
    }

    #[inline]
    fn fully_expanded(&self) -> bool {
        self.untried.as_ref().is_some_and(Vec::is_empty)
    }
}

/// Root statistics of a finished search
#[derive(Debug, Clone, PartialEq)]
pub struct MctsResult {
    /// Most visited root move
    pub best_move: Option<Pos>,
    /// Visits of the chosen move (summed over workers)
    pub visits: u32,
    /// Win rate of the chosen move from the mover's perspective
    pub win_rate: f64,
    /// Iterations run (summed over workers)
    pub iterations: u32,
    /// Nodes allocated (summed over workers)
    pub nodes: usize,
}

impl MctsResult {
    fn empty() -> Self {
        Self {
            best_move: None,
            visits: 0,
            win_rate: 0.0,
            iterations: 0,
            nodes: 0,
        }
    }
}

/// Per-move root statistics of one tree
struct TreeReport {
    root: Vec<(Pos, u32, f64)>,
    iterations: u32,
    nodes: usize,
}

/// One search tree with its own RNG.
struct Tree<'a> {
    nodes: Vec<Node>,
    validator: &'a RuleValidator,
    config: &'a MctsConfig,
    rng: SmallRng,
}

impl<'a> Tree<'a> {
    fn new(
        board: &Board,
        color: Player,
        root_moves: Vec<Pos>,
        validator: &'a RuleValidator,
        config: &'a MctsConfig,
        rng: SmallRng,
    ) -> Self {
        let mut root = Node::new(*board, color, None, None);
        root.untried = Some(root_moves);
        Self {
            nodes: vec![root],
            validator,
            config,
            rng,
        }
    }

    fn run(mut self, deadline: Option<Instant>) -> TreeReport {
        let mut iterations = 0;
        while iterations < self.config.iterations {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                break;
            }
            let leaf = self.select();
            let node = self.expand(leaf);
            let outcome = self.simulate(node);
            self.backpropagate(node, outcome);
            iterations += 1;
        }

        let root = self.nodes[ROOT]
            .children
            .iter()
            .filter_map(|&c| {
                let n = &self.nodes[c];
                n.mv.map(|mv| (mv, n.visits, n.wins))
            })
            .collect();
        TreeReport {
            root,
            iterations,
            nodes: self.nodes.len(),
        }
    }

    /// Legal moves of a node, computed on first use. A non-terminal node
    /// without moves becomes a draw.
    fn ensure_untried(&mut self, id: NodeId) {
        if self.nodes[id].untried.is_some() {
            return;
        }
        let node = &self.nodes[id];
        let moves = search_candidates(&node.board, node.to_move, self.validator);
        let node = &mut self.nodes[id];
        if moves.is_empty() && node.terminal.is_none() {
            node.terminal = Some(Outcome::Draw);
        }
        node.untried = Some(moves);
    }

    fn select(&mut self) -> NodeId {
        let mut id = ROOT;
        loop {
            self.ensure_untried(id);
            let node = &self.nodes[id];
            if node.terminal.is_some() || !node.fully_expanded() || node.children.is_empty() {
                return id;
            }
            id = self.best_uct_child(id);
        }
    }

    fn best_uct_child(&self, id: NodeId) -> NodeId {
        let parent = &self.nodes[id];
        let ln_parent = f64::from(parent.visits.max(1)).ln();
        let mut best = parent.children[0];
        let mut best_value = f64::NEG_INFINITY;
        for &c in &parent.children {
            let child = &self.nodes[c];
            let value = if child.visits == 0 {
                f64::INFINITY
            } else {
                let n = f64::from(child.visits);
                child.wins / n + self.config.exploration * (ln_parent / n).sqrt()
            };
            if value > best_value {
                best_value = value;
                best = c;
            }
        }
        best
    }

    /// Add one untried child to a previously visited, non-terminal node.
    fn expand(&mut self, id: NodeId) -> NodeId {
        let node = &self.nodes[id];
        if node.terminal.is_some() || node.visits == 0 {
            return id;
        }
        let Some(untried) = self.nodes[id].untried.as_mut() else {
            return id;
        };
        if untried.is_empty() {
            return id;
        }
        let pick = self.rng.gen_range(0..untried.len());
        let mv = untried.swap_remove(pick);

        let parent = &self.nodes[id];
        let mover = parent.to_move;
        let board = parent.board.placed(mv, mover);
        let mut child = Node::new(board, mover.opponent(), Some(id), Some(mv));
        if self.validator.check_win(&board, mv, mover).is_over() {
            child.terminal = Some(Outcome::Win(mover));
        } else if board.is_full() {
            child.terminal = Some(Outcome::Draw);
        }

        let child_id = self.nodes.len();
        self.nodes.push(child);
        self.nodes[id].children.push(child_id);
        child_id
    }

    /// Play out from `id` and report the result.
    fn simulate(&mut self, id: NodeId) -> Outcome {
        let node = &self.nodes[id];
        if let Some(outcome) = node.terminal {
            return outcome;
        }
        let mut board = node.board;
        let mut to_move = node.to_move;

        for _ in 0..self.config.rollout_cap {
            let Some(mv) = self.rollout_move(&board, to_move) else {
                return Outcome::Draw;
            };
            board = board.placed(mv, to_move);
            if self.validator.check_win(&board, mv, to_move).is_over() {
                return Outcome::Win(to_move);
            }
            if board.is_full() {
                return Outcome::Draw;
            }
            to_move = to_move.opponent();
        }
        Outcome::Draw
    }

    /// Pick a playout move: greedy on the cheap heuristic with probability
    /// `greedy_ratio`, uniform otherwise. Forbidden picks are discarded and
    /// the choice is repeated.
    fn rollout_move(&mut self, board: &Board, color: Player) -> Option<Pos> {
        let mut moves = neighborhood(board, CANDIDATE_RADIUS);
        while !moves.is_empty() {
            let idx = if self.rng.gen::<f64>() < self.config.greedy_ratio {
                self.greedy_index(board, color, &moves)
            } else {
                self.rng.gen_range(0..moves.len())
            };
            let mv = moves.swap_remove(idx);
            if self.validator.is_legal_stone(board, mv, color) {
                return Some(mv);
            }
        }
        None
    }

    fn greedy_index(&self, board: &Board, color: Player, moves: &[Pos]) -> usize {
        let w = &self.config.weights;
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (i, &mv) in moves.iter().enumerate() {
            let score = rollout_score(board, mv, color, w);
            if score > best_score {
                best_score = score;
                best = i;
            }
        }
        best
    }

    fn backpropagate(&mut self, from: NodeId, outcome: Outcome) {
        let mut cursor = Some(from);
        while let Some(id) = cursor {
            let node = &mut self.nodes[id];
            node.visits += 1;
            // Credit the side that moved into this node; that is the side
            // choosing among these children at the parent.
            node.wins += match outcome {
                Outcome::Win(winner) if winner == node.to_move.opponent() => 1.0,
                Outcome::Win(_) => 0.0,
                Outcome::Draw => 0.5,
            };
            cursor = node.parent;
        }
    }
}

/// Cheap playout value of `mv` for `color`.
fn rollout_score(board: &Board, mv: Pos, color: Player, w: &RolloutWeights) -> f64 {
    if DIRECTIONS
        .iter()
        .any(|&(dr, dc)| run_length(board, mv, color, dr, dc) >= 5)
    {
        return w.win;
    }
    let adjacent = (-1..=1)
        .flat_map(|dr| (-1..=1).map(move |dc| (dr, dc)))
        .filter(|&(dr, dc)| dr != 0 || dc != 0)
        .filter_map(|(dr, dc)| mv.offset(dr, dc, 1))
        .filter(|&p| board.get_stone(p) == Some(color))
        .count();
    let rings_from_edge = 7 - mv.chebyshev(CENTER);
    w.adjacency * adjacent as f64 + w.center * f64::from(rings_from_edge)
}

/// Monte Carlo Tree Search engine.
pub struct MonteCarloTreeSearch {
    config: MctsConfig,
    validator: RuleValidator,
}

impl MonteCarloTreeSearch {
    pub fn new(validator: RuleValidator) -> Self {
        Self::with_config(validator, MctsConfig::default())
    }

    pub fn with_config(validator: RuleValidator, config: MctsConfig) -> Self {
        Self { config, validator }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Replace the validator snapshot (e.g. after a swap decision).
    pub fn set_validator(&mut self, validator: RuleValidator) {
        self.validator = validator;
    }

    /// Best move for `color`; `None` only when no legal move exists.
    pub fn find_best_move(&self, board: &Board, color: Player) -> Option<Pos> {
        self.search(board, color).best_move
    }

    /// Run the search and report root statistics.
    pub fn search(&self, board: &Board, color: Player) -> MctsResult {
        let root_moves = self.root_moves(board, color);
        match root_moves.as_slice() {
            [] => return MctsResult::empty(),
            [only] => {
                return MctsResult {
                    best_move: Some(*only),
                    ..MctsResult::empty()
                }
            }
            _ => {}
        }

        let deadline = self.config.time_limit.map(|t| Instant::now() + t);
        let base_seed = self.config.seed;
        let threads = self.config.threads.max(1);

        let grow = |worker: usize| {
            let rng = match base_seed {
                Some(seed) => {
                    SmallRng::seed_from_u64(seed ^ (worker as u64).wrapping_mul(WORKER_SEED_STRIDE))
                }
                None => SmallRng::from_entropy(),
            };
            Tree::new(board, color, root_moves.clone(), &self.validator, &self.config, rng)
                .run(deadline)
        };

        let reports: Vec<TreeReport> = if threads == 1 {
            vec![grow(0)]
        } else {
            (0..threads).into_par_iter().map(grow).collect()
        };

        let result = merge_reports(&reports);
        debug!(
            "mcts: {} -> {:?} visits {} win rate {:.3} iterations {} nodes {}",
            color, result.best_move, result.visits, result.win_rate, result.iterations, result.nodes
        );
        result
    }

    /// Legal root moves, optionally pruned to the evaluator's top N.
    fn root_moves(&self, board: &Board, color: Player) -> Vec<Pos> {
        let moves = root_candidates(board, color, &self.validator);
        let Some(limit) = self.config.root_candidates else {
            return moves;
        };
        if moves.len() <= limit {
            return moves;
        }
        let evaluator = PositionEvaluator::for_rule(self.validator.rule());
        let ranked = evaluator.rank_moves(board, color, &self.validator, usize::MAX);
        let pruned: Vec<Pos> = ranked
            .into_iter()
            .map(|(p, _)| p)
            .filter(|p| moves.contains(p))
            .take(limit)
            .collect();
        trace!("mcts: root pruned from {} to {}", moves.len(), pruned.len());
        if pruned.is_empty() {
            moves
        } else {
            pruned
        }
    }
}

/// Sum root statistics over workers and pick the most visited move.
fn merge_reports(reports: &[TreeReport]) -> MctsResult {
    let mut totals: HashMap<Pos, (u32, f64)> = HashMap::new();
    let mut order: Vec<Pos> = Vec::new();
    for report in reports {
        for &(mv, visits, wins) in &report.root {
            let entry = totals.entry(mv).or_insert_with(|| {
                order.push(mv);
                (0, 0.0)
            });
            entry.0 += visits;
            entry.1 += wins;
        }
    }

    let mut result = MctsResult {
        iterations: reports.iter().map(|r| r.iterations).sum(),
        nodes: reports.iter().map(|r| r.nodes).sum(),
        ..MctsResult::empty()
    };
    // First-seen order breaks visit ties deterministically
    for mv in order {
        let (visits, wins) = totals[&mv];
        if result.best_move.is_none() || visits > result.visits {
            result.best_move = Some(mv);
            result.visits = visits;
            result.win_rate = if visits == 0 {
                0.0
            } else {
                wins / f64::from(visits)
            };
        }
    }
    result
}
