//! Line-window pattern recognition
//!
//! Every query looks at an 11-cell window along one axis, centred on the
//! evaluation point, and tests it against the static pattern table.

use crate::board::{Board, Player, Pos, DIRECTIONS, TOTAL_CELLS};

use super::table::{patterns, Pattern, PatternCategory};

/// Cells in an extracted window (5 each side of the evaluation point)
pub const WINDOW_LEN: usize = 11;
/// Index of the evaluation point inside a window
pub const WINDOW_CENTER: usize = WINDOW_LEN / 2;

/// Extracted window, one ASCII symbol per cell.
pub type Window = [u8; WINDOW_LEN];

/// Threat classification, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ThreatLevel {
    #[default]
    None,
    Minor,
    ForcingSequence,
    Single,
    Double,
    ImmediateWin,
}

/// One matched template at a cell and axis.
#[derive(Debug, Clone, Copy)]
pub struct PatternMatch {
    pub pattern: &'static Pattern,
    pub pos: Pos,
    /// Index into `DIRECTIONS`
    pub direction: usize,
}

impl PatternMatch {
    #[inline]
    pub fn score(&self) -> i32 {
        self.pattern.score
    }

    #[inline]
    pub fn category(&self) -> PatternCategory {
        self.pattern.category
    }
}

/// Match counts per category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub winning: u32,
    pub critical: u32,
    pub forcing: u32,
    pub threatening: u32,
    pub building: u32,
    pub developing: u32,
    pub defensive: u32,
    pub forbidden: u32,
}

impl CategoryCounts {
    pub fn from_matches(matches: &[PatternMatch]) -> Self {
        let mut counts = Self::default();
        for m in matches {
            counts.add(m.category());
        }
        counts
    }

    pub fn add(&mut self, category: PatternCategory) {
        let slot = match category {
            PatternCategory::Winning => &mut self.winning,
            PatternCategory::Critical => &mut self.critical,
            PatternCategory::Forcing => &mut self.forcing,
            PatternCategory::Threatening => &mut self.threatening,
            PatternCategory::Building => &mut self.building,
            PatternCategory::Developing => &mut self.developing,
            PatternCategory::Defensive => &mut self.defensive,
            PatternCategory::Forbidden => &mut self.forbidden,
        };
        *slot += 1;
    }

    /// Reduce counts to a threat level. Rules are checked in fixed order;
    /// the first that fires wins.
    pub fn threat_level(&self) -> ThreatLevel {
        let c = self;
        if c.winning >= 1 {
            ThreatLevel::ImmediateWin
        } else if c.critical >= 2
            || (c.critical >= 1 && (c.forcing >= 1 || c.threatening >= 1))
            || c.forcing >= 2
            || (c.forcing >= 1 && c.threatening >= 1)
            || c.threatening >= 2
        {
            ThreatLevel::Double
        } else if c.critical >= 1 || c.forcing >= 1 {
            ThreatLevel::Single
        } else if c.threatening >= 1 {
            ThreatLevel::ForcingSequence
        } else if c.building >= 1 || c.developing >= 2 {
            ThreatLevel::Minor
        } else {
            ThreatLevel::None
        }
    }
}

/// Pattern matcher over the shared static table.
#[derive(Debug, Clone, Copy)]
pub struct PatternRecognizer {
    patterns: &'static [Pattern],
}

impl Default for PatternRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternRecognizer {
    pub fn new() -> Self {
        Self {
            patterns: patterns(),
        }
    }

    /// The table this recognizer matches against, highest score first.
    pub fn patterns(&self) -> &'static [Pattern] {
        self.patterns
    }

    /// Extract the window around `pos` along `DIRECTIONS[dir]`, seen from
    /// `player`. The centre is always `*`, whatever the cell holds.
    pub fn extract_window(board: &Board, pos: Pos, player: Player, dir: usize) -> Window {
        let (dr, dc) = DIRECTIONS[dir];
        let mut window = [b'#'; WINDOW_LEN];
        for (i, slot) in window.iter_mut().enumerate() {
            let step = i as i32 - WINDOW_CENTER as i32;
            if step == 0 {
                *slot = b'*';
                continue;
            }
            *slot = match pos.offset(dr, dc, step) {
                None => b'#',
                Some(p) => match board.get_stone(p) {
                    Some(s) if s == player => b'X',
                    Some(_) => b'O',
                    None => b'_',
                },
            };
        }
        window
    }

    #[inline]
    pub fn matches_template(pattern: &Pattern, window: &Window) -> bool {
        pattern.matches(window, WINDOW_CENTER)
    }

    /// Every pattern matching one window, highest score first.
    pub fn matches_in_direction(
        &self,
        board: &Board,
        pos: Pos,
        player: Player,
        dir: usize,
    ) -> Vec<&'static Pattern> {
        let window = Self::extract_window(board, pos, player, dir);
        if !has_stones(&window) {
            return Vec::new();
        }
        self.patterns
            .iter()
            .filter(|p| Self::matches_template(p, &window))
            .collect()
    }

    /// Highest-priority match of one window.
    pub fn best_in_direction(
        &self,
        board: &Board,
        pos: Pos,
        player: Player,
        dir: usize,
    ) -> Option<&'static Pattern> {
        let window = Self::extract_window(board, pos, player, dir);
        if !has_stones(&window) {
            return None;
        }
        self.patterns
            .iter()
            .find(|p| Self::matches_template(p, &window))
    }

    /// Highest offensive (non-defensive, non-forbidden) match of one window.
    fn best_offensive(
        &self,
        board: &Board,
        pos: Pos,
        player: Player,
        dir: usize,
    ) -> Option<&'static Pattern> {
        let window = Self::extract_window(board, pos, player, dir);
        if !has_stones(&window) {
            return None;
        }
        self.patterns
            .iter()
            .filter(|p| p.category.is_offensive())
            .find(|p| Self::matches_template(p, &window))
    }

    /// Scan every empty cell on all four axes and collect every template
    /// each window matches, sorted by descending score.
    pub fn find_all_patterns(&self, board: &Board, player: Player) -> Vec<PatternMatch> {
        let mut matches = Vec::new();
        if board.is_board_empty() {
            return matches;
        }
        for idx in 0..TOTAL_CELLS {
            let pos = Pos::from_index(idx);
            if !board.is_empty(pos) {
                continue;
            }
            for dir in 0..DIRECTIONS.len() {
                matches.extend(
                    self.matches_in_direction(board, pos, player, dir)
                        .into_iter()
                        .map(|pattern| PatternMatch {
                            pattern,
                            pos,
                            direction: dir,
                        }),
                );
            }
        }
        matches.sort_by(|a, b| b.score().cmp(&a.score()));
        matches
    }

    /// Category counts over `find_all_patterns`.
    pub fn count_categories(&self, board: &Board, player: Player) -> CategoryCounts {
        CategoryCounts::from_matches(&self.find_all_patterns(board, player))
    }

    pub fn evaluate_threat_level(&self, board: &Board, player: Player) -> ThreatLevel {
        self.count_categories(board, player).threat_level()
    }

    /// Cheap move-ordering value of an empty cell: best own shape per axis
    /// plus most of the best opponent shape the move would block.
    pub fn point_score(&self, board: &Board, pos: Pos, player: Player) -> i32 {
        if !board.is_empty(pos) {
            return 0;
        }
        let mut attack = 0;
        let mut defence = 0;
        for dir in 0..DIRECTIONS.len() {
            if let Some(p) = self.best_offensive(board, pos, player, dir) {
                attack += p.score;
            }
            if let Some(p) = self.best_offensive(board, pos, player.opponent(), dir) {
                defence += p.score;
            }
        }
        attack + defence * 4 / 5
    }
}

#[inline]
fn has_stones(window: &Window) -> bool {
    window.iter().any(|&b| b == b'X' || b == b'O')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CENTER;

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
    fn test_extract_window_symbols() {
        let board = board_with(&[(7, 6)], &[(7, 8)]);
        let window = PatternRecognizer::extract_window(&board, CENTER, Player::Black, 0);
        assert_eq!(&window, b"____X*O____");
        let window = PatternRecognizer::extract_window(&board, CENTER, Player::White, 0);
        assert_eq!(&window, b"____O*X____");
    }

    #[test]
    fn test_extract_window_walls() {
        let board = board_with(&[(0, 1)], &[]);
        let window = PatternRecognizer::extract_window(&board, Pos::new(0, 0), Player::Black, 0);
        assert_eq!(&window, b"#####*X____");
        let window = PatternRecognizer::extract_window(&board, Pos::new(0, 0), Player::Black, 3);
        // SW diagonal leaves the board on both sides of the corner
        assert_eq!(&window, b"#####*#####");
    }

    #[test]
    fn test_five_in_window_regardless_of_context() {
        let rec = PatternRecognizer::new();
        let five = rec
            .patterns()
            .iter()
            .find(|p| p.template == "XXXXX")
            .unwrap();
        let board = board_with(&[(7, 2), (7, 3), (7, 4), (7, 5), (7, 6)], &[(7, 1), (7, 8)]);
        let window = PatternRecognizer::extract_window(&board, CENTER, Player::Black, 0);
        assert!(PatternRecognizer::matches_template(five, &window));

        let gapped = board_with(&[(7, 1), (7, 2), (7, 4), (7, 5), (7, 6)], &[]);
        let window = PatternRecognizer::extract_window(&gapped, CENTER, Player::Black, 0);
        assert!(!PatternRecognizer::matches_template(five, &window));
    }

    #[test]
    fn test_best_in_direction_prefers_five() {
        let rec = PatternRecognizer::new();
        let board = board_with(&[(7, 3), (7, 4), (7, 5), (7, 6)], &[]);
        let best = rec
            .best_in_direction(&board, CENTER, Player::Black, 0)
            .unwrap();
        assert_eq!(best.category, PatternCategory::Winning);
        // White sees the same cell as a block
        let best = rec
            .best_in_direction(&board, CENTER, Player::White, 0)
            .unwrap();
        assert_eq!(best.category, PatternCategory::Defensive);
    }

    #[test]
    fn test_find_all_patterns_sorted() {
        let rec = PatternRecognizer::new();
        let board = board_with(&[(7, 6), (7, 7), (7, 8)], &[(6, 6)]);
        let matches = rec.find_all_patterns(&board, Player::Black);
        assert!(!matches.is_empty());
        assert!(matches.windows(2).all(|w| w[0].score() >= w[1].score()));
        assert!(matches.iter().all(|m| board.is_empty(m.pos)));
        assert!(rec.find_all_patterns(&Board::new(), Player::Black).is_empty());
    }

    #[test]
    fn test_find_all_patterns_keeps_every_template() {
        let rec = PatternRecognizer::new();
        let board = board_with(&[(7, 5), (7, 6), (7, 7)], &[]);
        let cell = Pos::new(7, 4);

        let in_window = rec.matches_in_direction(&board, cell, Player::Black, 0);
        assert!(in_window.len() >= 2, "only {} templates matched", in_window.len());
        assert!(in_window.iter().any(|p| p.category == PatternCategory::Critical));
        assert!(in_window.iter().any(|p| p.category == PatternCategory::Forcing));

        let found: Vec<&str> = rec
            .find_all_patterns(&board, Player::Black)
            .iter()
            .filter(|m| m.pos == cell && m.direction == 0)
            .map(|m| m.pattern.name)
            .collect();
        assert_eq!(found.len(), in_window.len());
        for p in &in_window {
            assert!(found.contains(&p.name), "{} missing from the scan", p.name);
        }
    }

    #[test]
    fn test_threat_levels() {
        let rec = PatternRecognizer::new();
        let empty = Board::new();
        assert_eq!(rec.evaluate_threat_level(&empty, Player::Black), ThreatLevel::None);

        let four = board_with(&[(7, 4), (7, 5), (7, 6), (7, 7)], &[(7, 3)]);
        assert_eq!(
            rec.evaluate_threat_level(&four, Player::Black),
            ThreatLevel::ImmediateWin
        );

        let open_three = board_with(&[(7, 5), (7, 6), (7, 7)], &[]);
        assert!(rec.evaluate_threat_level(&open_three, Player::Black) >= ThreatLevel::Double);

        let single = board_with(&[(7, 7)], &[]);
        assert_eq!(
            rec.evaluate_threat_level(&single, Player::Black),
            ThreatLevel::Minor
        );
    }

    #[test]
    fn test_threat_precedence() {
        let counts = CategoryCounts {
            critical: 1,
            threatening: 1,
            ..Default::default()
        };
        assert_eq!(counts.threat_level(), ThreatLevel::Double);
        let counts = CategoryCounts {
            forcing: 1,
            ..Default::default()
        };
        assert_eq!(counts.threat_level(), ThreatLevel::Single);
        let counts = CategoryCounts {
            threatening: 1,
            building: 5,
            ..Default::default()
        };
        assert_eq!(counts.threat_level(), ThreatLevel::ForcingSequence);
        let counts = CategoryCounts {
            developing: 1,
            ..Default::default()
        };
        assert_eq!(counts.threat_level(), ThreatLevel::None);
    }

    #[test]
    fn test_point_score_orders_urgency() {
        let rec = PatternRecognizer::new();
        let board = board_with(&[(7, 4), (7, 5), (7, 6), (7, 7)], &[(3, 3)]);
        let win = rec.point_score(&board, Pos::new(7, 8), Player::Black);
        let quiet = rec.point_score(&board, Pos::new(2, 12), Player::Black);
        assert!(win > quiet);
        assert_eq!(rec.point_score(&board, CENTER, Player::Black), 0);
    }
}
