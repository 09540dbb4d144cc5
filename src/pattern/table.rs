//! Static pattern table
//!
//! Templates are written over five symbols, always from the perspective of
//! the player being evaluated:
//!
//! | symbol | meaning |
//! |--------|---------|
//! | `X` | own stone |
//! | `O` | opponent stone |
//! | `_` | empty cell |
//! | `#` | off-board wall |
//! | `*` | the evaluation point (window centre) |
//!
//! Most entries are stone *shapes* (`_XXXX_`). A shape is expanded into one
//! template per own stone, with that stone replaced by `*`: the template then
//! reads "playing at the evaluation point completes this shape". A `+` joins
//! sub-templates that must all match the same window.

use std::sync::OnceLock;

/// Pattern categories, highest urgency first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PatternCategory {
    Winning,
    Critical,
    Forcing,
    Threatening,
    Building,
    Developing,
    Defensive,
    Forbidden,
}

impl PatternCategory {
    /// Categories that describe the player's own prospects (as opposed to
    /// blocking value or rule restrictions).
    #[inline]
    pub fn is_offensive(self) -> bool {
        !matches!(self, PatternCategory::Defensive | PatternCategory::Forbidden)
    }
}

/// Pattern scores. Ratios matter more than absolute values.
pub struct PatternScore;

impl PatternScore {
    /// Five in a row (or the move completing it)
    pub const FIVE: i32 = 100_000;
    /// Blocking the opponent's five
    pub const BLOCK_FIVE: i32 = 50_000;
    /// Open four: _XXXX_
    pub const OPEN_FOUR: i32 = 10_000;
    /// Blocking a move that would give the opponent an open four
    pub const BLOCK_OPEN_FOUR: i32 = 8_000;
    /// Any four: one empty cell away from five
    pub const FOUR: i32 = 5_000;
    /// Open three: becomes an open four if unanswered
    pub const OPEN_THREE: i32 = 1_000;
    /// Closed three: one side blocked
    pub const CLOSED_THREE: i32 = 300;
    /// Open two
    pub const OPEN_TWO: i32 = 80;
    /// Rule-restricted shapes sort last
    pub const DOUBLE_FOUR: i32 = -50_000;
    pub const OVERLINE: i32 = -100_000;
}

/// A compiled line template.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub name: &'static str,
    pub template: String,
    pub score: i32,
    pub category: PatternCategory,
    parts: Vec<Part>,
}

/// One `+`-separated piece of a template.
#[derive(Debug, Clone)]
struct Part {
    bytes: Vec<u8>,
    /// Offset of `*` inside `bytes`, when present
    anchor: Option<usize>,
}

impl Part {
    fn compile(text: &str) -> Self {
        let bytes = text.as_bytes().to_vec();
        let anchor = bytes.iter().position(|&b| b == b'*');
        Self { bytes, anchor }
    }

    fn matches(&self, window: &[u8], center: usize) -> bool {
        match self.anchor {
            Some(a) => {
                // `*` must sit exactly on the evaluation point
                if a > center {
                    return false;
                }
                let start = center - a;
                let end = start + self.bytes.len();
                end <= window.len() && window[start..end] == self.bytes[..]
            }
            None => window
                .windows(self.bytes.len())
                .any(|w| w == &self.bytes[..]),
        }
    }
}

impl Pattern {
    pub(crate) fn new(
        name: &'static str,
        template: String,
        score: i32,
        category: PatternCategory,
    ) -> Self {
        let parts = template.split('+').map(Part::compile).collect();
        Self {
            name,
            template,
            score,
            category,
            parts,
        }
    }

    /// Match against an extracted window whose evaluation point is at `center`.
    #[inline]
    pub fn matches(&self, window: &[u8], center: usize) -> bool {
        self.parts.iter().all(|p| p.matches(window, center))
    }
}

/// How a table entry turns into templates.
#[derive(Clone, Copy)]
enum Expand {
    /// Use the template text as written
    Literal,
    /// One template per own stone, that stone replaced by `*`
    EachStone,
    /// Line holding two fours through the played stone: one compound
    /// template per own stone that sits in at least two five-cell spans
    /// with four stones and one gap
    DoubleFour,
}

use PatternCategory::*;

const SHAPES: &[(&str, &str, i32, PatternCategory, Expand)] = &[
    // Winning
    ("five", "XXXXX", PatternScore::FIVE, Winning, Expand::Literal),
    ("make-five", "XXXXX", PatternScore::FIVE, Winning, Expand::EachStone),
    // Critical
    ("open-four", "_XXXX_", PatternScore::OPEN_FOUR, Critical, Expand::EachStone),
    // Forcing
    ("four", "XXXX_", PatternScore::FOUR, Forcing, Expand::EachStone),
    ("four", "_XXXX", PatternScore::FOUR, Forcing, Expand::EachStone),
    ("broken-four", "XXX_X", PatternScore::FOUR, Forcing, Expand::EachStone),
    ("broken-four", "XX_XX", PatternScore::FOUR, Forcing, Expand::EachStone),
    ("broken-four", "X_XXX", PatternScore::FOUR, Forcing, Expand::EachStone),
    // Threatening
    ("open-three", "__XXX_", PatternScore::OPEN_THREE, Threatening, Expand::EachStone),
    ("open-three", "_XXX__", PatternScore::OPEN_THREE, Threatening, Expand::EachStone),
    ("split-three", "_XX_X_", PatternScore::OPEN_THREE, Threatening, Expand::EachStone),
    ("split-three", "_X_XX_", PatternScore::OPEN_THREE, Threatening, Expand::EachStone),
    // Building
    ("closed-three", "OXXX__", PatternScore::CLOSED_THREE, Building, Expand::EachStone),
    ("closed-three", "__XXXO", PatternScore::CLOSED_THREE, Building, Expand::EachStone),
    ("closed-three", "#XXX__", PatternScore::CLOSED_THREE, Building, Expand::EachStone),
    ("closed-three", "__XXX#", PatternScore::CLOSED_THREE, Building, Expand::EachStone),
    ("closed-three", "OXX_X_", PatternScore::CLOSED_THREE, Building, Expand::EachStone),
    ("closed-three", "_X_XXO", PatternScore::CLOSED_THREE, Building, Expand::EachStone),
    ("closed-three", "OX_XX_", PatternScore::CLOSED_THREE, Building, Expand::EachStone),
    ("closed-three", "_XX_XO", PatternScore::CLOSED_THREE, Building, Expand::EachStone),
    ("spread-three", "X__XX", PatternScore::CLOSED_THREE, Building, Expand::EachStone),
    ("spread-three", "XX__X", PatternScore::CLOSED_THREE, Building, Expand::EachStone),
    ("spread-three", "X_X_X", PatternScore::CLOSED_THREE, Building, Expand::EachStone),
    // Developing
    ("open-two", "__XX__", PatternScore::OPEN_TWO, Developing, Expand::EachStone),
    ("open-two", "_X_X_", PatternScore::OPEN_TWO, Developing, Expand::EachStone),
    ("open-two", "_X__X_", PatternScore::OPEN_TWO, Developing, Expand::EachStone),
    // Defensive: the evaluation point interrupts opponent stones
    ("block-five", "OOOO*", PatternScore::BLOCK_FIVE, Defensive, Expand::Literal),
    ("block-five", "*OOOO", PatternScore::BLOCK_FIVE, Defensive, Expand::Literal),
    ("block-five", "OOO*O", PatternScore::BLOCK_FIVE, Defensive, Expand::Literal),
    ("block-five", "O*OOO", PatternScore::BLOCK_FIVE, Defensive, Expand::Literal),
    ("block-five", "OO*OO", PatternScore::BLOCK_FIVE, Defensive, Expand::Literal),
    ("block-open-four", "_OOO*_", PatternScore::BLOCK_OPEN_FOUR, Defensive, Expand::Literal),
    ("block-open-four", "_*OOO_", PatternScore::BLOCK_OPEN_FOUR, Defensive, Expand::Literal),
    ("block-open-four", "_OO*O_", PatternScore::BLOCK_OPEN_FOUR, Defensive, Expand::Literal),
    ("block-open-four", "_O*OO_", PatternScore::BLOCK_OPEN_FOUR, Defensive, Expand::Literal),
    // Forbidden for Black under Renju
    ("double-four", "X_XXX_X", PatternScore::DOUBLE_FOUR, Forbidden, Expand::DoubleFour),
    ("double-four", "XX_XX_XX", PatternScore::DOUBLE_FOUR, Forbidden, Expand::DoubleFour),
    ("double-four", "XXX_X_XXX", PatternScore::DOUBLE_FOUR, Forbidden, Expand::DoubleFour),
    ("overline", "XXXXXX", PatternScore::OVERLINE, Forbidden, Expand::EachStone),
];

/// Replace the stone at `idx` with the evaluation point.
fn anchor_at(shape: &str, idx: usize) -> String {
    shape
        .char_indices()
        .map(|(i, ch)| if i == idx { '*' } else { ch })
        .collect()
}

fn stone_indices(shape: &str) -> impl Iterator<Item = usize> + '_ {
    shape
        .char_indices()
        .filter(|&(_, ch)| ch == 'X')
        .map(|(i, _)| i)
}

fn double_four_templates(shape: &str) -> Vec<String> {
    let mut out = Vec::new();
    for idx in stone_indices(shape) {
        let anchored = anchor_at(shape, idx);
        let spans: Vec<&str> = (0..=shape.len().saturating_sub(5))
            .filter(|&start| start <= idx && idx < start + 5)
            .filter(|&start| {
                let span = &shape[start..start + 5];
                span.bytes().filter(|&b| b == b'X').count() == 4
                    && span.bytes().filter(|&b| b == b'_').count() == 1
            })
            .map(|start| &anchored[start..start + 5])
            .collect();
        if spans.len() >= 2 {
            out.push(spans.join("+"));
        }
    }
    out
}

fn build() -> Vec<Pattern> {
    let mut patterns = Vec::new();
    for &(name, shape, score, category, expand) in SHAPES {
        let templates = match expand {
            Expand::Literal => vec![shape.to_string()],
            Expand::EachStone => stone_indices(shape).map(|i| anchor_at(shape, i)).collect(),
            Expand::DoubleFour => double_four_templates(shape),
        };
        for template in templates {
            if patterns.iter().any(|p: &Pattern| p.template == template) {
                continue;
            }
            patterns.push(Pattern::new(name, template, score, category));
        }
    }
    // Stable: equal scores keep table order
    patterns.sort_by(|a, b| b.score.cmp(&a.score));
    patterns
}

/// All patterns, built once and sorted by descending score.
pub fn patterns() -> &'static [Pattern] {
    static TABLE: OnceLock<Vec<Pattern>> = OnceLock::new();
    TABLE.get_or_init(build)
}
