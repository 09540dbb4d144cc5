//! Pattern engine: static line templates and the window matcher

pub mod recognizer;
pub mod table;

pub use recognizer::{
    CategoryCounts, PatternMatch, PatternRecognizer, ThreatLevel, Window, WINDOW_CENTER,
    WINDOW_LEN,
};
pub use table::{patterns, Pattern, PatternCategory, PatternScore};
