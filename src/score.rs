//! Fixed scoring buckets recorded for each player on a score sheet.

use std::fmt;

/// One of the seven scoring buckets on a 7 Wonders score pad.
///
/// The set is closed: every sheet must carry one row per category, keyed by
/// the colour/label written on the pad (`Red`, `Coins`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScoreCategory {
    Military,
    Treasury,
    Wonder,
    Civilian,
    Science,
    Commerce,
    Guild,
}

impl ScoreCategory {
    /// All categories in score-sheet order.
    pub const ALL: [ScoreCategory; 7] = [
        ScoreCategory::Military,
        ScoreCategory::Treasury,
        ScoreCategory::Wonder,
        ScoreCategory::Civilian,
        ScoreCategory::Science,
        ScoreCategory::Commerce,
        ScoreCategory::Guild,
    ];

    /// Row label used on the sheet for this category.
    pub fn sheet_label(self) -> &'static str {
        match self {
            ScoreCategory::Military => "Red",
            ScoreCategory::Treasury => "Coins",
            ScoreCategory::Wonder => "Wonders",
            ScoreCategory::Civilian => "Blue",
            ScoreCategory::Science => "Yellow",
            ScoreCategory::Commerce => "Purple",
            ScoreCategory::Guild => "Green",
        }
    }

    /// Match a sheet row label (case-insensitive, surrounding whitespace ignored).
    pub fn from_sheet_label(label: &str) -> Option<ScoreCategory> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.sheet_label().eq_ignore_ascii_case(label))
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ScoreCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sheet_label())
    }
}

/// Column headers for the eight chartable values: the seven categories plus total.
pub const VALUE_COLUMNS: [&str; 8] = [
    "Red", "Coins", "Wonders", "Blue", "Yellow", "Purple", "Green", "Total",
];

/// Points scored by one player in one game, one entry per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryScores([i64; 7]);

impl CategoryScores {
    pub fn new(values: [i64; 7]) -> Self {
        CategoryScores(values)
    }

    pub fn get(&self, category: ScoreCategory) -> i64 {
        self.0[category.index()]
    }

    pub fn set(&mut self, category: ScoreCategory, points: i64) {
        self.0[category.index()] = points;
    }

    /// Sum over all seven categories. This is the only source of a player's total.
    ///
    /// Saturates instead of overflowing; sheet parsing bounds each cell so
    /// totals of parsed games are always exact.
    pub fn total(&self) -> i64 {
        self.0.iter().fold(0i64, |acc, &v| acc.saturating_add(v))
    }

    pub fn as_array(&self) -> [i64; 7] {
        self.0
    }
}
