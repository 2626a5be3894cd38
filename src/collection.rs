//! Cumulative tables across every game in a workbook.
//!
//! A `GameCollection` is built once by folding its games in sheet order into
//! per-player and per-civ-side histories plus a list of victors. The tables
//! are never updated afterwards.

use crate::error::{Result, WondersError};
use crate::game::SingleGameRecord;
use crate::score::{CategoryScores, ScoreCategory};
use crate::workbook::SheetSource;
use std::collections::HashSet;

/// Key that selects the victors table in [`GameCollection::lookup`].
pub const VICTORS_KEY: &str = "victors";

/// One player's line from one game.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRow {
    /// Sheet the game was read from
    pub game: String,
    pub player: String,
    pub scores: CategoryScores,
    pub total: i64,
    pub civilization: Option<String>,
    pub side: Option<String>,
    pub civ_side: Option<String>,
    /// Whether this player won the game
    pub is_victor: bool,
}

impl GameRow {
    fn from_game(game: &SingleGameRecord, player: &str) -> Self {
        let scores = game.scores(player).copied().unwrap_or_default();
        GameRow {
            game: game.sheet_name().to_string(),
            player: player.to_string(),
            scores,
            total: scores.total(),
            civilization: game.civilization(player).map(str::to_string),
            side: game.side(player).map(str::to_string),
            civ_side: game.civ_side(player),
            is_victor: game.victor() == player,
        }
    }

    /// The seven category scores followed by the total.
    pub fn values(&self) -> [i64; 8] {
        let mut values = [0; 8];
        values[..7].copy_from_slice(&self.scores.as_array());
        values[7] = self.total;
        values
    }
}

/// An ordered sequence of rows sharing a label (a player or a civ-side).
#[derive(Debug, Clone)]
pub struct History {
    pub label: String,
    pub rows: Vec<GameRow>,
}

/// Aggregate statistics over one history.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySummary {
    pub label: String,
    pub games: usize,
    pub wins: usize,
    /// Mean score per category, in `ScoreCategory::ALL` order
    pub category_means: [f64; 7],
    pub mean_total: f64,
    pub best_total: i64,
}

impl HistorySummary {
    pub fn from_rows(label: &str, rows: &[GameRow]) -> Self {
        let games = rows.len();
        let wins = rows.iter().filter(|r| r.is_victor).count();

        let mut category_means = [0.0; 7];
        let mut mean_total = 0.0;
        if games > 0 {
            for category in ScoreCategory::ALL {
                let sum: i64 = rows.iter().map(|r| r.scores.get(category)).sum();
                category_means[category.index()] = sum as f64 / games as f64;
            }
            mean_total = rows.iter().map(|r| r.total).sum::<i64>() as f64 / games as f64;
        }

        HistorySummary {
            label: label.to_string(),
            games,
            wins,
            category_means,
            mean_total,
            best_total: rows.iter().map(|r| r.total).max().unwrap_or(0),
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins as f64 / self.games as f64 * 100.0
        }
    }
}

/// Every game of a workbook plus the tables derived from them.
#[derive(Debug, Clone, Default)]
pub struct GameCollection {
    games: Vec<SingleGameRecord>,
    player_history: Vec<History>,
    civ_side_history: Vec<History>,
    victors: Vec<GameRow>,
}

impl GameCollection {
    /// Build a collection from ordered sheet names and a loader for each sheet.
    ///
    /// Games are folded strictly in the given order, which fixes the order of
    /// every history and of the victors table. The first loader error aborts
    /// the build.
    pub fn build<I, S, F>(sheet_names: I, mut load: F) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnMut(&str) -> Result<SingleGameRecord>,
    {
        let mut collection = GameCollection::default();
        let mut seen = HashSet::new();

        for name in sheet_names {
            let name = name.as_ref();
            if !seen.insert(name.to_string()) {
                return Err(WondersError::malformed(name, "duplicate sheet name"));
            }
            let game = load(name)?;
            collection.fold(game);
        }

        log::info!(
            "Loaded {} games: {} players, {} civ-sides",
            collection.games.len(),
            collection.player_history.len(),
            collection.civ_side_history.len()
        );
        Ok(collection)
    }

    /// Build a collection from every sheet of a workbook, in sheet order.
    pub fn from_source<W: SheetSource + ?Sized>(source: &W) -> Result<Self> {
        let names = source.sheet_names()?;
        Self::build(&names, |name| {
            let table = source.read_sheet(name)?;
            SingleGameRecord::from_table(name, &table)
        })
    }

    fn fold(&mut self, game: SingleGameRecord) {
        for player in game.players() {
            let row = GameRow::from_game(&game, player);
            append(&mut self.player_history, player, row.clone());
            if let Some(civ_side) = &row.civ_side {
                append(&mut self.civ_side_history, civ_side, row.clone());
            }
        }
        self.victors.push(GameRow::from_game(&game, game.victor()));
        self.games.push(game);
    }

    /// Games in sheet order.
    pub fn games(&self) -> &[SingleGameRecord] {
        &self.games
    }

    pub fn game(&self, sheet_name: &str) -> Option<&SingleGameRecord> {
        self.games.iter().find(|g| g.sheet_name() == sheet_name)
    }

    /// One row per game, the victor's, in sheet order.
    pub fn victors(&self) -> &[GameRow] {
        &self.victors
    }

    pub fn player_histories(&self) -> &[History] {
        &self.player_history
    }

    pub fn civ_side_histories(&self) -> &[History] {
        &self.civ_side_history
    }

    pub fn player_history(&self, player: &str) -> Option<&[GameRow]> {
        find(&self.player_history, player)
    }

    pub fn civ_side_history(&self, civ_side: &str) -> Option<&[GameRow]> {
        find(&self.civ_side_history, civ_side)
    }

    /// Resolve a key to a table, ignoring case.
    ///
    /// `"victors"` selects the victors table; otherwise civ-side labels are
    /// tried before player names, so a civ-side shadows a player of the same name.
    pub fn lookup(&self, key: &str) -> Result<&[GameRow]> {
        let key = key.trim();
        if key.eq_ignore_ascii_case(VICTORS_KEY) {
            return Ok(&self.victors);
        }
        self.civ_side_history(key)
            .or_else(|| self.player_history(key))
            .ok_or_else(|| WondersError::NotFound {
                key: key.to_string(),
            })
    }

    pub fn summaries(&self) -> Vec<HistorySummary> {
        summarize(&self.player_history)
    }

    pub fn civ_side_summaries(&self) -> Vec<HistorySummary> {
        summarize(&self.civ_side_history)
    }
}

fn append(histories: &mut Vec<History>, label: &str, row: GameRow) {
    match histories.iter_mut().find(|h| h.label == label) {
        Some(history) => history.rows.push(row),
        None => histories.push(History {
            label: label.to_string(),
            rows: vec![row],
        }),
    }
}

fn find<'a>(histories: &'a [History], label: &str) -> Option<&'a [GameRow]> {
    histories
        .iter()
        .find(|h| h.label.to_lowercase() == label.to_lowercase())
        .map(|h| h.rows.as_slice())
}

fn summarize(histories: &[History]) -> Vec<HistorySummary> {
    histories
        .iter()
        .map(|h| HistorySummary::from_rows(&h.label, &h.rows))
        .collect()
}
