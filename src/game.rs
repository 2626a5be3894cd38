//! A single game session parsed from one score sheet.

use crate::civilization::{normalize_player_name, parse_civ_label, CivLabel};
use crate::error::{Result, WondersError};
use crate::score::{CategoryScores, ScoreCategory};
use crate::table::{Cell, RawTable};
use std::collections::HashSet;

const CIVILIZATION_ROW: &str = "Civilization";

/// Largest magnitude accepted in a single score cell.
pub const MAX_CELL_POINTS: i64 = 100_000;

/// Validated record of one game: players, scores, recomputed totals, the
/// victor and (when the sheet recorded it) each player's civilization board.
#[derive(Debug, Clone)]
pub struct SingleGameRecord {
    sheet_name: String,
    players: Vec<String>,
    scores: Vec<CategoryScores>,
    civilizations: Option<Vec<CivLabel>>,
    victor: usize,
}

impl SingleGameRecord {
    /// Build a record from a raw sheet table.
    ///
    /// Totals are always recomputed from the seven category rows; any "Total"
    /// row on the sheet is ignored. A missing or non-text civilization row
    /// is not an error, the record simply carries no civilization data.
    pub fn from_table(sheet_name: &str, table: &RawTable) -> Result<Self> {
        let players = normalize_players(sheet_name, &table.players)?;

        let mut scores = vec![CategoryScores::default(); players.len()];
        for category in ScoreCategory::ALL {
            let row = labelled_row(sheet_name, table, category.sheet_label(), players.len())?
                .ok_or_else(|| {
                    WondersError::malformed(
                        sheet_name,
                        format!("missing '{}' row", category.sheet_label()),
                    )
                })?;
            for (i, cell) in row.iter().enumerate() {
                let points = cell.as_integer().ok_or_else(|| {
                    WondersError::malformed(
                        sheet_name,
                        format!(
                            "non-numeric '{}' score for {}: {:?}",
                            category.sheet_label(),
                            players[i],
                            cell
                        ),
                    )
                })?;
                if points.abs() > MAX_CELL_POINTS {
                    return Err(WondersError::malformed(
                        sheet_name,
                        format!(
                            "'{}' score for {} out of range: {}",
                            category.sheet_label(),
                            players[i],
                            points
                        ),
                    ));
                }
                scores[i].set(category, points);
            }
        }

        let victor = stable_argmax(&scores);
        let civilizations = parse_civilizations(sheet_name, table, &players)?;
        if civilizations.is_none() {
            log::warn!("Sheet '{}': no civilization data recorded", sheet_name);
        }

        log::debug!(
            "Parsed sheet '{}': {} players, victor {}",
            sheet_name,
            players.len(),
            players[victor]
        );

        Ok(SingleGameRecord {
            sheet_name: sheet_name.to_string(),
            players,
            scores,
            civilizations,
            victor,
        })
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Players in sheet column order, title-cased.
    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn n_players(&self) -> usize {
        self.players.len()
    }

    /// Whether the sheet recorded civilization boards.
    pub fn recorded_civ(&self) -> bool {
        self.civilizations.is_some()
    }

    fn index_of(&self, player: &str) -> Option<usize> {
        self.players.iter().position(|p| p == player)
    }

    pub fn scores(&self, player: &str) -> Option<&CategoryScores> {
        self.index_of(player).map(|i| &self.scores[i])
    }

    pub fn score(&self, player: &str, category: ScoreCategory) -> Option<i64> {
        self.scores(player).map(|s| s.get(category))
    }

    pub fn total(&self, player: &str) -> Option<i64> {
        self.scores(player).map(CategoryScores::total)
    }

    /// Player with the highest total; ties go to the earliest column.
    pub fn victor(&self) -> &str {
        &self.players[self.victor]
    }

    pub fn civilization(&self, player: &str) -> Option<&str> {
        self.civ_label(player).map(|l| l.civilization.as_str())
    }

    pub fn side(&self, player: &str) -> Option<&str> {
        self.civ_label(player).map(|l| l.side.as_str())
    }

    pub fn civ_side(&self, player: &str) -> Option<String> {
        self.civ_label(player).map(CivLabel::civ_side)
    }

    pub fn victor_civ(&self) -> Option<&str> {
        self.civilization(self.victor())
    }

    pub fn victor_side(&self) -> Option<&str> {
        self.side(self.victor())
    }

    pub fn victor_civ_side(&self) -> Option<String> {
        self.civ_side(self.victor())
    }

    fn civ_label(&self, player: &str) -> Option<&CivLabel> {
        let i = self.index_of(player)?;
        self.civilizations.as_ref().map(|civs| &civs[i])
    }
}

fn normalize_players(sheet_name: &str, headers: &[String]) -> Result<Vec<String>> {
    if headers.is_empty() {
        return Err(WondersError::malformed(sheet_name, "no player columns"));
    }

    let mut seen = HashSet::new();
    let mut players = Vec::with_capacity(headers.len());
    for header in headers {
        let name = normalize_player_name(header);
        if name.is_empty() {
            return Err(WondersError::malformed(sheet_name, "empty player name in header"));
        }
        if !seen.insert(name.clone()) {
            return Err(WondersError::malformed(
                sheet_name,
                format!("player name '{}' appears more than once", name),
            ));
        }
        players.push(name);
    }
    Ok(players)
}

/// Look up a row that must appear at most once and hold one cell per player.
fn labelled_row<'a>(
    sheet_name: &str,
    table: &'a RawTable,
    label: &str,
    n_players: usize,
) -> Result<Option<&'a [Cell]>> {
    if table.row_count(label) > 1 {
        return Err(WondersError::malformed(
            sheet_name,
            format!("'{}' row appears more than once", label),
        ));
    }
    match table.row(label) {
        Some(row) if row.len() != n_players => Err(WondersError::malformed(
            sheet_name,
            format!(
                "'{}' row has {} cells for {} players",
                label,
                row.len(),
                n_players
            ),
        )),
        row => Ok(row),
    }
}

fn stable_argmax(scores: &[CategoryScores]) -> usize {
    let mut best = 0;
    for (i, s) in scores.iter().enumerate().skip(1) {
        if s.total() > scores[best].total() {
            best = i;
        }
    }
    best
}

fn parse_civilizations(
    sheet_name: &str,
    table: &RawTable,
    players: &[String],
) -> Result<Option<Vec<CivLabel>>> {
    let row = match labelled_row(sheet_name, table, CIVILIZATION_ROW, players.len())? {
        Some(row) => row,
        None => return Ok(None),
    };
    // Only the first cell decides whether the row was filled in at all.
    if row.first().and_then(Cell::as_text).is_none() {
        return Ok(None);
    }

    row.iter()
        .zip(players)
        .map(|(cell, player)| {
            cell.as_text().and_then(parse_civ_label).ok_or_else(|| {
                WondersError::malformed(
                    sheet_name,
                    format!("missing civilization for {}: {:?}", player, cell),
                )
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}
