//! Pipeline functions for programmatic use by the CLI.
//!
//! Each operation takes a plain config struct (or a built collection) and
//! returns a summary string instead of printing to stdout.

use crate::chart::compare_distributions;
use crate::collection::{GameCollection, GameRow, HistorySummary};
use crate::score::VALUE_COLUMNS;
use crate::workbook::CsvWorkbook;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Write;
use std::io;
use std::path::{Path, PathBuf};

// ============================================================================
// Loading
// ============================================================================

/// Load every sheet of a CSV workbook directory into a collection.
pub fn load_collection(workbook: &Path) -> Result<GameCollection> {
    let source = CsvWorkbook::open(workbook)
        .with_context(|| format!("Failed to open workbook {}", workbook.display()))?;
    GameCollection::from_source(&source)
        .with_context(|| format!("Failed to load games from {}", workbook.display()))
}

// ============================================================================
// Text report
// ============================================================================

/// Plain-text report: victors per game, then per-player and per-civ-side summaries.
pub fn report(collection: &GameCollection) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Victors ({} games) ===", collection.victors().len());
    let _ = writeln!(out, "{:<20} {:<16} {:>6}  Civilization", "Game", "Player", "Total");
    for row in collection.victors() {
        let _ = writeln!(
            out,
            "{:<20} {:<16} {:>6}  {}",
            truncate_name(&row.game, 20),
            truncate_name(&row.player, 16),
            row.total,
            row.civ_side.as_deref().unwrap_or("-")
        );
    }

    write_summary_table(&mut out, "Players", &collection.summaries());
    let civ_summaries = collection.civ_side_summaries();
    if !civ_summaries.is_empty() {
        write_summary_table(&mut out, "Civilizations", &civ_summaries);
    }
    out
}

fn write_summary_table(out: &mut String, title: &str, summaries: &[HistorySummary]) {
    let _ = writeln!(out);
    let _ = writeln!(out, "=== {} ===", title);
    let _ = write!(out, "{:<18} {:>5} {:>5} {:>6}", "Name", "Games", "Wins", "Win%");
    for name in VALUE_COLUMNS {
        let _ = write!(out, " {:>7}", name);
    }
    let _ = writeln!(out, " {:>6}", "Best");

    for s in summaries {
        let _ = write!(
            out,
            "{:<18} {:>5} {:>5} {:>5.1}%",
            truncate_name(&s.label, 18),
            s.games,
            s.wins,
            s.win_rate()
        );
        for mean in s.category_means.iter().chain(std::iter::once(&s.mean_total)) {
            let _ = write!(out, " {:>7.2}", mean);
        }
        let _ = writeln!(out, " {:>6}", s.best_total);
    }
}

/// Plain-text listing of one looked-up table.
pub fn format_rows(rows: &[GameRow]) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:<20} {:<16}", "Game", "Player");
    for name in VALUE_COLUMNS {
        let _ = write!(out, " {:>7}", name);
    }
    let _ = writeln!(out, "  Civilization");
    for row in rows {
        let _ = write!(
            out,
            "{:<20} {:<16}",
            truncate_name(&row.game, 20),
            truncate_name(&row.player, 16)
        );
        for value in row.values() {
            let _ = write!(out, " {:>7}", value);
        }
        let _ = writeln!(out, "  {}", row.civ_side.as_deref().unwrap_or("-"));
    }
    out
}

fn truncate_name(name: &str, max_len: usize) -> String {
    if name.chars().count() <= max_len {
        name.to_string()
    } else {
        let truncated: String = name.chars().take(max_len - 1).collect();
        format!("{}~", truncated)
    }
}

// ============================================================================
// CSV output
// ============================================================================

#[derive(Serialize)]
struct GameRowRecord<'a> {
    #[serde(rename = "Game")]
    game: &'a str,
    #[serde(rename = "Player")]
    player: &'a str,
    #[serde(rename = "Red")]
    red: i64,
    #[serde(rename = "Coins")]
    coins: i64,
    #[serde(rename = "Wonders")]
    wonders: i64,
    #[serde(rename = "Blue")]
    blue: i64,
    #[serde(rename = "Yellow")]
    yellow: i64,
    #[serde(rename = "Purple")]
    purple: i64,
    #[serde(rename = "Green")]
    green: i64,
    #[serde(rename = "Total")]
    total: i64,
    #[serde(rename = "Civilization")]
    civilization: Option<&'a str>,
    #[serde(rename = "Side")]
    side: Option<&'a str>,
    #[serde(rename = "CivSide")]
    civ_side: Option<&'a str>,
    #[serde(rename = "Victor")]
    victor: bool,
}

impl<'a> From<&'a GameRow> for GameRowRecord<'a> {
    fn from(row: &'a GameRow) -> Self {
        let [red, coins, wonders, blue, yellow, purple, green, total] = row.values();
        GameRowRecord {
            game: &row.game,
            player: &row.player,
            red,
            coins,
            wonders,
            blue,
            yellow,
            purple,
            green,
            total,
            civilization: row.civilization.as_deref(),
            side: row.side.as_deref(),
            civ_side: row.civ_side.as_deref(),
            victor: row.is_victor,
        }
    }
}

/// Write rows as CSV with a header line.
pub fn write_rows_csv<W: io::Write>(rows: &[GameRow], output: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(output);
    for row in rows {
        writer.serialize(GameRowRecord::from(row))?;
    }
    writer.flush()?;
    Ok(())
}

// ============================================================================
// Compare
// ============================================================================

/// Configuration for the compare operation.
pub struct CompareConfig {
    /// Lookup keys: player names, civ-side labels or "victors"
    pub labels: Vec<String>,
    /// Output xlsx path
    pub output: PathBuf,
}

pub fn compare(collection: &GameCollection, config: &CompareConfig) -> Result<String> {
    compare_distributions(collection, &config.labels, &config.output)?;
    Ok(format!(
        "Wrote comparison of {} to {}",
        config.labels.join(", "),
        config.output.display()
    ))
}

// ============================================================================
// Export Workbook
// ============================================================================

/// Configuration for the export operation.
pub struct ExportConfig {
    /// Output xlsx path
    pub output: PathBuf,
    /// Also write one sheet per civ-side history
    pub include_civ_sides: bool,
}

/// Write all cumulative tables to an Excel workbook.
///
/// Produces a Summary sheet, a Victors sheet and one sheet per player
/// (and optionally per civ-side). Returns a summary string on success.
pub fn export_workbook(collection: &GameCollection, config: &ExportConfig) -> Result<String> {
    use rust_xlsxwriter::{Format, Workbook};

    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let mean_fmt = Format::new().set_num_format("0.00");

    // -- Summary sheet --
    let summary = workbook.add_worksheet();
    summary.set_name("Summary")?;
    let generated = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();
    summary.write_string_with_format(0, 0, "Generated", &bold)?;
    summary.write_string(0, 1, &generated)?;
    summary.write_string_with_format(1, 0, "Games", &bold)?;
    summary.write_number(1, 1, collection.games().len() as f64)?;

    let mut row: u32 = 3;
    for (title, summaries) in [
        ("Players", collection.summaries()),
        ("Civilizations", collection.civ_side_summaries()),
    ] {
        if summaries.is_empty() {
            continue;
        }
        summary.write_string_with_format(row, 0, title, &bold)?;
        row += 1;
        let headers = ["Name", "Games", "Wins", "Win %"];
        for (col, h) in headers.iter().enumerate() {
            summary.write_string_with_format(row, col as u16, *h, &bold)?;
        }
        for (i, name) in VALUE_COLUMNS.iter().enumerate() {
            summary.write_string_with_format(row, (headers.len() + i) as u16, *name, &bold)?;
        }
        let best_col = (headers.len() + VALUE_COLUMNS.len()) as u16;
        summary.write_string_with_format(row, best_col, "Best", &bold)?;
        row += 1;

        for s in &summaries {
            summary.write_string(row, 0, &s.label)?;
            summary.write_number(row, 1, s.games as f64)?;
            summary.write_number(row, 2, s.wins as f64)?;
            summary.write_number_with_format(row, 3, s.win_rate(), &mean_fmt)?;
            let means = s.category_means.iter().chain(std::iter::once(&s.mean_total));
            for (i, mean) in means.enumerate() {
                summary.write_number_with_format(
                    row,
                    (headers.len() + i) as u16,
                    *mean,
                    &mean_fmt,
                )?;
            }
            summary.write_number(row, best_col, s.best_total as f64)?;
            row += 1;
        }
        row += 1;
    }
    summary.autofit();

    // -- Victors and per-history sheets --
    let mut names = SheetNames::new();
    names.claim("Summary");
    let mut sheet_count = 2;
    write_rows_sheet(&mut workbook, &names.claim("Victors"), collection.victors(), &bold)?;
    for history in collection.player_histories() {
        let name = names.claim(&history.label);
        write_rows_sheet(&mut workbook, &name, &history.rows, &bold)?;
        sheet_count += 1;
    }
    if config.include_civ_sides {
        for history in collection.civ_side_histories() {
            let name = names.claim(&history.label);
            write_rows_sheet(&mut workbook, &name, &history.rows, &bold)?;
            sheet_count += 1;
        }
    }

    workbook
        .save(&config.output)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;

    Ok(format!(
        "Exported {} games to {} ({} sheets)",
        collection.games().len(),
        config.output.display(),
        sheet_count
    ))
}

fn write_rows_sheet(
    workbook: &mut rust_xlsxwriter::Workbook,
    name: &str,
    rows: &[GameRow],
    bold: &rust_xlsxwriter::Format,
) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(name)?;

    let mut headers = vec!["Game", "Player"];
    headers.extend(VALUE_COLUMNS);
    headers.extend(["Civilization", "Side", "CivSide", "Victor"]);
    for (col, h) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *h, bold)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        sheet.write_string(r, 0, &row.game)?;
        sheet.write_string(r, 1, &row.player)?;
        for (col, value) in row.values().iter().enumerate() {
            sheet.write_number(r, col as u16 + 2, *value as f64)?;
        }
        let civ_col = VALUE_COLUMNS.len() as u16 + 2;
        if let Some(civ) = &row.civilization {
            sheet.write_string(r, civ_col, civ)?;
        }
        if let Some(side) = &row.side {
            sheet.write_string(r, civ_col + 1, side)?;
        }
        if let Some(civ_side) = &row.civ_side {
            sheet.write_string(r, civ_col + 2, civ_side)?;
        }
        sheet.write_boolean(r, civ_col + 3, row.is_victor)?;
    }
    sheet.autofit();
    Ok(())
}

const MAX_SHEET_NAME: usize = 31;

/// Excel sheet names are limited to 31 characters, cannot contain `[]:*?/\`
/// and cannot start or end with an apostrophe.
fn sheet_name(label: &str) -> String {
    let cleaned: String = label
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c => c,
        })
        .collect();
    let name: String = cleaned
        .trim_matches('\'')
        .trim()
        .chars()
        .take(MAX_SHEET_NAME)
        .collect();
    let name = name.trim_end_matches('\'').to_string();
    if name.is_empty() {
        "Sheet".to_string()
    } else {
        name
    }
}

/// Hands out sheet names that are unique ignoring case, as Excel requires.
/// Clashes get a " (2)", " (3)", ... suffix.
struct SheetNames {
    used: HashSet<String>,
}

impl SheetNames {
    fn new() -> Self {
        // "History" is reserved by Excel
        let used = HashSet::from(["history".to_string()]);
        SheetNames { used }
    }

    fn claim(&mut self, label: &str) -> String {
        let base = sheet_name(label);
        let mut candidate = base.clone();
        let mut n = 2;
        while self.used.contains(&candidate.to_lowercase()) {
            let suffix = format!(" ({})", n);
            let keep = MAX_SHEET_NAME - suffix.chars().count();
            let stem: String = base.chars().take(keep).collect();
            candidate = format!("{}{}", stem.trim_end_matches('\''), suffix);
            n += 1;
        }
        self.used.insert(candidate.to_lowercase());
        candidate
    }
}
