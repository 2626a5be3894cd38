//! Side-by-side score distribution charts for players, civ-sides or victors.
//!
//! Output is an Excel workbook: a scatter chart of every game's points per
//! column, the plotted points, and box statistics per label.

use crate::collection::{GameCollection, GameRow};
use crate::score::VALUE_COLUMNS;
use anyhow::{bail, Context, Result};
use rust_xlsxwriter::{Chart, ChartType, Format, Workbook};
use std::path::Path;

const POINTS_SHEET: &str = "Points";
const LABEL_SPREAD: f64 = 0.15;
const STAT_NAMES: [&str; 5] = ["Min", "Q1", "Median", "Q3", "Max"];

/// Five-number summary of one column of one history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl BoxStats {
    /// Quartiles use linear interpolation between closest ranks.
    /// Returns `None` for an empty sample.
    pub fn from_values(values: &[i64]) -> Option<BoxStats> {
        if values.is_empty() {
            return None;
        }
        let mut sorted: Vec<f64> = values.iter().map(|&v| v as f64).collect();
        sorted.sort_by(|a, b| a.total_cmp(b));
        Some(BoxStats {
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }

    fn as_row(&self) -> [f64; 5] {
        [self.min, self.q1, self.median, self.q3, self.max]
    }
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = (sorted.len() - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Box statistics for each of the eight value columns of a history.
pub fn column_stats(rows: &[GameRow]) -> Vec<Option<BoxStats>> {
    (0..VALUE_COLUMNS.len())
        .map(|col| {
            let values: Vec<i64> = rows.iter().map(|r| r.values()[col]).collect();
            BoxStats::from_values(&values)
        })
        .collect()
}

/// Render a comparison of score distributions for the given lookup keys.
///
/// Every label is resolved with [`GameCollection::lookup`] before anything
/// is written, so an unknown label leaves no partial file behind.
pub fn compare_distributions<S: AsRef<str>>(
    collection: &GameCollection,
    labels: &[S],
    output: &Path,
) -> Result<()> {
    if labels.is_empty() {
        bail!("No labels given to compare");
    }

    let histories: Vec<(&str, &[GameRow])> = labels
        .iter()
        .map(|label| {
            let label = label.as_ref();
            collection
                .lookup(label)
                .map(|rows| (label, rows))
                .with_context(|| format!("Cannot compare '{}'", label))
        })
        .collect::<Result<_>>()?;

    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    // -- Chart sheet --
    let mut chart = Chart::new(ChartType::Scatter);
    chart.title().set_name("Score distributions");
    chart
        .x_axis()
        .set_name("Red, Coins, Wonders, Blue, Yellow, Purple, Green, Total")
        .set_min(0.5)
        .set_max(VALUE_COLUMNS.len() as f64 + 0.5);
    chart.y_axis().set_name("Points");

    let mut next_row: u32 = 1;
    let mut series_ranges = Vec::with_capacity(histories.len());
    for (_, rows) in &histories {
        let count = (rows.len() * VALUE_COLUMNS.len()) as u32;
        series_ranges.push((next_row, next_row + count.saturating_sub(1), count));
        next_row += count;
    }

    for ((label, _), (first, last, count)) in histories.iter().zip(&series_ranges) {
        if *count == 0 {
            continue;
        }
        chart
            .add_series()
            .set_name(*label)
            .set_categories((POINTS_SHEET, *first, 0, *last, 0))
            .set_values((POINTS_SHEET, *first, 1, *last, 1));
    }

    let chart_sheet = workbook.add_worksheet();
    chart_sheet.set_name("Chart")?;
    chart_sheet.set_column_width(0, 12)?;
    chart_sheet.insert_chart(1, 1, &chart)?;

    // -- Points sheet: one (x, y) per game per column, x offset by label --
    let points_sheet = workbook.add_worksheet();
    points_sheet.set_name(POINTS_SHEET)?;
    points_sheet.write_string_with_format(0, 0, "X", &bold)?;
    points_sheet.write_string_with_format(0, 1, "Y", &bold)?;
    points_sheet.write_string_with_format(0, 2, "Label", &bold)?;
    points_sheet.write_string_with_format(0, 3, "Game", &bold)?;
    points_sheet.write_string_with_format(0, 4, "Player", &bold)?;

    let centre = (histories.len() as f64 - 1.0) / 2.0;
    let mut row: u32 = 1;
    for (i, (label, rows)) in histories.iter().enumerate() {
        let offset = (i as f64 - centre) * LABEL_SPREAD;
        for game_row in rows.iter() {
            for (col, value) in game_row.values().iter().enumerate() {
                points_sheet.write_number(row, 0, col as f64 + 1.0 + offset)?;
                points_sheet.write_number(row, 1, *value as f64)?;
                points_sheet.write_string(row, 2, *label)?;
                points_sheet.write_string(row, 3, &game_row.game)?;
                points_sheet.write_string(row, 4, &game_row.player)?;
                row += 1;
            }
        }
    }

    // -- Summary sheet: box statistics --
    let summary = workbook.add_worksheet();
    summary.set_name("Summary")?;
    summary.write_string_with_format(0, 0, "Label", &bold)?;
    summary.write_string_with_format(0, 1, "Statistic", &bold)?;
    for (col, name) in VALUE_COLUMNS.iter().enumerate() {
        summary.write_string_with_format(0, col as u16 + 2, *name, &bold)?;
    }

    let mut row: u32 = 1;
    for (label, rows) in &histories {
        let stats = column_stats(rows);
        for (stat_idx, stat_name) in STAT_NAMES.iter().enumerate() {
            summary.write_string(row, 0, *label)?;
            summary.write_string(row, 1, *stat_name)?;
            for (col, col_stats) in stats.iter().enumerate() {
                if let Some(s) = col_stats {
                    summary.write_number(row, col as u16 + 2, s.as_row()[stat_idx])?;
                }
            }
            row += 1;
        }
    }

    workbook
        .save(output)
        .with_context(|| format!("Failed to write chart workbook {}", output.display()))?;
    log::info!(
        "Wrote distribution chart for {} labels to {}",
        histories.len(),
        output.display()
    );
    Ok(())
}
