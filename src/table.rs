//! Raw sheet tables as handed over by a sheet reader.
//!
//! A sheet is laid out with one row per score category (plus "Civilization"
//! and possibly a stale "Total"), a first column of row labels and one column
//! per player.

use crate::error::Result;
use csv::ReaderBuilder;
use std::io::Read;

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Classify a raw cell string: blank is empty, numeric text is a number.
    pub fn parse(raw: &str) -> Cell {
        let raw = raw.trim();
        if raw.is_empty() {
            return Cell::Empty;
        }
        match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => Cell::Number(n),
            _ => Cell::Text(raw.to_string()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integral numeric value, if this cell holds one that fits in an `i64`.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
            Cell::Number(n) if n.fract() == 0.0 && *n >= i64::MIN as f64 && *n < i64::MAX as f64 => {
                Some(*n as i64)
            }
            _ => None,
        }
    }
}

/// One sheet: row labels down the first column, player names across the header.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub players: Vec<String>,
    pub rows: Vec<(String, Vec<Cell>)>,
}

impl RawTable {
    pub fn new(players: Vec<String>) -> Self {
        RawTable {
            players,
            rows: Vec::new(),
        }
    }

    /// Append a labelled row. Short rows are padded with empty cells, long
    /// rows are cut to the player count.
    pub fn push_row(&mut self, label: &str, mut cells: Vec<Cell>) {
        cells.resize(self.players.len(), Cell::Empty);
        self.rows.push((label.trim().to_string(), cells));
    }

    /// Builder-style `push_row` taking raw strings, for hand-built tables.
    pub fn with_row(mut self, label: &str, cells: &[&str]) -> Self {
        let cells = cells.iter().map(|c| Cell::parse(c)).collect();
        self.push_row(label, cells);
        self
    }

    /// Find a row by label, case-insensitive. The first matching row wins.
    pub fn row(&self, label: &str) -> Option<&[Cell]> {
        let label = label.trim();
        self.rows
            .iter()
            .find(|(l, _)| l.eq_ignore_ascii_case(label))
            .map(|(_, cells)| cells.as_slice())
    }

    /// Number of rows carrying this label, case-insensitive.
    pub fn row_count(&self, label: &str) -> usize {
        let label = label.trim();
        self.rows
            .iter()
            .filter(|(l, _)| l.eq_ignore_ascii_case(label))
            .count()
    }

    /// Parse a CSV sheet. The first header cell names the label column and is
    /// ignored; every other header is a player column.
    pub fn from_csv_reader<R: Read>(input: R) -> Result<RawTable> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(input);

        let headers = reader.headers()?.clone();
        let players: Vec<String> = headers.iter().skip(1).map(|h| h.to_string()).collect();
        let mut table = RawTable::new(players);

        for result in reader.records() {
            let record = result?;
            let label = record.get(0).unwrap_or("");
            if label.is_empty() && record.iter().all(|c| c.is_empty()) {
                continue;
            }
            let cells = record.iter().skip(1).map(Cell::parse).collect();
            table.push_row(label, cells);
        }

        Ok(table)
    }
}
