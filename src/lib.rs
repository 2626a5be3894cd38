//! 7 Wonders session statistics
//!
//! Tools for turning hand-kept 7 Wonders score sheets into per-player and
//! per-civilization statistics.
//!
//! This library provides:
//! - `game`: Parsing one score sheet into a validated `SingleGameRecord`
//! - `collection`: Cumulative player, civ-side and victor tables across a workbook
//! - `workbook`: Sheet readers (CSV directory, in-memory)
//! - `chart`: Score distribution comparison charts
//! - `pipeline`: Report and export functions used by the CLI
//!
//! Binaries:
//! - `wonders-stats`: Command-line front end for reports, lookups, charts and exports

pub mod chart;
pub mod civilization;
pub mod collection;
pub mod error;
pub mod game;
pub mod pipeline;
pub mod score;
pub mod table;
pub mod workbook;

pub use collection::{GameCollection, GameRow, History, HistorySummary};
pub use error::{Result, WondersError};
pub use game::SingleGameRecord;
pub use score::{CategoryScores, ScoreCategory};
pub use table::{Cell, RawTable};
pub use workbook::{CsvWorkbook, MemoryWorkbook, SheetSource};
