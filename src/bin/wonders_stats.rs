//! Wonders Stats - Reports and charts from 7 Wonders score sheets
//!
//! Reads a workbook (a directory of per-game CSV sheets), builds the
//! cumulative player / civilization tables and prints or exports them.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use wonders_stats::pipeline::{self, CompareConfig, ExportConfig};

#[derive(Parser)]
#[command(name = "wonders-stats")]
#[command(about = "Per-player and per-civilization statistics for 7 Wonders score sheets")]
struct Cli {
    /// Workbook directory containing one CSV file per game
    #[arg(short, long, env = "WONDERS_WORKBOOK")]
    workbook: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print victors and per-player / per-civilization summaries
    Report,

    /// Print the table for a player, a civ-side ("Giza - A") or "victors"
    Lookup {
        key: String,

        /// Write CSV to stdout instead of a text table
        #[arg(long)]
        csv: bool,
    },

    /// Chart score distributions of several players / civ-sides side by side
    Compare {
        #[arg(required = true)]
        labels: Vec<String>,

        /// Output xlsx file
        #[arg(short, long, default_value = "compare.xlsx")]
        output: PathBuf,
    },

    /// Export all tables to an Excel workbook
    Export {
        /// Output xlsx file
        #[arg(short, long)]
        output: PathBuf,

        /// Add one sheet per civ-side
        #[arg(long)]
        civ_sides: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let collection = pipeline::load_collection(&cli.workbook)?;

    match cli.command {
        Commands::Report => {
            print!("{}", pipeline::report(&collection));
        }
        Commands::Lookup { key, csv } => {
            let rows = collection.lookup(&key)?;
            if csv {
                pipeline::write_rows_csv(rows, io::stdout().lock())?;
            } else {
                print!("{}", pipeline::format_rows(rows));
            }
        }
        Commands::Compare { labels, output } => {
            let summary = pipeline::compare(&collection, &CompareConfig { labels, output })?;
            println!("{}", summary);
        }
        Commands::Export { output, civ_sides } => {
            let config = ExportConfig {
                output,
                include_civ_sides: civ_sides,
            };
            println!("{}", pipeline::export_workbook(&collection, &config)?);
        }
    }

    Ok(())
}
