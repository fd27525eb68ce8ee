//! Command-line interface for kifu-finder.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **search**: Rank a database of records by similarity to a query record
//! - **compare**: Score two records against each other
//! - **database**: List or show the records of a database directory
//! - **serve**: Start the interactive web interface
//!
//! ## Usage
//!
//! ```text
//! # Rank the database against a query using the first 30 moves
//! kifu-finder search query.sgf --database games/ --moves 30
//!
//! # JSON output for scripting
//! kifu-finder search query.sgf --database games/ --format json
//!
//! # Write every score to a file, not just the top matches
//! kifu-finder search query.sgf --database games/ --output result.txt
//!
//! # Compare two records directly
//! kifu-finder compare a.sgf b.sgf
//!
//! # Start web UI
//! kifu-finder serve --database games/ --port 8080 --open
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::matching::engine::DEFAULT_MAX_MOVES;

pub mod compare;
pub mod database;
pub mod search;

#[derive(Parser)]
#[command(name = "kifu-finder")]
#[command(version)]
#[command(about = "Find Go game records with a similar opening")]
#[command(
    long_about = "kifu-finder compares the opening of a query SGF record against a directory of records.\n\nEvery record is compared under all 8 board symmetries, with and without exchanging the players, so rotated, mirrored and color-swapped copies of the same opening are found."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank database records by similarity to a query record
    Search(search::SearchArgs),

    /// Compare two records
    Compare(compare::CompareArgs),

    /// Inspect the record database
    Database(database::DatabaseArgs),

    /// Start the web server
    Serve(ServeArgs),
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Directory of SGF records to search
    #[arg(short, long, default_value = "database")]
    pub database: PathBuf,

    /// Largest number of opening moves a request may compare
    #[arg(short, long, default_value_t = DEFAULT_MAX_MOVES, value_parser = parse_positive)]
    pub moves: usize,

    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Parse a strictly positive count (move cutoff or result limit)
///
/// # Errors
///
/// Returns a message if the value is not a positive integer.
pub fn parse_positive(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
