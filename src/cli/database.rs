use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Subcommand};

use crate::cli::{parse_positive, OutputFormat};
use crate::core::types::EntryId;
use crate::database::store::GameDatabase;
use crate::matching::engine::DEFAULT_MAX_MOVES;

#[derive(Args)]
pub struct DatabaseArgs {
    #[command(subcommand)]
    pub command: DatabaseCommands,
}

#[derive(Subcommand)]
pub enum DatabaseCommands {
    /// List all records in the database
    List {
        /// Directory of SGF records
        #[arg(short, long, default_value = "database")]
        database: PathBuf,

        /// Number of opening moves to read from each record
        #[arg(short, long, default_value_t = DEFAULT_MAX_MOVES, value_parser = parse_positive)]
        moves: usize,
    },

    /// Show the opening of a specific record
    Show {
        /// Record file name
        #[arg(required = true)]
        name: String,

        /// Directory of SGF records
        #[arg(short, long, default_value = "database")]
        database: PathBuf,

        /// Number of opening moves to show
        #[arg(short, long, default_value_t = DEFAULT_MAX_MOVES, value_parser = parse_positive)]
        moves: usize,
    },
}

/// Execute database subcommand
///
/// # Errors
///
/// Returns an error if the database directory cannot be read or a record is
/// not found.
pub fn run(args: DatabaseArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    match args.command {
        DatabaseCommands::List { database, moves } => run_list(&database, moves, format, verbose),
        DatabaseCommands::Show {
            name,
            database,
            moves,
        } => run_show(&name, &database, moves, format),
    }
}

fn load(dir: &Path, moves: usize) -> anyhow::Result<GameDatabase> {
    GameDatabase::load_dir(dir, moves)
        .with_context(|| format!("Failed to load database {}", dir.display()))
}

fn run_list(
    dir: &Path,
    moves: usize,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let database = load(dir, moves)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "directory": dir.display().to_string(),
                "entries": database
                    .entries()
                    .iter()
                    .map(|e| serde_json::json!({ "id": e.id.0, "moves": e.moves.len() }))
                    .collect::<Vec<_>>(),
                "skipped": database.skipped(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("id\tmoves");
            for entry in database.entries() {
                println!("{}\t{}", entry.id, entry.moves.len());
            }
        }
        OutputFormat::Text => {
            println!("Records in {}:", dir.display());
            println!("{}", "-".repeat(60));
            for entry in database.entries() {
                println!("{:<50} {:>6} moves", entry.id.0, entry.moves.len());
            }
            println!("{}", "-".repeat(60));
            println!("Total: {} records", database.len());

            if !database.skipped().is_empty() {
                println!("Skipped: {} unreadable", database.skipped().len());
                if verbose {
                    for skipped in database.skipped() {
                        println!("  {}: {}", skipped.source, skipped.reason);
                    }
                }
            }
        }
    }

    Ok(())
}

fn run_show(name: &str, dir: &Path, moves: usize, format: OutputFormat) -> anyhow::Result<()> {
    let database = load(dir, moves)?;

    let entry = database
        .get(&EntryId::new(name))
        .ok_or_else(|| anyhow::anyhow!("Record '{name}' not found in {}", dir.display()))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(entry)?);
        }
        OutputFormat::Tsv => {
            println!("index\tcolor\tpoint");
            for (i, mv) in entry.moves.moves().iter().enumerate() {
                let point = mv.point().map_or_else(|| "pass".to_string(), |p| p.to_string());
                println!("{}\t{}\t{point}", i + 1, mv.color().letter());
            }
        }
        OutputFormat::Text => {
            println!("Record: {}", entry.id);
            if let Some(path) = &entry.path {
                println!("Path: {}", path.display());
            }
            println!("Moves: {}", entry.moves.len());
            println!();
            println!("{}", entry.moves.to_sgf_nodes());
        }
    }

    Ok(())
}
