use std::path::PathBuf;

use clap::Args;

use crate::cli::search::read_query;
use crate::cli::{parse_positive, OutputFormat};
use crate::core::entry::DatabaseEntry;
use crate::core::sequence::MoveSequence;
use crate::database::store::GameDatabase;
use crate::matching::engine::{MatchingEngine, ScoreRow, DEFAULT_MAX_MOVES};

#[derive(Args)]
pub struct CompareArgs {
    /// Query SGF record
    #[arg(required = true)]
    pub input_a: PathBuf,

    /// Record to compare against
    #[arg(required = true)]
    pub input_b: PathBuf,

    /// Number of opening moves to compare
    #[arg(short, long, default_value_t = DEFAULT_MAX_MOVES, value_parser = parse_positive)]
    pub moves: usize,
}

/// Score record B against every symmetry of record A
///
/// # Errors
///
/// Returns an error if either record cannot be read.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: CompareArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let query_a = read_query(&args.input_a, args.moves)?;
    let query_b = read_query(&args.input_b, args.moves)?;

    if verbose {
        eprintln!("Input A: {} moves", query_a.len());
        eprintln!("Input B: {} moves", query_b.len());
    }

    let database = GameDatabase::from_entries(vec![DatabaseEntry::from_path(
        &args.input_b,
        query_b.clone(),
    )]);
    let engine = MatchingEngine::new(&database);
    let rows = engine.score_variants(&engine.expand_query(&query_a));

    let Some(row) = rows.into_iter().next() else {
        anyhow::bail!("No score produced for {}", args.input_b.display());
    };

    match format {
        OutputFormat::Text => print_text_comparison(&args, &query_a, &query_b, &row),
        OutputFormat::Json => print_json_comparison(&args, &query_a, &query_b, &row)?,
        OutputFormat::Tsv => print_tsv_comparison(&row),
    }

    Ok(())
}

fn print_text_comparison(
    args: &CompareArgs,
    query_a: &MoveSequence,
    query_b: &MoveSequence,
    row: &ScoreRow,
) {
    println!("Comparison Results");
    println!("{}", "=".repeat(60));

    println!("\nInput A: {}", args.input_a.display());
    println!("  Moves: {}", query_a.len());

    println!("\nInput B: {}", args.input_b.display());
    println!("  Moves: {}", query_b.len());

    println!("\nSimilarity: {:.2}", row.score);
    println!(
        "  Best variant: {}",
        row.variant.as_deref().unwrap_or("none")
    );
}

fn print_json_comparison(
    args: &CompareArgs,
    query_a: &MoveSequence,
    query_b: &MoveSequence,
    row: &ScoreRow,
) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "input_a": {
            "path": args.input_a.display().to_string(),
            "moves": query_a.len(),
        },
        "input_b": {
            "path": args.input_b.display().to_string(),
            "moves": query_b.len(),
        },
        "score": row.score,
        "variant": row.variant,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_comparison(row: &ScoreRow) {
    println!("score\tvariant");
    println!(
        "{:.4}\t{}",
        row.score,
        row.variant.as_deref().unwrap_or("-")
    );
}
