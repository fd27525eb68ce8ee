use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;

use crate::cli::{parse_positive, OutputFormat};
use crate::core::sequence::MoveSequence;
use crate::database::store::GameDatabase;
use crate::matching::engine::{
    rank, MatchingConfig, MatchingEngine, ScoreRow, DEFAULT_MAX_MOVES, DEFAULT_RESULT_LIMIT,
};
use crate::parsing;

#[derive(Args)]
pub struct SearchArgs {
    /// Query SGF record
    /// Use '-' for stdin
    #[arg(required = true)]
    pub query: PathBuf,

    /// Directory of SGF records to search
    #[arg(short, long, default_value = "database")]
    pub database: PathBuf,

    /// Number of opening moves to compare
    #[arg(short, long, default_value_t = DEFAULT_MAX_MOVES, value_parser = parse_positive)]
    pub moves: usize,

    /// Number of matches to show
    #[arg(short = 'n', long, default_value_t = DEFAULT_RESULT_LIMIT, value_parser = parse_positive)]
    pub max_matches: usize,

    /// Also write every database entry with its score to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute search subcommand
///
/// # Errors
///
/// Returns an error if the query cannot be read, the database directory
/// cannot be listed, or output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: SearchArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let query = read_query(&args.query, args.moves)?;

    if verbose {
        eprintln!("Read {} opening moves from query", query.len());
    }

    let database = GameDatabase::load_dir(&args.database, args.moves)
        .with_context(|| format!("Failed to load database {}", args.database.display()))?;

    if verbose {
        eprintln!(
            "Loaded database with {} records ({} skipped)",
            database.len(),
            database.skipped().len()
        );
    }

    let config = MatchingConfig {
        max_moves: args.moves,
        result_limit: args.max_matches,
    };
    let engine = MatchingEngine::with_config(&database, config);
    let rows = engine.score_variants(&engine.expand_query(&query));

    // Written even for an empty database so callers always get the file
    if let Some(path) = &args.output {
        write_all_scores(path, &rows)
            .with_context(|| format!("Failed to write scores to {}", path.display()))?;
        if verbose {
            eprintln!("Wrote {} scores to {}", rows.len(), path.display());
        }
    }

    if database.is_empty() {
        eprintln!("Warning: Database is empty, no records to match against.");
        return Ok(());
    }

    let matches = rank(rows, args.max_matches);

    match format {
        OutputFormat::Text => print_text_results(&matches, &query, verbose),
        OutputFormat::Json => print_json_results(&matches, &query, &args)?,
        OutputFormat::Tsv => print_tsv_results(&matches),
    }

    Ok(())
}

/// Read the query record from a file, or from stdin for `-`
///
/// # Errors
///
/// Returns an error if the record cannot be found, read, or decoded.
pub fn read_query(path: &Path, max_moves: usize) -> anyhow::Result<MoveSequence> {
    use std::io::{self, Read};

    if path.to_string_lossy() == "-" {
        let mut buffer = Vec::new();
        io::stdin().read_to_end(&mut buffer)?;
        return Ok(parsing::sgf::parse_record_bytes(&buffer, max_moves, "<stdin>")?);
    }

    parsing::sgf::parse_file(path, max_moves)
        .with_context(|| format!("Failed to read query record {}", path.display()))
}

/// Write `path, score` lines for every row, best first
///
/// Scores use the shortest round-trip float form, so a perfect match is
/// written as `100.0`.
fn write_all_scores(path: &Path, rows: &[ScoreRow]) -> anyhow::Result<()> {
    let ranked = rank(rows.to_vec(), rows.len());
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);

    for row in &ranked {
        let source = row
            .path
            .as_ref()
            .map_or_else(|| row.id.to_string(), |p| p.display().to_string());
        writeln!(file, "{source}, {:?}", row.score)?;
    }

    file.flush()?;
    Ok(())
}

fn print_text_results(matches: &[ScoreRow], query: &MoveSequence, verbose: bool) {
    if verbose {
        println!("Query: {}", query.to_sgf_nodes());
    }

    for (i, row) in matches.iter().enumerate() {
        print!("#{:<3} {:>6.2}  {}", i + 1, row.score, row.id);
        match (&row.variant, verbose) {
            (Some(variant), true) => println!("  [{variant}]"),
            _ => println!(),
        }
    }
}

fn print_json_results(
    matches: &[ScoreRow],
    query: &MoveSequence,
    args: &SearchArgs,
) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "query": {
            "path": args.query.display().to_string(),
            "moves": query.len(),
            "sgf": query.to_sgf_nodes(),
        },
        "configuration": {
            "max_moves": args.moves,
            "result_limit": args.max_matches,
        },
        "matches": matches
            .iter()
            .enumerate()
            .map(|(i, row)| {
                serde_json::json!({
                    "rank": i + 1,
                    "id": row.id.0,
                    "path": row.path.as_ref().map(|p| p.display().to_string()),
                    "score": row.score,
                    "variant": row.variant,
                })
            })
            .collect::<Vec<_>>(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_results(matches: &[ScoreRow]) {
    println!("rank\tid\tscore\tvariant");
    for (i, row) in matches.iter().enumerate() {
        println!(
            "{}\t{}\t{:.4}\t{}",
            i + 1,
            row.id,
            row.score,
            row.variant.as_deref().unwrap_or("-"),
        );
    }
}
