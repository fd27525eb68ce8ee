use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod core;
mod database;
mod matching;
mod parsing;
mod utils;
mod web;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("kifu_finder=debug,info")
    } else {
        EnvFilter::new("kifu_finder=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Search(args) => {
            cli::search::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Compare(args) => {
            cli::compare::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Database(args) => {
            cli::database::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Serve(args) => {
            web::server::run(args)?;
        }
    }

    Ok(())
}
