use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pricelist_tools::aggregate::AggregateOutcome;
use pricelist_tools::{Result, ToolError, aggregate, search};
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose)?;
    match cli.command {
        Command::Aggregate(args) => execute_aggregate(args),
        Command::Search(args) => execute_search(args),
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

fn execute_aggregate(args: AggregateArgs) -> Result<()> {
    match aggregate::run(&args.source_dir, &args.output)? {
        AggregateOutcome::NoSourceFiles => {
            println!(
                "No spreadsheet files found in '{}'.",
                args.source_dir.display()
            );
        }
        AggregateOutcome::NoRowsExtracted => {
            println!(
                "No data rows could be extracted from '{}'.",
                args.source_dir.display()
            );
        }
        AggregateOutcome::Written(summary) => {
            println!(
                "Aggregated {} rows from {} sheets across {} files into '{}'.",
                summary.rows,
                summary.sheets_read,
                summary.files_found,
                args.output.display()
            );
        }
    }
    Ok(())
}

fn execute_search(args: SearchArgs) -> Result<()> {
    let results = search::run(&args.query, &args.input)?;
    if args.json {
        println!("{}", search::results_to_json(&results)?);
    } else {
        print!("{}", search::render_results(&results, args.full));
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Aggregate spreadsheet price lists into one table and search it."
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Combine every price list in the source directory into one spreadsheet.
    Aggregate(AggregateArgs),
    /// Search the aggregated price list for rows containing the query.
    Search(SearchArgs),
}

#[derive(clap::Args)]
struct AggregateArgs {
    /// Directory containing the source price lists.
    #[arg(long, default_value = "price-lists")]
    source_dir: PathBuf,

    /// Path of the combined spreadsheet to write.
    #[arg(long, default_value = "aggregated_pricelist.xlsx")]
    output: PathBuf,
}

#[derive(clap::Args)]
struct SearchArgs {
    /// Text to look for in any cell of the aggregated price list.
    query: String,

    /// Path to the aggregated spreadsheet produced by `aggregate`.
    #[arg(long, default_value = "aggregated_pricelist.xlsx")]
    input: PathBuf,

    /// Print every populated column of matching rows, not only the matching ones.
    #[arg(long)]
    full: bool,

    /// Emit results as JSON instead of formatted text.
    #[arg(long)]
    json: bool,
}
