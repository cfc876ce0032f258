use std::path::PathBuf;
use std::process::exit;

use chanfetch::{Board, Error, FetchSummary, Fetcher};
use clap::Parser;
use log::{error, info, LevelFilter};
use simple_logger::SimpleLogger;

/// Fetch threads and image metadata from a 4chan board.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// The board to fetch from (e.g. po, g).
    #[arg(short, long)]
    board: String,

    /// Number of threads to fetch.
    #[arg(short, long, default_value_t = 5)]
    threads: usize,

    /// Offset to start fetching threads from.
    #[arg(short, long, default_value_t = 0)]
    offset: usize,

    /// Output directory for saved records.
    #[arg(short, long, default_value = ".")]
    directory: PathBuf,
}

async fn run(args: &Args) -> Result<FetchSummary, Error> {
    let board = Board::new(&args.board)?;
    let fetcher = Fetcher::new(board, &args.directory)?;
    fetcher.fetch_top_threads(args.threads, args.offset).await
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(e) = SimpleLogger::new().with_level(LevelFilter::Info).init() {
        eprintln!("could not initialize logging: {e}");
    }

    info!("starting fetching process for board: {}", args.board);
    match run(&args).await {
        Ok(summary) => {
            info!(
                "fetching process completed: {} fetched, {} failed of {} selected",
                summary.fetched, summary.failed, summary.selected
            );
        }
        Err(e @ Error::InvalidBoard(_)) => {
            error!("validation error: {e}");
            eprintln!("Error: {e}. Please check the board name and try again.");
            exit(1);
        }
        Err(e) => {
            error!("an error occurred: {e}");
            eprintln!("An unexpected error occurred: {e}. Please check the logs for more details.");
            exit(1);
        }
    }
}
