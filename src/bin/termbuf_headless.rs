//! Headless Screen Buffer Runner
//!
//! Feeds a captured byte stream through the screen buffer and prints the
//! resulting state. Reads from a file or stdin.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use termbuf::{Config, Terminal};
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Run the termbuf screen buffer over captured terminal output
#[derive(ClapParser, Debug)]
#[command(name = "termbuf-headless", version, about)]
struct Args {
    /// Width in columns
    #[arg(short, long)]
    cols: Option<usize>,

    /// Height in rows
    #[arg(short, long)]
    rows: Option<usize>,

    /// Scrollback lines to keep
    #[arg(short, long)]
    scrollback: Option<usize>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the snapshot as JSON instead of text
    #[arg(short, long)]
    json: bool,

    /// Input file (reads stdin when omitted)
    input: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    // CLI args > environment variables > config file > defaults
    let mut config = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                error!("Error loading config '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };
    config.apply_env_vars();
    if let Some(cols) = args.cols {
        config.cols = cols;
    }
    if let Some(rows) = args.rows {
        config.rows = rows;
    }
    if let Some(scrollback) = args.scrollback {
        config.scrollback_limit = scrollback;
    }

    let input = match &args.input {
        Some(path) => match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                error!("Error reading file '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            let mut data = Vec::new();
            if let Err(e) = io::stdin().read_to_end(&mut data) {
                error!("Error reading stdin: {}", e);
                return ExitCode::FAILURE;
            }
            data
        }
    };

    let mut term = Terminal::from_config(&config);
    term.feed(&input);
    debug!(
        bytes = input.len(),
        scrollback = term.scrollback_len(),
        "processed input"
    );

    let snapshot = term.snapshot();
    if args.json {
        match snapshot.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Error serializing snapshot: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("Terminal State ({}x{}):", term.cols(), term.rows());
        println!("Cursor: ({}, {})", snapshot.cursor.row, snapshot.cursor.col);
        println!("---");
        for line in &snapshot.lines {
            println!("{}", line.text);
        }
        println!("---");
    }

    ExitCode::SUCCESS
}
