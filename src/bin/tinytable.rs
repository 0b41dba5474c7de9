//! TinyTable Console Binary
//!
//! Opens the table in a data directory and reads commands from stdin.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use clap::Parser;
use tinytable::config::WalSyncStrategy;
use tinytable::console::{self, CommandSource, Console};
use tinytable::{Config, Engine, TinyTable};
use tracing_subscriber::{fmt, EnvFilter};

/// TinyTable console
#[derive(Parser, Debug)]
#[command(name = "tinytable")]
#[command(about = "Fixed-schema row/column table over an embedded key-value store")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./ttdir")]
    data_dir: String,

    /// Fail instead of creating a missing data directory
    #[arg(long)]
    no_create: bool,

    /// Write buffer size in MB before the memtable is flushed
    #[arg(short = 'w', long, default_value = "16")]
    write_buffer_mb: usize,

    /// Bloom filter bits per key
    #[arg(short, long, default_value = "10")]
    bloom_bits: usize,

    /// fsync the WAL after every write
    #[arg(long)]
    sync: bool,

    /// Suppress the banner and prompt even on a terminal
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the console output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let wal_sync_strategy = if args.sync {
        WalSyncStrategy::EveryWrite
    } else {
        Config::default().wal_sync_strategy
    };
    let config = Config::builder()
        .data_dir(&args.data_dir)
        .create_if_missing(!args.no_create)
        .write_buffer_size(args.write_buffer_mb * 1024 * 1024)
        .bloom_bits_per_key(args.bloom_bits)
        .wal_sync_strategy(wal_sync_strategy)
        .build();

    tracing::info!("TinyTable v{}", tinytable::VERSION);

    let table = match Engine::open(config).and_then(TinyTable::open) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("Initial TinyTable failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let interactive = io::stdin().is_terminal() && !args.quiet;
    if interactive {
        println!("{}", console::banner());
    }

    let mut console = Console::new(table, io::stdout(), io::stderr()).with_prompt(interactive);
    if let Err(e) = console.run(CommandSource::new(io::stdin().lock())) {
        // Storage state is unknown; skip the schema persist
        eprintln!("Fatal error: {}", e);
        return ExitCode::FAILURE;
    }

    if let Err(e) = console.into_table().close() {
        eprintln!("Shutdown failed: {}", e);
        return ExitCode::FAILURE;
    }

    if interactive {
        println!("Bye.");
    }
    ExitCode::SUCCESS
}
