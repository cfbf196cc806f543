//! riglog - log analysis and comparison for multi-camera tracking rigs
//!
//! riglog imports session folders of loosely-structured `key: value` text
//! logs, normalizes them into typed numeric series, computes box-plot
//! statistics with IQR outlier detection, and emits aligned comparison
//! structures for charting.

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;

use riglog::cli;

fn main() {
    let args = cli::Cli::parse();

    // Per-value diagnostics sit at debug level so production runs stay quiet
    let level = match args.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    if let Err(err) = cli::run(args) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
