//! Command-line driver.
//!
//! Validates selections and calls into the core: fetch/archive a staged
//! session, list the archive, compare sessions, list keys, and rebuild the
//! archive after parser changes.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::archive::{Archive, LIST_HEADERS};
use crate::compare::{compare_combined, compare_timeline, timeline_filenames};
use crate::progress::LogProgress;
use crate::settings::Settings;
use crate::source::{LocalSource, LogSource};

#[derive(Parser)]
#[command(name = "riglog")]
#[command(about = "Analyze and compare multi-camera tracking rig logs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Archive/data directory (defaults to the configured or platform dir)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CompareMode {
    Box,
    Timeline,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch raw logs into staging, then archive them as a new session
    Fetch {
        /// Directory to fetch from (overrides the configured source dir)
        #[arg(long)]
        source_dir: Option<PathBuf>,
    },

    /// List archived sessions
    List,

    /// Compare sessions over selected keys
    Show {
        /// Session identifiers, in display order
        #[arg(required = true)]
        ids: Vec<String>,

        /// Augmented keys to compare
        #[arg(long, value_delimiter = ',', required = true)]
        keys: Vec<String>,

        #[arg(long, value_enum, default_value = "box")]
        mode: CompareMode,

        /// Data filename for timeline mode
        #[arg(long)]
        file: Option<String>,

        /// Emit chart-ready JSON instead of a text summary
        #[arg(long)]
        json: bool,
    },

    /// List a session's augmented keys
    Keys {
        /// Session identifier
        id: String,
    },

    /// Rebuild every session from its archived raw files
    Reimport,
}

pub fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load();
    let data_dir = cli
        .data_dir
        .clone()
        .or_else(|| settings.resolved_data_dir())
        .context("could not determine a data directory")?;

    let mut archive = Archive::open(&data_dir, &settings.general_filename, settings.import_options())
        .with_context(|| format!("opening archive under {}", data_dir.display()))?;

    match cli.command {
        Commands::Fetch { source_dir } => {
            let source_dir = source_dir
                .or_else(|| settings.source_dir.clone())
                .context("no source directory configured; pass --source-dir or set it in settings")?;

            let staging = data_dir.join("staging");
            let source = LocalSource::new(source_dir);
            let count = source
                .fetch(&staging, &mut LogProgress::default())
                .context("fetching raw logs")?;
            if count == 0 {
                bail!("no log files found at the source");
            }

            let id = archive
                .import_staged(&staging, &mut LogProgress::default())
                .context("archiving staged session")?;
            println!("archived session {}", id);
        }

        Commands::List => {
            let rows = archive.listing();
            if rows.is_empty() {
                println!("no sessions archived");
            } else {
                print_table(&LIST_HEADERS, &rows);
            }
        }

        Commands::Show {
            ids,
            keys,
            mode,
            file,
            json,
        } => {
            let sessions = archive.get(&ids)?;

            match mode {
                CompareMode::Box => {
                    let result = compare_combined(&sessions, &keys);
                    if json {
                        println!("{}", serde_json::to_string_pretty(&result)?);
                    } else {
                        print_combined(&result);
                    }
                }
                CompareMode::Timeline => {
                    let Some(file) = file else {
                        let available = timeline_filenames(&sessions);
                        bail!(
                            "timeline mode needs --file; available: {}",
                            available.join(", ")
                        );
                    };
                    let result = compare_timeline(&sessions, &keys, &file);
                    if json {
                        println!("{}", serde_json::to_string_pretty(&result)?);
                    } else {
                        print_timeline(&result);
                    }
                }
            }
        }

        Commands::Keys { id } => {
            let sessions = archive.get(&[id])?;
            for key in sessions[0].keys() {
                println!("{}", key);
            }
        }

        Commands::Reimport => {
            let count = archive
                .reimport_all(&mut LogProgress::default())
                .context("reimporting archive")?;
            println!("{} sessions reimported", count);
        }
    }

    Ok(())
}

fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let line: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:<width$}", h, width = widths[i]))
        .collect();
    println!("{}", line.join("  "));

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect();
        println!("{}", line.join("  "));
    }
}

fn print_combined(result: &crate::compare::CombinedComparison) {
    for key in &result.keys {
        println!("{}", key.key);
        if let Some(label) = &key.axis_label {
            println!("  axis: {}", label);
        }
        for (label, slot) in result.labels.iter().zip(&key.slots) {
            let label = label.replace('\n', " / ");
            match &slot.summary {
                Some(s) => println!(
                    "  {}: min={} q1={} median={} q3={} max={} outliers={}",
                    label,
                    s.min,
                    s.q1,
                    s.median,
                    s.q3,
                    s.max,
                    slot.outliers.len()
                ),
                None => println!("  {}: (no data)", label),
            }
        }
    }
}

fn print_timeline(result: &crate::compare::TimelineComparison) {
    println!("file: {}", result.filename);
    for panel in &result.panels {
        println!("{}", panel.label.replace('\n', " / "));
        if panel.series.is_empty() {
            println!("  (no data)");
        }
        for (key, values) in panel.series.iter() {
            println!("  {}: {} values", key, values.len());
        }
    }
}
