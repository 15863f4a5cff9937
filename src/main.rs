//! TreeWatch — polls directory trees and logs files added, removed, or
//! modified between scans.
//!
//! Thin binary entry point. All scanning logic lives in `treewatch-core`;
//! this file owns argument parsing, logging setup, and the sleep loop.

use anyhow::Context;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::{info, Level};
use treewatch_core::{ScannerConfig, TreeScanner};

#[derive(Parser, Debug)]
#[command(name = "treewatch")]
#[command(version)]
#[command(about = "Poll directory trees and report added, removed, and modified files")]
struct Cli {
    /// Directories to monitor (added to any listed in --config)
    #[arg(value_name = "DIR")]
    directories: Vec<PathBuf>,

    /// JSON scanner configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only track file names matching this regex (repeatable)
    #[arg(short, long, value_name = "REGEX")]
    include: Vec<String>,

    /// Never track file names matching this regex (repeatable, wins over --include)
    #[arg(short, long, value_name = "REGEX")]
    exclude: Vec<String>,

    /// Do not descend into subdirectories
    #[arg(long)]
    no_recurse: bool,

    /// Seconds to sleep between scans
    #[arg(long, value_name = "SECS", default_value_t = 2)]
    interval: u64,

    /// Scan once, list the tracked files, and exit
    #[arg(long)]
    once: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short = 'v', long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short = 'q', long)]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> Level {
        if self.quiet {
            return Level::WARN;
        }
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    /// Merge the config file (if any) with command-line arguments.
    fn scanner_config(&self) -> anyhow::Result<ScannerConfig> {
        let mut config = match &self.config {
            Some(path) => ScannerConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ScannerConfig::default(),
        };
        config.directories.extend(self.directories.iter().cloned());
        config.include_masks.extend(self.include.iter().cloned());
        config.exclude_masks.extend(self.exclude.iter().cloned());
        if self.no_recurse {
            config.recurse = false;
        }
        anyhow::ensure!(
            !config.directories.is_empty(),
            "no directories to monitor: pass at least one DIR or a --config listing some"
        );
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .init();

    let config = cli.scanner_config()?;
    let mut scanner = TreeScanner::from_config(&config);

    // Baseline: everything found now is the starting state, not a change.
    scanner.scan().context("initial scan failed")?;
    info!(
        "Tracking {} files in {} directories",
        scanner.files().len(),
        scanner.directories().count()
    );

    if cli.once {
        for path in scanner.files() {
            info!("{}", path.display());
        }
        return Ok(());
    }

    let interval = Duration::from_secs(cli.interval);
    loop {
        thread::sleep(interval);
        scanner.scan().context("scan failed")?;

        for path in scanner.new_files() {
            info!("added: {}", path.display());
        }
        for path in scanner.removed_files() {
            info!("removed: {}", path.display());
        }
        for path in scanner.modified_files() {
            let Some(record) = scanner.stats(path) else {
                continue;
            };
            info!(
                "modified: {} ({} -> {} bytes)",
                path.display(),
                record.previous.size,
                record.current.size
            );
        }
    }
}
