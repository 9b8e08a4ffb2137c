// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use log::{error, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use clap::{Parser, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_controller::{Controller, ProcessOptions};

mod app_controller;
mod citation_format;
mod converters;
mod errors;
mod file_utils;
mod validation;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for dscite
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// dscite - Deep Research Citation Formatter
///
/// Converts inline numeric citations in AI deep-research reports
/// (GPT and Gemini dialects) to Markdown footnote format.
#[derive(Parser, Debug)]
#[command(name = "dscite")]
#[command(version = "1.0.0")]
#[command(about = "Convert deep-research report citations to Markdown footnotes")]
#[command(long_about = "dscite rewrites inline citation markers and the trailing reference list
of GPT and Gemini deep-research reports into uniform Markdown footnote
format ([^n] inline, [^n]: Title URL definitions), preserving everything
else byte-for-byte. A backup copy (.bak) is written before any file is
overwritten.

EXAMPLES:
    dscite report.md                  # Convert a single report in place
    dscite -n report.md               # Preview changes without writing
    dscite -c report.md               # Check format and citation counts
    dscite -f report.md               # Re-check an already-converted report
    dscite -r ./deep-research/        # Convert every .md file in a tree
    dscite completions bash           # Generate bash completions")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Markdown file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Preview changes without writing
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Check file format and citation counts without processing
    #[arg(short, long)]
    check: bool,

    /// Force re-process even if already converted
    #[arg(short, long)]
    force: bool,

    /// Process subdirectories recursively
    #[arg(short, long)]
    recursive: bool,

    /// Show detailed output
    #[arg(short, long)]
    verbose: bool,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Initialize the logger once with info level; -v raises it to debug.
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "dscite", &mut std::io::stdout());
        return Ok(());
    }

    let input_path = cli
        .input_path
        .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

    if cli.verbose {
        log::set_max_level(LevelFilter::Debug);
    }

    if !input_path.exists() {
        return Err(anyhow!("Path not found: {:?}", input_path));
    }

    let options = ProcessOptions {
        dry_run: cli.dry_run,
        check_only: cli.check,
        force: cli.force,
        recursive: cli.recursive,
        verbose: cli.verbose,
    };
    log_mode_banner(&options);

    let controller = Controller::new(options);

    if input_path.is_file() {
        let result = controller.process_file(&input_path);
        if result.success {
            info!("✓ {}", result.message);
            Ok(())
        } else {
            error!("✗ {}", result.message);
            Err(anyhow!("Processing failed: {}", result.message))
        }
    } else if input_path.is_dir() {
        let stats = controller.process_directory(&input_path)?;
        info!(
            "Summary: {} processed, {} already converted, {} skipped, {} errors",
            stats.processed, stats.converted, stats.skipped, stats.errors
        );
        Ok(())
    } else {
        Err(anyhow!("Not a file or directory: {:?}", input_path))
    }
}

// Helper to announce which non-default modes are active
fn log_mode_banner(options: &ProcessOptions) {
    let mut modes = Vec::new();
    if options.dry_run {
        modes.push("PREVIEW");
    }
    if options.check_only {
        modes.push("CHECK");
    }
    if options.force {
        modes.push("FORCE");
    }
    if options.recursive {
        modes.push("RECURSIVE");
    }
    if options.verbose {
        modes.push("VERBOSE");
    }
    if !modes.is_empty() {
        info!("[{}]", modes.join(" | "));
    }
}
