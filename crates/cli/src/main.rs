//! # blankscan-cli
//!
//! Command-line front end for the blankscan workbook scanner.

mod discover;
mod export;

use anyhow::{Context, Result};
use blankscan_core::{
    IdCheck, IdPresenceRule, ScanConfig, ScanMode, Scanner, TracingEvents, DEFAULT_CHUNK_SIZE,
};
use blankscan_sheet::{parse_column, ColSpan, Span};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use export::WorkbookResult;
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// blankscan - find empty cells and rows in workbooks
#[derive(Parser)]
#[command(name = "blankscan")]
#[command(author, version, about = "Find empty cells and rows in workbooks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write the log to this file
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Scan workbooks for empty cells or rows
    Scan(ScanArgs),
    /// Check that every data row of a register sheet has an ID
    CheckIds(CheckIdsArgs),
}

#[derive(Args)]
struct ScanArgs {
    /// Workbook files or directories to search
    #[arg(required = true, value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Report empty cells or fully empty rows
    #[arg(short, long, default_value = "cell")]
    mode: ModeArg,

    /// Rows per work unit
    #[arg(short, long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: u32,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Ignore the empty rows after the last row with data (row mode)
    #[arg(long)]
    trim_trailing: bool,

    /// First row to scan; rows above it are headers
    #[arg(long)]
    first_row: Option<u32>,

    /// Column range to scan, e.g. "B" or "A:C"
    #[arg(long, value_parser = parse_columns)]
    columns: Option<ColSpan>,

    /// Only scan this sheet (repeatable)
    #[arg(short, long = "sheet", value_name = "NAME")]
    sheets: Vec<String>,

    /// Give up on a work unit after this many milliseconds
    #[arg(long, value_name = "MS")]
    unit_timeout_ms: Option<u64>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct CheckIdsArgs {
    /// Workbook files or directories to search
    #[arg(required = true, value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Sheet holding the register
    #[arg(short, long, default_value = "WKshenshou")]
    sheet: String,

    /// ID column letter
    #[arg(short, long, default_value = "B", value_parser = parse_column_arg)]
    column: u32,

    /// First data row below the header block
    #[arg(long, default_value_t = 7)]
    first_row: u32,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(short = 'j', long)]
    threads: Option<usize>,
}

/// Scan granularity.
#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum ModeArg {
    /// Every empty cell
    #[default]
    Cell,
    /// Rows where every cell is empty
    Row,
}

impl From<ModeArg> for ScanMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Cell => ScanMode::Cell,
            ModeArg::Row => ScanMode::Row,
        }
    }
}

/// Output format for reports.
#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    /// Human readable text (default)
    #[default]
    Text,
    /// JSON document
    Json,
}

fn parse_columns(s: &str) -> Result<ColSpan, String> {
    Span::parse_columns(s).map_err(|e| e.to_string())
}

fn parse_column_arg(s: &str) -> Result<u32, String> {
    parse_column(s).map_err(|e| e.to_string())
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_file.as_ref())?;

    match cli.command {
        Command::Scan(args) => run_scan(&args),
        Command::CheckIds(args) => Ok(run_check_ids(&args)),
    }
}

/// Console log on stderr, optionally teed to a file.
fn init_logging(verbose: bool, log_file: Option<&PathBuf>) -> Result<()> {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();
    Ok(())
}

fn scan_config(args: &ScanArgs) -> ScanConfig {
    let mut config = ScanConfig::default()
        .with_mode(args.mode.into())
        .with_chunk_size(args.chunk_size)
        .with_trim_trailing(args.trim_trailing);
    if let Some(threads) = args.threads {
        config = config.with_threads(threads);
    }
    if let Some(row) = args.first_row {
        config = config.with_first_row(row);
    }
    if let Some(columns) = args.columns {
        config = config.with_columns(columns);
    }
    if !args.sheets.is_empty() {
        config = config.with_sheets(args.sheets.iter().cloned());
    }
    if let Some(ms) = args.unit_timeout_ms {
        config = config.with_unit_timeout(Duration::from_millis(ms));
    }
    config
}

fn run_scan(args: &ScanArgs) -> Result<ExitCode> {
    let config = scan_config(args);
    config.validate().map_err(|e| anyhow::anyhow!("{e}"))?;
    let scanner = Scanner::new(config).with_events(Arc::new(TracingEvents));

    let files = discover::discover(&args.paths);
    if files.is_empty() {
        println!("{}", "No workbooks found".yellow());
        return Ok(ExitCode::SUCCESS);
    }

    let mut results = Vec::with_capacity(files.len());
    for path in files {
        tracing::info!("scanning {}", path.display());
        let outcome = scanner.scan_path(&path).map_err(|e| {
            tracing::error!("{}: {e}", path.display());
            e.to_string()
        });
        results.push(WorkbookResult { path, outcome });
    }

    let rendered = match args.format {
        OutputFormat::Text => export::render_text(&results),
        OutputFormat::Json => export::render_json(&results)?,
    };
    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            println!("Report written to {}", path.display().to_string().cyan());
        }
        None => print!("{rendered}"),
    }

    print_summary(&results);
    let failed = results.iter().any(|r| r.outcome.is_err());
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn print_summary(results: &[WorkbookResult]) {
    for result in results {
        let path = result.path.display();
        match &result.outcome {
            Ok(outcome) if outcome.report.has_errors() => eprintln!(
                "{} {path}: {} findings, some sheets incomplete",
                "PARTIAL".yellow().bold(),
                outcome.total_findings
            ),
            Ok(outcome) if outcome.total_findings > 0 => eprintln!(
                "{} {path}: {} findings",
                "FOUND".yellow(),
                outcome.total_findings
            ),
            Ok(_) => eprintln!("{} {path}", "CLEAN".green()),
            Err(err) => eprintln!("{} {path}: {err}", "ERROR".red().bold()),
        }
    }
}

fn run_check_ids(args: &CheckIdsArgs) -> ExitCode {
    let rule = IdPresenceRule {
        sheet: args.sheet.clone(),
        column: args.column,
        first_data_row: args.first_row,
        threads: args.threads,
        ..IdPresenceRule::default()
    };

    let mut failed = false;
    for path in discover::discover(&args.paths) {
        let path_display = path.display();
        match rule.check_path(&path) {
            IdCheck::Complete => println!("{} {path_display}", "OK".green()),
            IdCheck::MissingIds(rows) => println!(
                "{} {path_display}: {} rows without ID: {}",
                "MISSING".yellow().bold(),
                rows.len(),
                join_rows(&rows)
            ),
            IdCheck::Partial { rows, failures } => {
                println!(
                    "{} {path_display}: {} rows without ID so far: {}",
                    "PARTIAL".yellow().bold(),
                    rows.len(),
                    join_rows(&rows)
                );
                for failure in failures {
                    println!("  rows {}: {}", failure.rows, failure.error);
                }
            }
            IdCheck::ColumnEmpty => println!(
                "{} {path_display}: ID column is empty",
                "EMPTY".red().bold()
            ),
            IdCheck::NoData => println!("{} {path_display}: no data rows", "SKIP".dimmed()),
            IdCheck::Failed(err) => {
                failed = true;
                println!("{} {path_display}: {err}", "ERROR".red().bold());
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn join_rows(rows: &[u32]) -> String {
    rows.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_scan_args_map_onto_config() {
        let cli = Cli::try_parse_from([
            "blankscan",
            "scan",
            "book.xlsx",
            "--mode",
            "row",
            "--chunk-size",
            "50",
            "--trim-trailing",
            "--columns",
            "b:d",
            "--sheet",
            "One",
            "--sheet",
            "Two",
            "--first-row",
            "3",
            "--unit-timeout-ms",
            "250",
        ])
        .unwrap();
        let Command::Scan(args) = cli.command else {
            panic!("expected scan");
        };

        let config = scan_config(&args);
        assert_eq!(config.mode, ScanMode::Row);
        assert_eq!(config.chunk_size, 50);
        assert!(config.trim_trailing);
        assert_eq!(config.columns, Some(Span::new(2, 4)));
        assert_eq!(config.sheets, Some(vec!["One".to_string(), "Two".to_string()]));
        assert_eq!(config.first_row, Some(3));
        assert_eq!(config.unit_timeout, Some(Duration::from_millis(250)));
        assert_eq!(config.threads, None);
    }

    #[test]
    fn test_scan_defaults() {
        let cli = Cli::try_parse_from(["blankscan", "scan", "dir"]).unwrap();
        let Command::Scan(args) = cli.command else {
            panic!("expected scan");
        };
        assert_eq!(scan_config(&args), ScanConfig::default());
    }

    #[test]
    fn test_bad_columns_rejected() {
        assert!(Cli::try_parse_from(["blankscan", "scan", "x.xlsx", "--columns", "1:2"]).is_err());
    }

    #[test]
    fn test_check_ids_column_letter() {
        let cli =
            Cli::try_parse_from(["blankscan", "check-ids", "x.xlsx", "--column", "C"]).unwrap();
        let Command::CheckIds(args) = cli.command else {
            panic!("expected check-ids");
        };
        assert_eq!(args.column, 3);
        assert_eq!(args.sheet, "WKshenshou");
        assert_eq!(args.first_row, 7);
    }
}
