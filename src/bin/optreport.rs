use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use optreport::{BatchSummary, ConvertOptions, convert_folder};
use tracing_subscriber::EnvFilter;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Convert strategy tester optimization reports (.htm) into .xlsx spreadsheets",
    long_about = "Every .htm/.html report in the input folder becomes one .xlsx file in the \
                  output folder, named after the report."
)]
struct Cli {
    /// Folder containing the report files.
    #[arg(short, long)]
    input: PathBuf,

    /// Folder the spreadsheets are written to (created if missing).
    #[arg(short, long)]
    output: PathBuf,

    /// Zero-based position of the results table in each report.
    #[arg(long, default_value_t = 1)]
    table_index: usize,

    /// Minimum number of cells a result row must have (at least 7).
    #[arg(long, default_value_t = 7)]
    min_cells: usize,

    /// Name of the worksheet in every spreadsheet.
    #[arg(long, default_value = "Optimization Results")]
    sheet_name: String,

    /// Header fill color as ARGB hex.
    #[arg(long, default_value = "FF366092")]
    header_fill: String,

    /// Width cap for every column except Detail.
    #[arg(long, default_value_t = 30)]
    max_width: usize,

    /// Width cap for the Detail column.
    #[arg(long, default_value_t = 80)]
    max_detail_width: usize,

    /// Convert reports concurrently.
    #[arg(long)]
    parallel: bool,

    /// Log more (debug level).
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Log only warnings and errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(summary) if summary.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        },
    }
}

/// `RUST_LOG` wins over the verbosity flags.
fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<BatchSummary> {
    let options = options_from(cli);

    let summary = convert_folder(&cli.input, &cli.output, &options).with_context(|| {
        format!(
            "Failed to convert reports from {} into {}",
            cli.input.display(),
            cli.output.display()
        )
    })?;

    print_summary(cli, &summary);
    Ok(summary)
}

fn options_from(cli: &Cli) -> ConvertOptions {
    ConvertOptions::new()
        .with_table_index(cli.table_index)
        .with_min_cells(cli.min_cells)
        .with_sheet_name(cli.sheet_name.as_str())
        .with_header_fill(cli.header_fill.as_str())
        .with_width_caps(cli.max_width, cli.max_detail_width)
        .with_parallel(cli.parallel)
}

fn print_summary(cli: &Cli, summary: &BatchSummary) {
    if summary.discovered == 0 {
        println!("No report files found in {}", cli.input.display());
        return;
    }

    for doc in &summary.documents {
        let input = doc.input.file_name().unwrap_or_default().to_string_lossy();
        if doc.written {
            let output = doc.output.file_name().unwrap_or_default().to_string_lossy();
            println!("{} -> {} ({} rows)", input, output, doc.records);
        } else {
            println!("{} -> skipped, no data", input);
        }
    }
    for failure in &summary.failures {
        println!("{} -> failed: {}", failure.input.display(), failure.error);
    }

    println!("\n{}", "=".repeat(60));
    println!("Done.");
    println!("Report files found:   {}", summary.discovered);
    println!("Spreadsheets written: {}", summary.written);
    println!("Skipped (no data):    {}", summary.skipped);
    println!("Failed:               {}", summary.failed);
    println!("Total rows:           {}", summary.total_records);
    println!("Output folder:        {}", cli.output.display());
    println!("{}", "=".repeat(60));
}
