use anyhow::Result;
use cellscope::presentation::cli_summary::{
    print_batch_summary, print_perf_summary, print_summary,
};
use cellscope::presentation::writers::{
    all_writers, write_batch_summary, write_to_file, writer_for,
};
use cellscope::{AppConfig, ComparisonResult, CompareOptions, LogLevel};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "cellscope",
    about = "Cellscope — character-precise CSV comparison."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file path (defaults to the per-user config when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Lowercase cell values before comparing
    #[arg(long, global = true)]
    ignore_case: bool,

    /// Trim leading/trailing whitespace before comparing
    #[arg(long, global = true)]
    ignore_whitespace: bool,

    /// Report format: json, csv, html, or all
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Directory report files are written under
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// Print the summary without writing report files
    #[arg(long, global = true)]
    dry_run: bool,

    /// Suppress the console summary and non-error logs
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare one CSV file against another, cell by cell
    Compare { base: PathBuf, target: PathBuf },
    /// Compare one base CSV file against many targets
    Batch {
        base: PathBuf,
        #[arg(required = true)]
        targets: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.quiet {
        LogLevel::Error
    } else if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    cellscope::init_tracing(level);

    let cfg = AppConfig::load(cli.config.as_deref())?;
    // CLI flags win over the config file.
    let options = CompareOptions {
        ignore_case: cli.ignore_case || cfg.compare.ignore_case,
        ignore_whitespace: cli.ignore_whitespace || cfg.compare.ignore_whitespace,
    };
    let format = cli.format.clone().unwrap_or_else(|| cfg.output.format.clone());
    let output_dir = cli
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&cfg.output.dir));

    match &cli.command {
        Command::Compare { base, target } => {
            let (result, perf) = cellscope::run_with_timing(options, base, target).await?;

            if !cli.quiet {
                print_summary(&result);
                print_perf_summary(&perf);
            }
            if cli.dry_run {
                return Ok(ExitCode::SUCCESS);
            }

            // --- generate subdirectory per report ---
            let timestamp = Local::now().format("%Y%m%d_%H%M%S");
            let output_subdir = output_dir.join(format!("{}_{}", timestamp, result.report_id));
            std::fs::create_dir_all(&output_subdir)?;

            write_reports(&format, &result, &output_subdir)?;
            println!("Report written to {}", output_subdir.display());

            Ok(ExitCode::SUCCESS)
        }
        Command::Batch { base, targets } => {
            let (entries, perf) = cellscope::run_batch_with_timing(options, base, targets).await?;

            let any_failed = if cli.quiet {
                entries.iter().any(|e| e.outcome.is_failed())
            } else {
                let failed = print_batch_summary(&entries);
                print_perf_summary(&perf);
                failed
            };

            if !cli.dry_run {
                let timestamp = Local::now().format("%Y%m%d_%H%M%S");
                let output_subdir = output_dir.join(format!("{}_batch", timestamp));
                std::fs::create_dir_all(&output_subdir)?;

                for entry in &entries {
                    if let Some(result) = entry.outcome.result() {
                        write_reports(&format, result, &output_subdir)?;
                    }
                }
                write_batch_summary(&entries, &output_subdir)?;
                println!("Reports written to {}", output_subdir.display());
            }

            // Any failed target makes the exit code non-zero so scripts notice.
            Ok(if any_failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
    }
}

fn write_reports(format: &str, result: &ComparisonResult, dir: &Path) -> Result<()> {
    match format {
        "all" => {
            for writer in all_writers() {
                write_to_file(&*writer, result, dir)?;
            }
        }
        fmt => {
            let writer =
                writer_for(fmt).ok_or_else(|| anyhow::anyhow!("Unknown format: {}", fmt))?;
            write_to_file(&*writer, result, dir)?;
        }
    }
    Ok(())
}
