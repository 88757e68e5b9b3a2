use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// ─── Log level ────────────────────────────────────────────────────────────────

/// Controls the verbosity of cellscope's internal tracing output.
///
/// Pass to [`init_tracing`] before calling any async entry point.
///
/// | Variant | `tracing` level | When to use                           |
/// |---------|-----------------|---------------------------------------|
/// | `Error` | `error`         | `--quiet` / CI scripting              |
/// | `Info`  | `info`          | Default — shows per-file timings      |
/// | `Debug` | `debug`         | `--verbose` — shows encoding detail   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    #[default]
    Info,
    Debug,
}

/// Initialise the global `tracing` subscriber for cellscope.
///
/// This is a convenience wrapper around `tracing_subscriber`. It respects
/// `RUST_LOG` when set, falling back to `level` otherwise.
///
/// Call this **once** at application startup, before any cellscope async
/// function. Library consumers who manage their own subscriber should skip
/// this and configure tracing themselves.
///
/// Only available when the `cli` feature is enabled (pulls in
/// `tracing-subscriber`).
#[cfg(feature = "cli")]
pub fn init_tracing(level: LogLevel) {
    use tracing_subscriber::fmt::format::FmtSpan;

    let default_filter = match level {
        LogLevel::Error => "cellscope=error",
        LogLevel::Info => "cellscope=info",
        LogLevel::Debug => "cellscope=debug",
    };

    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

// ─── Public API Facade ───

pub use application::batch::BatchService;
pub use application::compare::{CellComparator, CompareOptions, CompareService};
pub use application::monitoring::PerfReport;
pub use domain::char_info::CharInfo;
pub use domain::comparison::{
    CellDifference, ComparisonResult, GridDiff, Summary, TableMeta, TargetComparison,
    TargetOutcome,
};
pub use domain::fingerprint::{fingerprint, Fingerprint};
pub use domain::grid::{align, Grid, Row};
pub use domain::ports::{Comparator, LoadedTable, ReportWriter, TableLoader};
pub use domain::string_diff::{diff, scan_reportable, CharDifference, DiffKind, StringDiffReport};
pub use infrastructure::config::{AppConfig, OutputConfig};
pub use infrastructure::csv::loader::{CsvTableLoader, LoadError};

use crate::application::monitoring::{MonitoringComparator, MonitoringTableLoader};

// ─── Public entry points ───

/// Compare one CSV file against another.
///
/// Returns the full [`ComparisonResult`], down to per-character differences.
/// Use [`run_with_timing`] if you also want a performance report.
pub async fn run(options: CompareOptions, base: &Path, target: &Path) -> Result<ComparisonResult> {
    let (result, _) = run_with_timing(options, base, target).await?;
    Ok(result)
}

/// Compare two files with performance timing.
///
/// Returns the `ComparisonResult` and a [`PerfReport`] containing per-file
/// load and compare timings.
pub async fn run_with_timing(
    options: CompareOptions,
    base: &Path,
    target: &Path,
) -> Result<(ComparisonResult, PerfReport)> {
    let report = PerfReport::new();
    let service = build_compare_service(options, &report);

    let result = service.compare_files(base, target).await?;

    let perf = report.lock().unwrap().clone();
    Ok((result, perf))
}

/// Compare one base file against many targets.
///
/// Entries come back in the same order as `targets`; a target that fails to
/// load gets a [`TargetOutcome::Failed`] entry instead of aborting the run.
pub async fn run_batch(
    options: CompareOptions,
    base: &Path,
    targets: &[PathBuf],
) -> Result<Vec<TargetComparison>> {
    let (entries, _) = run_batch_with_timing(options, base, targets).await?;
    Ok(entries)
}

/// Batch comparison with performance timing.
pub async fn run_batch_with_timing(
    options: CompareOptions,
    base: &Path,
    targets: &[PathBuf],
) -> Result<(Vec<TargetComparison>, PerfReport)> {
    let report = PerfReport::new();
    let (loader, comparator) = build_ports(options, &report);
    let service = BatchService::new(loader, comparator);

    let entries = service.compare_many(base, targets).await?;

    let perf = report.lock().unwrap().clone();
    Ok((entries, perf))
}

// ─── Private helpers ───────────────────────────────────────────────────────────

/// Wrap the CSV loader and the cell comparator in monitoring decorators.
///
/// The shared `report` accumulates timings from every load and compare of
/// the same run, giving a unified view across base and targets.
fn build_ports(
    options: CompareOptions,
    report: &Arc<Mutex<PerfReport>>,
) -> (Arc<dyn TableLoader>, Arc<dyn Comparator>) {
    let loader = Arc::new(MonitoringTableLoader::new(
        Arc::new(CsvTableLoader),
        Arc::clone(report),
    ));
    let comparator = Arc::new(MonitoringComparator::new(
        Arc::new(CellComparator::new(options)),
        Arc::clone(report),
    ));
    (loader, comparator)
}

fn build_compare_service(options: CompareOptions, report: &Arc<Mutex<PerfReport>>) -> CompareService {
    let (loader, comparator) = build_ports(options, report);
    CompareService::new(loader, comparator)
}
