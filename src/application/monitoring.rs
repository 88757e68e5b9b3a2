use crate::domain::comparison::GridDiff;
use crate::domain::grid::Grid;
use crate::domain::ports::{Comparator, LoadedTable, TableLoader};
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{info, instrument};

// ─── PerfReport ──────────────────────────────────────────────────────────────

/// A single timed operation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct OpTiming {
    /// Operation name: "load_table" or "compare_grids".
    pub operation: &'static str,
    /// File this operation was performed on (target file for compares).
    pub file: String,
    /// Elapsed wall time in milliseconds.
    pub duration_ms: u128,
    /// Number of cells involved (loaded or compared).
    pub cells: usize,
}

/// Accumulated performance timings for a single cellscope run.
///
/// Shared across all decorator instances for one run via `Arc<Mutex<_>>`.
/// After the run, pass to [`crate::presentation::cli_summary::print_perf_summary`]
/// to render a human-readable table.
#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct PerfReport {
    pub timings: Vec<OpTiming>,
    pub total_cells_loaded: usize,
    pub total_ms: u128,
}

impl PerfReport {
    pub fn new() -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self::default()))
    }

    fn record(report: &Arc<Mutex<Self>>, timing: OpTiming) {
        if let Ok(mut r) = report.lock() {
            r.total_ms += timing.duration_ms;
            if timing.operation == "load_table" {
                r.total_cells_loaded += timing.cells;
            }
            r.timings.push(timing);
        }
    }
}

// ─── MonitoringTableLoader ───────────────────────────────────────────────────

/// Decorator: wraps any `TableLoader`, measures wall time per `load` call,
/// and appends the result to the shared `PerfReport`.
pub struct MonitoringTableLoader {
    inner: Arc<dyn TableLoader>,
    report: Arc<Mutex<PerfReport>>,
}

impl MonitoringTableLoader {
    pub fn new(inner: Arc<dyn TableLoader>, report: Arc<Mutex<PerfReport>>) -> Self {
        Self { inner, report }
    }
}

#[async_trait]
impl TableLoader for MonitoringTableLoader {
    #[instrument(
        name = "load_table",
        skip(self, path),
        fields(file.path = %path.display()),
        level = "info"
    )]
    async fn load(&self, path: &Path) -> Result<LoadedTable> {
        let start = Instant::now();
        let table = self.inner.load(path).await?;
        let duration_ms = start.elapsed().as_millis();

        let cells = table.meta.rows * table.meta.columns;
        info!(
            file = %path.display(),
            rows = table.meta.rows,
            columns = table.meta.columns,
            encoding = %table.meta.encoding,
            duration_ms,
            "load_table completed"
        );

        PerfReport::record(
            &self.report,
            OpTiming {
                operation: "load_table",
                file: path.display().to_string(),
                duration_ms,
                cells,
            },
        );

        Ok(table)
    }
}

// ─── MonitoringComparator ────────────────────────────────────────────────────

/// Decorator: wraps any `Comparator`, measures wall time per `compare_grids`
/// call, and appends the result to the shared `PerfReport`.
pub struct MonitoringComparator {
    inner: Arc<dyn Comparator>,
    report: Arc<Mutex<PerfReport>>,
}

impl MonitoringComparator {
    pub fn new(inner: Arc<dyn Comparator>, report: Arc<Mutex<PerfReport>>) -> Self {
        Self { inner, report }
    }
}

impl Comparator for MonitoringComparator {
    #[instrument(
        name = "compare_grids",
        skip(self, base, target),
        fields(
            base.rows = base.row_count(),
            target.rows = target.row_count(),
        ),
        level = "info"
    )]
    fn compare_grids(&self, base: &Grid, target: &Grid) -> Result<GridDiff> {
        let start = Instant::now();
        let result = self.inner.compare_grids(base, target)?;
        let duration_ms = start.elapsed().as_millis();

        info!(
            total_cells = result.total_cells,
            different_cells = result.different_cells,
            duration_ms,
            "compare_grids completed"
        );

        PerfReport::record(
            &self.report,
            OpTiming {
                operation: "compare_grids",
                file: String::new(),
                duration_ms,
                cells: result.total_cells,
            },
        );

        Ok(result)
    }
}
