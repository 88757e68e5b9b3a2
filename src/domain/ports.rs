use crate::domain::comparison::{ComparisonResult, GridDiff, TableMeta};
use crate::domain::grid::Grid;
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

/// A grid together with the metadata of the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub grid: Grid,
    pub meta: TableMeta,
}

/// Port: access to tabular data on disk (implemented by CsvTableLoader).
///
/// Implementations own encoding detection and must map every missing/null
/// cell to `""` — the core never sees typed or absent values.
#[async_trait]
pub trait TableLoader: Send + Sync {
    async fn load(&self, path: &Path) -> Result<LoadedTable>;
}

/// Port: the cell-by-cell comparison algorithm (implemented by CellComparator).
pub trait Comparator: Send + Sync {
    fn compare_grids(&self, base: &Grid, target: &Grid) -> Result<GridDiff>;
}

/// Port: output formatting (implemented by JsonWriter, CsvWriter, HtmlWriter).
pub trait ReportWriter: Send + Sync {
    /// Serializes the comparison result to a string (JSON, CSV, HTML, etc.)
    fn format(&self, result: &ComparisonResult) -> Result<String>;
    /// Extension of the produced file (e.g. "json", "csv", "html")
    fn extension(&self) -> &'static str;
}
