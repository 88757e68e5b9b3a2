use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::domain::comparison::{CellDifference, ComparisonResult, GridDiff};
use crate::domain::grid::{align, Grid, Row};
use crate::domain::ports::{Comparator, LoadedTable, TableLoader};
use crate::domain::string_diff;

/// Normalization policy applied before the cell equality decision.
///
/// Normalization never changes what gets *recorded*: difference records
/// always carry the raw loaded values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct CompareOptions {
    /// Locale-independent lowercasing before comparing.
    #[serde(default)]
    pub ignore_case: bool,
    /// Trim leading/trailing whitespace before comparing.
    #[serde(default)]
    pub ignore_whitespace: bool,
}

// ─── Cell comparator (implementation of the port) ───

pub struct CellComparator {
    options: CompareOptions,
}

impl CellComparator {
    pub fn new(options: CompareOptions) -> Self {
        Self { options }
    }

    fn normalize(&self, value: &str) -> String {
        let v = if self.options.ignore_whitespace {
            value.trim()
        } else {
            value
        };
        if self.options.ignore_case {
            v.to_lowercase()
        } else {
            v.to_string()
        }
    }
}

impl Default for CellComparator {
    fn default() -> Self {
        Self::new(CompareOptions::default())
    }
}

impl Comparator for CellComparator {
    /// Align both grids to the canonical shape, then walk every cell in row
    /// order, canonical column order within a row. Identical (normalized)
    /// pairs only count; differing pairs get a full character-level report
    /// over the normalized values.
    fn compare_grids(&self, base: &Grid, target: &Grid) -> Result<GridDiff> {
        let (base, target) = align(base, target);
        let total_cells = base.row_count() * base.column_count();

        let mut identical_cells = 0;
        let mut differences = Vec::new();

        for (row_idx, (base_row, target_row)) in
            base.rows.iter().zip(target.rows.iter()).enumerate()
        {
            for (col_idx, column) in base.columns.iter().enumerate() {
                let left = cell(base_row, column)?;
                let right = cell(target_row, column)?;

                let left_norm = self.normalize(left);
                let right_norm = self.normalize(right);

                if left_norm == right_norm {
                    identical_cells += 1;
                    continue;
                }

                differences.push(CellDifference {
                    row: row_idx,
                    column: col_idx,
                    column_name: column.clone(),
                    original: left.to_string(),
                    target: right.to_string(),
                    original_repr: format!("{left:?}"),
                    target_repr: format!("{right:?}"),
                    report: string_diff::diff(&left_norm, &right_norm),
                });
            }
        }

        Ok(GridDiff {
            total_cells,
            identical_cells,
            different_cells: differences.len(),
            differences,
        })
    }
}

/// Aligned rows carry every canonical column by construction; a missing key
/// here means the aligner is broken, not that the input was malformed.
fn cell<'a>(row: &'a Row, column: &str) -> Result<&'a str> {
    row.get(column).map(String::as_str).ok_or_else(|| {
        anyhow!("aligned row is missing canonical column {column:?} (aligner invariant violation)")
    })
}

// ─── Compare Service ───

/// Loads both files and runs the full comparison, attaching file metadata.
pub struct CompareService {
    loader: Arc<dyn TableLoader>,
    comparator: Arc<dyn Comparator>,
}

impl CompareService {
    pub fn new(loader: Arc<dyn TableLoader>, comparator: Arc<dyn Comparator>) -> Self {
        Self { loader, comparator }
    }

    pub async fn compare_files(&self, base: &Path, target: &Path) -> Result<ComparisonResult> {
        let base_table = self.loader.load(base).await?;
        let target_table = self.loader.load(target).await?;
        self.compare_tables(&base_table, &target_table)
    }

    /// Compare two already-loaded tables. Split out so batch mode can load
    /// the base once and reuse it for every target.
    pub fn compare_tables(
        &self,
        base: &LoadedTable,
        target: &LoadedTable,
    ) -> Result<ComparisonResult> {
        let diff = self.comparator.compare_grids(&base.grid, &target.grid)?;

        info!(
            base = %base.meta.path,
            target = %target.meta.path,
            total_cells = diff.total_cells,
            different_cells = diff.different_cells,
            "comparison completed"
        );

        Ok(ComparisonResult::new(
            diff,
            base.meta.clone(),
            target.meta.clone(),
        ))
    }
}
