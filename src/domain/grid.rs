use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// One table row: column name → cell value. Always strings — the loader
/// normalizes missing/null cells to `""` before the core sees them.
pub type Row = BTreeMap<String, String>;

/// A two-dimensional string grid with named columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Grid {
    /// Column order. After [`align`] this is always the canonical
    /// lexicographically sorted union of both inputs' columns.
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Grid {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Grid { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// Normalize two grids of possibly different shape into a common one.
///
/// Canonical columns are the sorted union of both grids' declared columns
/// plus any stray row keys, so alignment is total even over malformed
/// input. Columns absent from a grid are added to every row with `""`; the
/// shorter grid is padded with all-empty rows at the end. Existing row order
/// is preserved. The sorted column order is an observable contract — output
/// columns never follow either input's original order.
pub fn align(base: &Grid, target: &Grid) -> (Grid, Grid) {
    let mut union: BTreeSet<String> = BTreeSet::new();
    for grid in [base, target] {
        union.extend(grid.columns.iter().cloned());
        for row in &grid.rows {
            union.extend(row.keys().cloned());
        }
    }
    let columns: Vec<String> = union.into_iter().collect();

    let row_count = base.row_count().max(target.row_count());
    (
        conform(base, &columns, row_count),
        conform(target, &columns, row_count),
    )
}

fn conform(grid: &Grid, columns: &[String], row_count: usize) -> Grid {
    let mut rows: Vec<Row> = grid
        .rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|col| (col.clone(), row.get(col).cloned().unwrap_or_default()))
                .collect()
        })
        .collect();

    while rows.len() < row_count {
        rows.push(empty_row(columns));
    }

    Grid::new(columns.to_vec(), rows)
}

fn empty_row(columns: &[String]) -> Row {
    columns
        .iter()
        .map(|col| (col.clone(), String::new()))
        .collect()
}
