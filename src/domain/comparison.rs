use chrono::Utc;
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

use crate::domain::fingerprint::Fingerprint;
use crate::domain::string_diff::StringDiffReport;

/// One differing cell, identified by position in the aligned grids.
///
/// `original`/`target` are the raw cell values as loaded — normalization
/// (trimming, case folding) affects only the equality decision, never what
/// gets recorded here. The embedded [`StringDiffReport`] is computed over
/// the normalized values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellDifference {
    /// 0-based row index into the aligned grids.
    pub row: usize,
    /// 0-based index into the canonical column order.
    pub column: usize,
    pub column_name: String,
    pub original: String,
    pub target: String,
    /// Debug renditions with escapes visible, so `"a\u{200B}b"` is
    /// distinguishable from `"ab"` in flat text reports.
    pub original_repr: String,
    pub target_repr: String,
    pub report: StringDiffReport,
}

/// Cell-level outcome of comparing two aligned grids, before file metadata
/// is attached. This is what the `Comparator` port produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridDiff {
    pub total_cells: usize,
    pub identical_cells: usize,
    pub different_cells: usize,
    pub differences: Vec<CellDifference>,
}

impl GridDiff {
    pub fn is_clean(&self) -> bool {
        self.different_cells == 0
    }
}

/// Metadata about one input table, as loaded (pre-alignment shape).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableMeta {
    pub path: String,
    pub rows: usize,
    pub columns: usize,
    pub size_bytes: u64,
    /// Name of the encoding the file was decoded with.
    pub encoding: String,
    pub fingerprint: Fingerprint,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Same value as `similarity`; kept under the name the reports use.
    pub accuracy: f64,
    pub difference_rate: f64,
}

/// The complete, immutable outcome of one comparison run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub report_id: String,
    pub created_at: String,
    /// `identical_cells / total_cells`, and 0.0 when `total_cells` is 0 —
    /// an empty-vs-empty comparison never reports 100%.
    pub similarity: f64,
    pub total_cells: usize,
    pub identical_cells: usize,
    pub different_cells: usize,
    pub differences: Vec<CellDifference>,
    pub base: TableMeta,
    pub target: TableMeta,
    pub summary: Summary,
}

impl ComparisonResult {
    pub fn new(diff: GridDiff, base: TableMeta, target: TableMeta) -> Self {
        let (similarity, difference_rate) = if diff.total_cells == 0 {
            (0.0, 0.0)
        } else {
            (
                diff.identical_cells as f64 / diff.total_cells as f64,
                diff.different_cells as f64 / diff.total_cells as f64,
            )
        };

        ComparisonResult {
            report_id: format!(
                "cmp_{}_{}",
                Utc::now().format("%Y%m%d_%H%M%S"),
                Uuid::new_v4().simple()
            ),
            created_at: Utc::now().to_rfc3339(),
            similarity,
            total_cells: diff.total_cells,
            identical_cells: diff.identical_cells,
            different_cells: diff.different_cells,
            differences: diff.differences,
            base,
            target,
            summary: Summary {
                accuracy: similarity,
                difference_rate,
            },
        }
    }

    pub fn is_clean(&self) -> bool {
        self.different_cells == 0
    }
}

/// Outcome for one target in a batch run.
///
/// An enum instead of `Option` so callers must handle the failed case
/// explicitly, and so the error reason survives into serialized output.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TargetOutcome {
    Compared(ComparisonResult),
    Failed { error: String },
}

impl TargetOutcome {
    pub fn result(&self) -> Option<&ComparisonResult> {
        match self {
            TargetOutcome::Compared(r) => Some(r),
            TargetOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TargetOutcome::Failed { .. })
    }
}

/// One entry of a batch run. Entries are ordered exactly like the input
/// target list, regardless of completion order.
#[derive(Debug, Clone, Serialize)]
pub struct TargetComparison {
    pub target: PathBuf,
    #[serde(flatten)]
    pub outcome: TargetOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(path: &str) -> TableMeta {
        TableMeta {
            path: path.to_string(),
            rows: 2,
            columns: 3,
            size_bytes: 42,
            encoding: "UTF-8".to_string(),
            fingerprint: Fingerprint(String::new()),
        }
    }

    #[test]
    fn zero_cells_yields_zero_similarity_not_a_division() {
        let diff = GridDiff {
            total_cells: 0,
            identical_cells: 0,
            different_cells: 0,
            differences: vec![],
        };
        let result = ComparisonResult::new(diff, meta("a.csv"), meta("b.csv"));
        assert_eq!(result.similarity, 0.0);
        assert_eq!(result.summary.difference_rate, 0.0);
        assert!(result.is_clean());
    }

    #[test]
    fn similarity_is_identical_over_total() {
        let diff = GridDiff {
            total_cells: 4,
            identical_cells: 3,
            different_cells: 1,
            differences: vec![],
        };
        let result = ComparisonResult::new(diff, meta("a.csv"), meta("b.csv"));
        assert_eq!(result.similarity, 0.75);
        assert_eq!(result.summary.accuracy, 0.75);
        assert_eq!(result.summary.difference_rate, 0.25);
        assert!(!result.is_clean());
    }

    #[test]
    fn report_id_has_prefix_and_timestamp() {
        let diff = GridDiff {
            total_cells: 1,
            identical_cells: 1,
            different_cells: 0,
            differences: vec![],
        };
        let result = ComparisonResult::new(diff, meta("a.csv"), meta("b.csv"));
        assert!(result.report_id.starts_with("cmp_"));
        assert!(!result.created_at.is_empty());
    }

    #[test]
    fn failed_outcome_serializes_with_status_tag() {
        let outcome = TargetOutcome::Failed {
            error: "no such file".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"], "no such file");
        assert!(outcome.is_failed());
        assert!(outcome.result().is_none());
    }
}
