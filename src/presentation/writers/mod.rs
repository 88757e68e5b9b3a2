use crate::domain::comparison::{ComparisonResult, TargetComparison, TargetOutcome};
use crate::domain::ports::ReportWriter;
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use self::{csv::CsvWriter, html::HtmlWriter, json::JsonWriter};

pub mod csv;
pub mod html;
pub mod json;

/// Register available writers - OCP: add new ones without touching main.rs
pub fn all_writers() -> Vec<Box<dyn ReportWriter>> {
    vec![
        Box::new(JsonWriter),
        Box::new(CsvWriter),
        Box::new(HtmlWriter),
    ]
}

pub fn writer_for(format: &str) -> Option<Box<dyn ReportWriter>> {
    match format {
        "json" => Some(Box::new(JsonWriter)),
        "csv" => Some(Box::new(CsvWriter)),
        "html" => Some(Box::new(HtmlWriter)),
        _ => None,
    }
}

/// Writes the comparison result to disk via the chosen writer
pub fn write_to_file(
    writer: &dyn ReportWriter,
    result: &ComparisonResult,
    dir: &Path,
) -> Result<PathBuf> {
    // Ensure the output directory exists
    fs::create_dir_all(dir)?;

    let content = writer.format(result)?;
    let path = dir.join(format!("{}.{}", result.report_id, writer.extension()));
    fs::write(&path, &content)?;
    Ok(path)
}

/// One summary line per batch entry, in batch order. Failed targets keep
/// their line, with the error in the last column.
pub fn write_batch_summary(entries: &[TargetComparison], dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let mut w = ::csv::Writer::from_writer(vec![]);
    w.write_record([
        "target_file",
        "status",
        "similarity",
        "total_cells",
        "identical_cells",
        "different_cells",
        "difference_rate",
        "target_rows",
        "target_columns",
        "target_encoding",
        "error",
    ])?;

    for entry in entries {
        let name = entry
            .target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| entry.target.display().to_string());

        match &entry.outcome {
            TargetOutcome::Compared(r) => {
                w.write_record([
                    name,
                    "compared".to_string(),
                    format!("{:.2}%", r.similarity * 100.0),
                    r.total_cells.to_string(),
                    r.identical_cells.to_string(),
                    r.different_cells.to_string(),
                    format!("{:.2}%", r.summary.difference_rate * 100.0),
                    r.target.rows.to_string(),
                    r.target.columns.to_string(),
                    r.target.encoding.clone(),
                    String::new(),
                ])?;
            }
            TargetOutcome::Failed { error } => {
                w.write_record([
                    name,
                    "failed".to_string(),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                    error.clone(),
                ])?;
            }
        }
    }

    w.flush()?;
    let content = String::from_utf8(w.into_inner()?)?;
    let path = dir.join("batch_summary.csv");
    fs::write(&path, &content)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::comparison::{GridDiff, TableMeta};
    use crate::domain::fingerprint::Fingerprint;

    fn meta(path: &str) -> TableMeta {
        TableMeta {
            path: path.to_string(),
            rows: 1,
            columns: 1,
            size_bytes: 10,
            encoding: "UTF-8".to_string(),
            fingerprint: Fingerprint("deadbeef".to_string()),
        }
    }

    fn clean_result() -> ComparisonResult {
        let diff = GridDiff {
            total_cells: 1,
            identical_cells: 1,
            different_cells: 0,
            differences: vec![],
        };
        ComparisonResult::new(diff, meta("a.csv"), meta("b.csv"))
    }

    #[test]
    fn unknown_format_has_no_writer() {
        assert!(writer_for("yaml").is_none());
        assert!(writer_for("json").is_some());
    }

    #[test]
    fn write_to_file_names_by_report_id_and_extension() {
        let dir = tempfile::tempdir().unwrap();
        let result = clean_result();
        let path = write_to_file(&JsonWriter, &result, dir.path()).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            format!("{}.json", result.report_id)
        );
        assert!(path.exists());
    }

    #[test]
    fn batch_summary_keeps_failed_targets() {
        let dir = tempfile::tempdir().unwrap();
        let entries = vec![
            TargetComparison {
                target: PathBuf::from("data/t1.csv"),
                outcome: TargetOutcome::Compared(clean_result()),
            },
            TargetComparison {
                target: PathBuf::from("data/t2.csv"),
                outcome: TargetOutcome::Failed {
                    error: "no such file".to_string(),
                },
            },
        ];

        let path = write_batch_summary(&entries, dir.path()).unwrap();
        let content = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("t1.csv,compared,100.00%"));
        assert!(lines[2].starts_with("t2.csv,failed"));
        assert!(lines[2].contains("no such file"));
    }
}
