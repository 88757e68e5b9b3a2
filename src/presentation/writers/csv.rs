use anyhow::Result;

use crate::domain::comparison::ComparisonResult;
use crate::domain::ports::ReportWriter;
use crate::domain::string_diff::ReportableChar;

/// Flat detail report: one line per differing cell, suitable for opening in
/// a spreadsheet. Row and column numbers are 1-based here; the `*_repr`
/// columns keep invisible characters readable in flat text.
pub struct CsvWriter;

impl ReportWriter for CsvWriter {
    fn format(&self, result: &ComparisonResult) -> Result<String> {
        let mut w = ::csv::Writer::from_writer(vec![]);
        w.write_record([
            "row",
            "column",
            "column_name",
            "original",
            "target",
            "original_repr",
            "target_repr",
            "length_delta",
            "diff_count",
            "diff_positions",
            "diff_kinds",
            "original_reportable_chars",
            "target_reportable_chars",
        ])?;

        for d in &result.differences {
            let positions: Vec<String> = d
                .report
                .positions()
                .iter()
                .map(ToString::to_string)
                .collect();
            let kinds: Vec<&str> = d.report.kind_counts.keys().map(|k| k.label()).collect();

            w.write_record([
                (d.row + 1).to_string(),
                (d.column + 1).to_string(),
                d.column_name.clone(),
                d.original.clone(),
                d.target.clone(),
                d.original_repr.clone(),
                d.target_repr.clone(),
                d.report.length_delta.to_string(),
                d.report.differences.len().to_string(),
                positions.join(";"),
                kinds.join(";"),
                reportable_summary(&d.report.left_reportable),
                reportable_summary(&d.report.right_reportable),
            ])?;
        }

        w.flush()?;
        Ok(String::from_utf8(w.into_inner()?)?)
    }

    fn extension(&self) -> &'static str {
        "csv"
    }
}

fn reportable_summary(chars: &[ReportableChar]) -> String {
    chars
        .iter()
        .map(|rc| format!("position {}: {}", rc.position, rc.info.name))
        .collect::<Vec<_>>()
        .join("; ")
}
