use anyhow::Result;
use sailfish::TemplateSimple;

use crate::domain::comparison::{CellDifference, ComparisonResult};
use crate::domain::ports::ReportWriter;
use crate::domain::string_diff::ReportableChar;

/// HTML reports show at most this many differences to keep the file small.
const MAX_DISPLAY: usize = 100;

#[derive(TemplateSimple)]
#[template(path = "html/report.stpl")] // base dir declared inside sailfish.toml
struct ReportTemplate<'a> {
    result: &'a ComparisonResult,
    similarity_pct: String,
    difference_pct: String,
    diffs: Vec<DiffView<'a>>,
    hidden: usize,
}

/// Per-difference view with display strings precomputed, so the template
/// stays free of formatting logic.
struct DiffView<'a> {
    index: usize,
    row: usize,
    column_name: &'a str,
    original: &'a str,
    target: &'a str,
    original_repr: &'a str,
    target_repr: &'a str,
    diff_count: usize,
    positions: String,
    kinds: String,
    reportable: String,
}

fn view(index: usize, d: &CellDifference) -> DiffView<'_> {
    let positions: Vec<String> = d
        .report
        .positions()
        .iter()
        .map(ToString::to_string)
        .collect();
    let kinds: Vec<&str> = d.report.kind_counts.keys().map(|k| k.label()).collect();

    DiffView {
        index: index + 1,
        row: d.row + 1,
        column_name: &d.column_name,
        original: &d.original,
        target: &d.target,
        original_repr: &d.original_repr,
        target_repr: &d.target_repr,
        diff_count: d.report.differences.len(),
        positions: positions.join(", "),
        kinds: kinds.join(", "),
        reportable: reportable_summary(&d.report.left_reportable, &d.report.right_reportable),
    }
}

fn reportable_summary(left: &[ReportableChar], right: &[ReportableChar]) -> String {
    let mut parts = Vec::new();
    for rc in left {
        parts.push(format!("original position {}: {}", rc.position, rc.info.name));
    }
    for rc in right {
        parts.push(format!("target position {}: {}", rc.position, rc.info.name));
    }
    parts.join("; ")
}

pub struct HtmlWriter;

impl ReportWriter for HtmlWriter {
    fn format(&self, result: &ComparisonResult) -> Result<String> {
        let shown = result.differences.len().min(MAX_DISPLAY);
        let diffs = result.differences[..shown]
            .iter()
            .enumerate()
            .map(|(i, d)| view(i, d))
            .collect();

        let template = ReportTemplate {
            result,
            similarity_pct: format!("{:.2}%", result.similarity * 100.0),
            difference_pct: format!("{:.2}%", result.summary.difference_rate * 100.0),
            diffs,
            hidden: result.differences.len() - shown,
        };
        Ok(template.render_once()?)
    }

    fn extension(&self) -> &'static str {
        "html"
    }
}
