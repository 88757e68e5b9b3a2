use crate::application::monitoring::PerfReport;
use crate::domain::comparison::{ComparisonResult, TargetComparison, TargetOutcome};
use colored::*;
use tabled::settings::{object::Columns, Alignment, Modify, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct SummaryRow {
    metric: String,
    value: String,
}

#[derive(Tabled)]
struct DiffPreviewRow {
    row: String,
    column: String,
    original: String,
    target: String,
    kinds: String,
}

/// How many differences the console preview shows; the full list goes to
/// the report files.
const PREVIEW_LIMIT: usize = 5;

pub fn print_summary(result: &ComparisonResult) {
    println!();

    println!("{}", "CELLSCOPE COMPARISON SUMMARY".bold().cyan());
    println!(
        "{} → {}",
        result.base.path.blue(),
        result.target.path.green()
    );
    println!("Report: {}", result.report_id.bright_yellow());
    println!();

    let similarity = format!("{:.2}%", result.similarity * 100.0);
    let summary_rows = vec![
        SummaryRow {
            metric: "Similarity".into(),
            value: colorize_similarity(result.similarity, &similarity),
        },
        SummaryRow {
            metric: "Total cells".into(),
            value: result.total_cells.to_string().bold().to_string(),
        },
        SummaryRow {
            metric: "Identical cells".into(),
            value: result.identical_cells.to_string().green().to_string(),
        },
        SummaryRow {
            metric: "Different cells".into(),
            value: result.different_cells.to_string().red().to_string(),
        },
        SummaryRow {
            metric: "Difference rate".into(),
            value: format!("{:.2}%", result.summary.difference_rate * 100.0),
        },
    ];

    let summary_table = Table::new(summary_rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..=1)).with(Alignment::right()))
        .to_string();
    println!("{summary_table}");

    if result.is_clean() {
        println!();
        println!("{}", "No differences detected.".italic());
    } else {
        print_diff_preview(result);
    }

    println!();
    println!("{}", "Files:".bold());
    print_file_line("base", result, true);
    print_file_line("target", result, false);
    println!();
}

fn print_diff_preview(result: &ComparisonResult) {
    let rows: Vec<DiffPreviewRow> = result
        .differences
        .iter()
        .take(PREVIEW_LIMIT)
        .map(|d| {
            let kinds: Vec<&str> = d.report.kind_counts.keys().map(|k| k.label()).collect();
            DiffPreviewRow {
                row: (d.row + 1).to_string(),
                column: d.column_name.bold().to_string(),
                original: d.original_repr.red().to_string(),
                target: d.target_repr.green().to_string(),
                kinds: kinds.join(", ").yellow().to_string(),
            }
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(0..=0)).with(Alignment::right()))
        .to_string();

    println!();
    println!("{table}");

    if result.different_cells > PREVIEW_LIMIT {
        println!(
            "  {} of {} difference(s) shown; see the report files for the rest.",
            PREVIEW_LIMIT,
            result.different_cells.to_string().bold()
        );
    }
}

fn print_file_line(label: &str, result: &ComparisonResult, base: bool) {
    let meta = if base { &result.base } else { &result.target };
    println!(
        "  {:<7} {} rows x {} columns ({})",
        format!("{label}:").dimmed(),
        meta.rows,
        meta.columns,
        meta.encoding
    );
}

fn colorize_similarity(similarity: f64, text: &str) -> String {
    if similarity >= 1.0 {
        text.bold().green().to_string()
    } else if similarity >= 0.9 {
        text.bold().yellow().to_string()
    } else {
        text.bold().red().to_string()
    }
}

// ─── Batch summary ────────────────────────────────────────────────────────────

#[derive(Tabled)]
struct BatchRow {
    target: String,
    status: String,
    similarity: String,
    #[tabled(rename = "different")]
    different_cells: String,
    #[tabled(rename = "total")]
    total_cells: String,
}

/// Print a per-target table for a batch run.
///
/// Returns `true` if any target failed (so the caller can exit non-zero).
pub fn print_batch_summary(entries: &[TargetComparison]) -> bool {
    println!();
    println!("{}", "CELLSCOPE BATCH SUMMARY".bold().cyan());
    println!();

    let rows: Vec<BatchRow> = entries
        .iter()
        .map(|e| {
            let target = e.target.display().to_string();
            match &e.outcome {
                TargetOutcome::Compared(r) => {
                    let similarity = format!("{:.2}%", r.similarity * 100.0);
                    BatchRow {
                        target: target.bold().to_string(),
                        status: "compared".green().to_string(),
                        similarity: colorize_similarity(r.similarity, &similarity),
                        different_cells: r.different_cells.to_string(),
                        total_cells: r.total_cells.to_string(),
                    }
                }
                TargetOutcome::Failed { error } => BatchRow {
                    target: target.bold().to_string(),
                    status: "failed".red().to_string(),
                    similarity: "-".dimmed().to_string(),
                    different_cells: error.clone().red().to_string(),
                    total_cells: "-".dimmed().to_string(),
                },
            }
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..=4)).with(Alignment::right()))
        .to_string();
    println!("{table}");
    println!();

    entries.iter().any(|e| e.outcome.is_failed())
}

// ─── Performance summary ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct PerfRow {
    operation: String,
    file: String,
    #[tabled(rename = "cells")]
    cells: String,
    #[tabled(rename = "time (ms)")]
    duration_ms: String,
}

/// Print a performance timing table to stdout.
pub fn print_perf_summary(report: &PerfReport) {
    if report.timings.is_empty() {
        return;
    }

    println!("{}", "PERFORMANCE".bold().cyan());

    let rows: Vec<PerfRow> = report
        .timings
        .iter()
        .map(|t| PerfRow {
            operation: t.operation.dimmed().to_string(),
            file: t.file.bold().to_string(),
            cells: t.cells.to_string(),
            duration_ms: format_duration(t.duration_ms),
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..=3)).with(Alignment::right()))
        .to_string();

    println!("{table}");

    println!(
        "  Total: {} cell(s) loaded  ·  {} ms elapsed",
        report.total_cells_loaded.to_string().bold(),
        format_duration(report.total_ms),
    );
    println!();
}

fn format_duration(ms: u128) -> String {
    if ms >= 1_000 {
        format!("{:.1}s", ms as f64 / 1_000.0).yellow().to_string()
    } else if ms >= 100 {
        ms.to_string().yellow().to_string()
    } else {
        ms.to_string().green().to_string()
    }
}
