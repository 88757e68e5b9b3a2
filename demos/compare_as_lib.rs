//! # Cellscope — library usage example
//!
//! Shows three common patterns for consuming Cellscope as a Rust library:
//!
//! 1. **Compare two files** — simplest, mirrors the CLI
//! 2. **Compare in-memory grids** — no files needed, bring your own data
//! 3. **Inspect the result** — traverse the differences for custom logic
//!
//! Run with two CSV files:
//!   cargo run --example compare_as_lib -- base.csv target.csv
//!
//! Run with the built-in in-memory grids:
//!   cargo run --example compare_as_lib

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use cellscope::{
    presentation::writers::{all_writers, write_to_file, writer_for},
    CellComparator, Comparator, ComparisonResult, CompareOptions, Grid, Row,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    match (args.get(1), args.get(2)) {
        (Some(base), Some(target)) => from_files(base, target).await,
        _ => in_memory_grids(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pattern 1 — compare two CSV files (same as the CLI does internally)
// ─────────────────────────────────────────────────────────────────────────────
async fn from_files(base: &str, target: &str) -> Result<()> {
    println!("=== Pattern 1: compare two files ===\n");

    let options = CompareOptions {
        ignore_case: false,
        ignore_whitespace: true,
    };
    let result = cellscope::run(options, Path::new(base), Path::new(target)).await?;

    // Write all three output formats (JSON / CSV / HTML)
    let out_dir = Path::new("./output");
    for writer in all_writers() {
        let path = write_to_file(&*writer, &result, out_dir)?;
        println!("Written: {}", path.display());
    }

    inspect_result(&result);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Pattern 2 — compare grids built entirely in code, no CSV files required.
// Useful when the data comes from an API response, a database, a test, etc.
// ─────────────────────────────────────────────────────────────────────────────
fn in_memory_grids() -> Result<()> {
    println!("=== Pattern 2: in-memory grids ===\n");

    let grid = |cells: &[(&str, &str, &str)]| {
        let rows = cells
            .iter()
            .map(|(name, city, score)| {
                Row::from([
                    ("name".to_string(), name.to_string()),
                    ("city".to_string(), city.to_string()),
                    ("score".to_string(), score.to_string()),
                ])
            })
            .collect();
        Grid::new(
            vec!["name".into(), "city".into(), "score".into()],
            rows,
        )
    };

    let base = grid(&[
        ("alice", "Oslo", "97"),
        ("bob", "Lyon", "85"),
    ]);
    // "Oslo" here hides a no-break space, and bob's score changed.
    let target = grid(&[
        ("alice", "Oslo\u{00A0}", "97"),
        ("bob", "Lyon", "86"),
    ]);

    let comparator = CellComparator::new(CompareOptions::default());
    let diff = comparator.compare_grids(&base, &target)?;

    println!(
        "{} of {} cell(s) differ\n",
        diff.different_cells, diff.total_cells
    );

    for d in &diff.differences {
        println!(
            "row {} column {:?}: {} → {}",
            d.row + 1,
            d.column_name,
            d.original_repr,
            d.target_repr
        );
        for rc in &d.report.right_reportable {
            println!("    target hides {:?} at position {}", rc.info.name, rc.position);
        }
    }

    // The Arc<dyn Comparator> form is what the services take.
    let _shared: Arc<dyn Comparator> = Arc::new(comparator);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Pattern 3 — inspect the ComparisonResult directly for custom logic.
// The result is plain serialisable Rust data — no magic, no callbacks.
// ─────────────────────────────────────────────────────────────────────────────
fn inspect_result(result: &ComparisonResult) {
    println!("=== Pattern 3: inspecting the result ===\n");
    println!("id         : {}", result.report_id);
    println!("base       : {}", result.base.path);
    println!("target     : {}", result.target.path);
    println!("similarity : {:.2}%", result.similarity * 100.0);
    println!();

    for d in &result.differences {
        println!(
            "~ row {} column {:?}: {} → {}",
            d.row + 1,
            d.column_name,
            d.original_repr,
            d.target_repr
        );
        for c in &d.report.differences {
            println!("    position {}: {}", c.position, c.kind.label());
        }
    }

    // Example: abort a data pipeline when invisible characters sneak in
    let invisible = result
        .differences
        .iter()
        .filter(|d| !d.report.right_reportable.is_empty())
        .count();
    if invisible > 0 {
        eprintln!(
            "⚠  {invisible} cell(s) contain invisible characters — review before loading.",
        );
    }

    // Example: serialise to JSON and send to a webhook / write to a log
    let json = serde_json::to_string_pretty(result).expect("result is always serialisable");
    println!("Full result: {} bytes of JSON", json.len());

    // writer_for gives a single format when you do not want all of them
    if let Some(writer) = writer_for("json") {
        println!("JSON writer produces .{} files", writer.extension());
    }
}
