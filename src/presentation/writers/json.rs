use anyhow::Result;

use crate::domain::{comparison::ComparisonResult, ports::ReportWriter};

/// Machine-readable report: the full [`ComparisonResult`] as pretty JSON,
/// including every character-level difference and both encoding probe lists.
pub struct JsonWriter;

impl ReportWriter for JsonWriter {
    fn format(&self, result: &ComparisonResult) -> Result<String> {
        Ok(serde_json::to_string_pretty(result)?)
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::compare::CellComparator;
    use crate::domain::comparison::TableMeta;
    use crate::domain::fingerprint::Fingerprint;
    use crate::domain::grid::{Grid, Row};
    use crate::domain::ports::Comparator;
    use serde_json::Value;

    fn meta(path: &str) -> TableMeta {
        TableMeta {
            path: path.to_string(),
            rows: 1,
            columns: 1,
            size_bytes: 5,
            encoding: "UTF-8".to_string(),
            fingerprint: Fingerprint("cafe".to_string()),
        }
    }

    fn one_cell(value: &str) -> Grid {
        let mut row = Row::new();
        row.insert("v".to_string(), value.to_string());
        Grid::new(vec!["v".to_string()], vec![row])
    }

    fn make_result() -> ComparisonResult {
        let diff = CellComparator::default()
            .compare_grids(&one_cell("a\u{00A0}b"), &one_cell("a b"))
            .unwrap();
        ComparisonResult::new(diff, meta("base.csv"), meta("target.csv"))
    }

    #[test]
    fn json_output_is_parseable_and_complete() {
        let output = JsonWriter.format(&make_result()).unwrap();
        let parsed: Value = serde_json::from_str(&output).unwrap();

        assert!(parsed["report_id"].as_str().unwrap().starts_with("cmp_"));
        assert_eq!(parsed["total_cells"], 1);
        assert_eq!(parsed["different_cells"], 1);
        assert_eq!(parsed["base"]["path"], "base.csv");
        assert_eq!(parsed["base"]["fingerprint"], "cafe");

        let char_diff = &parsed["differences"][0]["report"]["differences"][0];
        assert_eq!(char_diff["position"], 1);
        assert_eq!(char_diff["kind"], "whitespace_substitution");
        assert_eq!(char_diff["left_info"]["name"], "no-break space");
    }

    #[test]
    fn encoding_probes_are_serialized() {
        let output = JsonWriter.format(&make_result()).unwrap();
        let parsed: Value = serde_json::from_str(&output).unwrap();
        let probes = parsed["differences"][0]["report"]["left_encodings"]
            .as_array()
            .unwrap();
        assert_eq!(probes.len(), 5);
        assert_eq!(probes[0]["encoding"], "utf-8");
        assert_eq!(probes[1]["encoding"], "ascii");
        assert_eq!(probes[1]["success"], false);
    }
}
