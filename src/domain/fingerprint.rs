use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::domain::grid::Grid;

/// SHA-256 hex fingerprint of a grid's content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Fingerprint(pub String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Compute a SHA-256 fingerprint of a grid.
///
/// Each row is serialised to canonical JSON (keys sorted by `BTreeMap`),
/// rows are joined with `\n` in grid order, and the result is hashed. Row
/// order is NOT normalised away: the comparison is positional, so two grids
/// with the same rows in a different order are genuinely different inputs
/// and must fingerprint differently. An empty grid hashes the empty string.
pub fn fingerprint(grid: &Grid) -> Fingerprint {
    let row_strings: Vec<String> = grid
        .rows
        .iter()
        .map(|row| serde_json::to_string(row).unwrap_or_default())
        .collect();

    let content = row_strings.join("\n");
    let hash = Sha256::digest(content.as_bytes());
    Fingerprint(format!("{:x}", hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::Row;

    fn grid_of(values: &[&str]) -> Grid {
        let rows = values
            .iter()
            .map(|v| {
                let mut row = Row::new();
                row.insert("v".to_string(), v.to_string());
                row
            })
            .collect();
        Grid::new(vec!["v".to_string()], rows)
    }

    #[test]
    fn same_grid_same_fingerprint() {
        let g = grid_of(&["a", "b"]);
        assert_eq!(fingerprint(&g), fingerprint(&g));
    }

    #[test]
    fn different_content_different_fingerprint() {
        assert_ne!(fingerprint(&grid_of(&["a"])), fingerprint(&grid_of(&["b"])));
    }

    #[test]
    fn row_order_matters() {
        assert_ne!(
            fingerprint(&grid_of(&["a", "b"])),
            fingerprint(&grid_of(&["b", "a"]))
        );
    }

    #[test]
    fn empty_grid_is_deterministic() {
        assert_eq!(fingerprint(&Grid::default()), fingerprint(&Grid::default()));
    }
}
