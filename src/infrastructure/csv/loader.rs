use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use super::encoding::decode;
use crate::domain::comparison::TableMeta;
use crate::domain::fingerprint::fingerprint;
use crate::domain::grid::{Grid, Row};
use crate::domain::ports::{LoadedTable, TableLoader};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not decodable with any supported encoding")]
    UnsupportedEncoding { path: String },
    #[error("failed to parse {path} as CSV")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("{path}: row {row} has {found} fields but the header declares {expected}")]
    RaggedRow {
        path: String,
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Loads CSV files from disk with automatic encoding detection.
///
/// The header row names the columns. Rows shorter than the header are padded
/// with empty cells; rows longer than the header are rejected, since the
/// extra cells have no column to live in.
pub struct CsvTableLoader;

#[async_trait]
impl TableLoader for CsvTableLoader {
    async fn load(&self, path: &Path) -> Result<LoadedTable> {
        let path_str = path.display().to_string();

        let bytes = tokio::fs::read(path).await.map_err(|source| LoadError::Io {
            path: path_str.clone(),
            source,
        })?;
        let size_bytes = bytes.len() as u64;

        let decoded = decode(&bytes).ok_or_else(|| LoadError::UnsupportedEncoding {
            path: path_str.clone(),
        })?;
        debug!(file = %path_str, encoding = decoded.encoding, size_bytes, "decoded csv file");

        let grid = parse_csv(&decoded.text, &path_str)?;

        let meta = TableMeta {
            path: path_str,
            rows: grid.row_count(),
            columns: grid.column_count(),
            size_bytes,
            encoding: decoded.encoding.to_string(),
            fingerprint: fingerprint(&grid),
        };
        Ok(LoadedTable { grid, meta })
    }
}

fn parse_csv(text: &str, path: &str) -> Result<Grid, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| LoadError::Csv {
            path: path.to_string(),
            source,
        })?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|source| LoadError::Csv {
            path: path.to_string(),
            source,
        })?;
        if record.len() > headers.len() {
            return Err(LoadError::RaggedRow {
                path: path.to_string(),
                row: idx,
                expected: headers.len(),
                found: record.len(),
            });
        }

        let mut row = Row::new();
        for (col, header) in headers.iter().enumerate() {
            row.insert(header.clone(), record.get(col).unwrap_or("").to_string());
        }
        rows.push(row);
    }

    Ok(Grid::new(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::GBK;
    use std::io::Write;

    async fn load_bytes(bytes: &[u8]) -> Result<LoadedTable> {
        let mut f = tempfile::NamedTempFile::with_suffix(".csv").unwrap();
        f.write_all(bytes).unwrap();
        CsvTableLoader.load(f.path()).await
    }

    #[tokio::test]
    async fn loads_a_plain_utf8_file() {
        let table = load_bytes(b"name,age\nalice,30\nbob,25\n").await.unwrap();
        assert_eq!(table.grid.columns, vec!["name", "age"]);
        assert_eq!(table.grid.row_count(), 2);
        assert_eq!(table.grid.rows[0]["name"], "alice");
        assert_eq!(table.grid.rows[1]["age"], "25");
        assert_eq!(table.meta.encoding, "UTF-8");
        assert_eq!(table.meta.rows, 2);
        assert_eq!(table.meta.columns, 2);
        assert!(table.meta.size_bytes > 0);
    }

    #[tokio::test]
    async fn short_rows_are_padded_with_empty_cells() {
        let table = load_bytes(b"a,b,c\n1,2\n").await.unwrap();
        assert_eq!(table.grid.rows[0]["a"], "1");
        assert_eq!(table.grid.rows[0]["b"], "2");
        assert_eq!(table.grid.rows[0]["c"], "");
    }

    #[tokio::test]
    async fn overlong_rows_are_rejected() {
        let err = load_bytes(b"a,b\n1,2,3\n").await.unwrap_err();
        let load_err = err.downcast::<LoadError>().unwrap();
        assert!(matches!(
            load_err,
            LoadError::RaggedRow {
                row: 0,
                expected: 2,
                found: 3,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn gbk_files_are_detected_and_decoded() {
        let (bytes, _, _) = GBK.encode("名,值\n你好,1\n");
        let table = load_bytes(&bytes).await.unwrap();
        assert_ne!(table.meta.encoding, "UTF-8");
        assert_eq!(table.grid.rows[0]["名"], "你好");
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let err = CsvTableLoader
            .load(Path::new("/nonexistent/x.csv"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast::<LoadError>().unwrap(),
            LoadError::Io { .. }
        ));
    }

    #[tokio::test]
    async fn headers_only_yields_zero_rows() {
        let table = load_bytes(b"a,b\n").await.unwrap();
        assert_eq!(table.grid.row_count(), 0);
        assert_eq!(table.grid.columns, vec!["a", "b"]);
    }
}
