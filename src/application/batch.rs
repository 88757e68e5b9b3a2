use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::compare::CompareService;
use crate::domain::comparison::{TargetComparison, TargetOutcome};
use crate::domain::ports::{Comparator, TableLoader};

/// Compares one base table against many targets.
///
/// The base is loaded once; each target gets its own task (load + compare),
/// and handles are joined in input order, so the returned entries always
/// follow the input target order no matter which comparison finishes first.
/// A target that fails to load is recorded as [`TargetOutcome::Failed`] and
/// never aborts the rest of the batch; only a base-load failure fails the
/// whole call.
pub struct BatchService {
    loader: Arc<dyn TableLoader>,
    service: Arc<CompareService>,
}

impl BatchService {
    pub fn new(loader: Arc<dyn TableLoader>, comparator: Arc<dyn Comparator>) -> Self {
        let service = Arc::new(CompareService::new(Arc::clone(&loader), comparator));
        Self { loader, service }
    }

    pub async fn compare_many(
        &self,
        base: &Path,
        targets: &[PathBuf],
    ) -> Result<Vec<TargetComparison>> {
        let base_table = Arc::new(
            self.loader
                .load(base)
                .await
                .with_context(|| format!("failed to load base table {}", base.display()))?,
        );

        let mut handles = Vec::with_capacity(targets.len());
        for target in targets {
            let loader = Arc::clone(&self.loader);
            let service = Arc::clone(&self.service);
            let base_table = Arc::clone(&base_table);
            let target = target.clone();

            handles.push(tokio::spawn(async move {
                let outcome = match loader.load(&target).await {
                    Ok(table) => match service.compare_tables(&base_table, &table) {
                        Ok(result) => TargetOutcome::Compared(result),
                        Err(e) => TargetOutcome::Failed {
                            error: format!("{e:#}"),
                        },
                    },
                    Err(e) => TargetOutcome::Failed {
                        error: format!("{e:#}"),
                    },
                };
                TargetComparison { target, outcome }
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (handle, target) in handles.into_iter().zip(targets) {
            match handle.await {
                Ok(entry) => {
                    if let TargetOutcome::Failed { error } = &entry.outcome {
                        warn!(target = %entry.target.display(), %error, "target comparison failed");
                    }
                    results.push(entry);
                }
                // An isolated panic in one target must not poison the batch.
                Err(join_err) => {
                    warn!(target = %target.display(), %join_err, "target task panicked");
                    results.push(TargetComparison {
                        target: target.clone(),
                        outcome: TargetOutcome::Failed {
                            error: format!("comparison task failed: {join_err}"),
                        },
                    });
                }
            }
        }

        let failed = results.iter().filter(|r| r.outcome.is_failed()).count();
        info!(
            targets = results.len(),
            failed, "batch comparison completed"
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::compare::CellComparator;
    use crate::domain::comparison::TableMeta;
    use crate::domain::fingerprint::{fingerprint, Fingerprint};
    use crate::domain::grid::{Grid, Row};
    use crate::domain::ports::LoadedTable;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::collections::BTreeMap;

    /// In-memory loader: paths map to grids, anything else fails to load.
    struct MapTableLoader {
        tables: BTreeMap<PathBuf, Grid>,
    }

    #[async_trait]
    impl TableLoader for MapTableLoader {
        async fn load(&self, path: &Path) -> Result<LoadedTable> {
            let grid = self
                .tables
                .get(path)
                .cloned()
                .ok_or_else(|| anyhow!("no such file: {}", path.display()))?;
            let meta = TableMeta {
                path: path.display().to_string(),
                rows: grid.row_count(),
                columns: grid.column_count(),
                size_bytes: 0,
                encoding: "UTF-8".to_string(),
                fingerprint: fingerprint(&grid),
            };
            Ok(LoadedTable { grid, meta })
        }
    }

    fn one_cell(value: &str) -> Grid {
        let mut row = Row::new();
        row.insert("v".to_string(), value.to_string());
        Grid::new(vec!["v".to_string()], vec![row])
    }

    fn service(tables: BTreeMap<PathBuf, Grid>) -> BatchService {
        BatchService::new(
            Arc::new(MapTableLoader { tables }),
            Arc::new(CellComparator::default()),
        )
    }

    #[tokio::test]
    async fn one_bad_target_does_not_abort_the_batch() {
        let mut tables = BTreeMap::new();
        tables.insert(PathBuf::from("base.csv"), one_cell("x"));
        tables.insert(PathBuf::from("t1.csv"), one_cell("x"));
        tables.insert(PathBuf::from("t3.csv"), one_cell("y"));

        let targets = vec![
            PathBuf::from("t1.csv"),
            PathBuf::from("t2.csv"), // missing
            PathBuf::from("t3.csv"),
        ];

        let results = service(tables)
            .compare_many(Path::new("base.csv"), &targets)
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].target, PathBuf::from("t1.csv"));
        assert_eq!(results[1].target, PathBuf::from("t2.csv"));
        assert_eq!(results[2].target, PathBuf::from("t3.csv"));

        let r1 = results[0].outcome.result().unwrap();
        assert_eq!(r1.similarity, 1.0);

        assert!(results[1].outcome.is_failed());

        let r3 = results[2].outcome.result().unwrap();
        assert_eq!(r3.different_cells, 1);
    }

    #[tokio::test]
    async fn missing_base_fails_the_whole_call() {
        let results = service(BTreeMap::new())
            .compare_many(Path::new("absent.csv"), &[PathBuf::from("t.csv")])
            .await;
        assert!(results.is_err());
    }

    #[tokio::test]
    async fn base_fingerprint_is_shared_across_targets() {
        let mut tables = BTreeMap::new();
        tables.insert(PathBuf::from("base.csv"), one_cell("x"));
        tables.insert(PathBuf::from("a.csv"), one_cell("x"));
        tables.insert(PathBuf::from("b.csv"), one_cell("z"));

        let results = service(tables)
            .compare_many(
                Path::new("base.csv"),
                &[PathBuf::from("a.csv"), PathBuf::from("b.csv")],
            )
            .await
            .unwrap();

        let fp_a: &Fingerprint = &results[0].outcome.result().unwrap().base.fingerprint;
        let fp_b: &Fingerprint = &results[1].outcome.result().unwrap().base.fingerprint;
        assert_eq!(fp_a, fp_b);
    }
}
