use crate::backend::BackendGateway;
use crate::cache::read_entry;
use crate::output::{BatchReport, PlaceStatus};
use crate::pipeline::promotions::{publish_promotions, PromotionTally};
use crate::reconcile::{ReconcileBranch, ReconciliationOutcome, Reconciler};
use std::path::{Path, PathBuf};

/// Result of syncing one cached place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    pub reconciliation: ReconciliationOutcome,
    pub promotions: PromotionTally,
}

impl SyncOutcome {
    pub fn status(&self) -> PlaceStatus {
        let id = self.reconciliation.id;
        match self.reconciliation.branch {
            ReconcileBranch::Created => PlaceStatus::Created { id },
            ReconcileBranch::Updated => PlaceStatus::Updated {
                id,
                conflict: self.reconciliation.conflict,
            },
        }
    }
}

/// Pushes cached places to the backend
pub struct Syncer<G: BackendGateway> {
    reconciler: Reconciler<G>,
    publish_promotions: bool,
}

impl<G: BackendGateway> Syncer<G> {
    pub fn new(gateway: G, bounds_epsilon: f64, publish_promotions: bool) -> Self {
        Self {
            reconciler: Reconciler::new(gateway, bounds_epsilon),
            publish_promotions,
        }
    }

    pub fn gateway(&self) -> &G {
        self.reconciler.gateway()
    }

    /// Reconciles the cached place at `path` and stores the resulting id
    pub async fn sync(&self, path: &Path) -> crate::Result<SyncOutcome> {
        let mut entry = read_entry(path)?;
        let reconciliation = self.reconciler.reconcile_entry(path, &mut entry).await?;

        let promotions = if self.publish_promotions {
            publish_promotions(self.gateway(), reconciliation.id, &entry.place).await
        } else {
            PromotionTally::default()
        };

        Ok(SyncOutcome {
            reconciliation,
            promotions,
        })
    }

    /// Syncs every file in turn; one place failing never stops the batch
    pub async fn sync_all(&self, paths: &[PathBuf]) -> BatchReport {
        let mut report = BatchReport::new();

        for (index, path) in paths.iter().enumerate() {
            tracing::info!("Syncing place {} of {}", index + 1, paths.len());
            match self.sync(path).await {
                Ok(outcome) => {
                    let place = report.record(path, outcome.status());
                    place.promotions_posted = outcome.promotions.posted;
                    place.promotions_failed = outcome.promotions.failed;
                }
                Err(e) => {
                    report.record(
                        path,
                        PlaceStatus::Failed {
                            reason: e.to_string(),
                        },
                    );
                }
            }
        }

        report.finish();
        report
    }
}
