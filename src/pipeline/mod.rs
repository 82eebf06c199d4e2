//! Per-place and batch orchestration
//!
//! A place moves through two stages:
//! - enrich: crawl its website, extract a record, write it to the enriched
//!   directory
//! - sync: reconcile the enriched record with the backend and store the id
//!
//! Stages run strictly one place at a time. A failure ends processing of
//! that place only; batches record it and move on.

mod confirm;
mod enrich;
mod promotions;
mod sync;

pub use confirm::{AutoConfirm, Confirm};
pub use enrich::{EnrichOutcome, Enricher};
pub use promotions::{publish_promotions, PromotionTally};
pub use sync::{SyncOutcome, Syncer};

use crate::backend::BackendGateway;
use crate::crawler::PageFetcher;
use crate::extract::StructuredCompletion;
use crate::output::{BatchReport, PlaceStatus};
use std::path::{Path, PathBuf};

/// Enrich followed by sync
pub struct Pipeline<F: PageFetcher, C: StructuredCompletion, G: BackendGateway> {
    enricher: Enricher<F, C>,
    syncer: Syncer<G>,
}

impl<F, C, G> Pipeline<F, C, G>
where
    F: PageFetcher,
    C: StructuredCompletion,
    G: BackendGateway,
{
    pub fn new(enricher: Enricher<F, C>, syncer: Syncer<G>) -> Self {
        Self { enricher, syncer }
    }

    pub fn enricher(&self) -> &Enricher<F, C> {
        &self.enricher
    }

    pub fn syncer(&self) -> &Syncer<G> {
        &self.syncer
    }

    /// Enriches the place at `path`, then syncs the enriched file
    ///
    /// A kept (not overwritten) enriched file is still synced.
    pub async fn run(&self, path: &Path) -> crate::Result<SyncOutcome> {
        let enriched = self.enricher.enrich(path).await?;
        self.syncer.sync(enriched.path()).await
    }

    /// Runs every place in turn; one place failing never stops the batch
    pub async fn run_all(&self, paths: &[PathBuf]) -> BatchReport {
        let mut report = BatchReport::new();

        for (index, path) in paths.iter().enumerate() {
            tracing::info!("Processing place {} of {}", index + 1, paths.len());
            match self.run(path).await {
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
