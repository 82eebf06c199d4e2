use crate::backend::{BackendError, BackendGateway, BoundingBox};
use crate::cache::{write_entry, CacheError, LocalCacheEntry};
use crate::model::PlaceRecord;
use crate::reconcile::matcher::select_match;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// The backend call that was in flight when reconciliation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileStep {
    Lookup,
    Update,
    Create,
}

impl fmt::Display for ReconcileStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReconcileStep::Lookup => "lookup",
            ReconcileStep::Update => "update",
            ReconcileStep::Create => "create",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Place '{name}' has no coordinates")]
    MissingCoordinates { name: String },

    #[error("Backend {step} failed: {source}")]
    Backend {
        step: ReconcileStep,
        #[source]
        source: BackendError,
    },

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Which mutation reconciliation issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileBranch {
    Updated,
    Created,
}

/// Local and backend ids disagreed; the backend id was kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdConflict {
    pub local_id: i64,
    pub backend_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconciliationOutcome {
    pub branch: ReconcileBranch,
    /// Backend id of the place after reconciliation
    pub id: i64,
    /// Raw HTTP status of the mutation
    pub status: u16,
    pub conflict: Option<IdConflict>,
}

/// Maps candidate records onto backend places
pub struct Reconciler<G: BackendGateway> {
    gateway: G,
    epsilon: f64,
}

impl<G: BackendGateway> Reconciler<G> {
    /// Creates a reconciler using `epsilon` degrees for the nearby box
    pub fn new(gateway: G, epsilon: f64) -> Self {
        Self { gateway, epsilon }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Creates or updates the backend place for `candidate`
    ///
    /// `local_id` is the id held in the local cache, if any. It is only
    /// used to report a conflict; the backend lookup decides the branch.
    pub async fn reconcile(
        &self,
        candidate: &PlaceRecord,
        local_id: Option<i64>,
    ) -> Result<ReconciliationOutcome, ReconcileError> {
        let (latitude, longitude) =
            candidate
                .coordinates()
                .ok_or_else(|| ReconcileError::MissingCoordinates {
                    name: candidate.name.clone(),
                })?;

        let bounds = BoundingBox::around(latitude, longitude, self.epsilon);
        let nearby = self
            .gateway
            .get_by_bounds(&bounds)
            .await
            .map_err(|source| ReconcileError::Backend {
                step: ReconcileStep::Lookup,
                source,
            })?;

        let backend_id = select_match(&candidate.name, latitude, longitude, &nearby).map(|p| p.id);
        tracing::debug!(
            name = %candidate.name,
            nearby = nearby.len(),
            ?backend_id,
            ?local_id,
            "Matched candidate against backend"
        );

        match backend_id {
            Some(id) => {
                let conflict = local_id
                    .filter(|local| *local != id)
                    .map(|local_id| IdConflict {
                        local_id,
                        backend_id: id,
                    });
                if let Some(conflict) = &conflict {
                    tracing::info!(
                        name = %candidate.name,
                        local_id = conflict.local_id,
                        backend_id = conflict.backend_id,
                        "Local id is stale, using backend id"
                    );
                }

                let status = self.gateway.update(id, candidate).await.map_err(|source| {
                    ReconcileError::Backend {
                        step: ReconcileStep::Update,
                        source,
                    }
                })?;

                tracing::info!(name = %candidate.name, id, status, "Updated place");
                Ok(ReconciliationOutcome {
                    branch: ReconcileBranch::Updated,
                    id,
                    status,
                    conflict,
                })
            }
            None => {
                let created = self.gateway.create(candidate).await.map_err(|source| {
                    ReconcileError::Backend {
                        step: ReconcileStep::Create,
                        source,
                    }
                })?;

                tracing::info!(
                    name = %candidate.name,
                    id = created.id,
                    status = created.status,
                    "Created place"
                );
                Ok(ReconciliationOutcome {
                    branch: ReconcileBranch::Created,
                    id: created.id,
                    status: created.status,
                    conflict: None,
                })
            }
        }
    }

    /// Reconciles a cached entry and writes the resulting id back to `path`
    ///
    /// The file is rewritten only when the id changed, and never when the
    /// backend call failed.
    pub async fn reconcile_entry(
        &self,
        path: &Path,
        entry: &mut LocalCacheEntry,
    ) -> Result<ReconciliationOutcome, ReconcileError> {
        let outcome = self.reconcile(&entry.place, entry.id).await?;

        if entry.id != Some(outcome.id) {
            entry.id = Some(outcome.id);
            write_entry(path, entry)?;
            tracing::debug!("Stored id {} in {}", outcome.id, path.display());
        }

        Ok(outcome)
    }
}
