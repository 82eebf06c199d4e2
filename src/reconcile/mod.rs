//! Reconciliation of extracted places against the backend
//!
//! A candidate record is matched to an existing backend place by location
//! and name. The backend's id always wins over the locally cached one, and
//! the cache is corrected after a successful mutation.

mod matcher;
mod reconciler;

pub use matcher::select_match;
pub use reconciler::{
    IdConflict, ReconcileBranch, ReconcileError, ReconcileStep, ReconciliationOutcome, Reconciler,
};
