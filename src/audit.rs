//! Non-interactive sweep over existing backend ids
//!
//! Every id in a range is looked up and sorted into an outcome class; each
//! class carries a configured action.

use crate::backend::{BackendError, BackendGateway};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// What to do with a place in a given outcome class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuditAction {
    #[default]
    Skip,
    Delete,
}

impl FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s" | "skip" => Ok(AuditAction::Skip),
            "d" | "delete" => Ok(AuditAction::Delete),
            other => Err(format!("unknown audit action '{}' (use skip or delete)", other)),
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditAction::Skip => f.write_str("skip"),
            AuditAction::Delete => f.write_str("delete"),
        }
    }
}

/// Action per outcome class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditActions {
    /// The place exists (2xx)
    pub found: AuditAction,
    /// The backend answered 404
    pub not_found: AuditAction,
    /// The backend answered 5xx
    pub server_error: AuditAction,
}

/// How a single lookup ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditClass {
    Found,
    NotFound,
    ServerError,
    /// Any other HTTP status, or an unparseable body
    Other,
    /// No HTTP answer at all
    Unreachable,
}

impl AuditClass {
    fn of(result: &Result<crate::backend::StoredPlace, BackendError>) -> Self {
        match result {
            Ok(_) => AuditClass::Found,
            Err(BackendError::Transport(e)) if e.status().is_none() => AuditClass::Unreachable,
            Err(e) => match e.status() {
                Some(404) => AuditClass::NotFound,
                Some(status) if (500..600).contains(&status) => AuditClass::ServerError,
                _ => AuditClass::Other,
            },
        }
    }
}

/// Counts per class plus the deletions issued
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditSummary {
    pub found: usize,
    pub not_found: usize,
    pub server_error: usize,
    pub other: usize,
    pub unreachable: usize,
    pub deleted: usize,
    pub delete_failures: usize,
}

/// Looks up every id in `ids` and applies the configured actions
///
/// Lookup and delete failures are logged and the sweep continues.
pub async fn audit<G: BackendGateway + ?Sized>(
    gateway: &G,
    ids: Range<i64>,
    actions: &AuditActions,
) -> AuditSummary {
    let mut summary = AuditSummary::default();

    for id in ids {
        let result = gateway.get_by_id(id).await;
        let class = AuditClass::of(&result);

        let action = match class {
            AuditClass::Found => {
                summary.found += 1;
                actions.found
            }
            AuditClass::NotFound => {
                summary.not_found += 1;
                actions.not_found
            }
            AuditClass::ServerError => {
                summary.server_error += 1;
                actions.server_error
            }
            AuditClass::Other => {
                summary.other += 1;
                AuditAction::Skip
            }
            AuditClass::Unreachable => {
                summary.unreachable += 1;
                AuditAction::Skip
            }
        };

        match &result {
            Ok(place) => tracing::info!(id, name = %place.name, "Place found"),
            Err(e) => tracing::info!(id, ?class, "Lookup failed: {}", e),
        }

        if action == AuditAction::Delete {
            match gateway.delete(id).await {
                Ok(status) => {
                    tracing::info!(id, status, "Deleted place");
                    summary.deleted += 1;
                }
                Err(e) => {
                    tracing::warn!(id, "Delete failed: {}", e);
                    summary.delete_failures += 1;
                }
            }
        }
    }

    summary
}
