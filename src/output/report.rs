//! Per-place results of a batch run

use crate::reconcile::IdConflict;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Final state of one place in a batch
#[derive(Debug, Clone, PartialEq)]
pub enum PlaceStatus {
    /// Extracted and written to the enriched directory
    Enriched { output: PathBuf },

    /// Created in the backend under a new id
    Created { id: i64 },

    /// Updated in the backend
    Updated {
        id: i64,
        conflict: Option<IdConflict>,
    },

    /// Skipped on operator request
    Skipped { reason: String },

    /// Processing stopped with an error
    Failed { reason: String },
}

impl PlaceStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, PlaceStatus::Failed { .. })
    }

    fn label(&self) -> &'static str {
        match self {
            PlaceStatus::Enriched { .. } => "enriched",
            PlaceStatus::Created { .. } => "created",
            PlaceStatus::Updated { .. } => "updated",
            PlaceStatus::Skipped { .. } => "skipped",
            PlaceStatus::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceReport {
    /// Cache file the place was read from
    pub source: PathBuf,
    pub status: PlaceStatus,
    pub promotions_posted: usize,
    pub promotions_failed: usize,
}

/// Results of one batch, in processing order
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub places: Vec<PlaceReport>,
}

impl Default for BatchReport {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchReport {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            places: Vec::new(),
        }
    }

    /// Appends the result for one place
    pub fn record(&mut self, source: &Path, status: PlaceStatus) -> &mut PlaceReport {
        if let PlaceStatus::Failed { reason } = &status {
            tracing::error!("{}: {}", source.display(), reason);
        }

        self.places.push(PlaceReport {
            source: source.to_path_buf(),
            status,
            promotions_posted: 0,
            promotions_failed: 0,
        });
        let last = self.places.len() - 1;
        &mut self.places[last]
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn succeeded(&self) -> usize {
        self.places.iter().filter(|p| !p.status.is_failure()).count()
    }

    pub fn failed(&self) -> usize {
        self.places.iter().filter(|p| p.status.is_failure()).count()
    }

    pub fn count(&self, label: &str) -> usize {
        self.places
            .iter()
            .filter(|p| p.status.label() == label)
            .count()
    }

    /// Wall-clock duration, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Prints a batch summary to stdout
pub fn print_report(report: &BatchReport) {
    println!("=== Batch Report ===\n");

    println!("Started: {}", report.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
    if let Some(seconds) = report.duration_seconds() {
        println!("Duration: {}s", seconds);
    }
    println!();

    println!("Places ({}):", report.places.len());
    for place in &report.places {
        let detail = match &place.status {
            PlaceStatus::Enriched { output } => format!("-> {}", output.display()),
            PlaceStatus::Created { id } => format!("id {}", id),
            PlaceStatus::Updated { id, conflict: None } => format!("id {}", id),
            PlaceStatus::Updated {
                id,
                conflict: Some(conflict),
            } => format!("id {} (local id {} replaced)", id, conflict.local_id),
            PlaceStatus::Skipped { reason } | PlaceStatus::Failed { reason } => reason.clone(),
        };
        println!(
            "  [{}] {} {}",
            place.status.label(),
            place.source.display(),
            detail
        );
        if place.promotions_posted + place.promotions_failed > 0 {
            println!(
                "      promotions: {} posted, {} failed",
                place.promotions_posted, place.promotions_failed
            );
        }
    }
    println!();

    for label in ["enriched", "created", "updated", "skipped", "failed"] {
        let count = report.count(label);
        if count > 0 {
            println!("  {}: {}", label, count);
        }
    }

    let total = report.places.len();
    let success_rate = if total > 0 {
        (report.succeeded() as f64 / total as f64) * 100.0
    } else {
        0.0
    };
    println!(
        "\nSuccess Rate: {:.1}% ({} / {} places)",
        success_rate,
        report.succeeded(),
        total
    );
}
