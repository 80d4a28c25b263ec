//! Turning a submitted label into a store mutation and back into local state
//!
//! A submission at a position that already carries a marker appends to that
//! marker's list; anywhere else it creates a new marker. Positions must match
//! exactly. Labels are not deduplicated.

use serde::Serialize;
use tracing::error;

use crate::store::MarkerStore;
use crate::types::{MarkerId, MarkerRecord, Position};

/// The store mutation a submission resolves to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    /// No marker at the position yet
    Create { position: Position, label: String },
    /// Append to marker `id`; `diseases` is the complete desired list
    Update { id: MarkerId, diseases: Vec<String> },
}

/// How a store mutation settled
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Created(MarkerRecord),
    Updated { id: MarkerId, diseases: Vec<String> },
    Failed(String),
}

/// Works out what submitting `draft` at `position` should do
///
/// Returns `None` when there is no position yet or the trimmed label is empty.
pub fn plan(markers: &[MarkerRecord], position: Option<Position>, draft: &str) -> Option<Intent> {
    let position = position?;
    let label = draft.trim();
    if label.is_empty() {
        return None;
    }

    match markers.iter().find(|marker| marker.is_at(&position)) {
        Some(existing) => {
            let mut diseases = existing.diseases.clone();
            diseases.push(label.to_string());
            Some(Intent::Update {
                id: existing.id,
                diseases,
            })
        }
        None => Some(Intent::Create {
            position,
            label: label.to_string(),
        }),
    }
}

/// Sends `intent` to the store; failures are logged and reported as [`Outcome::Failed`]
pub async fn execute<S: MarkerStore>(store: &S, intent: &Intent) -> Outcome {
    match intent {
        Intent::Create { position, label } => match store.create_marker(*position, label).await {
            Ok(record) => Outcome::Created(record),
            Err(e) => {
                error!("error adding marker: {}", e);
                Outcome::Failed(e.to_string())
            }
        },
        Intent::Update { id, diseases } => match store.update_marker(*id, diseases).await {
            Ok(()) => Outcome::Updated {
                id: *id,
                diseases: diseases.clone(),
            },
            Err(e) => {
                error!("error updating marker {}: {}", id, e);
                Outcome::Failed(e.to_string())
            }
        },
    }
}

/// Patches the local marker list with a settled outcome
pub fn apply(markers: &mut Vec<MarkerRecord>, outcome: &Outcome) {
    match outcome {
        Outcome::Created(record) => markers.push(record.clone()),
        Outcome::Updated { id, diseases } => {
            for marker in markers.iter_mut().filter(|marker| marker.id == *id) {
                marker.diseases = diseases.clone();
            }
        }
        Outcome::Failed(_) => {}
    }
}
