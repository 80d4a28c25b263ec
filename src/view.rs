//! The map view's state
//!
//! [`MapView`] owns the cached marker list, the live position and the draft
//! label. Every "Add Marker" action becomes a [`Submission`] whose status moves
//! from `Pending` to `Succeeded` or `Failed`. Starting and completing a
//! submission are separate steps so a caller that shares the view can release
//! it while the store call is in flight.

use serde::Serialize;
use tracing::{error, info};

use crate::geolocation::LocationService;
use crate::reconcile::{self, Intent, Outcome};
use crate::store::MarkerStore;
use crate::types::{MarkerRecord, Position};

pub type SubmissionId = u64;

/// Where a submission stands
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Succeeded,
    Failed(String),
}

/// One "Add Marker" action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub intent: Intent,
    pub status: SubmissionStatus,
}

/// View-model behind the `/map` page
#[derive(Debug, Default, Clone)]
pub struct MapView {
    markers: Vec<MarkerRecord>,
    position: Option<Position>,
    label: String,
    submissions: Vec<Submission>,
    next_submission: SubmissionId,
}

impl MapView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markers(&self) -> &[MarkerRecord] {
        &self.markers
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// The map is drawn only once a position is known
    pub fn is_ready(&self) -> bool {
        self.position.is_some()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn submission(&self, id: SubmissionId) -> Option<&Submission> {
        self.submissions.iter().find(|s| s.id == id)
    }

    /// Replaces the cached marker list
    pub fn apply_markers(&mut self, markers: Vec<MarkerRecord>) {
        self.markers = markers;
    }

    /// Records the answer of a location query; failures are only logged
    pub fn apply_position(&mut self, fix: crate::Result<Position>) {
        match fix {
            Ok(position) => {
                info!("live location {} {}", position.latitude, position.longitude);
                self.position = Some(position);
            }
            Err(e) => error!("error fetching live location: {}", e),
        }
    }

    /// Forgets the live position, as a fresh mount of the view would
    pub fn reset_position(&mut self) {
        self.position = None;
    }

    /// Refreshes the marker list from the store
    pub async fn load_markers<S: MarkerStore>(&mut self, store: &S) {
        let markers = store.list_markers().await;
        self.apply_markers(markers);
    }

    /// Asks the location source for the current position
    pub async fn locate<L: LocationService>(&mut self, locator: &L) {
        let fix = locator.current_position().await;
        self.apply_position(fix);
    }

    /// Runs the marker fetch and the location query side by side
    pub async fn mount<S: MarkerStore, L: LocationService>(&mut self, store: &S, locator: &L) {
        let (markers, fix) = tokio::join!(store.list_markers(), locator.current_position());
        self.apply_markers(markers);
        self.apply_position(fix);
    }

    /// Starts a submission of the draft label at the live position
    ///
    /// Returns `None`, and records nothing, when there is no position yet or
    /// the label is blank. Otherwise the submission is recorded as pending and
    /// the intent to send is handed back.
    pub fn begin_submission(&mut self) -> Option<(SubmissionId, Intent)> {
        let intent = reconcile::plan(&self.markers, self.position, &self.label)?;
        self.next_submission += 1;
        let id = self.next_submission;
        self.submissions.push(Submission {
            id,
            intent: intent.clone(),
            status: SubmissionStatus::Pending,
        });
        Some((id, intent))
    }

    /// Applies the settled outcome of submission `id`
    ///
    /// The draft label is cleared after a successful creation and kept after
    /// an update.
    pub fn complete_submission(&mut self, id: SubmissionId, outcome: Outcome) {
        reconcile::apply(&mut self.markers, &outcome);
        let status = match outcome {
            Outcome::Created(_) => {
                self.label.clear();
                SubmissionStatus::Succeeded
            }
            Outcome::Updated { .. } => SubmissionStatus::Succeeded,
            Outcome::Failed(reason) => SubmissionStatus::Failed(reason),
        };
        if let Some(submission) = self.submissions.iter_mut().find(|s| s.id == id) {
            submission.status = status;
        }
    }

    /// Starts, sends and completes a submission in one go
    pub async fn submit<S: MarkerStore>(&mut self, store: &S) -> Option<SubmissionId> {
        let (id, intent) = self.begin_submission()?;
        let outcome = reconcile::execute(store, &intent).await;
        self.complete_submission(id, outcome);
        Some(id)
    }
}
