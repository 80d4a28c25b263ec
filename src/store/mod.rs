//! Marker persistence
//!
//! [`MarkerStore`] is the seam between the map view and wherever markers live.
//! [`RestStore`] talks to the `user-locs` REST collection; [`MemoryStore`]
//! keeps everything in process.

pub mod client;
pub mod memory;
pub mod wire;

pub use client::RestStore;
pub use memory::MemoryStore;

use std::future::Future;

use tracing::error;

use crate::error::Result;
use crate::types::{MarkerId, MarkerRecord, Position};

/// List/create/update access to the marker collection
pub trait MarkerStore: Send + Sync {
    /// Reads the full collection
    fn fetch_markers(&self) -> impl Future<Output = Result<Vec<MarkerRecord>>> + Send;

    /// Creates a record holding `label` as its only disease
    fn create_marker(
        &self,
        position: Position,
        label: &str,
    ) -> impl Future<Output = Result<MarkerRecord>> + Send;

    /// Replaces the disease list of record `id`
    fn update_marker(
        &self,
        id: MarkerId,
        diseases: &[String],
    ) -> impl Future<Output = Result<()>> + Send;

    /// Reads the full collection, logging failures and answering an empty list
    fn list_markers(&self) -> impl Future<Output = Vec<MarkerRecord>> + Send {
        async move {
            match self.fetch_markers().await {
                Ok(markers) => markers,
                Err(e) => {
                    error!("error fetching markers: {}", e);
                    Vec::new()
                }
            }
        }
    }
}
