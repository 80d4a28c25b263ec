//! reqwest client for the `user-locs` REST collection

use serde::de::Error as _;
use tracing::{debug, info};

use super::wire::{Collection, DiseasesPatch, Envelope, NewMarker, PositionalDiseases, RemoteItem};
use super::MarkerStore;
use crate::error::{Error, Result};
use crate::types::{MarkerId, MarkerRecord, Position};

/// Origin of the development backend
pub const DEFAULT_STORE_URL: &str = "http://localhost:1337";

const COLLECTION_PATH: &str = "/api/user-locs";

/// Marker store backed by the remote REST collection
///
/// No retries, no timeouts, no idempotency keys: a duplicate submit during a
/// slow request produces a duplicate remote record.
#[derive(Debug, Clone)]
pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
}

impl RestStore {
    /// Creates a store client for the backend at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Creates a store client reusing an existing HTTP client
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}{}", self.base_url, COLLECTION_PATH)
    }

    fn item_url(&self, id: MarkerId) -> String {
        format!("{}{}/{}", self.base_url, COLLECTION_PATH, id)
    }
}

impl Default for RestStore {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_URL)
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(Error::Status {
            status: status.as_u16(),
            url: response.url().to_string(),
        })
    }
}

impl MarkerStore for RestStore {
    async fn fetch_markers(&self) -> Result<Vec<MarkerRecord>> {
        let response = self
            .client
            .get(self.collection_url())
            .query(&[("populate", "*")])
            .send()
            .await?;
        let bytes = check_status(response)?.bytes().await?;
        let collection: Collection = serde_json::from_slice(&bytes)?;

        let markers: Vec<MarkerRecord> = collection
            .data
            .unwrap_or_default()
            .into_iter()
            .filter_map(RemoteItem::into_record)
            .collect();
        debug!("fetched {} markers", markers.len());
        Ok(markers)
    }

    async fn create_marker(&self, position: Position, label: &str) -> Result<MarkerRecord> {
        let labels = [label.to_string()];
        let body = Envelope {
            data: NewMarker {
                latitude: position.latitude,
                longitude: position.longitude,
                diseases: PositionalDiseases(&labels),
            },
        };

        let response = self.client.post(self.collection_url()).json(&body).send().await?;
        let bytes = check_status(response)?.bytes().await?;
        let created: Envelope<RemoteItem> = serde_json::from_slice(&bytes)?;

        let id = created.data.id;
        let record = created.data.into_record().ok_or_else(|| {
            Error::Json(serde_json::Error::custom(format!(
                "created user-loc {} has no coordinates",
                id
            )))
        })?;
        info!("created marker {} at {:?}", record.id, record.position);
        Ok(record)
    }

    async fn update_marker(&self, id: MarkerId, diseases: &[String]) -> Result<()> {
        let body = Envelope {
            data: DiseasesPatch {
                diseases: PositionalDiseases(diseases),
            },
        };

        let response = self.client.put(self.item_url(id)).json(&body).send().await?;
        check_status(response)?;
        info!("updated marker {} with {} diseases", id, diseases.len());
        Ok(())
    }
}
