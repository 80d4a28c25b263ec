//! Core data types for disease-map

use serde::{Deserialize, Serialize};

/// Label shown for records whose disease mapping is missing or empty
pub const NO_DISEASE: &str = "No Disease";

/// Separator used when listing a marker's diseases in its popup
pub const POPUP_SEPARATOR: &str = ", ";

/// Represents a WGS84 position in degrees
///
/// Equality is exact: two positions that differ only by floating-point
/// noise are different positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    /// Creates a position from latitude/longitude in degrees
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Returns the position as a `[lat, lon]` pair, the order Leaflet expects
    pub fn to_latlng(&self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }
}

/// Identifier assigned by the remote store
pub type MarkerId = u64;

/// A persisted disease-label annotation at a coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerRecord {
    /// Store-assigned identifier, immutable after creation
    pub id: MarkerId,
    /// Where the marker sits
    pub position: Position,
    /// Disease labels in append order, not deduplicated
    pub diseases: Vec<String>,
}

impl MarkerRecord {
    /// Creates a new marker record
    pub fn new(id: MarkerId, position: Position, diseases: Vec<String>) -> Self {
        Self { id, position, diseases }
    }

    /// Returns whether this marker sits exactly at `position`
    pub fn is_at(&self, position: &Position) -> bool {
        self.position == *position
    }

    /// Returns the text revealed when the pin is activated
    pub fn popup_label(&self) -> String {
        self.diseases.join(POPUP_SEPARATOR)
    }
}
