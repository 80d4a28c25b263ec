//! One-shot location sources
//!
//! A [`LocationService`] answers a single "where am I" query. The map view asks
//! once per mount and never refreshes the answer. In the browser the fix comes
//! from `navigator.geolocation.getCurrentPosition`, which the placeholder page
//! reports back to the server; the server then wraps it in a [`FixedLocation`].

use std::future::Future;

use crate::error::{Error, Result};
use crate::types::Position;

/// Source of the device's current position
pub trait LocationService {
    /// Queries the current position once
    fn current_position(&self) -> impl Future<Output = Result<Position>> + Send;
}

/// A location source that always reports the same fix
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Position);

impl FixedLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self(Position::new(latitude, longitude))
    }
}

impl LocationService for FixedLocation {
    async fn current_position(&self) -> Result<Position> {
        let Position { latitude, longitude } = self.0;
        if latitude.is_finite() && longitude.is_finite() {
            Ok(self.0)
        } else {
            Err(Error::Geolocation(format!(
                "no usable fix at {}, {}",
                latitude, longitude
            )))
        }
    }
}

/// A location source that always fails, e.g. after the user denied access
#[derive(Debug, Clone)]
pub struct UnavailableLocation {
    reason: String,
}

impl UnavailableLocation {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

impl LocationService for UnavailableLocation {
    async fn current_position(&self) -> Result<Position> {
        Err(Error::Geolocation(self.reason.clone()))
    }
}
