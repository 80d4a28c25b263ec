//! disease-map - live-location disease markers on a tile map
//!
//! disease-map shows a map centered on the user's position and lets them pin
//! disease labels there. Markers live in a remote `user-locs` REST collection;
//! the map view keeps a cached copy and reconciles it after every change.
//!
//! # Examples
//!
//! ## Submitting a label
//!
//! ```no_run
//! use disease_map::{FixedLocation, MapView, RestStore};
//!
//! # async fn demo() {
//! let store = RestStore::default();
//! let mut view = MapView::new();
//! view.mount(&store, &FixedLocation::new(12.97, 77.59)).await;
//!
//! view.set_label("dengue");
//! view.submit(&store).await;
//!
//! for marker in view.markers() {
//!     println!("{}: {}", marker.id, marker.popup_label());
//! }
//! # }
//! ```
//!
//! ## Serving the pages
//!
//! ```no_run
//! use disease_map::{api, Config, Pages, RestStore};
//!
//! # async fn serve() -> disease_map::Result<()> {
//! let config = Config::load()?;
//! let state = api::AppState::new(RestStore::new(&config.store_url), Pages::new(config.zoom)?);
//! let app = api::create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod geolocation;
pub mod html;
pub mod reconcile;
pub mod shell;
pub mod store;
pub mod types;
pub mod view;

pub use config::Config;
pub use error::{Error, Result};
pub use geolocation::{FixedLocation, LocationService, UnavailableLocation};
pub use html::Pages;
pub use shell::Route;
pub use store::{MarkerStore, MemoryStore, RestStore};
pub use types::{MarkerId, MarkerRecord, Position};
pub use view::{MapView, Submission, SubmissionStatus};
