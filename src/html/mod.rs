//! Server-rendered pages.
//!
//! The templates are compiled into the binary and rendered with Tera. The map
//! itself is drawn client-side by Leaflet from a JSON config embedded in the
//! page.

pub mod templates;

use serde::Serialize;
use tera::{Context, Tera};

use crate::error::Result;
use crate::shell::Route;
use crate::types::MarkerRecord;
use crate::view::MapView;

/// Raster tile source
pub const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Attribution the tile source requires
pub const TILE_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";

/// Pin image
pub const ICON_URL: &str = "https://png.pngtree.com/png-vector/20221125/ourmid/pngtree-map-position-marker-symbol-vector-png-image_34790780.png";

/// Pin shadow image
pub const SHADOW_URL: &str = "https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.7.1/images/marker-shadow.png";

/// Where the label form posts to
pub const SUBMIT_PATH: &str = "/map/markers";

const TITLE: &str = "Disease Map";
const HEADING: &str = "Live Location Map with Disease Markers";

#[derive(Debug, Serialize)]
struct TileLayer {
    url: &'static str,
    attribution: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Icon {
    icon_url: &'static str,
    icon_size: [u32; 2],
    icon_anchor: [i32; 2],
    popup_anchor: [i32; 2],
    shadow_url: &'static str,
    shadow_size: [u32; 2],
}

impl Icon {
    fn red() -> Self {
        Self {
            icon_url: ICON_URL,
            icon_size: [25, 41],
            icon_anchor: [12, 41],
            popup_anchor: [1, -34],
            shadow_url: SHADOW_URL,
            shadow_size: [41, 41],
        }
    }
}

/// One pin as the page script consumes it
#[derive(Debug, Serialize)]
struct Pin {
    id: u64,
    position: [f64; 2],
    popup: String,
}

impl From<&MarkerRecord> for Pin {
    fn from(marker: &MarkerRecord) -> Self {
        Self {
            id: marker.id,
            position: marker.position.to_latlng(),
            popup: marker.popup_label(),
        }
    }
}

#[derive(Debug, Serialize)]
struct LeafletConfig {
    center: [f64; 2],
    zoom: u8,
    tiles: TileLayer,
    icon: Icon,
    pins: Vec<Pin>,
}

/// Renderer for every page the server answers with
pub struct Pages {
    tera: Tera,
    zoom: u8,
}

impl Pages {
    /// Compiles the bundled templates; `zoom` is the initial map zoom
    pub fn new(zoom: u8) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("landing.html", templates::LANDING_HTML),
            ("map.html", templates::MAP_HTML),
            ("not_found.html", templates::NOT_FOUND_HTML),
        ])?;
        Ok(Self { tera, zoom })
    }

    pub fn landing(&self) -> Result<String> {
        let mut context = Context::new();
        context.insert("title", TITLE);
        context.insert("map_path", Route::Map.path());
        Ok(self.tera.render("landing.html", &context)?)
    }

    /// Renders the map page for `view`
    ///
    /// Without a live position this is the loading placeholder. `locate`
    /// controls whether the placeholder asks the browser for a fix; it is off
    /// once the browser has reported a failure, so the page waits instead of
    /// asking again.
    pub fn map(&self, view: &MapView, locate: bool) -> Result<String> {
        let mut context = Context::new();
        context.insert("heading", HEADING);
        context.insert("label", view.label());
        context.insert("submit_path", SUBMIT_PATH);
        context.insert("map_path", Route::Map.path());
        context.insert("ready", &view.is_ready());
        context.insert("locate", &locate);

        if let Some(center) = view.position() {
            let config = LeafletConfig {
                center: center.to_latlng(),
                zoom: self.zoom,
                tiles: TileLayer {
                    url: TILE_URL,
                    attribution: TILE_ATTRIBUTION,
                },
                icon: Icon::red(),
                pins: view.markers().iter().map(Pin::from).collect(),
            };
            context.insert("config_json", &script_json(&config)?);
        }

        Ok(self.tera.render("map.html", &context)?)
    }

    pub fn not_found(&self, path: &str) -> Result<String> {
        let mut context = Context::new();
        context.insert("path", path);
        context.insert("home_path", Route::Landing.path());
        Ok(self.tera.render("not_found.html", &context)?)
    }
}

/// JSON that is safe to inline inside a `<script>` element
fn script_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}
