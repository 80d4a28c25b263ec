use std::sync::Arc;

use axum::{
    extract::{Form, Query, State},
    http::{HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use tokio::sync::Mutex;
use tracing::{error, warn};

use super::models::*;
use super::session::Sessions;
use crate::geolocation::{FixedLocation, LocationService, UnavailableLocation};
use crate::html::Pages;
use crate::reconcile;
use crate::shell::Route;
use crate::store::MarkerStore;
use crate::types::Position;
use crate::view::{MapView, Submission, SubmissionStatus};

/// State shared by every handler
pub struct AppState<S> {
    pub store: S,
    pub sessions: Sessions,
    pub pages: Pages,
}

impl<S: MarkerStore> AppState<S> {
    pub fn new(store: S, pages: Pages) -> Arc<Self> {
        Arc::new(Self {
            store,
            sessions: Sessions::new(),
            pages,
        })
    }
}

pub type SharedState<S> = Arc<AppState<S>>;

fn page(rendered: crate::Result<String>) -> Response {
    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("page render error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("error rendering page: {}", e)).into_response()
        }
    }
}

/// `/map` link that mounts the view at `position`
pub fn map_location(position: Option<Position>) -> String {
    match position {
        Some(p) => format!("{}?lat={}&lon={}", Route::Map.path(), p.latitude, p.longitude),
        None => Route::Map.path().to_string(),
    }
}

/// Starts a submission of `label`, releases the view during the store call,
/// then applies the outcome
async fn run_submission<S: MarkerStore>(
    store: &S,
    view: &Mutex<MapView>,
    label: String,
) -> Option<Submission> {
    let (id, intent) = {
        let mut view = view.lock().await;
        view.set_label(label);
        view.begin_submission()?
    };

    let outcome = reconcile::execute(store, &intent).await;

    let mut view = view.lock().await;
    view.complete_submission(id, outcome);
    view.submission(id).cloned()
}

pub async fn landing<S: MarkerStore>(State(state): State<SharedState<S>>) -> Response {
    page(state.pages.landing())
}

/// Mounts the browser's map view
///
/// The browser reports its fix (or its failure) through the query string.
/// Without either, the placeholder page asks the browser for one. Coordinates
/// that are not finite count as no fix.
pub async fn map_page<S: MarkerStore>(
    State(state): State<SharedState<S>>,
    headers: HeaderMap,
    Query(query): Query<MapQuery>,
) -> Response {
    let session = state.sessions.resolve(&headers);
    let lat = query.lat.filter(|v| v.is_finite());
    let lon = query.lon.filter(|v| v.is_finite());

    let response = match (lat, lon, query.error) {
        (Some(lat), Some(lon), _) => {
            let fix = FixedLocation::new(lat, lon);
            let (markers, position) =
                tokio::join!(state.store.list_markers(), fix.current_position());

            let mut view = session.view.lock().await;
            view.apply_markers(markers);
            view.apply_position(position);
            page(state.pages.map(&view, false))
        }
        (_, _, Some(reason)) => {
            let denied = UnavailableLocation::new(reason);
            let (markers, position) =
                tokio::join!(state.store.list_markers(), denied.current_position());

            let mut view = session.view.lock().await;
            view.reset_position();
            view.apply_markers(markers);
            view.apply_position(position);
            page(state.pages.map(&view, false))
        }
        _ => {
            let markers = state.store.list_markers().await;

            let mut view = session.view.lock().await;
            view.reset_position();
            view.apply_markers(markers);
            page(state.pages.map(&view, true))
        }
    };
    session.attach(response)
}

/// Handles the "Add Marker" form and sends the browser back to its map
pub async fn submit_form<S: MarkerStore>(
    State(state): State<SharedState<S>>,
    headers: HeaderMap,
    Form(form): Form<LabelForm>,
) -> Response {
    let session = state.sessions.resolve(&headers);
    run_submission(&state.store, &session.view, form.label).await;
    let position = session.view.lock().await.position();
    session.attach(Redirect::to(&map_location(position)))
}

pub async fn list_markers<S: MarkerStore>(
    State(state): State<SharedState<S>>,
    headers: HeaderMap,
) -> Response {
    let session = state.sessions.resolve(&headers);
    let markers = session.view.lock().await.markers().to_vec();
    session.attach(Json(markers))
}

pub async fn list_submissions<S: MarkerStore>(
    State(state): State<SharedState<S>>,
    headers: HeaderMap,
) -> Response {
    let session = state.sessions.resolve(&headers);
    let submissions = session.view.lock().await.submissions().to_vec();
    session.attach(Json(submissions))
}

pub async fn create_submission<S: MarkerStore>(
    State(state): State<SharedState<S>>,
    headers: HeaderMap,
    Json(req): Json<SubmissionRequest>,
) -> Response {
    let session = state.sessions.resolve(&headers);
    let result = submit_label(&state.store, &session.view, req.label).await;
    session.attach(result)
}

async fn submit_label<S: MarkerStore>(
    store: &S,
    view: &Mutex<MapView>,
    label: String,
) -> Result<(StatusCode, Json<Submission>), (StatusCode, Json<ErrorResponse>)> {
    let ready = view.lock().await.is_ready();
    if !ready {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: "No live location yet".to_string(),
            }),
        ));
    }

    let submission = run_submission(store, view, label).await.ok_or_else(|| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: "Label is empty".to_string(),
            }),
        )
    })?;

    let status = match submission.status {
        SubmissionStatus::Failed(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::CREATED,
    };
    Ok((status, Json(submission)))
}

pub async fn not_found<S: MarkerStore>(State(state): State<SharedState<S>>, uri: Uri) -> Response {
    let path = uri.path();
    if let Some(route) = Route::from_path(path) {
        return Redirect::permanent(route.path()).into_response();
    }
    warn!("no page at {}", path);
    match state.pages.not_found(path) {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => page(Err(e)),
    }
}
