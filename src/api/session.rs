//! Per-browser map views
//!
//! Every browser gets its own [`MapView`], found through the
//! `disease_map_session` cookie. A request without a known cookie starts a
//! fresh view and the response hands out the new cookie.

use std::sync::Arc;

use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::view::MapView;

pub const SESSION_COOKIE: &str = "disease_map_session";

pub type SessionId = Uuid;

/// A map view owned by one browser
pub type SharedView = Arc<Mutex<MapView>>;

/// Map views keyed by session id
#[derive(Default)]
pub struct Sessions {
    views: DashMap<SessionId, SharedView>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds the view named by the request's session cookie, or starts a new one
    pub fn resolve(&self, headers: &HeaderMap) -> Session {
        if let Some(id) = session_cookie(headers) {
            if let Some(view) = self.get(&id) {
                return Session {
                    id,
                    view,
                    is_new: false,
                };
            }
            debug!("unknown session {}, starting a new one", id);
        }

        let id = Uuid::new_v4();
        let view = SharedView::default();
        self.views.insert(id, view.clone());
        debug!("started session {}", id);
        Session {
            id,
            view,
            is_new: true,
        }
    }

    pub fn get(&self, id: &SessionId) -> Option<SharedView> {
        // clone out so no shard lock is held across an await
        self.views.get(id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

/// The view serving the current request
pub struct Session {
    pub id: SessionId,
    pub view: SharedView,
    is_new: bool,
}

impl Session {
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// Adds the `Set-Cookie` header when this session was just started
    pub fn attach(&self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        if self.is_new {
            let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, self.id);
            match HeaderValue::from_str(&cookie) {
                Ok(value) => {
                    response.headers_mut().append(header::SET_COOKIE, value);
                }
                Err(e) => warn!("cannot set session cookie: {}", e),
            }
        }
        response
    }
}

fn session_cookie(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, id)| id.parse().ok())
}
