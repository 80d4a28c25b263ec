use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::info;

use super::handlers::*;
use crate::html::SUBMIT_PATH;
use crate::shell::Route;
use crate::store::MarkerStore;

async fn log_request_response(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let method = req.method().to_string();
    info!("incoming request: {} {}", method, path);
    let response = next.run(req).await;
    info!("request result: {} for {} {}", response.status(), method, path);
    response
}

pub fn create_router<S: MarkerStore + 'static>(state: SharedState<S>) -> Router {
    Router::new()
        .route(Route::Landing.path(), get(landing::<S>))
        .route(Route::Map.path(), get(map_page::<S>))
        .route(SUBMIT_PATH, post(submit_form::<S>))
        .route("/api/markers", get(list_markers::<S>))
        .route(
            "/api/submissions",
            get(list_submissions::<S>).post(create_submission::<S>),
        )
        .fallback(not_found::<S>)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(log_request_response))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::session::{SharedView, SESSION_COOKIE};
    use crate::html::Pages;
    use crate::store::MemoryStore;
    use crate::types::{MarkerRecord, Position};
    use axum::{
        body::{to_bytes, Body},
        http::{header, HeaderValue, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(store: MemoryStore) -> (Router, SharedState<MemoryStore>) {
        let state = AppState::new(store, Pages::new(13).unwrap());
        (create_router(state.clone()), state)
    }

    /// A client that keeps the session cookie it is handed
    struct Browser {
        router: Router,
        cookie: Option<String>,
    }

    impl Browser {
        fn new(router: &Router) -> Self {
            Self {
                router: router.clone(),
                cookie: None,
            }
        }

        async fn send(&mut self, mut req: Request<Body>) -> Response {
            if let Some(cookie) = &self.cookie {
                req.headers_mut()
                    .insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
            }
            let response = self.router.clone().oneshot(req).await.unwrap();
            if let Some(set) = response.headers().get(header::SET_COOKIE) {
                let pair = set.to_str().unwrap().split(';').next().unwrap();
                self.cookie = Some(pair.to_string());
            }
            response
        }

        fn view(&self, state: &SharedState<MemoryStore>) -> SharedView {
            let cookie = self.cookie.as_deref().unwrap();
            let (name, id) = cookie.split_once('=').unwrap();
            assert_eq!(name, SESSION_COOKIE);
            state.sessions.get(&id.parse().unwrap()).unwrap()
        }
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn form_req(label: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(SUBMIT_PATH)
            .header(header::CONTENT_TYPE, mime::APPLICATION_WWW_FORM_URLENCODED.as_ref())
            .body(Body::from(format!("label={}", label)))
            .unwrap()
    }

    fn json_req(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_landing() {
        let (router, state) = app(MemoryStore::new());
        let response = router.oneshot(get_req("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert!(body_text(response).await.contains("Open the map"));
        assert!(state.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_map_without_fix_shows_placeholder() {
        let (router, _) = app(MemoryStore::new());
        let response = router.oneshot(get_req("/map")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response.headers().get(header::SET_COOKIE).unwrap();
        assert!(cookie.to_str().unwrap().starts_with(SESSION_COOKIE));
        let html = body_text(response).await;
        assert!(html.contains("Fetching live location..."));
        assert!(html.contains("getCurrentPosition"));
    }

    #[tokio::test]
    async fn test_map_with_denied_fix_waits() {
        let (router, state) = app(MemoryStore::new());
        let mut browser = Browser::new(&router);
        let response = browser
            .send(get_req("/map?error=User%20denied%20Geolocation"))
            .await;
        let html = body_text(response).await;
        assert!(html.contains("Fetching live location..."));
        assert!(!html.contains("getCurrentPosition"));
        assert!(browser.view(&state).lock().await.position().is_none());
    }

    #[tokio::test]
    async fn test_map_with_non_finite_fix_is_no_fix() {
        let (router, state) = app(MemoryStore::new());
        let mut browser = Browser::new(&router);

        for uri in ["/map?lat=NaN&lon=2.5", "/map?lat=1.5&lon=inf", "/map?lat=-inf&lon=NaN"] {
            let response = browser.send(get_req(uri)).await;
            assert_eq!(response.status(), StatusCode::OK);
            let html = body_text(response).await;
            assert!(html.contains("Fetching live location..."));
            assert!(!html.contains("NaN"));
            assert!(browser.view(&state).lock().await.position().is_none());
        }

        let store = state.store.clone();
        browser.send(form_req("dengue")).await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_map_mount_loads_markers() {
        let store = MemoryStore::with_records(vec![MarkerRecord::new(
            1,
            Position::new(12.5, 77.5),
            vec!["flu".into(), "cold".into()],
        )]);
        let (router, state) = app(store);
        let mut browser = Browser::new(&router);

        let response = browser.send(get_req("/map?lat=12.5&lon=77.5")).await;

        let html = body_text(response).await;
        assert!(html.contains(r#""popup":"flu, cold""#));
        let view = browser.view(&state);
        let view = view.lock().await;
        assert_eq!(view.position(), Some(Position::new(12.5, 77.5)));
        assert_eq!(view.markers().len(), 1);
    }

    #[tokio::test]
    async fn test_form_submit_creates_then_appends() {
        let store = MemoryStore::new();
        let (router, state) = app(store.clone());
        let mut browser = Browser::new(&router);
        browser.send(get_req("/map?lat=1.5&lon=2.5")).await;

        let response = browser.send(form_req("dengue")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/map?lat=1.5&lon=2.5"
        );
        assert_eq!(browser.view(&state).lock().await.label(), "");

        browser.send(form_req("malaria")).await;

        assert_eq!(store.len(), 1);
        let view = browser.view(&state);
        let view = view.lock().await;
        assert_eq!(view.markers()[0].diseases, vec!["dengue", "malaria"]);
        assert_eq!(view.label(), "malaria");
    }

    #[tokio::test]
    async fn test_form_submit_without_fix_is_ignored() {
        let store = MemoryStore::new();
        let (router, _) = app(store.clone());

        let response = router.oneshot(form_req("dengue")).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/map");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_two_browsers_keep_their_own_position() {
        let store = MemoryStore::new();
        let (router, state) = app(store.clone());
        let mut a = Browser::new(&router);
        let mut b = Browser::new(&router);

        a.send(get_req("/map?lat=12.97&lon=77.59")).await;
        b.send(get_req("/map?lat=48.85&lon=2.35")).await;
        assert_ne!(a.cookie, b.cookie);

        let response = a.send(form_req("dengue")).await;
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/map?lat=12.97&lon=77.59"
        );
        assert_eq!(store.len(), 1);
        let created = store.get(1).unwrap();
        assert_eq!(created.position, Position::new(12.97, 77.59));
        assert_eq!(created.diseases, vec!["dengue"]);

        let view = b.view(&state);
        let view = view.lock().await;
        assert_eq!(view.position(), Some(Position::new(48.85, 2.35)));
        assert!(view.submissions().is_empty());
        assert_eq!(state.sessions.len(), 2);
    }

    #[tokio::test]
    async fn test_plain_map_visit_does_not_reset_other_browser() {
        let store = MemoryStore::new();
        let (router, _) = app(store.clone());
        let mut a = Browser::new(&router);
        let mut c = Browser::new(&router);

        a.send(get_req("/map?lat=12.97&lon=77.59")).await;
        a.send(form_req("dengue")).await;

        let response = c.send(get_req("/map")).await;
        assert!(body_text(response).await.contains("Fetching live location..."));

        let response = a.send(form_req("malaria")).await;
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/map?lat=12.97&lon=77.59"
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(1).unwrap().diseases, vec!["dengue", "malaria"]);
    }

    #[tokio::test]
    async fn test_api_submission_statuses() {
        let store = MemoryStore::new();
        let (router, _) = app(store.clone());
        let mut browser = Browser::new(&router);

        let response = browser
            .send(json_req("/api/submissions", json!({ "label": "flu" })))
            .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        browser.send(get_req("/map?lat=3&lon=4")).await;
        let response = browser
            .send(json_req("/api/submissions", json!({ "label": "flu" })))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"]["state"], "succeeded");
        assert_eq!(body["intent"]["kind"], "create");

        store.set_offline(true);
        let response = browser
            .send(json_req("/api/submissions", json!({ "label": "cold" })))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = browser.send(get_req("/api/submissions")).await;
        let history: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(history.as_array().unwrap().len(), 2);
        assert_eq!(history[1]["status"]["state"], "failed");

        let response = router.oneshot(get_req("/api/submissions")).await.unwrap();
        let fresh: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(fresh, json!([]));
    }

    #[tokio::test]
    async fn test_api_markers() {
        let store = MemoryStore::with_records(vec![MarkerRecord::new(
            8,
            Position::new(1.0, 1.0),
            vec!["flu".into()],
        )]);
        let (router, _) = app(store);
        let mut browser = Browser::new(&router);
        browser.send(get_req("/map?lat=1&lon=1")).await;

        let response = browser.send(get_req("/api/markers")).await;

        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body[0]["id"], 8);
        assert_eq!(body[0]["diseases"], json!(["flu"]));
    }

    #[tokio::test]
    async fn test_unknown_path_and_trailing_slash() {
        let (router, _) = app(MemoryStore::new());

        let response = router.clone().oneshot(get_req("/nowhere")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = router.oneshot(get_req("/map/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/map");
    }
}
