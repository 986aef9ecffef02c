//! Router-level tests for the song picker.
//!
//! Each test builds the full router (middleware, templates, static files) around
//! a fake backing store and drives it with `tower::ServiceExt::oneshot`.
//!
//! Run with: cargo test --test api_tests
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::Router;
use http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use songpicker::config::AppConfig;
use songpicker::routes::create_router;
use songpicker::state::AppState;
use songpicker::templates::init_templates;
use songpicker::{BackingStore, LibsqlStore, SongCatalog, SongPicker, SongRecord, StoreError};

const TEST_CONFIG: &str = r#"
[http]
host = "127.0.0.1"
port = 0

[auth]
identity = "test-identity"
"#;

#[derive(Default)]
struct CountingStore {
    pings: AtomicUsize,
}

#[async_trait]
impl BackingStore for CountingStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.pings.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct UnreachableStore;

#[async_trait]
impl BackingStore for UnreachableStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Timeout(Duration::from_millis(10)))
    }
}

fn app_with(catalog: SongCatalog, store: Arc<dyn BackingStore>) -> Router {
    let config = AppConfig::from_toml(TEST_CONFIG).expect("test config parses");
    let tera = init_templates(&config.ui).expect("templates load");
    let picker = SongPicker::new(catalog, store);
    create_router(AppState::new(config, tera, picker))
}

fn two_song_catalog() -> SongCatalog {
    SongCatalog::new(vec![
        SongRecord::new(1, "Teenage Dirtbag", "Wheatus"),
        SongRecord::new(2, "Smells Like Teen Spirit", "Nirvana"),
    ])
    .unwrap()
}

fn pick_request() -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/pick_random_song")
        .body(Body::empty())
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn pick_returns_a_catalog_song() {
    let app = app_with(two_song_catalog(), Arc::new(CountingStore::default()));

    for _ in 0..20 {
        let response = app.clone().oneshot(pick_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");

        let json = body_json(response).await;
        let id = json["id"].as_i64().unwrap();
        assert!(id == 1 || id == 2, "unexpected id {id}");
        assert!(json["name"].is_string());
        assert!(json["artist"].is_string());
    }
}

#[tokio::test]
async fn pick_probes_store_once_per_request() {
    let store = Arc::new(CountingStore::default());
    let app = app_with(SongCatalog::builtin(), store.clone());

    app.clone().oneshot(pick_request()).await.unwrap();
    app.oneshot(pick_request()).await.unwrap();

    assert_eq!(store.pings.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn pick_with_unreachable_store_is_503() {
    let app = app_with(SongCatalog::builtin(), Arc::new(UnreachableStore));

    let response = app.oneshot(pick_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = body_json(response).await;
    assert_eq!(json["error"], "backing_store_unavailable");
    assert!(json.get("id").is_none());
    assert!(json["request_id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn pick_with_empty_catalog_is_500() {
    let store = Arc::new(CountingStore::default());
    let app = app_with(SongCatalog::new(Vec::new()).unwrap(), store.clone());

    let response = app.oneshot(pick_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["error"], "empty_catalog");
    assert_eq!(store.pings.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn pick_with_malformed_database_url_is_503() {
    let config = AppConfig::from_toml(
        r#"
        [http]
        host = "127.0.0.1"
        port = 0

        [database]
        url = "libsql://remote.example"
        "#,
    )
    .unwrap();
    let store = Arc::new(LibsqlStore::new(&config.database));
    let app = app_with(SongCatalog::builtin(), store);

    let response = app.oneshot(pick_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn pick_with_in_memory_libsql_store() {
    let config = AppConfig::from_toml(
        r#"
        [http]
        host = "127.0.0.1"
        port = 0

        [database]
        url = ":memory:"
        "#,
    )
    .unwrap();
    let store = Arc::new(LibsqlStore::new(&config.database));
    let catalog = SongCatalog::builtin();
    let app = app_with(catalog.clone(), store);

    let response = app.oneshot(pick_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(catalog.contains_id(json["id"].as_i64().unwrap()));
}

#[tokio::test]
async fn pick_rejects_get() {
    let app = app_with(SongCatalog::builtin(), Arc::new(CountingStore::default()));

    let response = app.oneshot(get("/api/pick_random_song")).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn song_listing_is_ordered_and_stable() {
    let app = app_with(SongCatalog::builtin(), Arc::new(CountingStore::default()));

    let first = body_json(app.clone().oneshot(get("/api/songs")).await.unwrap()).await;
    let second = body_json(app.oneshot(get("/api/songs")).await.unwrap()).await;

    assert_eq!(first, second);
    let ids: Vec<i64> = first
        .as_array()
        .unwrap()
        .iter()
        .map(|song| song["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);
}

#[tokio::test]
async fn home_page_renders_button_and_identity() {
    let app = app_with(SongCatalog::builtin(), Arc::new(UnreachableStore));

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CACHE_CONTROL]
        .to_str()
        .unwrap()
        .starts_with("public"));

    let html = body_text(response).await;
    assert!(html.contains("id=\"pick-button\""));
    assert!(html.contains("/api/pick_random_song"));
    assert!(html.contains("test-identity"));
}

#[tokio::test]
async fn health_is_ok_even_when_store_is_down() {
    let app = app_with(SongCatalog::builtin(), Arc::new(UnreachableStore));

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn store_health_reflects_probe() {
    let healthy = app_with(SongCatalog::builtin(), Arc::new(CountingStore::default()));
    let response = healthy.oneshot(get("/health/store")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let down = app_with(SongCatalog::builtin(), Arc::new(UnreachableStore));
    let response = down.oneshot(get("/health/store")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn static_assets_are_served_with_long_cache() {
    let app = app_with(SongCatalog::builtin(), Arc::new(CountingStore::default()));

    let response = app.oneshot(get("/static/js/app.js")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CACHE_CONTROL]
        .to_str()
        .unwrap()
        .contains("immutable"));
}
