#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use promptcraft_api::config::{HistoryConfig, ServerConfig};
use promptcraft_api::router::build_app_router;
use promptcraft_api::state::AppState;
use promptcraft_core::error::GenerationError;
use promptcraft_core::generation::GenerationClient;
use promptcraft_core::params::PromptParams;
use promptcraft_history::{HistoryController, HistoryStore, MemoryStorage};

/// Build a test `ServerConfig` with safe defaults and in-memory history.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        history: HistoryConfig::in_memory(),
    }
}

/// Generation client that replays scripted results and records the
/// parameters it was called with.
#[derive(Default)]
pub struct ScriptedGenerator {
    results: Mutex<VecDeque<Result<String, GenerationError>>>,
    pub calls: Mutex<Vec<PromptParams>>,
}

impl ScriptedGenerator {
    pub fn new(results: Vec<Result<String, GenerationError>>) -> Arc<Self> {
        Arc::new(Self {
            results: Mutex::new(results.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationClient for ScriptedGenerator {
    async fn generate(&self, params: &PromptParams) -> Result<String, GenerationError> {
        self.calls.lock().unwrap().push(params.clone());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GenerationError::EmptyResponse))
    }
}

/// Build the full application router around `generator`, with an
/// in-memory history store.
pub fn build_test_app(generator: Arc<dyn GenerationClient>) -> Router {
    let config = test_config();
    let store = HistoryStore::with_options(
        Arc::new(MemoryStorage::new()),
        "test.history",
        config.history.capacity,
    );
    let history = Arc::new(HistoryController::new(Arc::clone(&generator), store));

    let state = AppState {
        config: Arc::new(config.clone()),
        generator,
        history,
    };

    build_app_router(state, &config)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, Body::empty()).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Body::empty()).await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Body::from(json.to_string())).await
}

pub async fn post_raw(app: Router, uri: &str, body: &'static str) -> Response<Body> {
    send(app, Method::POST, uri, Body::from(body)).await
}

async fn send(app: Router, method: Method, uri: &str, body: Body) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
