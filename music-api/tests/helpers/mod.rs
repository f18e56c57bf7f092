//! Test helpers shared by the HTTP integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use music_api::{build_router, AppState};
use music_common::persist::{self, Conn, ExecResult, PoolLimits, Querier, Rows, Tx, Value};
use serde_json::Value as Json;
use sqlx::sqlite::SqliteRow;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

/// App over a fresh on-disk database
///
/// Returns (TempDir, Router) - TempDir must be kept alive for duration of test
pub async fn setup_app() -> (TempDir, Router) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let url = format!("sqlite://{}?mode=rwc", temp_dir.path().join("music.db").display());
    let pool = persist::connect(&url, PoolLimits::default())
        .await
        .expect("Failed to open test database");
    persist::ensure_schema(&pool).await.expect("Schema creation failed");

    let state = AppState::new(Arc::new(Conn::new(pool)));
    (temp_dir, build_router(state))
}

/// App whose database always fails
pub fn setup_broken_app() -> Router {
    build_router(AppState::new(Arc::new(BrokenQuerier)))
}

/// Send a request and return the status and the parsed JSON body
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Json) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    let json = if bytes.is_empty() {
        Json::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Json::String(String::from_utf8_lossy(&bytes).to_string()))
    };
    (status, json)
}

pub struct BrokenQuerier;

#[async_trait]
impl Querier for BrokenQuerier {
    async fn query(&self, _sql: &str, _params: &[Value]) -> Result<Rows, sqlx::Error> {
        Err(sqlx::Error::PoolClosed)
    }

    async fn query_row(&self, _sql: &str, _params: &[Value]) -> Result<Option<SqliteRow>, sqlx::Error> {
        Err(sqlx::Error::PoolClosed)
    }

    async fn exec(&self, _sql: &str, _params: &[Value]) -> Result<ExecResult, sqlx::Error> {
        Err(sqlx::Error::PoolClosed)
    }

    async fn begin(&self) -> Result<Tx, sqlx::Error> {
        Err(sqlx::Error::PoolClosed)
    }

    async fn row_exists(&self, _table: &str, _condition: &str, _params: &[Value]) -> bool {
        true
    }
}
