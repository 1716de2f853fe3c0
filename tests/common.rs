//! Shared test utilities for integration tests.
//!
//! Provides an in-process mock of the GitHub issues endpoint and helpers for
//! starting the cheatsheet server against it.

#![allow(dead_code)]

use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use cheatsheets::{
    AppState, GithubClient, GithubSettings, MarkdownRenderer, SheetCache, SheetService,
    ShareOrigin, router,
};
use reqwest::Url;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::net::TcpListener;

pub const ORIGIN: &str = "https://cheatsheets.example.com";

/// Canned issue listings keyed by label, one inner vector per page.
#[derive(Default)]
pub struct MockGithub {
    pub pages: HashMap<String, Vec<Vec<Value>>>,
    /// Status returned for every request when set
    pub failure: Option<StatusCode>,
    pub hits: AtomicUsize,
}

impl MockGithub {
    pub fn with_label(label: &str, issues: Vec<Value>) -> Self {
        let mut mock = Self::default();
        mock.pages.insert(label.to_string(), vec![issues]);
        mock
    }

    pub fn failing(status: StatusCode) -> Self {
        Self {
            failure: Some(status),
            ..Self::default()
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Builds one issue as the GitHub API returns it.
pub fn issue_json(id: u64, title: &str, body: Option<&str>, state: &str) -> Value {
    json!({
        "id": id,
        "number": id,
        "title": title,
        "body": body,
        "state": state,
        "html_url": format!("https://github.com/octo/sheets/issues/{}", id),
        "created_at": "2020-01-02T03:04:05Z",
        "updated_at": "2020-02-03T04:05:06Z",
        "labels": [],
    })
}

async fn list_issues(
    State(mock): State<Arc<MockGithub>>,
    Path((_owner, _repo)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    mock.hits.fetch_add(1, Ordering::SeqCst);
    if let Some(status) = mock.failure {
        return (status, Json(json!({ "message": "mock failure" }))).into_response();
    }

    let label = params.get("labels").cloned().unwrap_or_default();
    let page: usize = params
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);
    let issues = mock
        .pages
        .get(&label)
        .and_then(|pages| pages.get(page.saturating_sub(1)))
        .cloned()
        .unwrap_or_default();

    Json(Value::Array(issues)).into_response()
}

async fn serve(app: Router) -> Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(addr)
}

/// Starts the mock GitHub API and returns its base URL.
pub async fn spawn_github(mock: Arc<MockGithub>) -> Result<Url> {
    let app = Router::new()
        .route("/repos/:owner/:repo/issues", get(list_issues))
        .with_state(mock);
    let addr = serve(app).await?;
    Ok(Url::parse(&format!("http://{}/", addr))?)
}

/// Builds a GitHub client pointed at a base URL.
pub fn github_client(api_base: Url) -> Result<GithubClient> {
    GithubClient::new(GithubSettings {
        api_base,
        owner: "octo".to_string(),
        repo: "sheets".to_string(),
        token: None,
        timeout: Duration::from_secs(5),
        max_pages: 5,
    })
}

/// Starts the cheatsheet server backed by the mock and returns its base URL.
pub async fn spawn_app(mock: Arc<MockGithub>) -> Result<String> {
    let api_base = spawn_github(mock).await?;
    let sheets = SheetService::new(
        github_client(api_base)?,
        SheetCache::new("test", Duration::from_secs(60)),
    );
    let state = AppState {
        sheets,
        renderer: Arc::new(MarkdownRenderer::new()),
        origin: ShareOrigin::parse(ORIGIN)?,
    };
    let addr = serve(router(state)).await?;
    Ok(format!("http://{}", addr))
}
