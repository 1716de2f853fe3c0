use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::anchor::ShareOrigin;
use crate::assets::{STYLESHEET_PATH, stylesheet};
use crate::components::layout::Styles;
use crate::github::IssueSource;
use crate::issue::CollectionId;
use crate::markdown::MarkdownRenderer;
use crate::pages::sheet::{self, SheetPage};
use crate::sheet::SheetService;

/// Shared state of the HTTP handlers.
pub struct AppState<S> {
    pub sheets: SheetService<S>,
    pub renderer: Arc<MarkdownRenderer>,
    pub origin: ShareOrigin,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            sheets: self.sheets.clone(),
            renderer: Arc::clone(&self.renderer),
            origin: self.origin.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SheetQuery {
    #[serde(rename = "_id")]
    active: Option<String>,
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
}

/// Builds the application router.
pub fn router<S: IssueSource>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route(STYLESHEET_PATH, get(handle_stylesheet))
        .route("/sheet/:collection", get(handle_sheet::<S>))
        .with_state(state)
}

pub async fn run_http_server<S: IssueSource>(state: AppState<S>, bind: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind HTTP server to `{bind}`"))?;
    let local_addr = listener.local_addr().ok();

    info!(
        requested_bind = %bind,
        bound_addr = local_addr.map(|addr| addr.to_string()),
        origin = %state.origin.as_str(),
        "starting HTTP server"
    );

    axum::serve(listener, router(state))
        .await
        .context("HTTP server exited with an error")
}

async fn handle_health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn handle_stylesheet() -> Response {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        stylesheet(),
    )
        .into_response()
}

async fn handle_sheet<S: IssueSource>(
    State(state): State<AppState<S>>,
    Path(raw_collection): Path<String>,
    Query(query): Query<SheetQuery>,
) -> Response {
    let collection = match CollectionId::parse(&raw_collection) {
        Ok(collection) => collection,
        Err(error) => {
            debug!(collection = %raw_collection, error = %error, "rejected collection id");
            return (StatusCode::BAD_REQUEST, error.to_string()).into_response();
        }
    };

    let issues = state.sheets.issues(&collection).await;
    let page = SheetPage {
        collection: &collection,
        issues: &issues,
        active: query.active.as_deref(),
        origin: &state.origin,
        styles: Styles::Link(STYLESHEET_PATH),
        now: Utc::now(),
    };

    Html(sheet::generate(&page, &state.renderer).into_string()).into_response()
}
