//! Issue fetching from the GitHub REST API.
//!
//! [`IssueSource`] is the seam the page controller depends on;
//! [`GithubClient`] is the production implementation. A collection maps to
//! the issues of one repository carrying the collection name as a label.

use anyhow::Context;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

use crate::issue::{CollectionId, IssueRecord};

/// GitHub caps `per_page` at 100.
const PAGE_SIZE: usize = 100;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Failure of one `fetch_issues` call.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("upstream returned HTTP {status}: {body}")]
    Upstream { status: StatusCode, body: String },

    #[error("invalid upstream response: {0}")]
    Decode(String),
}

/// Source of issue records for a collection.
pub trait IssueSource: Send + Sync + 'static {
    /// Fetches the ordered issue list of a collection.
    fn fetch_issues(
        &self,
        collection: &CollectionId,
    ) -> impl Future<Output = Result<Vec<IssueRecord>, FetchError>> + Send;
}

/// Settings for [`GithubClient`].
#[derive(Debug, Clone)]
pub struct GithubSettings {
    pub api_base: Url,
    pub owner: String,
    pub repo: String,
    pub token: Option<String>,
    pub timeout: Duration,
    pub max_pages: usize,
}

/// Wire shape of one item of the issues listing.
///
/// The listing also returns pull requests; those carry a `pull_request`
/// object and are dropped.
#[derive(Debug, Deserialize)]
struct ListedIssue {
    #[serde(default)]
    pull_request: Option<serde_json::Value>,
    #[serde(flatten)]
    issue: IssueRecord,
}

/// Issue client for the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    settings: GithubSettings,
}

impl GithubClient {
    /// Builds client with default headers and request timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the TLS
    /// backend cannot be initialised.
    pub fn new(settings: GithubSettings) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("cheatsheets/", env!("CARGO_PKG_VERSION"))),
        );
        if let Some(token) = &settings.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .context("GitHub token is not a valid header value")?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, settings })
    }

    /// URL of one page of a collection's issue listing.
    fn page_url(&self, collection: &CollectionId, page: usize) -> Result<Url, FetchError> {
        let mut url = self.settings.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Decode("API base cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend([
                "repos",
                self.settings.owner.as_str(),
                self.settings.repo.as_str(),
                "issues",
            ]);
        url.query_pairs_mut()
            .append_pair("labels", collection.as_str())
            .append_pair("state", "all")
            .append_pair("per_page", &PAGE_SIZE.to_string())
            .append_pair("page", &page.to_string());
        Ok(url)
    }

    async fn fetch_page(&self, url: Url) -> Result<Vec<ListedIssue>, FetchError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read error response body>".to_owned());
            return Err(FetchError::Upstream { status, body });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

impl IssueSource for GithubClient {
    async fn fetch_issues(
        &self,
        collection: &CollectionId,
    ) -> Result<Vec<IssueRecord>, FetchError> {
        let mut issues = Vec::new();

        for page in 1..=self.settings.max_pages {
            let url = self.page_url(collection, page)?;
            let listed = self.fetch_page(url).await?;
            let count = listed.len();

            issues.extend(
                listed
                    .into_iter()
                    .filter(|item| item.pull_request.is_none())
                    .map(|item| item.issue),
            );

            debug!(collection = %collection, page, count, "fetched issue page");
            if count < PAGE_SIZE {
                break;
            }
        }

        Ok(issues)
    }
}
