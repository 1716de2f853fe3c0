//! Cheatsheet pages rendered from GitHub issue threads.

mod anchor;
mod assets;
pub mod cache;
pub mod components;
mod config;
mod github;
mod highlight;
mod issue;
mod markdown;
pub mod pages;
pub mod server;
pub mod sheet;
mod time;

pub use anchor::{ShareOrigin, anchor_id};
pub use assets::{SHEET_SCRIPT, STYLESHEET_PATH, stylesheet};
pub use cache::{CacheKey, Cached, Freshness, SheetCache, WriteClaim};
pub use config::{Command, Config};
pub use github::{FetchError, GithubClient, GithubSettings, IssueSource};
pub use highlight::{Capability, Highlighter, escape_html};
pub use issue::{CollectionId, IssueRecord, IssueState};
pub use markdown::MarkdownRenderer;
pub use server::{AppState, router, run_http_server};
pub use sheet::{SheetService, active_issue, scroll_target};
pub use time::{format_date, format_relative};
