//! Issue records and the collection they are grouped under.

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Open or closed state of an issue thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

impl IssueState {
    /// Returns the state name as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
        }
    }
}

/// Single issue thread as returned by the issue tracker.
///
/// Records are immutable once fetched. The page only ever holds a
/// read-only cached copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub id: u64,
    pub title: String,
    /// Markdown source. GitHub reports `null` for issues without a body.
    #[serde(default)]
    pub body: Option<String>,
    pub state: IssueState,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IssueRecord {
    /// Markdown body, empty when the issue has none.
    pub fn markdown(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }

    /// Returns true if the issue is still open.
    pub fn is_open(&self) -> bool {
        self.state == IssueState::Open
    }
}

/// Name of the group of issues rendered as one cheatsheet.
///
/// Used verbatim as cache key, in derived anchor ids and in share links, so
/// it must be non-empty and free of path separators and whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionId(String);

impl CollectionId {
    /// Validates and wraps a collection name taken from the route.
    ///
    /// # Errors
    ///
    /// Returns error if the name is empty or contains `/`, whitespace or
    /// control characters.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            bail!("Collection id cannot be empty");
        }
        if let Some(c) = raw
            .chars()
            .find(|c| *c == '/' || c.is_whitespace() || c.is_control())
        {
            bail!("Collection id contains invalid character {:?}: {}", c, raw);
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
pub(crate) fn sample_issue(id: u64, title: &str, body: &str) -> IssueRecord {
    use chrono::TimeZone;

    IssueRecord {
        id,
        title: title.to_string(),
        body: Some(body.to_string()),
        state: IssueState::Open,
        html_url: format!("https://github.com/owner/repo/issues/{}", id),
        created_at: Utc.with_ymd_and_hms(2020, 3, 14, 9, 30, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2020, 3, 15, 9, 30, 0).unwrap(),
    }
}
