//! Anchor ids and shareable deep links.
//!
//! The anchor id is used both as the DOM id of a rendered entry and as the
//! `_id` query value of a share link. Both sides go through [`anchor_id`] so
//! a copied link always lands on the entry it was copied from.

use anyhow::{Context, Result, bail};
use reqwest::Url;

use crate::issue::{CollectionId, IssueRecord};

/// Derives the stable anchor id of an issue within a collection.
///
/// # Examples
///
/// ```no_run
/// use cheatsheets::{CollectionId, anchor_id};
///
/// # fn example(issue: &cheatsheets::IssueRecord) -> anyhow::Result<()> {
/// let collection = CollectionId::parse("go")?;
/// assert_eq!(anchor_id(&collection, issue), format!("go-{}", issue.id));
/// # Ok(())
/// # }
/// ```
pub fn anchor_id(collection: &CollectionId, issue: &IssueRecord) -> String {
    format!("{}-{}", collection, issue.id)
}

/// Fixed origin that share links are composed against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareOrigin(Url);

impl ShareOrigin {
    /// Parses an http(s) origin such as `https://cheatsheets.example.com`.
    ///
    /// # Errors
    ///
    /// Returns error if the value is not a URL or uses another scheme.
    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw).with_context(|| format!("Invalid share origin: {}", raw))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            bail!("Share origin must use http or https: {}", raw);
        }

        Ok(Self(url))
    }

    /// Composes `{origin}/sheet/{collection}?_id={anchor}` for an issue.
    pub fn share_link(&self, collection: &CollectionId, issue: &IssueRecord) -> Url {
        let mut url = self.0.clone();
        url.set_path(&format!("sheet/{}", collection));
        url.set_fragment(None);
        url.query_pairs_mut()
            .clear()
            .append_pair("_id", &anchor_id(collection, issue));
        url
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}
