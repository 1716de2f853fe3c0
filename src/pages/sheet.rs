//! Cheatsheet page generation

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use maud::{Markup, html};
use std::fs;
use std::path::Path;

use crate::anchor::{ShareOrigin, anchor_id};
use crate::components::entry::{EntryData, issue_entry};
use crate::components::layout::{Styles, page_wrapper};
use crate::issue::{CollectionId, IssueRecord};
use crate::markdown::MarkdownRenderer;
use crate::sheet::{active_issue, scroll_target};
use crate::time::{format_date, format_relative};

/// Inputs of one sheet page render.
pub struct SheetPage<'a> {
    pub collection: &'a CollectionId,
    pub issues: &'a [IssueRecord],
    /// Raw `_id` query value
    pub active: Option<&'a str>,
    pub origin: &'a ShareOrigin,
    pub styles: Styles<'a>,
    /// Reference moment for relative timestamps
    pub now: DateTime<Utc>,
}

/// Generates the cheatsheet page for a collection
///
/// Renders one entry per issue in list order. The entry whose anchor id
/// equals the active selector is marked selected and becomes the scroll
/// target; a selector matching nothing marks no entry. An empty issue list
/// renders zero entries.
///
/// # Arguments
///
/// * `page`: Page inputs
/// * `renderer`: Markdown renderer for issue bodies
///
/// # Returns
///
/// Rendered HTML markup
pub fn generate(page: &SheetPage<'_>, renderer: &MarkdownRenderer) -> Markup {
    let collection = page.collection;
    let title = match active_issue(collection, page.issues, page.active) {
        Some(issue) => issue.title.clone(),
        None => format!("{} cheatsheet", collection),
    };
    let target = scroll_target(collection, page.issues, page.active);

    page_wrapper(
        &title,
        page.styles,
        target.as_deref(),
        html! {
            h3 class="sheet-header" {
                (collection.as_str()) " " span class="suffix" { "cheatsheet" }
            }
            main class="entries" {
                @for issue in page.issues {
                    @let anchor = anchor_id(collection, issue);
                    @let share_url = page.origin.share_link(collection, issue);
                    @let body_html = renderer.render(issue.markdown());
                    @let updated = format_relative(issue.updated_at, page.now);
                    @let created = format_date(issue.created_at);
                    (issue_entry(&EntryData {
                        issue,
                        anchor: &anchor,
                        share_url: share_url.as_str(),
                        body_html: &body_html,
                        selected: target.as_deref() == Some(anchor.as_str()),
                        updated_relative: &updated,
                        created_date: &created,
                    }))
                }
            }
        },
    )
}

/// Writes a rendered page to disk, creating parent directories as needed.
///
/// # Errors
///
/// Returns error if directory creation or the write fails
pub fn write(path: &Path, page: &Markup) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, &page.0).with_context(|| format!("Failed to write page: {}", path.display()))
}
