//! Issue entry card

use maud::{Markup, PreEscaped, html};

use crate::issue::IssueRecord;

/// Precomputed values of one rendered issue entry.
pub struct EntryData<'a> {
    pub issue: &'a IssueRecord,
    /// DOM id, equal to the issue's anchor id
    pub anchor: &'a str,
    pub share_url: &'a str,
    /// Rendered Markdown body
    pub body_html: &'a str,
    pub selected: bool,
    pub updated_relative: &'a str,
    pub created_date: &'a str,
}

/// Renders one issue as a cheatsheet card.
///
/// The outer element's id is the anchor id so deep links can find it.
pub fn issue_entry(data: &EntryData<'_>) -> Markup {
    let issue = data.issue;
    let status_class = if issue.is_open() {
        "status status-open"
    } else {
        "status status-closed"
    };

    html! {
        article id=(data.anchor) class=(if data.selected { "entry selected" } else { "entry" }) {
            p class="entry-title" {
                a href=(issue.html_url) target="_blank" rel="noopener" {
                    (issue.title)
                    span class=(status_class) title=(issue.state.as_str()) {}
                }
            }
            div class="entry-body markdown-body" {
                (PreEscaped(data.body_html))
            }
            div class="entry-meta" {
                button type="button" class="copy-link" data-share-url=(data.share_url) title="Copy link" {
                    "Copy link"
                }
                div class="entry-times" {
                    time datetime=(issue.updated_at.to_rfc3339()) { (data.updated_relative) }
                    span class="separator" { "/" }
                    time datetime=(issue.created_at.to_rfc3339()) { (data.created_date) }
                }
            }
        }
    }
}
