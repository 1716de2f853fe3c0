//! Page layout wrapper component

use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::assets::SHEET_SCRIPT;

/// How the page stylesheet is delivered.
#[derive(Debug, Clone, Copy)]
pub enum Styles<'a> {
    /// `<link>` to a served stylesheet path.
    Link(&'a str),
    /// Stylesheet text embedded in a `<style>` element.
    Inline(&'a str),
}

/// Wraps page content with standard HTML structure
///
/// Provides DOCTYPE, head and container structure. The client script is
/// always embedded; it reads `data-scroll-target` from the body to run the
/// scroll-to-entry effect and wires the copy-link buttons.
///
/// # Arguments
///
/// * `title`: Page title text (without suffix)
/// * `styles`: Stylesheet delivery
/// * `scroll_target`: DOM id to scroll into view after load, if any
/// * `body`: Page-specific body markup
///
/// # Returns
///
/// Complete HTML document with wrapped content
pub fn page_wrapper(
    title: &str,
    styles: Styles<'_>,
    scroll_target: Option<&str>,
    body: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Cheatsheets" }
                @match styles {
                    Styles::Link(href) => {
                        link rel="stylesheet" href=(href);
                    }
                    Styles::Inline(css) => {
                        style { (PreEscaped(css)) }
                    }
                }
            }
            body data-scroll-target=[scroll_target] {
                div class="container" {
                    (body)
                }
                script { (PreEscaped(SHEET_SCRIPT)) }
            }
        }
    }
}
