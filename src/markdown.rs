//! Markdown rendering for issue bodies.
//!
//! This module renders GitHub Flavored Markdown with comrak and hands fenced
//! code blocks to the [`Highlighter`](crate::Highlighter).

mod renderer;

pub use renderer::MarkdownRenderer;
