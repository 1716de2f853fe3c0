//! Bundled CSS and client script

const BASE: &str = include_str!("../assets/base.css");
const SHEET: &str = include_str!("../assets/sheet.css");
const MARKDOWN: &str = include_str!("../assets/markdown.css");

/// Client script: scroll-to-entry effect and copy-link buttons.
pub const SHEET_SCRIPT: &str = include_str!("../assets/sheet.js");

/// Route the bundled stylesheet is served from.
pub const STYLESHEET_PATH: &str = "/assets/sheet.css";

/// Returns the bundled page stylesheet.
pub fn stylesheet() -> String {
    [BASE, SHEET, MARKDOWN].join("\n")
}
