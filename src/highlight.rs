//! Syntax highlighting for fenced code blocks.
//!
//! Each language tag is resolved to a highlighting capability: an alias is
//! first mapped to its canonical tag, then the canonical tag is looked up in
//! the syntect grammar set. Tags without a grammar fall back to escaped
//! plain text in the same markup.

use std::collections::HashMap;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use tracing::debug;

/// CSS class prefix for highlighted spans.
const CLASS_PREFIX: &str = "tok-";

/// Code highlighting capability resolved for a language tag.
#[derive(Debug, Clone, Copy)]
pub enum Capability<'a> {
    /// Grammar registered for the canonical tag.
    Grammar(&'a SyntaxReference),
    /// No grammar; code is emitted as escaped text.
    PlainText,
}

/// Maps language tags to syntect grammars.
pub struct Highlighter {
    syntax_set: SyntaxSet,
    aliases: HashMap<String, String>,
}

impl Highlighter {
    /// Creates highlighter with the default syntect grammars and no aliases.
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            aliases: HashMap::new(),
        }
    }

    /// Creates highlighter with an alias table (`alias` -> `canonical`).
    pub fn with_aliases(aliases: HashMap<String, String>) -> Self {
        Self {
            aliases,
            ..Self::new()
        }
    }

    /// Returns the canonical tag for a possibly aliased language tag.
    pub fn canonical<'t>(&'t self, tag: &'t str) -> &'t str {
        self.aliases.get(tag).map(String::as_str).unwrap_or(tag)
    }

    /// Resolves the highlighting capability for a language tag.
    pub fn capability(&self, tag: &str) -> Capability<'_> {
        let canonical = self.canonical(tag);
        if canonical.is_empty() {
            return Capability::PlainText;
        }

        self.syntax_set
            .find_syntax_by_token(canonical)
            .or_else(|| self.syntax_set.find_syntax_by_extension(canonical))
            .map_or(Capability::PlainText, Capability::Grammar)
    }

    /// Renders a code block as `<pre class="language-{tag}"><code>…</code></pre>`.
    ///
    /// The class carries the tag as written in the fence. The body is
    /// highlighted when the tag resolves to a grammar and escaped plain text
    /// otherwise. Never fails: a grammar error also takes the plain path.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cheatsheets::Highlighter;
    ///
    /// let highlighter = Highlighter::new();
    /// let html = highlighter.code_block("a < b", "nosuchlang");
    /// assert_eq!(html, "<pre class=\"language-nosuchlang\"><code>a &lt; b</code></pre>");
    /// ```
    pub fn code_block(&self, code: &str, tag: &str) -> String {
        let body = match self.capability(tag) {
            Capability::Grammar(syntax) => self
                .highlight_with(syntax, code)
                .unwrap_or_else(|| escape_html(code)),
            Capability::PlainText => escape_html(code),
        };

        format!(
            "<pre class=\"language-{}\"><code>{}</code></pre>",
            escape_html(tag),
            body
        )
    }

    /// Highlights code with class-based spans, or None on grammar error.
    fn highlight_with(&self, syntax: &SyntaxReference, code: &str) -> Option<String> {
        if code.is_empty() {
            return Some(String::new());
        }

        let mut generator = ClassedHTMLGenerator::new_with_class_style(
            syntax,
            &self.syntax_set,
            ClassStyle::SpacedPrefixed {
                prefix: CLASS_PREFIX,
            },
        );

        for line in LinesWithEndings::from(code) {
            if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
                debug!(syntax = %syntax.name, error = %e, "highlighting failed, using plain text");
                return None;
            }
        }

        Some(generator.finalize())
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

/// Escapes HTML special characters.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
