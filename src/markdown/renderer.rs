//! Markdown rendering with GitHub Flavored Markdown support.

use comrak::Options;

use crate::highlight::Highlighter;

/// Opening markup comrak emits for every code block.
const PRE_OPEN: &str = "<pre><code";
/// Attribute prefix of a block carrying an info string.
const LANG_ATTR: &str = " class=\"language-";
const FENCE_CLOSE: &str = "</code></pre>";

/// Renders issue bodies to HTML.
///
/// Provides GFM extensions including tables, strikethrough, autolinks,
/// task lists and footnotes. Raw HTML in the source is escaped rather than
/// passed through. Code blocks are replaced with the highlighter's output;
/// a block without a language tag goes through it with an empty tag.
pub struct MarkdownRenderer {
    highlighter: Highlighter,
}

impl MarkdownRenderer {
    /// Creates renderer with the default highlighter.
    pub fn new() -> Self {
        Self::with_highlighter(Highlighter::new())
    }

    /// Creates renderer around a configured highlighter.
    pub fn with_highlighter(highlighter: Highlighter) -> Self {
        Self { highlighter }
    }

    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    /// Comrak options for issue bodies.
    fn options() -> Options<'static> {
        let mut options = Options::default();

        options.extension.strikethrough = true;
        options.extension.table = true;
        options.extension.autolink = true;
        options.extension.tasklist = true;
        options.extension.footnotes = true;

        // Issue bodies are semi-trusted: show raw HTML as text
        options.render.unsafe_ = false;
        options.render.escape = true;

        options
    }

    /// Renders markdown content to HTML string.
    ///
    /// Pure function of the input and the renderer configuration: the same
    /// source always yields the same HTML.
    ///
    /// # Arguments
    ///
    /// * `content`: Markdown content to render
    ///
    /// # Returns
    ///
    /// Rendered HTML with highlighted code blocks
    pub fn render(&self, content: &str) -> String {
        let html = comrak::markdown_to_html(content, &Self::options());
        self.highlight_code_blocks(&html)
    }

    /// Replaces `<pre><code class="language-X">…</code></pre>` and untagged
    /// `<pre><code>…</code></pre>` blocks with highlighter output.
    fn highlight_code_blocks(&self, html: &str) -> String {
        let mut result = String::with_capacity(html.len());
        let mut last_end = 0;
        let mut search_pos = 0;

        while let Some(found) = html[search_pos..].find(PRE_OPEN) {
            let block_start = search_pos + found;
            let after_open = block_start + PRE_OPEN.len();
            let rest = &html[after_open..];

            let (language, content_start) = if rest.starts_with('>') {
                (String::new(), after_open + 1)
            } else if let Some(attr) = rest.strip_prefix(LANG_ATTR) {
                let lang_start = after_open + LANG_ATTR.len();
                let Some(lang_len) = attr.find('"') else {
                    break;
                };
                let lang_end = lang_start + lang_len;
                let Some(tag_len) = html[lang_end..].find('>') else {
                    break;
                };
                (html_decode(&html[lang_start..lang_end]), lang_end + tag_len + 1)
            } else {
                search_pos = after_open;
                continue;
            };

            let Some(content_len) = html[content_start..].find(FENCE_CLOSE) else {
                break;
            };
            let content_end = content_start + content_len;
            let code = html_decode(&html[content_start..content_end]);

            result.push_str(&html[last_end..block_start]);
            result.push_str(&self.highlighter.code_block(&code, &language));

            last_end = content_end + FENCE_CLOSE.len();
            search_pos = last_end;
        }

        result.push_str(&html[last_end..]);
        result
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Reverses the entity escaping comrak applies inside code blocks.
///
/// `&amp;` is decoded last so `&amp;lt;` yields `&lt;` and not `<`.
fn html_decode(html: &str) -> String {
    html.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_render_basic_markdown() {
        // Arrange
        let renderer = MarkdownRenderer::new();
        let markdown = "# Hello\n\nThis is **bold** text.";

        // Act
        let html = renderer.render(markdown);

        // Assert
        assert!(html.contains("<h1>"), "Should contain h1 tag");
        assert!(html.contains("Hello"), "Should contain heading text");
        assert!(html.contains("<strong>bold</strong>"), "Should contain strong tag");
    }

    #[test]
    fn test_render_gfm_tables() {
        // Arrange
        let renderer = MarkdownRenderer::new();
        let markdown = r#"
| Command | Effect |
|---------|--------|
| `ls`    | list   |
"#;

        // Act
        let html = renderer.render(markdown);

        // Assert
        assert!(html.contains("<table>"), "Should contain table tag");
        assert!(html.contains("<th>"), "Should contain table header");
        assert!(html.contains("<td>"), "Should contain table cell");
        assert!(html.contains("<code>ls</code>"), "Inline code stays plain");
    }

    #[test]
    fn test_render_gfm_tasklist() {
        // Arrange
        let renderer = MarkdownRenderer::new();
        let markdown = "- [ ] todo\n- [x] done\n";

        // Act
        let html = renderer.render(markdown);

        // Assert
        assert!(html.contains("type=\"checkbox\""), "Should contain checkbox");
        assert!(html.contains("disabled"), "Checkboxes should be disabled");
    }

    #[test]
    fn test_render_escapes_raw_html() {
        // Arrange
        let renderer = MarkdownRenderer::new();
        let markdown = "<script>alert('xss')</script>\n\nNormal text.";

        // Act
        let html = renderer.render(markdown);

        // Assert
        assert!(
            !html.contains("<script>"),
            "Raw HTML should not pass through: {}",
            html
        );
        assert!(html.contains("&lt;script&gt;"), "Should show tag as text: {}", html);
        assert!(html.contains("Normal text"));
    }

    #[test]
    fn test_render_code_block_highlighted() {
        // Arrange
        let renderer = MarkdownRenderer::new();
        let markdown = "```rust\nfn main() {\n    println!(\"hello\");\n}\n```\n";

        // Act
        let html = renderer.render(markdown);

        // Assert
        assert!(
            html.contains("<pre class=\"language-rust\"><code>"),
            "Should wrap block with language class: {}",
            html
        );
        assert!(html.contains("<span class=\"tok-"), "Should contain spans: {}", html);
        assert!(html.contains("println!"));
        assert!(!html.contains("<pre><code"), "Comrak block should be replaced");
    }

    #[test]
    fn test_render_unknown_language_fallback() {
        // Arrange
        let renderer = MarkdownRenderer::new();
        let markdown = "```unknownlang\na < b && \"c\"\n```\n";

        // Act
        let html = renderer.render(markdown);

        // Assert
        assert!(
            html.contains(
                "<pre class=\"language-unknownlang\"><code>a &lt; b &amp;&amp; &quot;c&quot;\n</code></pre>"
            ),
            "Should render escaped fallback: {}",
            html
        );
    }

    #[test]
    fn test_render_untagged_block_uses_empty_language() {
        // Arrange
        let renderer = MarkdownRenderer::new();
        let markdown = "```\na < b\n```\n";

        // Act
        let html = renderer.render(markdown);

        // Assert
        assert!(
            html.contains("<pre class=\"language-\"><code>a &lt; b\n</code></pre>"),
            "Untagged block should go through the plain text path: {}",
            html
        );
        assert!(!html.contains("<pre><code"), "Comrak block should be replaced");
    }

    #[test]
    fn test_render_inline_code_untouched() {
        // Arrange
        let renderer = MarkdownRenderer::new();

        // Act
        let html = renderer.render("Use `<pre>` here.\n");

        // Assert
        assert!(html.contains("<code>&lt;pre&gt;</code>"), "{}", html);
        assert!(!html.contains("language-"));
    }

    #[test]
    fn test_render_escaped_entities_survive_round_trip() {
        // Arrange
        let renderer = MarkdownRenderer::new();
        let markdown = "```unknownlang\n&lt;\n```\n";

        // Act
        let html = renderer.render(markdown);

        // Assert
        assert!(
            html.contains("<code>&amp;lt;\n</code>"),
            "Literal entity text should stay literal: {}",
            html
        );
    }

    #[test]
    fn test_render_multiple_code_blocks() {
        // Arrange
        let renderer = MarkdownRenderer::new();
        let markdown = "```rust\nfn foo() {}\n```\n\ntext\n\n```python\ndef bar():\n    pass\n```\n";

        // Act
        let html = renderer.render(markdown);

        // Assert
        assert!(html.contains("<pre class=\"language-rust\">"));
        assert!(html.contains("<pre class=\"language-python\">"));
        assert!(html.contains("<p>text</p>"));
    }

    #[test]
    fn test_render_with_alias_table() {
        // Arrange
        let mut aliases = HashMap::new();
        aliases.insert("sheetlang".to_string(), "python".to_string());
        let renderer = MarkdownRenderer::with_highlighter(Highlighter::with_aliases(aliases));
        let markdown = "```sheetlang\ndef f():\n    return 1\n```\n";

        // Act
        let html = renderer.render(markdown);

        // Assert
        assert!(html.contains("<pre class=\"language-sheetlang\"><code>"));
        assert!(html.contains("<span class=\"tok-"), "Alias should highlight: {}", html);
    }

    #[test]
    fn test_render_is_deterministic() {
        // Arrange
        let renderer = MarkdownRenderer::default();
        let markdown = "## Title\n\n```rust\nlet a = 1;\n```\n";

        // Act
        let first = renderer.render(markdown);
        let second = renderer.render(markdown);

        // Assert
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_empty_markdown() {
        // Arrange
        let renderer = MarkdownRenderer::new();

        // Act
        let html = renderer.render("");

        // Assert
        assert!(html.is_empty(), "Empty source renders nothing: {:?}", html);
    }
}
