//! Markdown rendering with allowlist sanitisation.
//!
//! Card content is user-supplied, so everything that leaves this module has
//! been through `ammonia`: scripts, event handlers, `javascript:` URLs,
//! iframes and friends are gone, and only a fixed set of benign tags and
//! attributes survive. Code fences get a `language-*` class for the
//! front-end highlighter, falling back to a small detection heuristic when
//! the fence carries no recognised tag.
//!
//! `render_markdown` never panics: if rendering blows up for any reason the
//! caller gets the HTML-escaped input back instead.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use markdown_it::plugins::cmark;
use markdown_it::plugins::cmark::block::fence::CodeFence;
use markdown_it::{MarkdownIt, Node, NodeValue, Renderer};

/// Language tags the front-end highlighter understands, plus common aliases.
const KNOWN_LANGUAGES: &[(&str, &str)] = &[
    ("rust", "rust"),
    ("rs", "rust"),
    ("python", "python"),
    ("py", "python"),
    ("javascript", "javascript"),
    ("js", "javascript"),
    ("typescript", "typescript"),
    ("ts", "typescript"),
    ("json", "json"),
    ("html", "html"),
    ("css", "css"),
    ("bash", "bash"),
    ("sh", "bash"),
    ("shell", "bash"),
    ("zsh", "bash"),
    ("sql", "sql"),
    ("toml", "toml"),
    ("yaml", "yaml"),
    ("yml", "yaml"),
    ("c", "c"),
    ("cpp", "cpp"),
    ("c++", "cpp"),
    ("go", "go"),
    ("java", "java"),
    ("markdown", "markdown"),
    ("md", "markdown"),
];

/// Code fence annotated for client-side syntax highlighting.
#[derive(Debug)]
struct HighlightedCode {
    lang: Option<String>,
    content: String,
}

impl NodeValue for HighlightedCode {
    fn render(&self, _node: &Node, fmt: &mut dyn Renderer) {
        fmt.cr();
        fmt.open("pre", &[]);
        match &self.lang {
            Some(lang) => fmt.open("code", &[("class", format!("language-{lang}"))]),
            None => fmt.open("code", &[]),
        }
        fmt.text(&self.content);
        fmt.close("code");
        fmt.close("pre");
        fmt.cr();
    }
}

impl fmt::Display for HighlightedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HighlightedCode({})", self.lang.as_deref().unwrap_or("plain"))
    }
}

/// Render markdown to sanitised HTML.
///
/// Never panics and never emits unescaped user content. Worst case the
/// result is the whole input HTML-escaped as plain text.
pub fn render_markdown(markdown: &str) -> String {
    match catch_unwind(AssertUnwindSafe(|| render_unsanitised(markdown))) {
        Ok(html) => sanitise(&html),
        Err(_) => html_escape::encode_text(markdown).into_owned(),
    }
}

fn render_unsanitised(markdown: &str) -> String {
    let md = &mut MarkdownIt::new();
    cmark::add(md);
    // Raw HTML must reach the sanitiser rather than being escaped wholesale,
    // otherwise author-supplied tags like <sup> could never render.
    markdown_it::plugins::html::add(md);

    let mut ast = md.parse(markdown);
    ast.walk_mut(|node, _depth| {
        let Some(fence) = node.cast::<CodeFence>() else {
            return;
        };
        let lang = recognised_language(&fence.info)
            .or_else(|| detect_language(&fence.content))
            .map(str::to_string);
        let content = fence.content.clone();
        node.replace(HighlightedCode { lang, content });
    });
    ast.render()
}

/// Allowlist pass over rendered HTML.
///
/// The defaults already drop scripts, styles, event handlers and non-http
/// URL schemes; we only add the `class` attribute on `code` so highlighter
/// annotations survive.
fn sanitise(html: &str) -> String {
    ammonia::Builder::default()
        .add_tag_attributes("code", ["class"])
        .clean(html)
        .to_string()
}

/// Canonical language for a fence info string, e.g. `rust,no_run` -> `rust`.
fn recognised_language(info: &str) -> Option<&'static str> {
    let tag = info
        .trim()
        .split([' ', ',', '\t'])
        .next()
        .unwrap_or("")
        .to_lowercase();
    KNOWN_LANGUAGES
        .iter()
        .find(|(alias, _)| *alias == tag)
        .map(|(_, canonical)| *canonical)
}

/// Cheap guess at the language of an untagged fence. `None` means render as
/// plain text.
fn detect_language(code: &str) -> Option<&'static str> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return None;
    }
    if (trimmed.starts_with('{') || trimmed.starts_with('['))
        && serde_json::from_str::<serde_json::Value>(trimmed).is_ok()
    {
        return Some("json");
    }
    if trimmed.starts_with("#!") {
        return Some("bash");
    }
    if trimmed.contains("fn ") && (trimmed.contains("let ") || trimmed.contains("->")) {
        return Some("rust");
    }
    if trimmed.lines().any(|l| {
        let l = l.trim_start();
        l.starts_with("def ") || l.starts_with("import ") || l.starts_with("from ")
    }) {
        return Some("python");
    }
    if trimmed.contains("function ") || trimmed.contains("=>") || trimmed.contains("const ") {
        return Some("javascript");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_markdown() {
        let html = render_markdown("# Title\n\nSome *emphasis*.");
        assert!(html.contains("<h1>"));
        assert!(html.contains("<em>emphasis</em>"));
    }

    #[test]
    fn test_script_stripped_including_content() {
        let html = render_markdown("<script>alert(1)</script>Hello");
        assert!(html.contains("Hello"));
        assert!(!html.contains("script"));
        assert!(!html.contains("alert"));
    }

    #[test]
    fn test_event_handlers_stripped() {
        let html = render_markdown(r#"<a href="https://example.com" onclick="evil()">x</a>"#);
        assert!(!html.contains("onclick"));
        assert!(!html.contains("evil"));
    }

    #[test]
    fn test_javascript_urls_stripped() {
        let html = render_markdown(r#"<a href="javascript:alert(1)">click</a>"#);
        assert!(!html.contains("javascript:"));
        assert!(html.contains("click"));

        let html = render_markdown(r#"[click](javascript:alert(1))"#);
        assert!(!html.contains(r#"href="javascript"#));
    }

    #[test]
    fn test_embedding_tags_stripped() {
        for payload in [
            "<style>body{display:none}</style>ok",
            "<iframe src=\"https://x\"></iframe>ok",
            "<object data=\"x\"></object>ok",
            "<embed src=\"x\">ok",
        ] {
            let html = render_markdown(payload);
            assert!(html.contains("ok"), "lost text for {payload}");
            for tag in ["<style", "<iframe", "<object", "<embed"] {
                assert!(!html.contains(tag), "{tag} survived in {html}");
            }
        }
    }

    #[test]
    fn test_tagged_fence_gets_language_class() {
        let html = render_markdown("```rust\nfn main() {}\n```");
        assert!(html.contains("language-rust"), "got {html}");
        assert!(html.contains("fn main()"));
    }

    #[test]
    fn test_fence_alias_normalised() {
        let html = render_markdown("```py\nprint('hi')\n```");
        assert!(html.contains("language-python"));
    }

    #[test]
    fn test_untagged_json_fence_detected() {
        let html = render_markdown("```\n{\"a\": 1}\n```");
        assert!(html.contains("language-json"), "got {html}");
    }

    #[test]
    fn test_untagged_prose_fence_stays_plain() {
        let html = render_markdown("```\njust some words\n```");
        assert!(html.contains("<code>"));
        assert!(!html.contains("language-"));
    }

    #[test]
    fn test_fence_content_escaped() {
        let html = render_markdown("```html\n<script>alert(1)</script>\n```");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_never_panics_on_junk() {
        for input in [
            "",
            "``",
            "```",
            "[[[",
            "](",
            "> > > \n```\n",
            "<<<<>>>>",
            "\u{0}\u{1}\u{2}",
        ] {
            let _ = render_markdown(input);
        }
    }

    #[test]
    fn test_detect_language() {
        assert_eq!(detect_language("{\"a\": 1}"), Some("json"));
        assert_eq!(detect_language("#!/bin/sh\nls"), Some("bash"));
        assert_eq!(detect_language("fn add(a: i32) -> i32 { a }"), Some("rust"));
        assert_eq!(detect_language("import os\n"), Some("python"));
        assert_eq!(detect_language("const x = () => 1"), Some("javascript"));
        assert_eq!(detect_language("plain words"), None);
        assert_eq!(detect_language(""), None);
    }

    #[test]
    fn test_recognised_language() {
        assert_eq!(recognised_language("rust"), Some("rust"));
        assert_eq!(recognised_language("rs,no_run"), Some("rust"));
        assert_eq!(recognised_language("TS"), Some("typescript"));
        assert_eq!(recognised_language("brainfuck"), None);
        assert_eq!(recognised_language(""), None);
    }
}
