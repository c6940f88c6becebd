//! Markdown rendering for post detail pages

use pulldown_cmark::{html, Options, Parser};

/// Render markdown to HTML.
///
/// Front matter is handled separately in `FrontMatter::parse`, so the
/// YAML-metadata extension stays off.
pub fn render(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_SMART_PUNCTUATION
        | Options::ENABLE_HEADING_ATTRIBUTES
        | Options::ENABLE_GFM;

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}
