//! Body normalization: editor content arrives either as raw HTML or as
//! Markdown, and both must come out the other side as HTML.

use comrak::{Options, markdown_to_html};

/// Detects whether stored content is already HTML. Anything whose first
/// non-whitespace character is `<` is treated as authored HTML and passed
/// through byte-for-byte; everything else is rendered as Markdown.
pub fn is_html(body: &str) -> bool {
    body.trim_start().starts_with('<')
}

/// Normalize a stored article body into HTML.
pub fn normalize(body: &str) -> String {
    if is_html(body) {
        return body.to_string();
    }

    markdown_to_html(body, &markdown_options())
}

fn markdown_options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    // Editors embed inline HTML (iframes, styled spans) inside Markdown.
    options.render.r#unsafe = true;
    options
}
