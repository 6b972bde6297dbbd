//! Content pipeline turning stored article bodies into display-ready HTML.
//!
//! Stored bodies may be raw HTML or Markdown. Rendering runs three pure
//! stages in order: normalize to HTML, annotate level-2/3 headings with
//! anchor ids while extracting a table of contents, then split at the first
//! paragraph so templates can interleave the TOC widget.

pub mod headings;
pub mod normalize;
pub mod split;
pub mod types;

pub use headings::{AnnotatedHtml, annotate_headings};
pub use normalize::normalize;
pub use split::{SplitBody, split_at_first_paragraph};
pub use types::{RenderError, RenderedArticle, TocEntry};

/// Run the full pipeline over a stored body.
pub fn render_article_body(body: &str) -> Result<RenderedArticle, RenderError> {
    let html = normalize(body);
    let annotated = annotate_headings(&html)?;
    let split = split_at_first_paragraph(&annotated.html);

    Ok(RenderedArticle {
        lead_html: split.lead,
        remainder_html: split.remainder,
        toc: annotated.toc,
    })
}
