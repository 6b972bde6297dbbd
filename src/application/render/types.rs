use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("heading annotation failed: {message}")]
    Annotation { message: String },
}

/// One entry of the table of contents extracted while annotating headings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// The heading's anchor id, either pre-existing or freshly assigned.
    pub id: String,
    /// Inner text of the heading with nested tags stripped.
    pub text: String,
    /// Heading level, 2 or 3.
    pub level: u8,
}

/// The fully processed body of an article, ready for templating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArticle {
    /// Everything up to and including the first closing paragraph tag.
    pub lead_html: String,
    /// The rest of the document. Empty when no paragraph boundary exists.
    pub remainder_html: String,
    pub toc: Vec<TocEntry>,
}

impl RenderedArticle {
    /// True when the document produced enough headings to warrant a
    /// table-of-contents block.
    pub fn has_toc(&self) -> bool {
        !self.toc.is_empty()
    }
}
