//! Heading annotation: give every `<h2>`/`<h3>` a stable anchor id and
//! collect them into a table of contents.

use std::cell::RefCell;
use std::rc::Rc;

use lol_html::{RewriteStrSettings, element, rewrite_str, text};

use crate::application::render::types::{RenderError, TocEntry};

/// Annotated HTML plus the extracted table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedHtml {
    pub html: String,
    pub toc: Vec<TocEntry>,
}

/// Walks the document and assigns `heading-N` ids to `<h2>` and `<h3>`
/// elements that lack one. Ids already present are kept verbatim and the
/// counter does not advance for them, so adding a hand-written id to one
/// heading never renumbers the others that followed it before the edit.
pub fn annotate_headings(html: &str) -> Result<AnnotatedHtml, RenderError> {
    let entries: Rc<RefCell<Vec<TocEntry>>> = Rc::new(RefCell::new(Vec::new()));
    let counter = Rc::new(RefCell::new(0usize));

    let element_entries = Rc::clone(&entries);
    let text_entries = Rc::clone(&entries);

    let output = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("h2, h3", move |el| {
                    let level = if el.tag_name().eq_ignore_ascii_case("h2") {
                        2
                    } else {
                        3
                    };

                    let id = match el.get_attribute("id").filter(|id| !id.is_empty()) {
                        Some(existing) => existing,
                        None => {
                            let mut next = counter.borrow_mut();
                            let id = format!("heading-{}", *next);
                            *next += 1;
                            el.set_attribute("id", &id)?;
                            id
                        }
                    };

                    element_entries.borrow_mut().push(TocEntry {
                        id,
                        text: String::new(),
                        level,
                    });
                    Ok(())
                }),
                // Text chunks include descendant text, which strips any
                // nested markup from the heading label.
                text!("h2, h3", move |chunk| {
                    if let Some(entry) = text_entries.borrow_mut().last_mut() {
                        entry.text.push_str(chunk.as_str());
                    }
                    Ok(())
                }),
            ],
            ..RewriteStrSettings::new()
        },
    )
    .map_err(|err| RenderError::Annotation {
        message: err.to_string(),
    })?;

    let mut toc = Rc::try_unwrap(entries)
        .map(RefCell::into_inner)
        .unwrap_or_default();
    for entry in &mut toc {
        entry.text = entry.text.trim().to_string();
    }

    Ok(AnnotatedHtml { html: output, toc })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_sequential_ids() {
        let annotated =
            annotate_headings("<h2>Birinci</h2><p>metin</p><h3>İkinci</h3>").expect("annotate");

        assert!(annotated.html.contains("<h2 id=\"heading-0\">"));
        assert!(annotated.html.contains("<h3 id=\"heading-1\">"));
        assert_eq!(
            annotated.toc,
            vec![
                TocEntry {
                    id: "heading-0".into(),
                    text: "Birinci".into(),
                    level: 2,
                },
                TocEntry {
                    id: "heading-1".into(),
                    text: "İkinci".into(),
                    level: 3,
                },
            ]
        );
    }

    #[test]
    fn keeps_existing_ids_without_advancing_counter() {
        let annotated = annotate_headings(
            "<h2>Bir</h2><h2 id=\"ozel\">Özel</h2><h2>Üç</h2>",
        )
        .expect("annotate");

        assert!(annotated.html.contains("<h2 id=\"heading-0\">Bir</h2>"));
        assert!(annotated.html.contains("<h2 id=\"ozel\">Özel</h2>"));
        assert!(annotated.html.contains("<h2 id=\"heading-1\">Üç</h2>"));
        assert_eq!(
            annotated.toc.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(),
            vec!["heading-0", "ozel", "heading-1"]
        );
    }

    #[test]
    fn strips_nested_tags_from_toc_text() {
        let annotated =
            annotate_headings("<h2> <strong>Kalın</strong> başlık </h2>").expect("annotate");
        assert_eq!(annotated.toc[0].text, "Kalın başlık");
        assert!(annotated.html.contains("<strong>Kalın</strong>"));
    }

    #[test]
    fn ignores_other_heading_levels() {
        let annotated =
            annotate_headings("<h1>Sayfa</h1><h4>Alt</h4><h2>Bölüm</h2>").expect("annotate");
        assert_eq!(annotated.toc.len(), 1);
        assert!(annotated.html.contains("<h1>Sayfa</h1>"));
        assert!(annotated.html.contains("<h4>Alt</h4>"));
    }

    #[test]
    fn empty_id_attribute_counts_as_missing() {
        let annotated = annotate_headings("<h2 id=\"\">Boş</h2>").expect("annotate");
        assert_eq!(annotated.toc[0].id, "heading-0");
    }

    #[test]
    fn document_without_headings_yields_empty_toc() {
        let annotated = annotate_headings("<p>sadece paragraf</p>").expect("annotate");
        assert!(annotated.toc.is_empty());
        assert_eq!(annotated.html, "<p>sadece paragraf</p>");
    }
}
