//! Splits annotated article HTML at the first paragraph boundary so a
//! table-of-contents widget can sit between the intro and the body.

const PARAGRAPH_BOUNDARY: &str = "</p>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitBody {
    pub lead: String,
    pub remainder: String,
}

/// Splits at the first `</p>`, keeping the closing tag in the lead. When no
/// paragraph boundary exists the whole input becomes the remainder.
pub fn split_at_first_paragraph(html: &str) -> SplitBody {
    match html.find(PARAGRAPH_BOUNDARY) {
        Some(idx) => {
            let boundary = idx + PARAGRAPH_BOUNDARY.len();
            SplitBody {
                lead: html[..boundary].to_string(),
                remainder: html[boundary..].to_string(),
            }
        }
        None => SplitBody {
            lead: String::new(),
            remainder: html.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_after_first_paragraph() {
        let split = split_at_first_paragraph("<p>giriş</p><h2>devam</h2><p>metin</p>");
        assert_eq!(split.lead, "<p>giriş</p>");
        assert_eq!(split.remainder, "<h2>devam</h2><p>metin</p>");
    }

    #[test]
    fn no_boundary_means_empty_lead() {
        let split = split_at_first_paragraph("<h2>sadece başlık</h2>");
        assert_eq!(split.lead, "");
        assert_eq!(split.remainder, "<h2>sadece başlık</h2>");
    }

    #[test]
    fn empty_input() {
        let split = split_at_first_paragraph("");
        assert_eq!(split.lead, "");
        assert_eq!(split.remainder, "");
    }

    #[test]
    fn reassembly_is_lossless() {
        let html = "<p>bir</p><p>iki</p><p>üç</p>";
        let split = split_at_first_paragraph(html);
        assert_eq!(format!("{}{}", split.lead, split.remainder), html);
    }
}
