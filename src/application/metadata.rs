//! SEO metadata assembly: per-page meta tags, Open Graph values, canonical
//! URLs, and the JSON-LD structured data embedded on article pages.

use serde_json::{Value, json};
use time::format_description::well_known::Rfc3339;

use crate::application::sitemap::{canonical_url, normalize_public_site_url};
use crate::domain::entities::{ArticleRecord, CategoryRecord, SiteSettingsRecord};

/// Head metadata for one rendered page.
#[derive(Debug, Clone, Default)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub keywords: Option<String>,
    pub canonical: String,
    pub og_title: String,
    pub og_description: String,
    pub og_image: Option<String>,
    pub og_type: &'static str,
    /// Serialized JSON-LD, already safe to embed in a script tag.
    pub json_ld: Option<String>,
}

pub fn site_meta(settings: &SiteSettingsRecord, path: &str) -> PageMeta {
    let base = normalize_public_site_url(&settings.public_site_url);
    let title = non_empty(&settings.meta_title).unwrap_or_else(|| settings.site_name.clone());
    let description =
        non_empty(&settings.meta_description).unwrap_or_else(|| settings.site_description.clone());

    PageMeta {
        canonical: canonical_url(&base, path),
        og_title: title.clone(),
        og_description: description.clone(),
        og_image: non_empty(&settings.logo_url),
        og_type: "website",
        keywords: non_empty(&settings.meta_keywords),
        json_ld: None,
        title,
        description,
    }
}

pub fn article_meta(
    settings: &SiteSettingsRecord,
    article: &ArticleRecord,
    category: Option<&CategoryRecord>,
    author_name: &str,
) -> PageMeta {
    let base = normalize_public_site_url(&settings.public_site_url);
    let path = format!("/{}", article.slug);
    let canonical = canonical_url(&base, &path);
    let title = format!("{} | {}", article.title, settings.site_name);
    let json_ld = article_json_ld(&base, article, category, author_name);

    PageMeta {
        title,
        description: article.excerpt.clone(),
        keywords: article.focus_keyword.clone(),
        canonical,
        og_title: article.title.clone(),
        og_description: article.excerpt.clone(),
        og_image: non_empty(&article.cover_image).or_else(|| non_empty(&settings.logo_url)),
        og_type: "article",
        json_ld: Some(json_ld),
    }
}

pub fn page_meta(
    settings: &SiteSettingsRecord,
    slug: &str,
    title: &str,
    meta_title: Option<&str>,
    meta_description: Option<&str>,
) -> PageMeta {
    let base = normalize_public_site_url(&settings.public_site_url);
    let path = format!("/{slug}");
    let title = meta_title
        .and_then(|t| non_empty(t))
        .unwrap_or_else(|| format!("{} | {}", title, settings.site_name));
    let description = meta_description
        .and_then(|d| non_empty(d))
        .unwrap_or_else(|| settings.site_description.clone());

    PageMeta {
        canonical: canonical_url(&base, &path),
        og_title: title.clone(),
        og_description: description.clone(),
        og_image: non_empty(&settings.logo_url),
        og_type: "website",
        keywords: non_empty(&settings.meta_keywords),
        json_ld: None,
        title,
        description,
    }
}

/// Article pages embed two schema.org documents: the Article itself and the
/// breadcrumb trail home → category → article.
fn article_json_ld(
    base: &str,
    article: &ArticleRecord,
    category: Option<&CategoryRecord>,
    author_name: &str,
) -> String {
    let site_root = canonical_url(base, "/");
    let article_url = canonical_url(base, &format!("/{}", article.slug));
    let published = format_rfc3339(article.created_at);
    let modified = format_rfc3339(article.updated_at);

    let images: Vec<&str> = non_empty(&article.cover_image)
        .is_some()
        .then_some(article.cover_image.as_str())
        .into_iter()
        .collect();

    let article_doc = json!({
        "@context": "https://schema.org",
        "@type": "Article",
        "headline": article.title,
        "description": article.excerpt,
        "image": images,
        "datePublished": published,
        "dateModified": modified,
        "author": [{
            "@type": "Person",
            "name": author_name,
            "url": site_root,
        }],
    });

    let mut crumbs = vec![json!({
        "@type": "ListItem",
        "position": 1,
        "name": "Ana Sayfa",
        "item": site_root,
    })];
    if let Some(category) = category {
        crumbs.push(json!({
            "@type": "ListItem",
            "position": 2,
            "name": category.name,
            "item": canonical_url(base, &format!("/kategori/{}", category.slug)),
        }));
    }
    crumbs.push(json!({
        "@type": "ListItem",
        "position": crumbs.len() + 1,
        "name": article.title,
        "item": article_url,
    }));

    let breadcrumb_doc = json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": crumbs,
    });

    Value::Array(vec![article_doc, breadcrumb_doc]).to_string()
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn format_rfc3339(value: time::OffsetDateTime) -> String {
    value.format(&Rfc3339).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn settings() -> SiteSettingsRecord {
        let mut settings = SiteSettingsRecord::defaults(OffsetDateTime::UNIX_EPOCH);
        settings.public_site_url = "https://example.com/".to_string();
        settings.site_name = "Deneme".to_string();
        settings
    }

    fn article() -> ArticleRecord {
        ArticleRecord {
            id: Uuid::nil(),
            title: "E-ticaret Rehberi".to_string(),
            slug: "e-ticaret-rehberi".to_string(),
            excerpt: "Kısa özet".to_string(),
            body: "<p>metin</p>".to_string(),
            cover_image: "/uploads/kapak.webp".to_string(),
            published: true,
            focus_keyword: Some("e-ticaret".to_string()),
            category_id: Uuid::nil(),
            author_id: Uuid::nil(),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn article_meta_builds_canonical_and_og() {
        let meta = article_meta(&settings(), &article(), None, "Yazar");
        assert_eq!(meta.canonical, "https://example.com/e-ticaret-rehberi");
        assert_eq!(meta.og_type, "article");
        assert_eq!(meta.title, "E-ticaret Rehberi | Deneme");
        assert_eq!(meta.og_image.as_deref(), Some("/uploads/kapak.webp"));
    }

    #[test]
    fn json_ld_contains_article_and_breadcrumbs() {
        let category = CategoryRecord {
            id: Uuid::nil(),
            name: "E-Ticaret".to_string(),
            slug: "e-ticaret".to_string(),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };
        let meta = article_meta(&settings(), &article(), Some(&category), "Yazar");
        let documents: serde_json::Value =
            serde_json::from_str(meta.json_ld.as_deref().unwrap()).unwrap();

        let array = documents.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[0]["@type"], "Article");
        assert_eq!(array[1]["@type"], "BreadcrumbList");

        let crumbs = array[1]["itemListElement"].as_array().unwrap();
        assert_eq!(crumbs.len(), 3);
        assert_eq!(crumbs[1]["item"], "https://example.com/kategori/e-ticaret");
        assert_eq!(crumbs[2]["position"], 3);
    }

    #[test]
    fn breadcrumbs_skip_missing_category() {
        let meta = article_meta(&settings(), &article(), None, "Yazar");
        let documents: serde_json::Value =
            serde_json::from_str(meta.json_ld.as_deref().unwrap()).unwrap();
        let crumbs = documents[1]["itemListElement"].as_array().unwrap();
        assert_eq!(crumbs.len(), 2);
        assert_eq!(crumbs[1]["position"], 2);
    }

    #[test]
    fn site_meta_falls_back_to_site_name() {
        let meta = site_meta(&settings(), "/");
        assert_eq!(meta.title, "Deneme");
        assert_eq!(meta.canonical, "https://example.com");
    }
}
