//! Sitemap and robots.txt generation.
//!
//! Keeps the HTTP layer focused on request/response handling; everything
//! URL-shaped is assembled here from the settings row and the public content.

use std::sync::Arc;

use thiserror::Error;
use time::format_description::well_known::Rfc3339;

use crate::application::repos::{ArticlesRepo, CategoriesRepo, PagesRepo, RepoError};
use crate::domain::entities::SiteSettingsRecord;

/// Service for generating sitemap.xml and robots.txt.
#[derive(Clone)]
pub struct SitemapService {
    articles: Arc<dyn ArticlesRepo>,
    categories: Arc<dyn CategoriesRepo>,
    pages: Arc<dyn PagesRepo>,
}

#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("failed to list articles: {0}")]
    Articles(String),
    #[error("failed to list categories: {0}")]
    Categories(String),
    #[error("failed to list pages: {0}")]
    Pages(String),
}

impl From<RepoError> for SitemapError {
    fn from(err: RepoError) -> Self {
        SitemapError::Articles(err.to_string())
    }
}

impl SitemapService {
    pub fn new(
        articles: Arc<dyn ArticlesRepo>,
        categories: Arc<dyn CategoriesRepo>,
        pages: Arc<dyn PagesRepo>,
    ) -> Self {
        Self {
            articles,
            categories,
            pages,
        }
    }

    /// Generate sitemap.xml content from the static routes, the published
    /// articles, the categories, and the active static pages.
    pub async fn sitemap_xml(
        &self,
        settings: &SiteSettingsRecord,
    ) -> Result<String, SitemapError> {
        let base = normalize_public_site_url(&settings.public_site_url);
        let mut entries = Vec::new();

        entries.push(sitemap_entry(&base, "/", Some(settings.updated_at)));
        entries.push(sitemap_entry(&base, "/blog", None));

        for article in self.articles.all_published_for_sitemap().await? {
            entries.push(sitemap_entry(
                &base,
                &format!("/{}", article.slug),
                Some(article.updated_at),
            ));
        }

        let categories = self
            .categories
            .list_categories()
            .await
            .map_err(|e| SitemapError::Categories(e.to_string()))?;
        for category in categories {
            entries.push(sitemap_entry(
                &base,
                &format!("/kategori/{}", category.slug),
                None,
            ));
        }

        let pages = self
            .pages
            .active_pages()
            .await
            .map_err(|e| SitemapError::Pages(e.to_string()))?;
        for page in pages {
            entries.push(sitemap_entry(
                &base,
                &format!("/{}", page.slug),
                Some(page.updated_at),
            ));
        }

        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
        );
        for entry in entries {
            xml.push_str(&entry);
        }
        xml.push_str("</urlset>\n");
        Ok(xml)
    }

    /// Generate robots.txt content.
    pub fn robots_txt(&self, settings: &SiteSettingsRecord) -> String {
        let base = normalize_public_site_url(&settings.public_site_url);
        let sitemap_url = format!("{base}sitemap.xml");
        format!("User-agent: *\nAllow: /\nDisallow: /uploads/\nSitemap: {sitemap_url}\n")
    }
}

pub fn normalize_public_site_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    format!("{trimmed}/")
}

pub fn canonical_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path == "/" {
        base.to_string()
    } else {
        format!("{base}{path}")
    }
}

fn sitemap_entry(base: &str, path: &str, lastmod: Option<time::OffsetDateTime>) -> String {
    let loc = canonical_url(base, path);
    let lastmod_str = lastmod
        .and_then(|dt| dt.format(&Rfc3339).ok())
        .unwrap_or_default();
    if lastmod_str.is_empty() {
        format!("  <url><loc>{loc}</loc></url>\n")
    } else {
        format!("  <url><loc>{loc}</loc><lastmod>{lastmod_str}</lastmod></url>\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_url_handles_root() {
        assert_eq!(canonical_url("https://example.com/", "/"), "https://example.com");
        assert_eq!(
            canonical_url("https://example.com", "/blog"),
            "https://example.com/blog"
        );
    }

    #[test]
    fn normalizes_trailing_slashes() {
        assert_eq!(
            normalize_public_site_url("https://example.com//"),
            "https://example.com/"
        );
        assert_eq!(
            normalize_public_site_url(" https://example.com "),
            "https://example.com/"
        );
    }
}
