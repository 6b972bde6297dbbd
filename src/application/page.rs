//! Static page lookup and the default page set.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::render::{RenderError, render_article_body};
use crate::application::repos::{CreatePageParams, PagesRepo, RepoError};
use crate::domain::entities::StaticPageRecord;

/// The site ships with a fixed set of static pages. Missing ones are created
/// with a placeholder body the first time the admin listing loads.
const DEFAULT_PAGES: &[(&str, &str)] = &[
    ("hizmetler", "Hizmetler"),
    ("hakkimda", "Hakkımda"),
    ("iletisim", "İletişim"),
    ("e-ticaret", "E-Ticaret"),
    ("pazaryerleri", "Pazaryerleri"),
    ("gizlilik-politikasi", "Gizlilik Politikası"),
    ("site-haritasi", "Site Haritası"),
];

#[derive(Debug, Error)]
pub enum PageError {
    #[error("page not found")]
    NotFound,
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// A static page with its body run through the content pipeline.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub page: StaticPageRecord,
    pub body_html: String,
}

#[derive(Clone)]
pub struct PageService {
    pages: Arc<dyn PagesRepo>,
}

impl PageService {
    pub fn new(pages: Arc<dyn PagesRepo>) -> Self {
        Self { pages }
    }

    /// Looks up an active page by slug. `Ok(None)` means the slug matched no
    /// active page; the public router turns that into a 404.
    pub async fn active_page(&self, slug: &str) -> Result<Option<RenderedPage>, PageError> {
        let Some(page) = self.pages.find_by_slug(slug).await? else {
            return Ok(None);
        };
        if !page.active {
            return Ok(None);
        }

        let rendered = render_article_body(&page.body)?;
        let body_html = format!("{}{}", rendered.lead_html, rendered.remainder_html);

        Ok(Some(RenderedPage { page, body_html }))
    }

    /// Active pages in listing order, used for the public navigation bar.
    pub async fn navigation(&self) -> Result<Vec<StaticPageRecord>, PageError> {
        Ok(self.pages.active_pages().await?)
    }

    /// Creates any of the default pages that do not exist yet. Safe to run
    /// repeatedly; existing pages are never touched.
    pub async fn seed_defaults(&self) -> Result<(), PageError> {
        for (slug, title) in DEFAULT_PAGES {
            if self.pages.find_by_slug(slug).await?.is_some() {
                continue;
            }

            self.pages
                .create_page(CreatePageParams {
                    slug: (*slug).to_string(),
                    title: (*title).to_string(),
                    body: format!(
                        "<h1>{title}</h1><p>Bu sayfa içeriği admin panelinden düzenlenebilir.</p>"
                    ),
                    active: true,
                    meta_title: None,
                    meta_description: None,
                })
                .await?;
            info!(target: "application::page", slug, "seeded default page");
        }

        Ok(())
    }
}
