//! Static page management.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::application::admin::ensure_non_empty;
use crate::application::page::{PageError, PageService};
use crate::application::repos::{PagesRepo, RepoError, UpdatePageParams};
use crate::domain::entities::StaticPageRecord;

#[derive(Debug, Error)]
pub enum AdminPageError {
    #[error("constraint violation: {0}")]
    ConstraintViolation(&'static str),
    #[error("page not found")]
    NotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<PageError> for AdminPageError {
    fn from(err: PageError) -> Self {
        match err {
            PageError::NotFound => AdminPageError::NotFound,
            PageError::Repo(repo) => AdminPageError::Repo(repo),
            PageError::Render(_) => AdminPageError::ConstraintViolation("body"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpdatePageCommand {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub active: bool,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

#[derive(Clone)]
pub struct AdminPageService {
    pages: Arc<dyn PagesRepo>,
    seeder: PageService,
}

impl AdminPageService {
    pub fn new(pages: Arc<dyn PagesRepo>) -> Self {
        let seeder = PageService::new(pages.clone());
        Self { pages, seeder }
    }

    /// Lists every static page, creating the defaults that are missing so a
    /// fresh install shows the whole set.
    pub async fn list(&self) -> Result<Vec<StaticPageRecord>, AdminPageError> {
        self.seeder.seed_defaults().await?;
        Ok(self.pages.list_pages().await?)
    }

    pub async fn load_by_slug(&self, slug: &str) -> Result<StaticPageRecord, AdminPageError> {
        self.pages
            .find_by_slug(slug)
            .await?
            .ok_or(AdminPageError::NotFound)
    }

    pub async fn update(
        &self,
        command: UpdatePageCommand,
    ) -> Result<StaticPageRecord, AdminPageError> {
        ensure_non_empty(&command.title, "title").map_err(AdminPageError::ConstraintViolation)?;

        let params = UpdatePageParams {
            id: command.id,
            title: command.title,
            body: command.body,
            active: command.active,
            meta_title: command.meta_title.filter(|v| !v.trim().is_empty()),
            meta_description: command.meta_description.filter(|v| !v.trim().is_empty()),
        };

        match self.pages.update_page(params).await {
            Ok(page) => Ok(page),
            Err(RepoError::NotFound) => Err(AdminPageError::NotFound),
            Err(err) => Err(err.into()),
        }
    }
}
