//! Article authoring: create, edit, publish, delete.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::application::admin::ensure_non_empty;
use crate::application::pagination::{Page, PageRequest};
use crate::application::repos::{
    ArticleListScope, ArticleQueryFilter, ArticlesRepo, ArticlesWriteRepo, AuthorsRepo,
    CreateArticleParams, RepoError, UpdateArticleParams,
};
use crate::domain::entities::{ArticleListRecord, ArticleRecord};
use crate::domain::slug::{SlugAsyncError, SlugError, generate_unique_slug_async};

const DEFAULT_AUTHOR_NAME: &str = "Admin";

#[derive(Debug, Error)]
pub enum AdminArticleError {
    #[error("constraint violation: {0}")]
    ConstraintViolation(&'static str),
    #[error("article not found")]
    NotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct CreateArticleCommand {
    pub title: String,
    pub excerpt: String,
    pub body: String,
    pub cover_image: String,
    pub published: bool,
    pub focus_keyword: Option<String>,
    pub category_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct UpdateArticleCommand {
    pub id: Uuid,
    pub title: String,
    pub excerpt: String,
    pub body: String,
    pub cover_image: String,
    pub published: bool,
    pub focus_keyword: Option<String>,
    pub category_id: Uuid,
}

#[derive(Clone)]
pub struct AdminArticleService {
    reader: Arc<dyn ArticlesRepo>,
    writer: Arc<dyn ArticlesWriteRepo>,
    authors: Arc<dyn AuthorsRepo>,
}

impl AdminArticleService {
    pub fn new(
        reader: Arc<dyn ArticlesRepo>,
        writer: Arc<dyn ArticlesWriteRepo>,
        authors: Arc<dyn AuthorsRepo>,
    ) -> Self {
        Self {
            reader,
            writer,
            authors,
        }
    }

    pub async fn list(
        &self,
        page: u64,
        per_page: u32,
    ) -> Result<Page<ArticleListRecord>, AdminArticleError> {
        let request = PageRequest::new(page, per_page).map_err(RepoError::from)?;
        let listing = self
            .reader
            .list_articles(
                ArticleListScope::Admin,
                &ArticleQueryFilter::default(),
                request,
            )
            .await?;
        Ok(listing)
    }

    pub async fn load(&self, id: Uuid) -> Result<ArticleRecord, AdminArticleError> {
        self.reader
            .find_by_id(id)
            .await?
            .ok_or(AdminArticleError::NotFound)
    }

    pub async fn create(
        &self,
        command: CreateArticleCommand,
    ) -> Result<ArticleRecord, AdminArticleError> {
        ensure_non_empty(&command.title, "title")
            .map_err(AdminArticleError::ConstraintViolation)?;
        ensure_non_empty(&command.body, "body").map_err(AdminArticleError::ConstraintViolation)?;

        let author = self.default_author().await?;
        let slug = self.unique_slug(&command.title).await?;

        let params = CreateArticleParams {
            title: command.title,
            slug,
            excerpt: command.excerpt,
            body: command.body,
            cover_image: command.cover_image,
            published: command.published,
            focus_keyword: command.focus_keyword,
            category_id: command.category_id,
            author_id: author,
        };

        match self.writer.create_article(params.clone()).await {
            Ok(article) => Ok(article),
            // Lost a slug race: another writer claimed the probe result
            // between the existence check and the insert. Regenerate once.
            Err(RepoError::Duplicate { .. }) => {
                let retry_slug = self.unique_slug(&params.title).await?;
                let retry = CreateArticleParams {
                    slug: retry_slug,
                    ..params
                };
                Ok(self.writer.create_article(retry).await?)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn update(
        &self,
        command: UpdateArticleCommand,
    ) -> Result<ArticleRecord, AdminArticleError> {
        ensure_non_empty(&command.title, "title")
            .map_err(AdminArticleError::ConstraintViolation)?;
        ensure_non_empty(&command.body, "body").map_err(AdminArticleError::ConstraintViolation)?;

        let existing = self.load(command.id).await?;

        // Slugs are assigned once at creation. Edits never touch them, so
        // published URLs stay stable even when the title changes.
        let slug = existing.slug;

        let params = UpdateArticleParams {
            id: command.id,
            title: command.title,
            slug,
            excerpt: command.excerpt,
            body: command.body,
            cover_image: command.cover_image,
            published: command.published,
            focus_keyword: command.focus_keyword,
            category_id: command.category_id,
        };

        Ok(self.writer.update_article(params).await?)
    }

    pub async fn set_published(
        &self,
        id: Uuid,
        published: bool,
    ) -> Result<ArticleRecord, AdminArticleError> {
        match self.writer.set_published(id, published).await {
            Ok(article) => Ok(article),
            Err(RepoError::NotFound) => Err(AdminArticleError::NotFound),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AdminArticleError> {
        match self.writer.delete_article(id).await {
            Ok(()) => Ok(()),
            Err(RepoError::NotFound) => Err(AdminArticleError::NotFound),
            Err(err) => Err(err.into()),
        }
    }

    async fn unique_slug(&self, title: &str) -> Result<String, AdminArticleError> {
        let reader = self.reader.clone();
        match generate_unique_slug_async(title, move |candidate| {
            let reader = reader.clone();
            let candidate = candidate.to_string();
            async move { reader.slug_exists(&candidate).await.map(|taken| !taken) }
        })
        .await
        {
            Ok(slug) => Ok(slug),
            Err(SlugAsyncError::Slug(err)) => match err {
                SlugError::EmptyInput | SlugError::Unrepresentable { .. } => {
                    Err(AdminArticleError::ConstraintViolation("title"))
                }
                SlugError::Exhausted { .. } => Err(AdminArticleError::ConstraintViolation("slug")),
            },
            Err(SlugAsyncError::Predicate(err)) => Err(AdminArticleError::Repo(err)),
        }
    }

    /// The site is single-author. The first author row is used for every
    /// article; it is created on demand with the site owner's name.
    async fn default_author(&self) -> Result<Uuid, AdminArticleError> {
        if let Some(author) = self.authors.first_author().await? {
            return Ok(author.id);
        }
        let created = self.authors.create_author(DEFAULT_AUTHOR_NAME).await?;
        Ok(created.id)
    }
}
