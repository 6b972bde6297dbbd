use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::application::pagination::{Page, PageRequest, PaginationError};
use crate::application::render::{RenderError, RenderedArticle, render_article_body};
use crate::application::repos::{
    ArticleListScope, ArticleQueryFilter, ArticlesRepo, CategoriesRepo, CommentsRepo, RepoError,
};
use crate::domain::entities::{
    ArticleListRecord, ArticleRecord, CategoryRecord, CategoryWithCount, CommentRecord,
};

const RECENT_SIDEBAR_LIMIT: u32 = 5;
const RELATED_LIMIT: u32 = 3;
const HOME_RECENT_LIMIT: u32 = 6;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("unknown category")]
    UnknownCategory,
    #[error("invalid page number: {0}")]
    InvalidPage(String),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<PaginationError> for FeedError {
    fn from(err: PaginationError) -> Self {
        FeedError::Repo(RepoError::Pagination(err))
    }
}

/// Data for the home page: latest writing plus the category rail.
#[derive(Debug, Clone)]
pub struct HomeContext {
    pub recent: Vec<ArticleListRecord>,
    pub categories: Vec<CategoryWithCount>,
}

/// Data for the paginated blog listing, optionally scoped to a category.
#[derive(Debug, Clone)]
pub struct ListingContext {
    pub articles: Page<ArticleListRecord>,
    pub categories: Vec<CategoryWithCount>,
    pub active_category: Option<CategoryRecord>,
}

/// Everything an article page needs: the rendered body, its table of
/// contents, approved comments, and the sidebar content.
#[derive(Debug, Clone)]
pub struct ArticleContext {
    pub article: ArticleRecord,
    pub category: Option<CategoryRecord>,
    pub rendered: RenderedArticle,
    pub comments: Vec<CommentRecord>,
    pub related: Vec<ArticleListRecord>,
    pub recent: Vec<ArticleListRecord>,
    pub categories: Vec<CategoryWithCount>,
}

#[derive(Clone)]
pub struct FeedService {
    articles: Arc<dyn ArticlesRepo>,
    categories: Arc<dyn CategoriesRepo>,
    comments: Arc<dyn CommentsRepo>,
}

impl FeedService {
    pub fn new(
        articles: Arc<dyn ArticlesRepo>,
        categories: Arc<dyn CategoriesRepo>,
        comments: Arc<dyn CommentsRepo>,
    ) -> Self {
        Self {
            articles,
            categories,
            comments,
        }
    }

    pub async fn home(&self) -> Result<HomeContext, FeedError> {
        let recent = self
            .articles
            .recent_articles(ArticleListScope::Public, HOME_RECENT_LIMIT)
            .await?;
        let categories = self.categories.list_with_counts().await?;

        Ok(HomeContext { recent, categories })
    }

    pub async fn listing(&self, page: u64, per_page: u32) -> Result<ListingContext, FeedError> {
        let request = PageRequest::new(page, per_page)?;
        let articles = self
            .articles
            .list_articles(
                ArticleListScope::Public,
                &ArticleQueryFilter::default(),
                request,
            )
            .await?;
        let categories = self.categories.list_with_counts().await?;

        Ok(ListingContext {
            articles,
            categories,
            active_category: None,
        })
    }

    pub async fn category_listing(
        &self,
        slug: &str,
        page: u64,
        per_page: u32,
    ) -> Result<ListingContext, FeedError> {
        let category = self
            .categories
            .find_by_slug(slug)
            .await?
            .ok_or(FeedError::UnknownCategory)?;

        let request = PageRequest::new(page, per_page)?;
        let filter = ArticleQueryFilter {
            category_id: Some(category.id),
        };
        let articles = self
            .articles
            .list_articles(ArticleListScope::Public, &filter, request)
            .await?;
        let categories = self.categories.list_with_counts().await?;

        Ok(ListingContext {
            articles,
            categories,
            active_category: Some(category),
        })
    }

    /// Loads a published article by slug and runs the body pipeline.
    /// Returns `Ok(None)` when no published article carries the slug, so the
    /// caller can fall through to static pages.
    pub async fn article(&self, slug: &str) -> Result<Option<ArticleContext>, FeedError> {
        let Some(article) = self.articles.find_by_slug(slug).await? else {
            return Ok(None);
        };
        if !article.published {
            return Ok(None);
        }

        let rendered = render_article_body(&article.body)?;
        let category = self.categories.find_by_id(article.category_id).await?;
        let comments = self.comments.approved_for_article(article.id).await?;
        let related = self
            .articles
            .related_articles(article.id, article.category_id, RELATED_LIMIT)
            .await?;
        let recent = self
            .articles
            .recent_articles(ArticleListScope::Public, RECENT_SIDEBAR_LIMIT)
            .await?;
        let categories = self.categories.list_with_counts().await?;

        Ok(Some(ArticleContext {
            article,
            category,
            rendered,
            comments,
            related,
            recent,
            categories,
        }))
    }

    pub async fn article_exists(&self, id: Uuid) -> Result<bool, FeedError> {
        Ok(self.articles.find_by_id(id).await?.is_some())
    }
}
