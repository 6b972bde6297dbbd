//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::application::pagination::{Page, PageRequest, PaginationError};
use crate::domain::entities::{
    ArticleListRecord, ArticleRecord, AuthorRecord, CategoryRecord, CategoryWithCount,
    CommentListRecord, CommentRecord, SiteSettingsRecord, StaticPageRecord,
};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
    #[error(transparent)]
    Pagination(#[from] PaginationError),
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Which articles a listing query may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleListScope {
    /// Published articles only.
    Public,
    /// Everything, drafts included.
    Admin,
}

#[derive(Debug, Clone, Default)]
pub struct ArticleQueryFilter {
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct CreateArticleParams {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub body: String,
    pub cover_image: String,
    pub published: bool,
    pub focus_keyword: Option<String>,
    pub category_id: Uuid,
    pub author_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct UpdateArticleParams {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub body: String,
    pub cover_image: String,
    pub published: bool,
    pub focus_keyword: Option<String>,
    pub category_id: Uuid,
}

#[async_trait]
pub trait ArticlesRepo: Send + Sync {
    async fn list_articles(
        &self,
        scope: ArticleListScope,
        filter: &ArticleQueryFilter,
        page: PageRequest,
    ) -> Result<Page<ArticleListRecord>, RepoError>;

    async fn recent_articles(
        &self,
        scope: ArticleListScope,
        limit: u32,
    ) -> Result<Vec<ArticleListRecord>, RepoError>;

    /// Published articles in the same category, excluding the article itself.
    async fn related_articles(
        &self,
        article_id: Uuid,
        category_id: Uuid,
        limit: u32,
    ) -> Result<Vec<ArticleListRecord>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ArticleRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ArticleRecord>, RepoError>;

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError>;

    async fn all_published_for_sitemap(&self) -> Result<Vec<ArticleRecord>, RepoError>;

    async fn count_articles(&self, scope: ArticleListScope) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait ArticlesWriteRepo: Send + Sync {
    async fn create_article(&self, params: CreateArticleParams)
    -> Result<ArticleRecord, RepoError>;

    async fn update_article(&self, params: UpdateArticleParams)
    -> Result<ArticleRecord, RepoError>;

    async fn set_published(&self, id: Uuid, published: bool) -> Result<ArticleRecord, RepoError>;

    async fn delete_article(&self, id: Uuid) -> Result<(), RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateCategoryParams {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone)]
pub struct UpdateCategoryParams {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

#[async_trait]
pub trait CategoriesRepo: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, RepoError>;

    /// Categories together with their published article counts.
    async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<CategoryRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CategoryRecord>, RepoError>;

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError>;

    async fn create_category(&self, params: CreateCategoryParams)
    -> Result<CategoryRecord, RepoError>;

    async fn update_category(&self, params: UpdateCategoryParams)
    -> Result<CategoryRecord, RepoError>;

    async fn delete_category(&self, id: Uuid) -> Result<(), RepoError>;

    async fn count_articles_in(&self, id: Uuid) -> Result<u64, RepoError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentModerationFilter {
    #[default]
    All,
    Pending,
    Approved,
}

#[derive(Debug, Clone)]
pub struct CreateCommentParams {
    pub article_id: Uuid,
    pub author_name: String,
    pub author_email: String,
    pub body: String,
}

#[async_trait]
pub trait CommentsRepo: Send + Sync {
    async fn approved_for_article(&self, article_id: Uuid)
    -> Result<Vec<CommentRecord>, RepoError>;

    async fn list_for_moderation(
        &self,
        filter: CommentModerationFilter,
    ) -> Result<Vec<CommentListRecord>, RepoError>;

    async fn create_comment(&self, params: CreateCommentParams)
    -> Result<CommentRecord, RepoError>;

    async fn set_approved(&self, id: Uuid, approved: bool) -> Result<CommentRecord, RepoError>;

    async fn set_admin_reply(&self, id: Uuid, reply: &str) -> Result<CommentRecord, RepoError>;

    async fn delete_comment(&self, id: Uuid) -> Result<(), RepoError>;

    async fn count_pending(&self) -> Result<u64, RepoError>;

    async fn count_comments(&self) -> Result<u64, RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreatePageParams {
    pub slug: String,
    pub title: String,
    pub body: String,
    pub active: bool,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdatePageParams {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub active: bool,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

#[async_trait]
pub trait PagesRepo: Send + Sync {
    async fn list_pages(&self) -> Result<Vec<StaticPageRecord>, RepoError>;

    async fn active_pages(&self) -> Result<Vec<StaticPageRecord>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<StaticPageRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<StaticPageRecord>, RepoError>;

    async fn create_page(&self, params: CreatePageParams)
    -> Result<StaticPageRecord, RepoError>;

    async fn update_page(&self, params: UpdatePageParams)
    -> Result<StaticPageRecord, RepoError>;
}

#[async_trait]
pub trait SettingsRepo: Send + Sync {
    /// The singleton settings row, when it has been created.
    async fn load(&self) -> Result<Option<SiteSettingsRecord>, RepoError>;

    async fn save(&self, settings: &SiteSettingsRecord) -> Result<SiteSettingsRecord, RepoError>;
}

#[async_trait]
pub trait AuthorsRepo: Send + Sync {
    async fn first_author(&self) -> Result<Option<AuthorRecord>, RepoError>;

    async fn create_author(&self, name: &str) -> Result<AuthorRecord, RepoError>;
}
