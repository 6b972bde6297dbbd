#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use sqlx::postgres::PgPoolOptions;
use time::OffsetDateTime;
use uuid::Uuid;

use kalem::application::admin::articles::AdminArticleService;
use kalem::application::admin::categories::AdminCategoryService;
use kalem::application::admin::comments::AdminCommentService;
use kalem::application::admin::dashboard::AdminDashboardService;
use kalem::application::admin::pages::AdminPageService;
use kalem::application::admin::settings::AdminSettingsService;
use kalem::application::admin::uploads::{AdminUploadService, UploadError, UploadStore};
use kalem::application::comments::CommentService;
use kalem::application::feed::FeedService;
use kalem::application::page::PageService;
use kalem::application::pagination::{Page, PageRequest};
use kalem::application::repos::{
    ArticleListScope, ArticleQueryFilter, ArticlesRepo, ArticlesWriteRepo, AuthorsRepo,
    CategoriesRepo, CommentModerationFilter, CommentsRepo, CreateArticleParams,
    CreateCategoryParams, CreateCommentParams, CreatePageParams, PagesRepo, RepoError,
    SettingsRepo, UpdateArticleParams, UpdateCategoryParams, UpdatePageParams,
};
use kalem::application::sitemap::SitemapService;
use kalem::domain::entities::{
    ArticleListRecord, ArticleRecord, AuthorRecord, CategoryRecord, CategoryWithCount,
    CommentListRecord, CommentRecord, SiteSettingsRecord, StaticPageRecord,
};
use kalem::infra::db::PostgresRepositories;
use kalem::infra::http::{AdminState, HttpState};

pub fn ts(offset_secs: i64) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(1_700_000_000 + offset_secs).unwrap()
}

pub fn category(name: &str, slug: &str) -> CategoryRecord {
    CategoryRecord {
        id: Uuid::new_v4(),
        name: name.to_string(),
        slug: slug.to_string(),
        created_at: ts(0),
        updated_at: ts(0),
    }
}

pub fn author(name: &str) -> AuthorRecord {
    AuthorRecord {
        id: Uuid::new_v4(),
        name: name.to_string(),
        bio: String::new(),
        avatar_url: String::new(),
        created_at: ts(0),
    }
}

pub fn article(
    title: &str,
    slug: &str,
    category: &CategoryRecord,
    author: &AuthorRecord,
    published: bool,
    created_at: OffsetDateTime,
) -> ArticleRecord {
    ArticleRecord {
        id: Uuid::new_v4(),
        title: title.to_string(),
        slug: slug.to_string(),
        excerpt: format!("{title} hakkında kısa özet."),
        body: format!("## Giriş\n\n{title} içeriği.\n\n## Devamı\n\nDaha fazla ayrıntı."),
        cover_image: String::new(),
        published,
        focus_keyword: None,
        category_id: category.id,
        author_id: author.id,
        created_at,
        updated_at: created_at,
    }
}

pub fn static_page(slug: &str, title: &str, active: bool) -> StaticPageRecord {
    StaticPageRecord {
        id: Uuid::new_v4(),
        slug: slug.to_string(),
        title: title.to_string(),
        body: format!("{title} sayfa içeriği."),
        active,
        meta_title: None,
        meta_description: None,
        created_at: ts(0),
        updated_at: ts(0),
    }
}

pub fn settings(site_name: &str, public_site_url: &str) -> SiteSettingsRecord {
    let mut record = SiteSettingsRecord::defaults(ts(0));
    record.site_name = site_name.to_string();
    record.public_site_url = public_site_url.to_string();
    record
}

/// In-memory stand-in for the Postgres repositories. Every trait method
/// mirrors the SQL behavior the services rely on: listing order, scope
/// filtering, duplicate slug detection, and `NotFound` on missing rows.
#[derive(Default)]
pub struct MemoryRepos {
    pub articles: Mutex<Vec<ArticleRecord>>,
    pub categories: Mutex<Vec<CategoryRecord>>,
    pub comments: Mutex<Vec<CommentRecord>>,
    pub pages: Mutex<Vec<StaticPageRecord>>,
    pub settings: Mutex<Option<SiteSettingsRecord>>,
    pub authors: Mutex<Vec<AuthorRecord>>,
}

impl MemoryRepos {
    pub fn seed_article(&self, record: ArticleRecord) {
        self.articles.lock().unwrap().push(record);
    }

    pub fn seed_category(&self, record: CategoryRecord) {
        self.categories.lock().unwrap().push(record);
    }

    pub fn seed_comment(&self, record: CommentRecord) {
        self.comments.lock().unwrap().push(record);
    }

    pub fn seed_page(&self, record: StaticPageRecord) {
        self.pages.lock().unwrap().push(record);
    }

    pub fn seed_settings(&self, record: SiteSettingsRecord) {
        *self.settings.lock().unwrap() = Some(record);
    }

    pub fn seed_author(&self, record: AuthorRecord) {
        self.authors.lock().unwrap().push(record);
    }

    fn to_list_record(&self, record: &ArticleRecord) -> ArticleListRecord {
        let category_rows = self.categories.lock().unwrap();
        let author_rows = self.authors.lock().unwrap();
        let category = category_rows.iter().find(|c| c.id == record.category_id);
        let author = author_rows.iter().find(|a| a.id == record.author_id);

        ArticleListRecord {
            id: record.id,
            title: record.title.clone(),
            slug: record.slug.clone(),
            excerpt: record.excerpt.clone(),
            cover_image: record.cover_image.clone(),
            published: record.published,
            category_name: category.map(|c| c.name.clone()).unwrap_or_default(),
            category_slug: category.map(|c| c.slug.clone()).unwrap_or_default(),
            author_name: author.map(|a| a.name.clone()).unwrap_or_default(),
            created_at: record.created_at,
        }
    }

    fn visible(record: &ArticleRecord, scope: ArticleListScope) -> bool {
        match scope {
            ArticleListScope::Public => record.published,
            ArticleListScope::Admin => true,
        }
    }
}

#[async_trait]
impl ArticlesRepo for MemoryRepos {
    async fn list_articles(
        &self,
        scope: ArticleListScope,
        filter: &ArticleQueryFilter,
        page: PageRequest,
    ) -> Result<Page<ArticleListRecord>, RepoError> {
        let mut matching: Vec<ArticleRecord> = self
            .articles
            .lock()
            .unwrap()
            .iter()
            .filter(|a| Self::visible(a, scope))
            .filter(|a| filter.category_id.is_none_or(|id| a.category_id == id))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        let items = matching
            .iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .map(|a| self.to_list_record(a))
            .collect();

        Ok(Page::new(items, page, total))
    }

    async fn recent_articles(
        &self,
        scope: ArticleListScope,
        limit: u32,
    ) -> Result<Vec<ArticleListRecord>, RepoError> {
        let mut matching: Vec<ArticleRecord> = self
            .articles
            .lock()
            .unwrap()
            .iter()
            .filter(|a| Self::visible(a, scope))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit as usize);

        Ok(matching.iter().map(|a| self.to_list_record(a)).collect())
    }

    async fn related_articles(
        &self,
        article_id: Uuid,
        category_id: Uuid,
        limit: u32,
    ) -> Result<Vec<ArticleListRecord>, RepoError> {
        let mut matching: Vec<ArticleRecord> = self
            .articles
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.published && a.category_id == category_id && a.id != article_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit as usize);

        Ok(matching.iter().map(|a| self.to_list_record(a)).collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ArticleRecord>, RepoError> {
        Ok(self
            .articles
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.slug == slug)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ArticleRecord>, RepoError> {
        Ok(self
            .articles
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError> {
        Ok(self.articles.lock().unwrap().iter().any(|a| a.slug == slug))
    }

    async fn all_published_for_sitemap(&self) -> Result<Vec<ArticleRecord>, RepoError> {
        Ok(self
            .articles
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.published)
            .cloned()
            .collect())
    }

    async fn count_articles(&self, scope: ArticleListScope) -> Result<u64, RepoError> {
        Ok(self
            .articles
            .lock()
            .unwrap()
            .iter()
            .filter(|a| Self::visible(a, scope))
            .count() as u64)
    }
}

#[async_trait]
impl ArticlesWriteRepo for MemoryRepos {
    async fn create_article(
        &self,
        params: CreateArticleParams,
    ) -> Result<ArticleRecord, RepoError> {
        let mut rows = self.articles.lock().unwrap();
        if rows.iter().any(|a| a.slug == params.slug) {
            return Err(RepoError::Duplicate {
                constraint: "articles_slug_key".to_string(),
            });
        }

        let now = OffsetDateTime::now_utc();
        let record = ArticleRecord {
            id: Uuid::new_v4(),
            title: params.title,
            slug: params.slug,
            excerpt: params.excerpt,
            body: params.body,
            cover_image: params.cover_image,
            published: params.published,
            focus_keyword: params.focus_keyword,
            category_id: params.category_id,
            author_id: params.author_id,
            created_at: now,
            updated_at: now,
        };
        rows.push(record.clone());
        Ok(record)
    }

    async fn update_article(
        &self,
        params: UpdateArticleParams,
    ) -> Result<ArticleRecord, RepoError> {
        let mut rows = self.articles.lock().unwrap();
        let record = rows
            .iter_mut()
            .find(|a| a.id == params.id)
            .ok_or(RepoError::NotFound)?;

        record.title = params.title;
        record.slug = params.slug;
        record.excerpt = params.excerpt;
        record.body = params.body;
        record.cover_image = params.cover_image;
        record.published = params.published;
        record.focus_keyword = params.focus_keyword;
        record.category_id = params.category_id;
        record.updated_at = OffsetDateTime::now_utc();
        Ok(record.clone())
    }

    async fn set_published(&self, id: Uuid, published: bool) -> Result<ArticleRecord, RepoError> {
        let mut rows = self.articles.lock().unwrap();
        let record = rows
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(RepoError::NotFound)?;
        record.published = published;
        record.updated_at = OffsetDateTime::now_utc();
        Ok(record.clone())
    }

    async fn delete_article(&self, id: Uuid) -> Result<(), RepoError> {
        let mut rows = self.articles.lock().unwrap();
        let before = rows.len();
        rows.retain(|a| a.id != id);
        if rows.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl CategoriesRepo for MemoryRepos {
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, RepoError> {
        let mut rows = self.categories.lock().unwrap().clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError> {
        let categories = self.list_categories().await?;
        let articles = self.articles.lock().unwrap();
        Ok(categories
            .into_iter()
            .map(|category| {
                let article_count = articles
                    .iter()
                    .filter(|a| a.published && a.category_id == category.id)
                    .count() as i64;
                CategoryWithCount {
                    category,
                    article_count,
                }
            })
            .collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<CategoryRecord>, RepoError> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.slug == slug)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CategoryRecord>, RepoError> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .any(|c| c.slug == slug))
    }

    async fn create_category(
        &self,
        params: CreateCategoryParams,
    ) -> Result<CategoryRecord, RepoError> {
        let mut rows = self.categories.lock().unwrap();
        if rows.iter().any(|c| c.slug == params.slug) {
            return Err(RepoError::Duplicate {
                constraint: "categories_slug_key".to_string(),
            });
        }

        let now = OffsetDateTime::now_utc();
        let record = CategoryRecord {
            id: Uuid::new_v4(),
            name: params.name,
            slug: params.slug,
            created_at: now,
            updated_at: now,
        };
        rows.push(record.clone());
        Ok(record)
    }

    async fn update_category(
        &self,
        params: UpdateCategoryParams,
    ) -> Result<CategoryRecord, RepoError> {
        let mut rows = self.categories.lock().unwrap();
        if rows
            .iter()
            .any(|c| c.slug == params.slug && c.id != params.id)
        {
            return Err(RepoError::Duplicate {
                constraint: "categories_slug_key".to_string(),
            });
        }

        let record = rows
            .iter_mut()
            .find(|c| c.id == params.id)
            .ok_or(RepoError::NotFound)?;
        record.name = params.name;
        record.slug = params.slug;
        record.updated_at = OffsetDateTime::now_utc();
        Ok(record.clone())
    }

    async fn delete_category(&self, id: Uuid) -> Result<(), RepoError> {
        let mut rows = self.categories.lock().unwrap();
        let before = rows.len();
        rows.retain(|c| c.id != id);
        if rows.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn count_articles_in(&self, id: Uuid) -> Result<u64, RepoError> {
        Ok(self
            .articles
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.category_id == id)
            .count() as u64)
    }
}

#[async_trait]
impl CommentsRepo for MemoryRepos {
    async fn approved_for_article(
        &self,
        article_id: Uuid,
    ) -> Result<Vec<CommentRecord>, RepoError> {
        let mut rows: Vec<CommentRecord> = self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.article_id == article_id && c.approved)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rows)
    }

    async fn list_for_moderation(
        &self,
        filter: CommentModerationFilter,
    ) -> Result<Vec<CommentListRecord>, RepoError> {
        let articles = self.articles.lock().unwrap().clone();
        let mut rows: Vec<CommentListRecord> = self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| match filter {
                CommentModerationFilter::All => true,
                CommentModerationFilter::Pending => !c.approved,
                CommentModerationFilter::Approved => c.approved,
            })
            .map(|comment| {
                let article = articles.iter().find(|a| a.id == comment.article_id);
                CommentListRecord {
                    comment: comment.clone(),
                    article_title: article.map(|a| a.title.clone()).unwrap_or_default(),
                    article_slug: article.map(|a| a.slug.clone()).unwrap_or_default(),
                }
            })
            .collect();
        rows.sort_by(|a, b| b.comment.created_at.cmp(&a.comment.created_at));
        Ok(rows)
    }

    async fn create_comment(
        &self,
        params: CreateCommentParams,
    ) -> Result<CommentRecord, RepoError> {
        let record = CommentRecord {
            id: Uuid::new_v4(),
            article_id: params.article_id,
            author_name: params.author_name,
            author_email: params.author_email,
            body: params.body,
            approved: false,
            admin_reply: None,
            admin_reply_at: None,
            created_at: OffsetDateTime::now_utc(),
        };
        self.comments.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn set_approved(&self, id: Uuid, approved: bool) -> Result<CommentRecord, RepoError> {
        let mut rows = self.comments.lock().unwrap();
        let record = rows
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepoError::NotFound)?;
        record.approved = approved;
        Ok(record.clone())
    }

    async fn set_admin_reply(&self, id: Uuid, reply: &str) -> Result<CommentRecord, RepoError> {
        let mut rows = self.comments.lock().unwrap();
        let record = rows
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepoError::NotFound)?;
        record.admin_reply = Some(reply.to_string());
        record.admin_reply_at = Some(OffsetDateTime::now_utc());
        Ok(record.clone())
    }

    async fn delete_comment(&self, id: Uuid) -> Result<(), RepoError> {
        let mut rows = self.comments.lock().unwrap();
        let before = rows.len();
        rows.retain(|c| c.id != id);
        if rows.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn count_pending(&self) -> Result<u64, RepoError> {
        Ok(self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| !c.approved)
            .count() as u64)
    }

    async fn count_comments(&self) -> Result<u64, RepoError> {
        Ok(self.comments.lock().unwrap().len() as u64)
    }
}

#[async_trait]
impl PagesRepo for MemoryRepos {
    async fn list_pages(&self) -> Result<Vec<StaticPageRecord>, RepoError> {
        let mut rows = self.pages.lock().unwrap().clone();
        rows.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(rows)
    }

    async fn active_pages(&self) -> Result<Vec<StaticPageRecord>, RepoError> {
        let mut rows: Vec<StaticPageRecord> = self
            .pages
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.active)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rows)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<StaticPageRecord>, RepoError> {
        Ok(self
            .pages
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.slug == slug)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<StaticPageRecord>, RepoError> {
        Ok(self
            .pages
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn create_page(&self, params: CreatePageParams) -> Result<StaticPageRecord, RepoError> {
        let mut rows = self.pages.lock().unwrap();
        if rows.iter().any(|p| p.slug == params.slug) {
            return Err(RepoError::Duplicate {
                constraint: "static_pages_slug_key".to_string(),
            });
        }

        let now = OffsetDateTime::now_utc();
        let record = StaticPageRecord {
            id: Uuid::new_v4(),
            slug: params.slug,
            title: params.title,
            body: params.body,
            active: params.active,
            meta_title: params.meta_title,
            meta_description: params.meta_description,
            created_at: now,
            updated_at: now,
        };
        rows.push(record.clone());
        Ok(record)
    }

    async fn update_page(&self, params: UpdatePageParams) -> Result<StaticPageRecord, RepoError> {
        let mut rows = self.pages.lock().unwrap();
        let record = rows
            .iter_mut()
            .find(|p| p.id == params.id)
            .ok_or(RepoError::NotFound)?;
        record.title = params.title;
        record.body = params.body;
        record.active = params.active;
        record.meta_title = params.meta_title;
        record.meta_description = params.meta_description;
        record.updated_at = OffsetDateTime::now_utc();
        Ok(record.clone())
    }
}

#[async_trait]
impl SettingsRepo for MemoryRepos {
    async fn load(&self) -> Result<Option<SiteSettingsRecord>, RepoError> {
        Ok(self.settings.lock().unwrap().clone())
    }

    async fn save(&self, settings: &SiteSettingsRecord) -> Result<SiteSettingsRecord, RepoError> {
        *self.settings.lock().unwrap() = Some(settings.clone());
        Ok(settings.clone())
    }
}

#[async_trait]
impl AuthorsRepo for MemoryRepos {
    async fn first_author(&self) -> Result<Option<AuthorRecord>, RepoError> {
        Ok(self.authors.lock().unwrap().first().cloned())
    }

    async fn create_author(&self, name: &str) -> Result<AuthorRecord, RepoError> {
        let record = AuthorRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            bio: String::new(),
            avatar_url: String::new(),
            created_at: OffsetDateTime::now_utc(),
        };
        self.authors.lock().unwrap().push(record.clone());
        Ok(record)
    }
}

#[derive(Default)]
pub struct MemoryUploadStore {
    files: Mutex<HashMap<String, Bytes>>,
}

#[async_trait]
impl UploadStore for MemoryUploadStore {
    async fn store(&self, filename: &str, bytes: Bytes) -> Result<(), UploadError> {
        self.files
            .lock()
            .unwrap()
            .insert(filename.to_string(), bytes);
        Ok(())
    }

    async fn read(&self, filename: &str) -> Result<Option<Bytes>, UploadError> {
        Ok(self.files.lock().unwrap().get(filename).cloned())
    }
}

/// A pool that never connects; tests exercise the in-memory repos only and
/// stay away from the `/_health/db` routes.
fn lazy_repositories() -> Arc<PostgresRepositories> {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost/kalem_test")
        .expect("lazy pool");
    Arc::new(PostgresRepositories::new(pool))
}

pub fn build_http_state(repos: Arc<MemoryRepos>) -> HttpState {
    let articles: Arc<dyn ArticlesRepo> = repos.clone();
    let categories: Arc<dyn CategoriesRepo> = repos.clone();
    let comments: Arc<dyn CommentsRepo> = repos.clone();
    let pages: Arc<dyn PagesRepo> = repos.clone();
    let settings: Arc<dyn SettingsRepo> = repos.clone();
    let authors: Arc<dyn AuthorsRepo> = repos.clone();

    HttpState {
        feed: FeedService::new(articles.clone(), categories.clone(), comments.clone()),
        pages: PageService::new(pages.clone()),
        comments: CommentService::new(comments, articles.clone()),
        sitemap: SitemapService::new(articles, categories, pages),
        settings,
        authors,
        uploads: AdminUploadService::new(Arc::new(MemoryUploadStore::default())),
        db: lazy_repositories(),
    }
}

pub fn build_admin_state(repos: Arc<MemoryRepos>) -> AdminState {
    let articles: Arc<dyn ArticlesRepo> = repos.clone();
    let articles_write: Arc<dyn ArticlesWriteRepo> = repos.clone();
    let categories: Arc<dyn CategoriesRepo> = repos.clone();
    let comments: Arc<dyn CommentsRepo> = repos.clone();
    let pages: Arc<dyn PagesRepo> = repos.clone();
    let settings: Arc<dyn SettingsRepo> = repos.clone();
    let authors: Arc<dyn AuthorsRepo> = repos.clone();

    AdminState {
        dashboard: AdminDashboardService::new(
            articles.clone(),
            categories.clone(),
            comments.clone(),
        ),
        articles: AdminArticleService::new(articles, articles_write, authors),
        categories: AdminCategoryService::new(categories),
        comments: AdminCommentService::new(comments),
        pages: AdminPageService::new(pages),
        settings: AdminSettingsService::new(settings),
        uploads: AdminUploadService::new(Arc::new(MemoryUploadStore::default())),
        db: lazy_repositories(),
    }
}
