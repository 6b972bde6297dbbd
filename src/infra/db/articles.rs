use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::pagination::{Page, PageRequest},
    application::repos::{
        ArticleListScope, ArticleQueryFilter, ArticlesRepo, ArticlesWriteRepo,
        CreateArticleParams, RepoError, UpdateArticleParams,
    },
    domain::entities::{ArticleListRecord, ArticleRecord},
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct ArticleRow {
    id: Uuid,
    title: String,
    slug: String,
    excerpt: String,
    body: String,
    cover_image: String,
    published: bool,
    focus_keyword: Option<String>,
    category_id: Uuid,
    author_id: Uuid,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ArticleRow> for ArticleRecord {
    fn from(row: ArticleRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            slug: row.slug,
            excerpt: row.excerpt,
            body: row.body,
            cover_image: row.cover_image,
            published: row.published,
            focus_keyword: row.focus_keyword,
            category_id: row.category_id,
            author_id: row.author_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ArticleListRow {
    id: Uuid,
    title: String,
    slug: String,
    excerpt: String,
    cover_image: String,
    published: bool,
    category_name: String,
    category_slug: String,
    author_name: String,
    created_at: OffsetDateTime,
}

impl From<ArticleListRow> for ArticleListRecord {
    fn from(row: ArticleListRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            slug: row.slug,
            excerpt: row.excerpt,
            cover_image: row.cover_image,
            published: row.published,
            category_name: row.category_name,
            category_slug: row.category_slug,
            author_name: row.author_name,
            created_at: row.created_at,
        }
    }
}

const ARTICLE_COLUMNS: &str = "id, title, slug, excerpt, body, cover_image, published, \
     focus_keyword, category_id, author_id, created_at, updated_at";

const LIST_SELECT: &str = "SELECT a.id, a.title, a.slug, a.excerpt, a.cover_image, \
     a.published, c.name AS category_name, c.slug AS category_slug, \
     au.name AS author_name, a.created_at \
     FROM articles a \
     INNER JOIN categories c ON c.id = a.category_id \
     INNER JOIN authors au ON au.id = a.author_id";

fn scope_clause(scope: ArticleListScope) -> &'static str {
    match scope {
        ArticleListScope::Public => " WHERE a.published = TRUE",
        ArticleListScope::Admin => " WHERE TRUE",
    }
}

#[async_trait]
impl ArticlesRepo for PostgresRepositories {
    async fn list_articles(
        &self,
        scope: ArticleListScope,
        filter: &ArticleQueryFilter,
        page: PageRequest,
    ) -> Result<Page<ArticleListRecord>, RepoError> {
        let mut sql = format!("{LIST_SELECT}{}", scope_clause(scope));
        let mut count_sql = format!(
            "SELECT COUNT(*) FROM articles a{}",
            scope_clause(scope)
        );
        if filter.category_id.is_some() {
            sql.push_str(" AND a.category_id = $1");
            count_sql.push_str(" AND a.category_id = $1");
        }
        sql.push_str(" ORDER BY a.created_at DESC LIMIT ");
        sql.push_str(&page.limit().to_string());
        sql.push_str(" OFFSET ");
        sql.push_str(&page.offset().to_string());

        let mut query = sqlx::query_as::<_, ArticleListRow>(&sql);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(category_id) = filter.category_id {
            query = query.bind(category_id);
            count_query = count_query.bind(category_id);
        }

        let rows = query
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        let total = count_query
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        let items = rows.into_iter().map(ArticleListRecord::from).collect();
        Ok(Page::new(items, page, total.max(0) as u64))
    }

    async fn recent_articles(
        &self,
        scope: ArticleListScope,
        limit: u32,
    ) -> Result<Vec<ArticleListRecord>, RepoError> {
        let sql = format!(
            "{LIST_SELECT}{} ORDER BY a.created_at DESC LIMIT $1",
            scope_clause(scope)
        );
        let rows = sqlx::query_as::<_, ArticleListRow>(&sql)
            .bind(i64::from(limit))
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ArticleListRecord::from).collect())
    }

    async fn related_articles(
        &self,
        article_id: Uuid,
        category_id: Uuid,
        limit: u32,
    ) -> Result<Vec<ArticleListRecord>, RepoError> {
        let sql = format!(
            "{LIST_SELECT} WHERE a.published = TRUE AND a.category_id = $1 AND a.id <> $2 \
             ORDER BY a.created_at DESC LIMIT $3"
        );
        let rows = sqlx::query_as::<_, ArticleListRow>(&sql)
            .bind(category_id)
            .bind(article_id)
            .bind(i64::from(limit))
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ArticleListRecord::from).collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ArticleRecord>, RepoError> {
        let row = sqlx::query_as::<_, ArticleRow>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ArticleRecord::from))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ArticleRecord>, RepoError> {
        let row = sqlx::query_as::<_, ArticleRow>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ArticleRecord::from))
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM articles WHERE slug = $1)",
        )
        .bind(slug)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(exists)
    }

    async fn all_published_for_sitemap(&self) -> Result<Vec<ArticleRecord>, RepoError> {
        let rows = sqlx::query_as::<_, ArticleRow>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE published = TRUE \
             ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ArticleRecord::from).collect())
    }

    async fn count_articles(&self, scope: ArticleListScope) -> Result<u64, RepoError> {
        let sql = format!("SELECT COUNT(*) FROM articles a{}", scope_clause(scope));
        let total = sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(total.max(0) as u64)
    }
}

#[async_trait]
impl ArticlesWriteRepo for PostgresRepositories {
    async fn create_article(
        &self,
        params: CreateArticleParams,
    ) -> Result<ArticleRecord, RepoError> {
        let row = sqlx::query_as::<_, ArticleRow>(&format!(
            "INSERT INTO articles (title, slug, excerpt, body, cover_image, published, \
             focus_keyword, category_id, author_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {ARTICLE_COLUMNS}"
        ))
        .bind(&params.title)
        .bind(&params.slug)
        .bind(&params.excerpt)
        .bind(&params.body)
        .bind(&params.cover_image)
        .bind(params.published)
        .bind(&params.focus_keyword)
        .bind(params.category_id)
        .bind(params.author_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(ArticleRecord::from(row))
    }

    async fn update_article(
        &self,
        params: UpdateArticleParams,
    ) -> Result<ArticleRecord, RepoError> {
        let row = sqlx::query_as::<_, ArticleRow>(&format!(
            "UPDATE articles SET title = $2, slug = $3, excerpt = $4, body = $5, \
             cover_image = $6, published = $7, focus_keyword = $8, category_id = $9, \
             updated_at = now() \
             WHERE id = $1 \
             RETURNING {ARTICLE_COLUMNS}"
        ))
        .bind(params.id)
        .bind(&params.title)
        .bind(&params.slug)
        .bind(&params.excerpt)
        .bind(&params.body)
        .bind(&params.cover_image)
        .bind(params.published)
        .bind(&params.focus_keyword)
        .bind(params.category_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(ArticleRecord::from(row))
    }

    async fn set_published(&self, id: Uuid, published: bool) -> Result<ArticleRecord, RepoError> {
        let row = sqlx::query_as::<_, ArticleRow>(&format!(
            "UPDATE articles SET published = $2, updated_at = now() \
             WHERE id = $1 RETURNING {ARTICLE_COLUMNS}"
        ))
        .bind(id)
        .bind(published)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(ArticleRecord::from(row))
    }

    async fn delete_article(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
