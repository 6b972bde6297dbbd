use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{CreatePageParams, PagesRepo, RepoError, UpdatePageParams},
    domain::entities::StaticPageRecord,
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct StaticPageRow {
    id: Uuid,
    slug: String,
    title: String,
    body: String,
    active: bool,
    meta_title: Option<String>,
    meta_description: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<StaticPageRow> for StaticPageRecord {
    fn from(row: StaticPageRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            title: row.title,
            body: row.body,
            active: row.active,
            meta_title: row.meta_title,
            meta_description: row.meta_description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PAGE_COLUMNS: &str =
    "id, slug, title, body, active, meta_title, meta_description, created_at, updated_at";

#[async_trait]
impl PagesRepo for PostgresRepositories {
    async fn list_pages(&self) -> Result<Vec<StaticPageRecord>, RepoError> {
        let rows = sqlx::query_as::<_, StaticPageRow>(&format!(
            "SELECT {PAGE_COLUMNS} FROM static_pages ORDER BY title"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(StaticPageRecord::from).collect())
    }

    async fn active_pages(&self) -> Result<Vec<StaticPageRecord>, RepoError> {
        let rows = sqlx::query_as::<_, StaticPageRow>(&format!(
            "SELECT {PAGE_COLUMNS} FROM static_pages WHERE active = TRUE ORDER BY title"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(StaticPageRecord::from).collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<StaticPageRecord>, RepoError> {
        let row = sqlx::query_as::<_, StaticPageRow>(&format!(
            "SELECT {PAGE_COLUMNS} FROM static_pages WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(StaticPageRecord::from))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<StaticPageRecord>, RepoError> {
        let row = sqlx::query_as::<_, StaticPageRow>(&format!(
            "SELECT {PAGE_COLUMNS} FROM static_pages WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(StaticPageRecord::from))
    }

    async fn create_page(&self, params: CreatePageParams) -> Result<StaticPageRecord, RepoError> {
        let row = sqlx::query_as::<_, StaticPageRow>(&format!(
            "INSERT INTO static_pages (slug, title, body, active, meta_title, meta_description) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {PAGE_COLUMNS}"
        ))
        .bind(&params.slug)
        .bind(&params.title)
        .bind(&params.body)
        .bind(params.active)
        .bind(&params.meta_title)
        .bind(&params.meta_description)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(StaticPageRecord::from(row))
    }

    async fn update_page(&self, params: UpdatePageParams) -> Result<StaticPageRecord, RepoError> {
        let row = sqlx::query_as::<_, StaticPageRow>(&format!(
            "UPDATE static_pages SET title = $2, body = $3, active = $4, \
             meta_title = $5, meta_description = $6, updated_at = now() \
             WHERE id = $1 RETURNING {PAGE_COLUMNS}"
        ))
        .bind(params.id)
        .bind(&params.title)
        .bind(&params.body)
        .bind(params.active)
        .bind(&params.meta_title)
        .bind(&params.meta_description)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(StaticPageRecord::from(row))
    }
}
