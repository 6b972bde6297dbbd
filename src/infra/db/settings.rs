use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    application::repos::{RepoError, SettingsRepo},
    domain::entities::SiteSettingsRecord,
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct SiteSettingsRow {
    site_name: String,
    site_description: String,
    logo_url: String,
    favicon_url: String,
    meta_title: String,
    meta_description: String,
    meta_keywords: String,
    google_analytics_id: String,
    google_tag_manager_id: String,
    facebook_pixel_id: String,
    custom_head_html: String,
    custom_footer_html: String,
    posts_per_page: i32,
    layout_width: String,
    sidebar_about_image: String,
    public_site_url: String,
    updated_at: OffsetDateTime,
}

impl From<SiteSettingsRow> for SiteSettingsRecord {
    fn from(row: SiteSettingsRow) -> Self {
        Self {
            site_name: row.site_name,
            site_description: row.site_description,
            logo_url: row.logo_url,
            favicon_url: row.favicon_url,
            meta_title: row.meta_title,
            meta_description: row.meta_description,
            meta_keywords: row.meta_keywords,
            google_analytics_id: row.google_analytics_id,
            google_tag_manager_id: row.google_tag_manager_id,
            facebook_pixel_id: row.facebook_pixel_id,
            custom_head_html: row.custom_head_html,
            custom_footer_html: row.custom_footer_html,
            posts_per_page: row.posts_per_page,
            layout_width: row.layout_width,
            sidebar_about_image: row.sidebar_about_image,
            public_site_url: row.public_site_url,
            updated_at: row.updated_at,
        }
    }
}

const SETTINGS_COLUMNS: &str = "site_name, site_description, logo_url, favicon_url, \
     meta_title, meta_description, meta_keywords, google_analytics_id, \
     google_tag_manager_id, facebook_pixel_id, custom_head_html, custom_footer_html, \
     posts_per_page, layout_width, sidebar_about_image, public_site_url, updated_at";

#[async_trait]
impl SettingsRepo for PostgresRepositories {
    async fn load(&self) -> Result<Option<SiteSettingsRecord>, RepoError> {
        let row = sqlx::query_as::<_, SiteSettingsRow>(&format!(
            "SELECT {SETTINGS_COLUMNS} FROM site_settings WHERE id = 1"
        ))
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(SiteSettingsRecord::from))
    }

    async fn save(&self, settings: &SiteSettingsRecord) -> Result<SiteSettingsRecord, RepoError> {
        let row = sqlx::query_as::<_, SiteSettingsRow>(&format!(
            r#"
            INSERT INTO site_settings (
                id, site_name, site_description, logo_url, favicon_url,
                meta_title, meta_description, meta_keywords, google_analytics_id,
                google_tag_manager_id, facebook_pixel_id, custom_head_html,
                custom_footer_html, posts_per_page, layout_width,
                sidebar_about_image, public_site_url, updated_at
            ) VALUES (1, $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            ON CONFLICT (id) DO UPDATE SET
                site_name = EXCLUDED.site_name,
                site_description = EXCLUDED.site_description,
                logo_url = EXCLUDED.logo_url,
                favicon_url = EXCLUDED.favicon_url,
                meta_title = EXCLUDED.meta_title,
                meta_description = EXCLUDED.meta_description,
                meta_keywords = EXCLUDED.meta_keywords,
                google_analytics_id = EXCLUDED.google_analytics_id,
                google_tag_manager_id = EXCLUDED.google_tag_manager_id,
                facebook_pixel_id = EXCLUDED.facebook_pixel_id,
                custom_head_html = EXCLUDED.custom_head_html,
                custom_footer_html = EXCLUDED.custom_footer_html,
                posts_per_page = EXCLUDED.posts_per_page,
                layout_width = EXCLUDED.layout_width,
                sidebar_about_image = EXCLUDED.sidebar_about_image,
                public_site_url = EXCLUDED.public_site_url,
                updated_at = EXCLUDED.updated_at
            RETURNING {SETTINGS_COLUMNS}
            "#
        ))
        .bind(&settings.site_name)
        .bind(&settings.site_description)
        .bind(&settings.logo_url)
        .bind(&settings.favicon_url)
        .bind(&settings.meta_title)
        .bind(&settings.meta_description)
        .bind(&settings.meta_keywords)
        .bind(&settings.google_analytics_id)
        .bind(&settings.google_tag_manager_id)
        .bind(&settings.facebook_pixel_id)
        .bind(&settings.custom_head_html)
        .bind(&settings.custom_footer_html)
        .bind(settings.posts_per_page)
        .bind(&settings.layout_width)
        .bind(&settings.sidebar_about_image)
        .bind(&settings.public_site_url)
        .bind(settings.updated_at)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(SiteSettingsRecord::from(row))
    }
}
