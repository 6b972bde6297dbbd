//! Site settings: a singleton row edited through one admin form.

use std::sync::Arc;

use thiserror::Error;
use time::OffsetDateTime;

use crate::application::admin::ensure_non_empty;
use crate::application::repos::{RepoError, SettingsRepo};
use crate::domain::entities::SiteSettingsRecord;

#[derive(Debug, Error)]
pub enum AdminSettingsError {
    #[error("constraint violation: {0}")]
    ConstraintViolation(&'static str),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct UpdateSettingsCommand {
    pub site_name: String,
    pub site_description: String,
    pub logo_url: String,
    pub favicon_url: String,
    pub meta_title: String,
    pub meta_description: String,
    pub meta_keywords: String,
    pub google_analytics_id: String,
    pub google_tag_manager_id: String,
    pub facebook_pixel_id: String,
    pub custom_head_html: String,
    pub custom_footer_html: String,
    pub posts_per_page: i32,
    pub layout_width: String,
    pub sidebar_about_image: String,
    pub public_site_url: String,
}

#[derive(Clone)]
pub struct AdminSettingsService {
    settings: Arc<dyn SettingsRepo>,
}

impl AdminSettingsService {
    pub fn new(settings: Arc<dyn SettingsRepo>) -> Self {
        Self { settings }
    }

    /// Loads the settings row, falling back to defaults when the singleton
    /// has never been saved.
    pub async fn load_or_default(&self) -> Result<SiteSettingsRecord, AdminSettingsError> {
        match self.settings.load().await? {
            Some(settings) => Ok(settings),
            None => Ok(SiteSettingsRecord::defaults(OffsetDateTime::now_utc())),
        }
    }

    pub async fn update(
        &self,
        command: UpdateSettingsCommand,
    ) -> Result<SiteSettingsRecord, AdminSettingsError> {
        ensure_non_empty(&command.site_name, "site_name")
            .map_err(AdminSettingsError::ConstraintViolation)?;
        if command.posts_per_page < 1 {
            return Err(AdminSettingsError::ConstraintViolation("posts_per_page"));
        }

        let record = SiteSettingsRecord {
            site_name: command.site_name,
            site_description: command.site_description,
            logo_url: command.logo_url,
            favicon_url: command.favicon_url,
            meta_title: command.meta_title,
            meta_description: command.meta_description,
            meta_keywords: command.meta_keywords,
            google_analytics_id: command.google_analytics_id,
            google_tag_manager_id: command.google_tag_manager_id,
            facebook_pixel_id: command.facebook_pixel_id,
            custom_head_html: command.custom_head_html,
            custom_footer_html: command.custom_footer_html,
            posts_per_page: command.posts_per_page,
            layout_width: command.layout_width,
            sidebar_about_image: command.sidebar_about_image,
            public_site_url: command.public_site_url,
            updated_at: OffsetDateTime::now_utc(),
        };

        Ok(self.settings.save(&record).await?)
    }
}
