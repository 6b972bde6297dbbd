//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleRecord {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    /// Stored body: HTML from the editor, or legacy Markdown.
    pub body: String,
    pub cover_image: String,
    pub published: bool,
    pub focus_keyword: Option<String>,
    pub category_id: Uuid,
    pub author_id: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Article joined with its category and author names for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleListRecord {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub cover_image: String,
    pub published: bool,
    pub category_name: String,
    pub category_slug: String,
    pub author_name: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRecord {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryWithCount {
    pub category: CategoryRecord,
    pub article_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentRecord {
    pub id: Uuid,
    pub article_id: Uuid,
    pub author_name: String,
    pub author_email: String,
    pub body: String,
    pub approved: bool,
    pub admin_reply: Option<String>,
    pub admin_reply_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

/// Comment joined with the owning article's title and slug for moderation lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentListRecord {
    pub comment: CommentRecord,
    pub article_title: String,
    pub article_slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticPageRecord {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub body: String,
    pub active: bool,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorRecord {
    pub id: Uuid,
    pub name: String,
    pub bio: String,
    pub avatar_url: String,
    pub created_at: OffsetDateTime,
}

/// The single site-wide settings row (id = 1).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteSettingsRecord {
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
    pub updated_at: OffsetDateTime,
}

impl SiteSettingsRecord {
    /// Default settings seeded when the singleton row is absent.
    pub fn defaults(now: OffsetDateTime) -> Self {
        Self {
            site_name: "Kalem".to_string(),
            site_description: String::new(),
            logo_url: String::new(),
            favicon_url: String::new(),
            meta_title: String::new(),
            meta_description: String::new(),
            meta_keywords: String::new(),
            google_analytics_id: String::new(),
            google_tag_manager_id: String::new(),
            facebook_pixel_id: String::new(),
            custom_head_html: String::new(),
            custom_footer_html: String::new(),
            posts_per_page: 10,
            layout_width: "max-w-6xl".to_string(),
            sidebar_about_image: String::new(),
            public_site_url: String::new(),
            updated_at: now,
        }
    }
}
