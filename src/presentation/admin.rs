use askama::Template;
use uuid::Uuid;

use crate::application::admin::dashboard::DashboardSnapshot;
use crate::application::repos::CommentModerationFilter;
use crate::domain::entities::{
    ArticleListRecord, ArticleRecord, CategoryWithCount, CommentListRecord, SiteSettingsRecord,
    StaticPageRecord,
};
use crate::presentation::views::{format_display_date, format_iso_date};

#[derive(Clone)]
pub struct AdminNavigationItemView {
    pub label: &'static str,
    pub href: &'static str,
    pub is_active: bool,
}

#[derive(Clone)]
pub struct AdminChrome {
    pub site_name: String,
    pub navigation: Vec<AdminNavigationItemView>,
    pub page_title: String,
}

const ADMIN_SECTIONS: &[(&str, &str)] = &[
    ("Panel", "/"),
    ("Yazılar", "/articles"),
    ("Kategoriler", "/categories"),
    ("Yorumlar", "/comments"),
    ("Sayfalar", "/pages"),
    ("Ayarlar", "/settings"),
];

impl AdminChrome {
    pub fn build(site_name: &str, active_href: &str, page_title: impl Into<String>) -> Self {
        Self {
            site_name: site_name.to_string(),
            navigation: ADMIN_SECTIONS
                .iter()
                .map(|(label, href)| AdminNavigationItemView {
                    label,
                    href,
                    is_active: *href == active_href,
                })
                .collect(),
            page_title: page_title.into(),
        }
    }
}

#[derive(Clone)]
pub struct AdminLayout<T> {
    pub chrome: AdminChrome,
    pub asset_version: String,
    pub content: T,
}

impl<T> AdminLayout<T> {
    pub fn new(chrome: AdminChrome, content: T) -> Self {
        Self {
            chrome,
            asset_version: asset_version(),
            content,
        }
    }
}

fn asset_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[derive(Clone)]
pub struct AdminMetricView {
    pub label: &'static str,
    pub value: u64,
}

#[derive(Clone)]
pub struct AdminDashboardView {
    pub metrics: Vec<AdminMetricView>,
    pub latest_articles: Vec<AdminArticleRowView>,
}

impl From<&DashboardSnapshot> for AdminDashboardView {
    fn from(snapshot: &DashboardSnapshot) -> Self {
        Self {
            metrics: vec![
                AdminMetricView {
                    label: "Toplam yazı",
                    value: snapshot.total_articles,
                },
                AdminMetricView {
                    label: "Yayında",
                    value: snapshot.published_articles,
                },
                AdminMetricView {
                    label: "Kategori",
                    value: snapshot.total_categories,
                },
                AdminMetricView {
                    label: "Yorum",
                    value: snapshot.total_comments,
                },
                AdminMetricView {
                    label: "Bekleyen yorum",
                    value: snapshot.pending_comments,
                },
            ],
            latest_articles: snapshot
                .latest_articles
                .iter()
                .map(AdminArticleRowView::from)
                .collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/dashboard.html")]
pub struct AdminDashboardTemplate {
    pub view: AdminLayout<AdminDashboardView>,
}

#[derive(Clone)]
pub struct AdminArticleRowView {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub category_name: String,
    pub published: bool,
    pub status_label: &'static str,
    pub display_date: String,
    pub edit_href: String,
    pub preview_href: String,
}

impl From<&ArticleListRecord> for AdminArticleRowView {
    fn from(record: &ArticleListRecord) -> Self {
        Self {
            id: record.id.to_string(),
            title: record.title.clone(),
            slug: record.slug.clone(),
            category_name: record.category_name.clone(),
            published: record.published,
            status_label: if record.published {
                "Yayında"
            } else {
                "Taslak"
            },
            display_date: format_display_date(record.created_at),
            edit_href: format!("/articles/{}/edit", record.id),
            preview_href: format!("/{}", record.slug),
        }
    }
}

#[derive(Clone)]
pub struct AdminPaginationView {
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
    pub page: u64,
    pub total_pages: u64,
    pub show: bool,
}

#[derive(Clone)]
pub struct AdminArticleListView {
    pub articles: Vec<AdminArticleRowView>,
    pub pagination: AdminPaginationView,
}

#[derive(Template)]
#[template(path = "admin/articles.html")]
pub struct AdminArticlesTemplate {
    pub view: AdminLayout<AdminArticleListView>,
}

#[derive(Clone)]
pub struct AdminCategoryOption {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

#[derive(Clone)]
pub struct AdminArticleFormView {
    pub heading: String,
    pub form_action: String,
    pub submit_label: &'static str,
    pub title: String,
    pub excerpt: String,
    pub body: String,
    pub cover_image: String,
    pub focus_keyword: String,
    pub published: bool,
    pub categories: Vec<AdminCategoryOption>,
}

impl AdminArticleFormView {
    pub fn create(categories: &[CategoryWithCount]) -> Self {
        Self {
            heading: "Yeni Yazı".to_string(),
            form_action: "/articles/create".to_string(),
            submit_label: "Oluştur",
            title: String::new(),
            excerpt: String::new(),
            body: String::new(),
            cover_image: String::new(),
            focus_keyword: String::new(),
            published: false,
            categories: category_options(categories, None),
        }
    }

    pub fn edit(article: &ArticleRecord, categories: &[CategoryWithCount]) -> Self {
        Self {
            heading: format!("Düzenle: {}", article.title),
            form_action: format!("/articles/{}/edit", article.id),
            submit_label: "Kaydet",
            title: article.title.clone(),
            excerpt: article.excerpt.clone(),
            body: article.body.clone(),
            cover_image: article.cover_image.clone(),
            focus_keyword: article.focus_keyword.clone().unwrap_or_default(),
            published: article.published,
            categories: category_options(categories, Some(article.category_id)),
        }
    }
}

fn category_options(
    categories: &[CategoryWithCount],
    selected: Option<Uuid>,
) -> Vec<AdminCategoryOption> {
    categories
        .iter()
        .map(|entry| AdminCategoryOption {
            id: entry.category.id.to_string(),
            name: entry.category.name.clone(),
            selected: selected == Some(entry.category.id),
        })
        .collect()
}

#[derive(Template)]
#[template(path = "admin/article_form.html")]
pub struct AdminArticleFormTemplate {
    pub view: AdminLayout<AdminArticleFormView>,
}

#[derive(Clone)]
pub struct AdminCategoryRowView {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub article_count: i64,
    pub display_date: String,
}

#[derive(Clone)]
pub struct AdminCategoryListView {
    pub categories: Vec<AdminCategoryRowView>,
}

impl AdminCategoryListView {
    pub fn build(categories: &[CategoryWithCount]) -> Self {
        Self {
            categories: categories
                .iter()
                .map(|entry| AdminCategoryRowView {
                    id: entry.category.id.to_string(),
                    name: entry.category.name.clone(),
                    slug: entry.category.slug.clone(),
                    article_count: entry.article_count,
                    display_date: format_display_date(entry.category.created_at),
                })
                .collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/categories.html")]
pub struct AdminCategoriesTemplate {
    pub view: AdminLayout<AdminCategoryListView>,
}

#[derive(Clone)]
pub struct AdminCommentFilterView {
    pub label: &'static str,
    pub href: &'static str,
    pub is_active: bool,
}

#[derive(Clone)]
pub struct AdminCommentRowView {
    pub id: String,
    pub author_name: String,
    pub author_email: String,
    pub body: String,
    pub approved: bool,
    pub status_label: &'static str,
    pub article_title: String,
    pub article_href: String,
    pub admin_reply: String,
    pub has_reply: bool,
    pub display_date: String,
}

impl From<&CommentListRecord> for AdminCommentRowView {
    fn from(record: &CommentListRecord) -> Self {
        Self {
            id: record.comment.id.to_string(),
            author_name: record.comment.author_name.clone(),
            author_email: record.comment.author_email.clone(),
            body: record.comment.body.clone(),
            approved: record.comment.approved,
            status_label: if record.comment.approved {
                "Onaylı"
            } else {
                "Bekliyor"
            },
            article_title: record.article_title.clone(),
            article_href: format!("/{}", record.article_slug),
            admin_reply: record.comment.admin_reply.clone().unwrap_or_default(),
            has_reply: record.comment.admin_reply.is_some(),
            display_date: format_display_date(record.comment.created_at),
        }
    }
}

#[derive(Clone)]
pub struct AdminCommentListView {
    pub filters: Vec<AdminCommentFilterView>,
    pub comments: Vec<AdminCommentRowView>,
}

impl AdminCommentListView {
    pub fn build(active: CommentModerationFilter, comments: &[CommentListRecord]) -> Self {
        let filters = vec![
            AdminCommentFilterView {
                label: "Tümü",
                href: "/comments",
                is_active: matches!(active, CommentModerationFilter::All),
            },
            AdminCommentFilterView {
                label: "Bekleyen",
                href: "/comments?filter=pending",
                is_active: matches!(active, CommentModerationFilter::Pending),
            },
            AdminCommentFilterView {
                label: "Onaylı",
                href: "/comments?filter=approved",
                is_active: matches!(active, CommentModerationFilter::Approved),
            },
        ];

        Self {
            filters,
            comments: comments.iter().map(AdminCommentRowView::from).collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/comments.html")]
pub struct AdminCommentsTemplate {
    pub view: AdminLayout<AdminCommentListView>,
}

#[derive(Clone)]
pub struct AdminPageRowView {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub active: bool,
    pub status_label: &'static str,
    pub display_date: String,
    pub edit_href: String,
    pub preview_href: String,
}

impl From<&StaticPageRecord> for AdminPageRowView {
    fn from(record: &StaticPageRecord) -> Self {
        Self {
            id: record.id.to_string(),
            title: record.title.clone(),
            slug: record.slug.clone(),
            active: record.active,
            status_label: if record.active { "Aktif" } else { "Pasif" },
            display_date: format_display_date(record.updated_at),
            edit_href: format!("/pages/{}/edit", record.slug),
            preview_href: format!("/{}", record.slug),
        }
    }
}

#[derive(Clone)]
pub struct AdminPageListView {
    pub pages: Vec<AdminPageRowView>,
}

#[derive(Template)]
#[template(path = "admin/pages.html")]
pub struct AdminPagesTemplate {
    pub view: AdminLayout<AdminPageListView>,
}

#[derive(Clone)]
pub struct AdminPageFormView {
    pub heading: String,
    pub form_action: String,
    pub title: String,
    pub body: String,
    pub active: bool,
    pub meta_title: String,
    pub meta_description: String,
}

impl From<&StaticPageRecord> for AdminPageFormView {
    fn from(record: &StaticPageRecord) -> Self {
        Self {
            heading: format!("Sayfa: {}", record.title),
            form_action: format!("/pages/{}", record.id),
            title: record.title.clone(),
            body: record.body.clone(),
            active: record.active,
            meta_title: record.meta_title.clone().unwrap_or_default(),
            meta_description: record.meta_description.clone().unwrap_or_default(),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/page_form.html")]
pub struct AdminPageFormTemplate {
    pub view: AdminLayout<AdminPageFormView>,
}

#[derive(Clone)]
pub struct AdminSettingsFormView {
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
    pub updated_at: String,
}

impl From<&SiteSettingsRecord> for AdminSettingsFormView {
    fn from(record: &SiteSettingsRecord) -> Self {
        Self {
            site_name: record.site_name.clone(),
            site_description: record.site_description.clone(),
            logo_url: record.logo_url.clone(),
            favicon_url: record.favicon_url.clone(),
            meta_title: record.meta_title.clone(),
            meta_description: record.meta_description.clone(),
            meta_keywords: record.meta_keywords.clone(),
            google_analytics_id: record.google_analytics_id.clone(),
            google_tag_manager_id: record.google_tag_manager_id.clone(),
            facebook_pixel_id: record.facebook_pixel_id.clone(),
            custom_head_html: record.custom_head_html.clone(),
            custom_footer_html: record.custom_footer_html.clone(),
            posts_per_page: record.posts_per_page,
            layout_width: record.layout_width.clone(),
            sidebar_about_image: record.sidebar_about_image.clone(),
            public_site_url: record.public_site_url.clone(),
            updated_at: format_iso_date(record.updated_at),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/settings.html")]
pub struct AdminSettingsTemplate {
    pub view: AdminLayout<AdminSettingsFormView>,
}
