use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use time::OffsetDateTime;
use time::macros::format_description;

use crate::application::error::{ErrorReport, HttpError};
use crate::application::feed::{ArticleContext, HomeContext, ListingContext};
use crate::application::metadata::PageMeta;
use crate::application::pagination::Page;
use crate::application::render::TocEntry;
use crate::domain::entities::{
    ArticleListRecord, CategoryWithCount, CommentRecord, SiteSettingsRecord, StaticPageRecord,
};

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(chrome: LayoutChrome) -> Response {
    let content = ErrorPageView::not_found();
    let view = LayoutContext::new(chrome, content);
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

/// Site-wide layout data shared by all public pages: branding, navigation,
/// tracking snippets, and page metadata.
#[derive(Clone)]
pub struct LayoutChrome {
    pub site_name: String,
    pub logo_url: String,
    pub favicon_url: String,
    pub layout_width: String,
    pub navigation: Vec<NavigationLinkView>,
    pub google_analytics_id: String,
    pub google_tag_manager_id: String,
    pub facebook_pixel_id: String,
    pub custom_head_html: String,
    pub custom_footer_html: String,
    pub meta: PageMetaView,
}

impl LayoutChrome {
    pub fn build(
        settings: &SiteSettingsRecord,
        nav_pages: &[StaticPageRecord],
        meta: PageMeta,
    ) -> Self {
        let mut navigation = vec![
            NavigationLinkView {
                label: "Ana Sayfa".to_string(),
                href: "/".to_string(),
            },
            NavigationLinkView {
                label: "Blog".to_string(),
                href: "/blog".to_string(),
            },
        ];
        navigation.extend(nav_pages.iter().map(|page| NavigationLinkView {
            label: page.title.clone(),
            href: format!("/{}", page.slug),
        }));

        Self {
            site_name: settings.site_name.clone(),
            logo_url: settings.logo_url.clone(),
            favicon_url: settings.favicon_url.clone(),
            layout_width: settings.layout_width.clone(),
            navigation,
            google_analytics_id: settings.google_analytics_id.clone(),
            google_tag_manager_id: settings.google_tag_manager_id.clone(),
            facebook_pixel_id: settings.facebook_pixel_id.clone(),
            custom_head_html: settings.custom_head_html.clone(),
            custom_footer_html: settings.custom_footer_html.clone(),
            meta: PageMetaView::from(meta),
        }
    }

    pub fn with_meta(self, meta: PageMeta) -> Self {
        Self {
            meta: PageMetaView::from(meta),
            ..self
        }
    }
}

#[derive(Clone)]
pub struct NavigationLinkView {
    pub label: String,
    pub href: String,
}

#[derive(Clone)]
pub struct PageMetaView {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub canonical: String,
    pub og_title: String,
    pub og_description: String,
    pub og_image: String,
    pub og_type: String,
    pub json_ld: String,
}

impl From<PageMeta> for PageMetaView {
    fn from(meta: PageMeta) -> Self {
        Self {
            title: meta.title,
            description: meta.description,
            keywords: meta.keywords.unwrap_or_default(),
            canonical: meta.canonical,
            og_title: meta.og_title,
            og_description: meta.og_description,
            og_image: meta.og_image.unwrap_or_default(),
            og_type: meta.og_type.to_string(),
            json_ld: meta.json_ld.unwrap_or_default(),
        }
    }
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub chrome: LayoutChrome,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, content: T) -> Self {
        Self { chrome, content }
    }
}

#[derive(Clone)]
pub struct ArticleCard {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub cover_image: String,
    pub category_name: String,
    pub category_slug: String,
    pub author_name: String,
    pub display_date: String,
    pub iso_date: String,
}

impl From<&ArticleListRecord> for ArticleCard {
    fn from(record: &ArticleListRecord) -> Self {
        Self {
            slug: record.slug.clone(),
            title: record.title.clone(),
            excerpt: record.excerpt.clone(),
            cover_image: record.cover_image.clone(),
            category_name: record.category_name.clone(),
            category_slug: record.category_slug.clone(),
            author_name: record.author_name.clone(),
            display_date: format_display_date(record.created_at),
            iso_date: format_iso_date(record.created_at),
        }
    }
}

#[derive(Clone)]
pub struct CategorySummary {
    pub name: String,
    pub slug: String,
    pub count: i64,
    pub is_active: bool,
}

fn build_category_summaries(
    categories: &[CategoryWithCount],
    active_slug: Option<&str>,
) -> Vec<CategorySummary> {
    categories
        .iter()
        .map(|entry| CategorySummary {
            name: entry.category.name.clone(),
            slug: entry.category.slug.clone(),
            count: entry.article_count,
            is_active: active_slug == Some(entry.category.slug.as_str()),
        })
        .collect()
}

#[derive(Clone)]
pub struct PageLink {
    pub number: u64,
    pub href: String,
    pub is_current: bool,
}

#[derive(Clone)]
pub struct PaginationView {
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
    pub links: Vec<PageLink>,
    pub show: bool,
}

impl PaginationView {
    pub fn from_page<T>(page: &Page<T>, base_path: &str) -> Self {
        let href = |number: u64| {
            if number == 1 {
                base_path.to_string()
            } else {
                format!("{base_path}?page={number}")
            }
        };

        Self {
            prev_href: page.prev_page().map(href),
            next_href: page.next_page().map(href),
            links: page
                .page_numbers()
                .into_iter()
                .map(|number| PageLink {
                    number,
                    href: href(number),
                    is_current: number == page.page,
                })
                .collect(),
            show: page.total_pages() > 1,
        }
    }
}

pub struct HomeView {
    pub articles: Vec<ArticleCard>,
    pub categories: Vec<CategorySummary>,
}

impl From<&HomeContext> for HomeView {
    fn from(context: &HomeContext) -> Self {
        Self {
            articles: context.recent.iter().map(ArticleCard::from).collect(),
            categories: build_category_summaries(&context.categories, None),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub view: LayoutContext<HomeView>,
}

pub struct ListingView {
    pub heading: String,
    pub articles: Vec<ArticleCard>,
    pub categories: Vec<CategorySummary>,
    pub pagination: PaginationView,
}

impl ListingView {
    pub fn from_context(context: &ListingContext) -> Self {
        let (heading, base_path, active_slug) = match &context.active_category {
            Some(category) => (
                category.name.clone(),
                format!("/kategori/{}", category.slug),
                Some(category.slug.as_str()),
            ),
            None => ("Blog".to_string(), "/blog".to_string(), None),
        };

        Self {
            heading,
            articles: context.articles.items.iter().map(ArticleCard::from).collect(),
            categories: build_category_summaries(&context.categories, active_slug),
            pagination: PaginationView::from_page(&context.articles, &base_path),
        }
    }
}

#[derive(Template)]
#[template(path = "listing.html")]
pub struct ListingTemplate {
    pub view: LayoutContext<ListingView>,
}

#[derive(Clone)]
pub struct TocItemView {
    pub id: String,
    pub text: String,
    pub is_nested: bool,
}

#[derive(Clone)]
pub struct CommentView {
    pub author_name: String,
    pub body: String,
    pub display_date: String,
    pub admin_reply: String,
    pub has_reply: bool,
}

impl From<&CommentRecord> for CommentView {
    fn from(record: &CommentRecord) -> Self {
        Self {
            author_name: record.author_name.clone(),
            body: record.body.clone(),
            display_date: format_display_date(record.created_at),
            admin_reply: record.admin_reply.clone().unwrap_or_default(),
            has_reply: record.admin_reply.is_some(),
        }
    }
}

pub struct ArticleDetailView {
    pub article_id: String,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub cover_image: String,
    pub category_name: String,
    pub category_slug: String,
    pub display_date: String,
    pub iso_date: String,
    pub lead_html: String,
    pub remainder_html: String,
    pub toc: Vec<TocItemView>,
    pub comments: Vec<CommentView>,
    pub related: Vec<ArticleCard>,
    pub recent: Vec<ArticleCard>,
    pub categories: Vec<CategorySummary>,
    pub sidebar_about_image: String,
}

impl ArticleDetailView {
    pub fn from_context(context: &ArticleContext, settings: &SiteSettingsRecord) -> Self {
        Self {
            article_id: context.article.id.to_string(),
            slug: context.article.slug.clone(),
            title: context.article.title.clone(),
            excerpt: context.article.excerpt.clone(),
            cover_image: context.article.cover_image.clone(),
            category_name: context
                .category
                .as_ref()
                .map(|c| c.name.clone())
                .unwrap_or_default(),
            category_slug: context
                .category
                .as_ref()
                .map(|c| c.slug.clone())
                .unwrap_or_default(),
            display_date: format_display_date(context.article.created_at),
            iso_date: format_iso_date(context.article.created_at),
            lead_html: context.rendered.lead_html.clone(),
            remainder_html: context.rendered.remainder_html.clone(),
            toc: build_toc_items(&context.rendered.toc),
            comments: context.comments.iter().map(CommentView::from).collect(),
            related: context.related.iter().map(ArticleCard::from).collect(),
            recent: context.recent.iter().map(ArticleCard::from).collect(),
            categories: build_category_summaries(&context.categories, None),
            sidebar_about_image: settings.sidebar_about_image.clone(),
        }
    }

    pub fn has_toc(&self) -> bool {
        !self.toc.is_empty()
    }
}

fn build_toc_items(entries: &[TocEntry]) -> Vec<TocItemView> {
    entries
        .iter()
        .map(|entry| TocItemView {
            id: entry.id.clone(),
            text: entry.text.clone(),
            is_nested: entry.level == 3,
        })
        .collect()
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct ArticleTemplate {
    pub view: LayoutContext<ArticleDetailView>,
}

pub struct PageView {
    pub title: String,
    pub body_html: String,
}

#[derive(Template)]
#[template(path = "page.html")]
pub struct PageTemplate {
    pub view: LayoutContext<PageView>,
}

pub struct ErrorPageView {
    pub title: String,
    pub message: String,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            title: "Sayfa Bulunamadı".to_string(),
            message: "Aradığınız sayfa mevcut değil. Ana sayfaya dönerek devam edebilirsiniz."
                .to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}

const DISPLAY_DATE: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[day].[month].[year]");
const ISO_DATE: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

pub fn format_display_date(value: OffsetDateTime) -> String {
    value.format(DISPLAY_DATE).unwrap_or_default()
}

pub fn format_iso_date(value: OffsetDateTime) -> String {
    value.format(ISO_DATE).unwrap_or_default()
}
