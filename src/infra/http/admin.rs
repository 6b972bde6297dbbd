use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Form, Multipart, Path, Query, State},
    http::{StatusCode, header},
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    application::{
        admin::{
            articles::{AdminArticleError, AdminArticleService, CreateArticleCommand, UpdateArticleCommand},
            categories::{AdminCategoryError, AdminCategoryService},
            comments::{AdminCommentError, AdminCommentService},
            dashboard::{AdminDashboardService, DashboardError},
            pages::{AdminPageError, AdminPageService, UpdatePageCommand},
            settings::{AdminSettingsError, AdminSettingsService, UpdateSettingsCommand},
            uploads::{AdminUploadService, UploadError},
        },
        error::HttpError,
        repos::CommentModerationFilter,
    },
    infra::db::PostgresRepositories,
    presentation::admin::{
        AdminArticleFormTemplate, AdminArticleFormView, AdminArticleListView,
        AdminArticleRowView, AdminArticlesTemplate, AdminCategoriesTemplate,
        AdminCategoryListView, AdminChrome, AdminCommentListView, AdminCommentsTemplate,
        AdminDashboardTemplate, AdminDashboardView, AdminLayout, AdminPageFormTemplate,
        AdminPageFormView, AdminPageListView, AdminPageRowView, AdminPagesTemplate,
        AdminPaginationView, AdminSettingsFormView, AdminSettingsTemplate,
    },
    presentation::views::render_template_response,
};

use super::{
    db_health_response,
    middleware::{log_responses, set_request_context},
    repo_error_to_http,
};

const ARTICLES_PER_PAGE: u32 = 20;

#[derive(Clone)]
pub struct AdminState {
    pub dashboard: AdminDashboardService,
    pub articles: AdminArticleService,
    pub categories: AdminCategoryService,
    pub comments: AdminCommentService,
    pub pages: AdminPageService,
    pub settings: AdminSettingsService,
    pub uploads: AdminUploadService,
    pub db: Arc<PostgresRepositories>,
}

pub fn build_admin_router(state: AdminState, upload_body_limit: usize) -> Router {
    Router::new()
        .route("/", get(admin_dashboard))
        .route("/articles", get(admin_articles))
        .route("/articles/new", get(admin_article_new))
        .route("/articles/create", post(admin_article_create))
        .route(
            "/articles/{id}/edit",
            get(admin_article_edit).post(admin_article_update),
        )
        .route("/articles/{id}/publish", post(admin_article_publish))
        .route("/articles/{id}/draft", post(admin_article_draft))
        .route("/articles/{id}/delete", post(admin_article_delete))
        .route("/categories", get(admin_categories))
        .route("/categories/create", post(admin_category_create))
        .route("/categories/{id}/rename", post(admin_category_rename))
        .route("/categories/{id}/delete", post(admin_category_delete))
        .route("/comments", get(admin_comments))
        .route("/comments/{id}/approve", post(admin_comment_approve))
        .route("/comments/{id}/unapprove", post(admin_comment_unapprove))
        .route("/comments/{id}/reply", post(admin_comment_reply))
        .route("/comments/{id}/delete", post(admin_comment_delete))
        .route("/pages", get(admin_pages))
        .route("/pages/{slug}/edit", get(admin_page_edit))
        .route("/pages/{id}", post(admin_page_update))
        .route("/settings", get(admin_settings).post(admin_settings_update))
        .route(
            "/uploads",
            post(admin_upload_store).layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        .route("/static/admin.css", get(admin_stylesheet))
        .route("/_health/db", get(admin_health))
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn load_chrome(
    state: &AdminState,
    active_href: &str,
    page_title: &str,
) -> Result<AdminChrome, HttpError> {
    let settings = state
        .settings
        .load_or_default()
        .await
        .map_err(|err| admin_settings_error("infra::http::admin::load_chrome", err))?;
    Ok(AdminChrome::build(&settings.site_name, active_href, page_title))
}

async fn admin_dashboard(State(state): State<AdminState>) -> Response {
    let chrome = match load_chrome(&state, "/", "Panel").await {
        Ok(chrome) => chrome,
        Err(err) => return err.into_response(),
    };

    match state.dashboard.snapshot().await {
        Ok(snapshot) => {
            let view = AdminLayout::new(chrome, AdminDashboardView::from(&snapshot));
            render_template_response(AdminDashboardTemplate { view }, StatusCode::OK)
        }
        Err(DashboardError::Repo(err)) => {
            repo_error_to_http("infra::http::admin::dashboard", err).into_response()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ArticlesQuery {
    page: Option<u64>,
}

async fn admin_articles(
    State(state): State<AdminState>,
    Query(query): Query<ArticlesQuery>,
) -> Response {
    let chrome = match load_chrome(&state, "/articles", "Yazılar").await {
        Ok(chrome) => chrome,
        Err(err) => return err.into_response(),
    };

    let page = query.page.unwrap_or(1).max(1);
    match state.articles.list(page, ARTICLES_PER_PAGE).await {
        Ok(listing) => {
            let rows: Vec<AdminArticleRowView> =
                listing.items.iter().map(AdminArticleRowView::from).collect();
            let pagination = AdminPaginationView {
                prev_href: listing.prev_page().map(articles_page_href),
                next_href: listing.next_page().map(articles_page_href),
                page: listing.page,
                total_pages: listing.total_pages(),
                show: listing.total_pages() > 1,
            };
            let view = AdminLayout::new(
                chrome,
                AdminArticleListView {
                    articles: rows,
                    pagination,
                },
            );
            render_template_response(AdminArticlesTemplate { view }, StatusCode::OK)
        }
        Err(err) => admin_article_error("infra::http::admin::articles", err).into_response(),
    }
}

fn articles_page_href(page: u64) -> String {
    if page == 1 {
        "/articles".to_string()
    } else {
        format!("/articles?page={page}")
    }
}

async fn admin_article_new(State(state): State<AdminState>) -> Response {
    let chrome = match load_chrome(&state, "/articles", "Yeni Yazı").await {
        Ok(chrome) => chrome,
        Err(err) => return err.into_response(),
    };

    match state.categories.list().await {
        Ok(categories) => {
            let view = AdminLayout::new(chrome, AdminArticleFormView::create(&categories));
            render_template_response(AdminArticleFormTemplate { view }, StatusCode::OK)
        }
        Err(err) => admin_category_error("infra::http::admin::article_new", err).into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct ArticleForm {
    title: String,
    #[serde(default)]
    excerpt: String,
    body: String,
    #[serde(default)]
    cover_image: String,
    #[serde(default)]
    focus_keyword: String,
    category_id: Uuid,
    #[serde(default)]
    published: Option<String>,
}

impl ArticleForm {
    fn focus_keyword(&self) -> Option<String> {
        let trimmed = self.focus_keyword.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

async fn admin_article_create(
    State(state): State<AdminState>,
    Form(form): Form<ArticleForm>,
) -> Response {
    let command = CreateArticleCommand {
        title: form.title.clone(),
        excerpt: form.excerpt.clone(),
        body: form.body.clone(),
        cover_image: form.cover_image.clone(),
        published: form.published.is_some(),
        focus_keyword: form.focus_keyword(),
        category_id: form.category_id,
    };

    match state.articles.create(command).await {
        Ok(_) => Redirect::to("/articles").into_response(),
        Err(err) => {
            admin_article_error("infra::http::admin::article_create", err).into_response()
        }
    }
}

async fn admin_article_edit(State(state): State<AdminState>, Path(id): Path<Uuid>) -> Response {
    let chrome = match load_chrome(&state, "/articles", "Yazıyı Düzenle").await {
        Ok(chrome) => chrome,
        Err(err) => return err.into_response(),
    };

    let article = match state.articles.load(id).await {
        Ok(article) => article,
        Err(err) => {
            return admin_article_error("infra::http::admin::article_edit", err).into_response();
        }
    };
    let categories = match state.categories.list().await {
        Ok(categories) => categories,
        Err(err) => {
            return admin_category_error("infra::http::admin::article_edit", err).into_response();
        }
    };

    let view = AdminLayout::new(chrome, AdminArticleFormView::edit(&article, &categories));
    render_template_response(AdminArticleFormTemplate { view }, StatusCode::OK)
}

async fn admin_article_update(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
    Form(form): Form<ArticleForm>,
) -> Response {
    let command = UpdateArticleCommand {
        id,
        title: form.title.clone(),
        excerpt: form.excerpt.clone(),
        body: form.body.clone(),
        cover_image: form.cover_image.clone(),
        published: form.published.is_some(),
        focus_keyword: form.focus_keyword(),
        category_id: form.category_id,
    };

    match state.articles.update(command).await {
        Ok(_) => Redirect::to("/articles").into_response(),
        Err(err) => {
            admin_article_error("infra::http::admin::article_update", err).into_response()
        }
    }
}

async fn admin_article_publish(State(state): State<AdminState>, Path(id): Path<Uuid>) -> Response {
    set_published(&state, id, true).await
}

async fn admin_article_draft(State(state): State<AdminState>, Path(id): Path<Uuid>) -> Response {
    set_published(&state, id, false).await
}

async fn set_published(state: &AdminState, id: Uuid, published: bool) -> Response {
    match state.articles.set_published(id, published).await {
        Ok(_) => Redirect::to("/articles").into_response(),
        Err(err) => {
            admin_article_error("infra::http::admin::article_set_published", err).into_response()
        }
    }
}

async fn admin_article_delete(State(state): State<AdminState>, Path(id): Path<Uuid>) -> Response {
    match state.articles.delete(id).await {
        Ok(()) => Redirect::to("/articles").into_response(),
        Err(err) => {
            admin_article_error("infra::http::admin::article_delete", err).into_response()
        }
    }
}

async fn admin_categories(State(state): State<AdminState>) -> Response {
    let chrome = match load_chrome(&state, "/categories", "Kategoriler").await {
        Ok(chrome) => chrome,
        Err(err) => return err.into_response(),
    };

    match state.categories.list().await {
        Ok(categories) => {
            let view = AdminLayout::new(chrome, AdminCategoryListView::build(&categories));
            render_template_response(AdminCategoriesTemplate { view }, StatusCode::OK)
        }
        Err(err) => admin_category_error("infra::http::admin::categories", err).into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct CategoryForm {
    name: String,
}

async fn admin_category_create(
    State(state): State<AdminState>,
    Form(form): Form<CategoryForm>,
) -> Response {
    match state.categories.create(form.name).await {
        Ok(_) => Redirect::to("/categories").into_response(),
        Err(err) => {
            admin_category_error("infra::http::admin::category_create", err).into_response()
        }
    }
}

async fn admin_category_rename(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
    Form(form): Form<CategoryForm>,
) -> Response {
    match state.categories.rename(id, form.name).await {
        Ok(_) => Redirect::to("/categories").into_response(),
        Err(err) => {
            admin_category_error("infra::http::admin::category_rename", err).into_response()
        }
    }
}

async fn admin_category_delete(State(state): State<AdminState>, Path(id): Path<Uuid>) -> Response {
    match state.categories.delete(id).await {
        Ok(()) => Redirect::to("/categories").into_response(),
        Err(err) => {
            admin_category_error("infra::http::admin::category_delete", err).into_response()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CommentsQuery {
    filter: Option<String>,
}

fn parse_comment_filter(raw: Option<&str>) -> CommentModerationFilter {
    match raw {
        Some("pending") => CommentModerationFilter::Pending,
        Some("approved") => CommentModerationFilter::Approved,
        _ => CommentModerationFilter::All,
    }
}

async fn admin_comments(
    State(state): State<AdminState>,
    Query(query): Query<CommentsQuery>,
) -> Response {
    let chrome = match load_chrome(&state, "/comments", "Yorumlar").await {
        Ok(chrome) => chrome,
        Err(err) => return err.into_response(),
    };

    let filter = parse_comment_filter(query.filter.as_deref());
    match state.comments.list(filter).await {
        Ok(comments) => {
            let view = AdminLayout::new(chrome, AdminCommentListView::build(filter, &comments));
            render_template_response(AdminCommentsTemplate { view }, StatusCode::OK)
        }
        Err(err) => admin_comment_error("infra::http::admin::comments", err).into_response(),
    }
}

async fn admin_comment_approve(State(state): State<AdminState>, Path(id): Path<Uuid>) -> Response {
    match state.comments.approve(id).await {
        Ok(_) => Redirect::to("/comments").into_response(),
        Err(err) => {
            admin_comment_error("infra::http::admin::comment_approve", err).into_response()
        }
    }
}

async fn admin_comment_unapprove(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
) -> Response {
    match state.comments.unapprove(id).await {
        Ok(_) => Redirect::to("/comments").into_response(),
        Err(err) => {
            admin_comment_error("infra::http::admin::comment_unapprove", err).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReplyForm {
    reply: String,
}

async fn admin_comment_reply(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
    Form(form): Form<ReplyForm>,
) -> Response {
    match state.comments.reply(id, &form.reply).await {
        Ok(_) => Redirect::to("/comments").into_response(),
        Err(err) => admin_comment_error("infra::http::admin::comment_reply", err).into_response(),
    }
}

async fn admin_comment_delete(State(state): State<AdminState>, Path(id): Path<Uuid>) -> Response {
    match state.comments.delete(id).await {
        Ok(()) => Redirect::to("/comments").into_response(),
        Err(err) => admin_comment_error("infra::http::admin::comment_delete", err).into_response(),
    }
}

async fn admin_pages(State(state): State<AdminState>) -> Response {
    let chrome = match load_chrome(&state, "/pages", "Sayfalar").await {
        Ok(chrome) => chrome,
        Err(err) => return err.into_response(),
    };

    match state.pages.list().await {
        Ok(pages) => {
            let rows: Vec<AdminPageRowView> = pages.iter().map(AdminPageRowView::from).collect();
            let view = AdminLayout::new(chrome, AdminPageListView { pages: rows });
            render_template_response(AdminPagesTemplate { view }, StatusCode::OK)
        }
        Err(err) => admin_page_error("infra::http::admin::pages", err).into_response(),
    }
}

async fn admin_page_edit(State(state): State<AdminState>, Path(slug): Path<String>) -> Response {
    let chrome = match load_chrome(&state, "/pages", "Sayfayı Düzenle").await {
        Ok(chrome) => chrome,
        Err(err) => return err.into_response(),
    };

    match state.pages.load_by_slug(&slug).await {
        Ok(page) => {
            let view = AdminLayout::new(chrome, AdminPageFormView::from(&page));
            render_template_response(AdminPageFormTemplate { view }, StatusCode::OK)
        }
        Err(err) => admin_page_error("infra::http::admin::page_edit", err).into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct PageForm {
    title: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    active: Option<String>,
    #[serde(default)]
    meta_title: String,
    #[serde(default)]
    meta_description: String,
}

async fn admin_page_update(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
    Form(form): Form<PageForm>,
) -> Response {
    let command = UpdatePageCommand {
        id,
        title: form.title,
        body: form.body,
        active: form.active.is_some(),
        meta_title: Some(form.meta_title),
        meta_description: Some(form.meta_description),
    };

    match state.pages.update(command).await {
        Ok(_) => Redirect::to("/pages").into_response(),
        Err(err) => admin_page_error("infra::http::admin::page_update", err).into_response(),
    }
}

async fn admin_settings(State(state): State<AdminState>) -> Response {
    let chrome = match load_chrome(&state, "/settings", "Ayarlar").await {
        Ok(chrome) => chrome,
        Err(err) => return err.into_response(),
    };

    match state.settings.load_or_default().await {
        Ok(settings) => {
            let view = AdminLayout::new(chrome, AdminSettingsFormView::from(&settings));
            render_template_response(AdminSettingsTemplate { view }, StatusCode::OK)
        }
        Err(err) => admin_settings_error("infra::http::admin::settings", err).into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct SettingsForm {
    site_name: String,
    #[serde(default)]
    site_description: String,
    #[serde(default)]
    logo_url: String,
    #[serde(default)]
    favicon_url: String,
    #[serde(default)]
    meta_title: String,
    #[serde(default)]
    meta_description: String,
    #[serde(default)]
    meta_keywords: String,
    #[serde(default)]
    google_analytics_id: String,
    #[serde(default)]
    google_tag_manager_id: String,
    #[serde(default)]
    facebook_pixel_id: String,
    #[serde(default)]
    custom_head_html: String,
    #[serde(default)]
    custom_footer_html: String,
    posts_per_page: i32,
    #[serde(default)]
    layout_width: String,
    #[serde(default)]
    sidebar_about_image: String,
    #[serde(default)]
    public_site_url: String,
}

async fn admin_settings_update(
    State(state): State<AdminState>,
    Form(form): Form<SettingsForm>,
) -> Response {
    let command = UpdateSettingsCommand {
        site_name: form.site_name,
        site_description: form.site_description,
        logo_url: form.logo_url,
        favicon_url: form.favicon_url,
        meta_title: form.meta_title,
        meta_description: form.meta_description,
        meta_keywords: form.meta_keywords,
        google_analytics_id: form.google_analytics_id,
        google_tag_manager_id: form.google_tag_manager_id,
        facebook_pixel_id: form.facebook_pixel_id,
        custom_head_html: form.custom_head_html,
        custom_footer_html: form.custom_footer_html,
        posts_per_page: form.posts_per_page,
        layout_width: form.layout_width,
        sidebar_about_image: form.sidebar_about_image,
        public_site_url: form.public_site_url,
    };

    match state.settings.update(command).await {
        Ok(_) => Redirect::to("/settings").into_response(),
        Err(err) => {
            admin_settings_error("infra::http::admin::settings_update", err).into_response()
        }
    }
}

async fn admin_upload_store(State(state): State<AdminState>, mut multipart: Multipart) -> Response {
    const SOURCE: &str = "infra::http::admin::upload_store";

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                return HttpError::new(
                    SOURCE,
                    StatusCode::BAD_REQUEST,
                    "Malformed upload",
                    err.to_string(),
                )
                .into_response();
            }
        };

        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => {
                return HttpError::new(
                    SOURCE,
                    StatusCode::BAD_REQUEST,
                    "Malformed upload",
                    err.to_string(),
                )
                .into_response();
            }
        };

        return match state.uploads.store_image(&filename, bytes).await {
            Ok(stored) => Json(json!({ "url": stored.url })).into_response(),
            Err(err) => upload_error_to_http(SOURCE, err).into_response(),
        };
    }

    HttpError::new(
        SOURCE,
        StatusCode::BAD_REQUEST,
        "No file in upload",
        "multipart request carried no file field",
    )
    .into_response()
}

async fn admin_stylesheet() -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/css; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=86400"),
        ],
        include_str!("../../../assets/admin.css"),
    )
        .into_response()
}

async fn admin_health(State(state): State<AdminState>) -> Response {
    db_health_response(state.db.health_check().await)
}

fn admin_article_error(source: &'static str, err: AdminArticleError) -> HttpError {
    match err {
        AdminArticleError::ConstraintViolation(field) => HttpError::new(
            source,
            StatusCode::BAD_REQUEST,
            "Invalid article",
            format!("constraint violation on `{field}`"),
        ),
        AdminArticleError::NotFound => HttpError::new(
            source,
            StatusCode::NOT_FOUND,
            "Article not found",
            "article not found",
        ),
        AdminArticleError::Repo(inner) => repo_error_to_http(source, inner),
    }
}

fn admin_category_error(source: &'static str, err: AdminCategoryError) -> HttpError {
    match err {
        AdminCategoryError::ConstraintViolation(field) => HttpError::new(
            source,
            StatusCode::BAD_REQUEST,
            "Invalid category",
            format!("constraint violation on `{field}`"),
        ),
        AdminCategoryError::NotFound => HttpError::new(
            source,
            StatusCode::NOT_FOUND,
            "Category not found",
            "category not found",
        ),
        AdminCategoryError::NotEmpty(count) => HttpError::new(
            source,
            StatusCode::CONFLICT,
            "Category still in use",
            format!("category still holds {count} articles"),
        ),
        AdminCategoryError::Repo(inner) => repo_error_to_http(source, inner),
    }
}

fn admin_comment_error(source: &'static str, err: AdminCommentError) -> HttpError {
    match err {
        AdminCommentError::NotFound => HttpError::new(
            source,
            StatusCode::NOT_FOUND,
            "Comment not found",
            "comment not found",
        ),
        AdminCommentError::EmptyReply => HttpError::new(
            source,
            StatusCode::BAD_REQUEST,
            "Empty reply",
            "reply must not be empty",
        ),
        AdminCommentError::Repo(inner) => repo_error_to_http(source, inner),
    }
}

fn admin_page_error(source: &'static str, err: AdminPageError) -> HttpError {
    match err {
        AdminPageError::ConstraintViolation(field) => HttpError::new(
            source,
            StatusCode::BAD_REQUEST,
            "Invalid page",
            format!("constraint violation on `{field}`"),
        ),
        AdminPageError::NotFound => HttpError::new(
            source,
            StatusCode::NOT_FOUND,
            "Page not found",
            "page not found",
        ),
        AdminPageError::Repo(inner) => repo_error_to_http(source, inner),
    }
}

fn admin_settings_error(source: &'static str, err: AdminSettingsError) -> HttpError {
    match err {
        AdminSettingsError::ConstraintViolation(field) => HttpError::new(
            source,
            StatusCode::BAD_REQUEST,
            "Invalid settings",
            format!("constraint violation on `{field}`"),
        ),
        AdminSettingsError::Repo(inner) => repo_error_to_http(source, inner),
    }
}

fn upload_error_to_http(source: &'static str, err: UploadError) -> HttpError {
    match err {
        UploadError::Empty => HttpError::new(
            source,
            StatusCode::BAD_REQUEST,
            "Empty upload",
            "uploaded file is empty",
        ),
        UploadError::UnsupportedType(ext) => HttpError::new(
            source,
            StatusCode::BAD_REQUEST,
            "Unsupported file type",
            format!("extension `{ext}` is not allowed"),
        ),
        UploadError::NotAnImage => HttpError::new(
            source,
            StatusCode::BAD_REQUEST,
            "Not an image",
            "file does not decode as an image",
        ),
        UploadError::Storage(message) => HttpError::new(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Upload storage failure",
            message,
        ),
    }
}
