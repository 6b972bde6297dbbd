use std::sync::Arc;

use axum::{
    Form, Router,
    body::Body,
    extract::{Path, Query, State},
    http::{
        HeaderValue, Request, StatusCode,
        header::{CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE},
    },
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use bytes::Bytes;
use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::{
        comments::{CommentError, CommentService, CommentSubmission},
        error::{ErrorReport, HttpError},
        feed::{ArticleContext, FeedError, FeedService},
        metadata::{article_meta, page_meta, site_meta},
        page::PageService,
        repos::{AuthorsRepo, SettingsRepo},
        sitemap::SitemapService,
    },
    domain::entities::{SiteSettingsRecord, StaticPageRecord},
    infra::db::PostgresRepositories,
    presentation::views::{
        ArticleDetailView, ArticleTemplate, HomeView, IndexTemplate, LayoutChrome, LayoutContext,
        ListingTemplate, ListingView, PageTemplate, PageView, render_not_found_response,
        render_template_response,
    },
};

use super::{
    db_health_response,
    middleware::{log_responses, set_request_context},
    repo_error_to_http,
};
use crate::application::admin::uploads::AdminUploadService;

#[derive(Clone)]
pub struct HttpState {
    pub feed: FeedService,
    pub pages: PageService,
    pub comments: CommentService,
    pub sitemap: SitemapService,
    pub settings: Arc<dyn SettingsRepo>,
    pub authors: Arc<dyn AuthorsRepo>,
    pub uploads: AdminUploadService,
    pub db: Arc<PostgresRepositories>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/blog", get(blog_listing))
        .route("/kategori/{slug}", get(category_listing))
        .route("/yorum", post(submit_comment))
        .route("/sitemap.xml", get(sitemap_xml))
        .route("/robots.txt", get(robots_txt))
        .route("/uploads/{filename}", get(serve_upload))
        .route("/_health/db", get(public_health))
        .fallback(fallback_router)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PageQuery {
    page: Option<String>,
}

/// Settings and navigation pages feed every public page's layout.
struct SiteContext {
    settings: SiteSettingsRecord,
    nav_pages: Vec<StaticPageRecord>,
}

impl SiteContext {
    fn chrome(&self, path: &str) -> LayoutChrome {
        let meta = site_meta(&self.settings, path);
        LayoutChrome::build(&self.settings, &self.nav_pages, meta)
    }

    fn per_page(&self) -> u32 {
        self.settings.posts_per_page.max(1) as u32
    }
}

async fn load_site_context(state: &HttpState) -> Result<SiteContext, HttpError> {
    let settings = state
        .settings
        .load()
        .await
        .map_err(|err| repo_error_to_http("infra::http::public::load_site_context", err))?
        .unwrap_or_else(|| SiteSettingsRecord::defaults(OffsetDateTime::now_utc()));
    let nav_pages = state
        .pages
        .navigation()
        .await
        .map_err(|err| page_error_to_http("infra::http::public::load_site_context", err))?;

    Ok(SiteContext {
        settings,
        nav_pages,
    })
}

fn parse_page(raw: Option<&str>) -> Result<u64, FeedError> {
    match raw {
        None => Ok(1),
        Some(value) => match value.parse::<u64>() {
            Ok(page) if page >= 1 => Ok(page),
            _ => Err(FeedError::InvalidPage(value.to_string())),
        },
    }
}

async fn index(State(state): State<HttpState>) -> Response {
    let site = match load_site_context(&state).await {
        Ok(site) => site,
        Err(err) => return err.into_response(),
    };

    match state.feed.home().await {
        Ok(context) => {
            let view = LayoutContext::new(site.chrome("/"), HomeView::from(&context));
            render_template_response(IndexTemplate { view }, StatusCode::OK)
        }
        Err(err) => feed_error_to_response(err, site.chrome("/")),
    }
}

async fn blog_listing(State(state): State<HttpState>, Query(query): Query<PageQuery>) -> Response {
    let site = match load_site_context(&state).await {
        Ok(site) => site,
        Err(err) => return err.into_response(),
    };

    let page = match parse_page(query.page.as_deref()) {
        Ok(page) => page,
        Err(err) => return feed_error_to_response(err, site.chrome("/blog")),
    };

    match state.feed.listing(page, site.per_page()).await {
        Ok(context) => {
            let view = LayoutContext::new(site.chrome("/blog"), ListingView::from_context(&context));
            render_template_response(ListingTemplate { view }, StatusCode::OK)
        }
        Err(err) => feed_error_to_response(err, site.chrome("/blog")),
    }
}

async fn category_listing(
    State(state): State<HttpState>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Response {
    let site = match load_site_context(&state).await {
        Ok(site) => site,
        Err(err) => return err.into_response(),
    };
    let path = format!("/kategori/{slug}");

    let page = match parse_page(query.page.as_deref()) {
        Ok(page) => page,
        Err(err) => return feed_error_to_response(err, site.chrome(&path)),
    };

    match state
        .feed
        .category_listing(&slug, page, site.per_page())
        .await
    {
        Ok(context) => {
            let view = LayoutContext::new(site.chrome(&path), ListingView::from_context(&context));
            render_template_response(ListingTemplate { view }, StatusCode::OK)
        }
        Err(err) => feed_error_to_response(err, site.chrome(&path)),
    }
}

async fn fallback_router(State(state): State<HttpState>, request: Request<Body>) -> Response {
    let raw_path = request.uri().path().trim_matches('/');
    let slug = raw_path.trim_end_matches('/');

    let site = match load_site_context(&state).await {
        Ok(site) => site,
        Err(err) => return err.into_response(),
    };

    if slug.is_empty() || slug.contains('/') {
        return render_not_found_response(site.chrome("/"));
    }

    // Articles and static pages share the root URL namespace. Articles win;
    // a miss falls through to the active static pages.
    match state.feed.article(slug).await {
        Ok(Some(context)) => return render_article(&state, &site, slug, context).await,
        Ok(None) => {}
        Err(err) => return feed_error_to_response(err, site.chrome(&format!("/{slug}"))),
    }

    match state.pages.active_page(slug).await {
        Ok(Some(rendered)) => {
            let meta = page_meta(
                &site.settings,
                slug,
                &rendered.page.title,
                rendered.page.meta_title.as_deref(),
                rendered.page.meta_description.as_deref(),
            );
            let chrome = site.chrome(&format!("/{slug}")).with_meta(meta);
            let content = PageView {
                title: rendered.page.title.clone(),
                body_html: rendered.body_html,
            };
            let view = LayoutContext::new(chrome, content);
            render_template_response(PageTemplate { view }, StatusCode::OK)
        }
        Ok(None) => render_not_found_response(site.chrome(&format!("/{slug}"))),
        Err(err) => {
            page_error_to_http("infra::http::public::fallback_router", err).into_response()
        }
    }
}

async fn render_article(
    state: &HttpState,
    site: &SiteContext,
    slug: &str,
    context: ArticleContext,
) -> Response {
    let author_name = match state.authors.first_author().await {
        Ok(Some(author)) => author.name,
        Ok(None) => site.settings.site_name.clone(),
        Err(err) => {
            return repo_error_to_http("infra::http::public::render_article", err).into_response();
        }
    };

    let meta = article_meta(
        &site.settings,
        &context.article,
        context.category.as_ref(),
        &author_name,
    );
    let chrome = site.chrome(&format!("/{slug}")).with_meta(meta);
    let content = ArticleDetailView::from_context(&context, &site.settings);
    let view = LayoutContext::new(chrome, content);
    render_template_response(ArticleTemplate { view }, StatusCode::OK)
}

#[derive(Debug, Deserialize)]
struct CommentForm {
    article_id: Uuid,
    slug: String,
    author_name: String,
    author_email: String,
    body: String,
    #[serde(default)]
    website: String,
}

async fn submit_comment(
    State(state): State<HttpState>,
    Form(form): Form<CommentForm>,
) -> Response {
    const SOURCE: &str = "infra::http::public::submit_comment";

    let slug = form.slug;
    let submission = CommentSubmission {
        article_id: form.article_id,
        author_name: form.author_name,
        author_email: form.author_email,
        body: form.body,
        website: form.website,
    };

    match state.comments.submit(submission).await {
        Ok(_) => Redirect::to(&format!("/{slug}?yorum=gonderildi#yorumlar")).into_response(),
        // Honeypot hits get the success redirect so bots learn nothing.
        Err(CommentError::Rejected) => {
            Redirect::to(&format!("/{slug}?yorum=gonderildi#yorumlar")).into_response()
        }
        Err(CommentError::MissingField(_) | CommentError::FieldTooLong(_)) => {
            Redirect::to(&format!("/{slug}?yorum=hata#yorumlar")).into_response()
        }
        Err(CommentError::UnknownArticle) => HttpError::new(
            SOURCE,
            StatusCode::NOT_FOUND,
            "Unknown article",
            "Comment submitted for a missing or unpublished article",
        )
        .into_response(),
        Err(CommentError::Repo(err)) => repo_error_to_http(SOURCE, err).into_response(),
    }
}

async fn sitemap_xml(State(state): State<HttpState>) -> Response {
    let settings = match load_site_context(&state).await {
        Ok(site) => site.settings,
        Err(err) => return err.into_response(),
    };

    match state.sitemap.sitemap_xml(&settings).await {
        Ok(body) => xml_response(body),
        Err(err) => HttpError::new(
            "infra::http::public::sitemap",
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to generate sitemap",
            err.to_string(),
        )
        .into_response(),
    }
}

async fn robots_txt(State(state): State<HttpState>) -> Response {
    let settings = match load_site_context(&state).await {
        Ok(site) => site.settings,
        Err(err) => return err.into_response(),
    };

    plain_response(state.sitemap.robots_txt(&settings))
}

async fn serve_upload(State(state): State<HttpState>, Path(filename): Path<String>) -> Response {
    const SOURCE: &str = "infra::http::public::serve_upload";

    match state.uploads.open(&filename).await {
        Ok(Some(bytes)) => build_upload_response(&filename, bytes),
        Ok(None) => HttpError::new(
            SOURCE,
            StatusCode::NOT_FOUND,
            "Upload not found",
            "The requested upload is not available",
        )
        .into_response(),
        Err(err) => HttpError::new(
            SOURCE,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to read uploaded file",
            err.to_string(),
        )
        .into_response(),
    }
}

async fn public_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.db.health_check().await)
}

fn feed_error_to_response(err: FeedError, chrome: LayoutChrome) -> Response {
    match err {
        FeedError::UnknownCategory => {
            let mut response = render_not_found_response(chrome);
            ErrorReport::from_message(
                "infra::http::public::feed_error_to_response",
                StatusCode::NOT_FOUND,
                "Unknown category",
            )
            .attach(&mut response);
            response
        }
        err => HttpError::from(err).into_response(),
    }
}

fn page_error_to_http(source: &'static str, err: crate::application::page::PageError) -> HttpError {
    use crate::application::page::PageError;

    match err {
        PageError::NotFound => HttpError::new(
            source,
            StatusCode::NOT_FOUND,
            "Page not found",
            "page not found",
        ),
        PageError::Render(inner) => HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to render page",
            &inner,
        ),
        PageError::Repo(inner) => repo_error_to_http(source, inner),
    }
}

fn build_upload_response(path: &str, bytes: Bytes) -> Response {
    let mut response = Response::new(Body::from(bytes.clone()));
    *response.status_mut() = StatusCode::OK;

    let headers = response.headers_mut();
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
        headers.insert(CONTENT_TYPE, value);
    }
    if let Ok(value) = HeaderValue::from_str(&bytes.len().to_string()) {
        headers.insert(CONTENT_LENGTH, value);
    }
    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=31536000, immutable"),
    );

    response
}

fn xml_response(body: String) -> Response {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "application/xml; charset=utf-8")],
        body,
    )
        .into_response()
}

fn plain_response(body: String) -> Response {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}
