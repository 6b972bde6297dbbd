use std::{process, sync::Arc};

use clap::Parser;
use kalem::{
    application::{
        admin::{
            articles::AdminArticleService, categories::AdminCategoryService,
            comments::AdminCommentService, dashboard::AdminDashboardService,
            pages::AdminPageService, settings::AdminSettingsService, uploads::AdminUploadService,
        },
        comments::CommentService,
        error::AppError,
        feed::FeedService,
        page::PageService,
        repos::{
            ArticlesRepo, ArticlesWriteRepo, AuthorsRepo, CategoriesRepo, CommentsRepo, PagesRepo,
            SettingsRepo,
        },
        sitemap::SitemapService,
    },
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, AdminState, HttpState},
        telemetry,
        uploads::UploadStorage,
    },
};
use tokio::try_join;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let cli = config::CliArgs::parse();
    let settings = config::load(&cli)
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    let repositories = init_repositories(&settings).await?;
    let (http_state, admin_state) = build_states(repositories, &settings)?;

    seed_content(&http_state, &admin_state).await?;

    serve_http(&settings, http_state, admin_state).await
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn build_states(
    repositories: Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> Result<(HttpState, AdminState), AppError> {
    let articles_repo: Arc<dyn ArticlesRepo> = repositories.clone();
    let articles_write_repo: Arc<dyn ArticlesWriteRepo> = repositories.clone();
    let categories_repo: Arc<dyn CategoriesRepo> = repositories.clone();
    let comments_repo: Arc<dyn CommentsRepo> = repositories.clone();
    let pages_repo: Arc<dyn PagesRepo> = repositories.clone();
    let settings_repo: Arc<dyn SettingsRepo> = repositories.clone();
    let authors_repo: Arc<dyn AuthorsRepo> = repositories.clone();

    let upload_storage = UploadStorage::new(settings.uploads.directory.clone())
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    let upload_service = AdminUploadService::new(Arc::new(upload_storage));

    let http_state = HttpState {
        feed: FeedService::new(
            articles_repo.clone(),
            categories_repo.clone(),
            comments_repo.clone(),
        ),
        pages: PageService::new(pages_repo.clone()),
        comments: CommentService::new(comments_repo.clone(), articles_repo.clone()),
        sitemap: SitemapService::new(
            articles_repo.clone(),
            categories_repo.clone(),
            pages_repo.clone(),
        ),
        settings: settings_repo.clone(),
        authors: authors_repo.clone(),
        uploads: upload_service.clone(),
        db: repositories.clone(),
    };

    let admin_state = AdminState {
        dashboard: AdminDashboardService::new(
            articles_repo.clone(),
            categories_repo.clone(),
            comments_repo.clone(),
        ),
        articles: AdminArticleService::new(
            articles_repo.clone(),
            articles_write_repo,
            authors_repo,
        ),
        categories: AdminCategoryService::new(categories_repo),
        comments: AdminCommentService::new(comments_repo),
        pages: AdminPageService::new(pages_repo),
        settings: AdminSettingsService::new(settings_repo),
        uploads: upload_service,
        db: repositories,
    };

    Ok((http_state, admin_state))
}

/// Creates the default static pages and the settings row on first boot so a
/// fresh install serves a complete site.
async fn seed_content(http_state: &HttpState, admin_state: &AdminState) -> Result<(), AppError> {
    http_state
        .pages
        .seed_defaults()
        .await
        .map_err(|err| AppError::unexpected(format!("failed to seed default pages: {err}")))?;

    let settings = admin_state
        .settings
        .load_or_default()
        .await
        .map_err(|err| AppError::unexpected(format!("failed to load site settings: {err}")))?;
    info!(
        target = "kalem::startup",
        site_name = %settings.site_name,
        "site settings loaded"
    );

    Ok(())
}

async fn serve_http(
    settings: &config::Settings,
    http_state: HttpState,
    admin_state: AdminState,
) -> Result<(), AppError> {
    let public_router = http::build_router(http_state);
    let upload_body_limit = settings.uploads.max_request_bytes.get() as usize;
    let admin_router = http::build_admin_router(admin_state, upload_body_limit);

    let public_listener = tokio::net::TcpListener::bind(settings.server.public_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    let admin_listener = tokio::net::TcpListener::bind(settings.server.admin_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "kalem::startup",
        public_addr = %settings.server.public_addr,
        admin_addr = %settings.server.admin_addr,
        "listening"
    );

    let public_server = axum::serve(public_listener, public_router.into_make_service());
    let admin_server = axum::serve(admin_listener, admin_router.into_make_service());

    try_join!(public_server, admin_server)
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}
