//! Dashboard counters shown on the admin landing page.

use std::sync::Arc;

use thiserror::Error;

use crate::application::repos::{
    ArticleListScope, ArticlesRepo, CategoriesRepo, CommentsRepo, RepoError,
};
use crate::domain::entities::ArticleListRecord;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub total_articles: u64,
    pub published_articles: u64,
    pub total_categories: u64,
    pub total_comments: u64,
    pub pending_comments: u64,
    pub latest_articles: Vec<ArticleListRecord>,
}

#[derive(Clone)]
pub struct AdminDashboardService {
    articles: Arc<dyn ArticlesRepo>,
    categories: Arc<dyn CategoriesRepo>,
    comments: Arc<dyn CommentsRepo>,
}

impl AdminDashboardService {
    pub fn new(
        articles: Arc<dyn ArticlesRepo>,
        categories: Arc<dyn CategoriesRepo>,
        comments: Arc<dyn CommentsRepo>,
    ) -> Self {
        Self {
            articles,
            categories,
            comments,
        }
    }

    pub async fn snapshot(&self) -> Result<DashboardSnapshot, DashboardError> {
        let total_articles = self.articles.count_articles(ArticleListScope::Admin).await?;
        let published_articles = self
            .articles
            .count_articles(ArticleListScope::Public)
            .await?;
        let total_categories = self.categories.list_categories().await?.len() as u64;
        let total_comments = self.comments.count_comments().await?;
        let pending_comments = self.comments.count_pending().await?;
        let latest_articles = self
            .articles
            .recent_articles(ArticleListScope::Admin, 5)
            .await?;

        Ok(DashboardSnapshot {
            total_articles,
            published_articles,
            total_categories,
            total_comments,
            pending_comments,
            latest_articles,
        })
    }
}
