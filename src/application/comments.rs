//! Visitor comment submission and moderation queue access.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::application::repos::{
    ArticlesRepo, CommentsRepo, CreateCommentParams, RepoError,
};
use crate::domain::entities::CommentRecord;

const MAX_NAME_LEN: usize = 120;
const MAX_EMAIL_LEN: usize = 254;
const MAX_BODY_LEN: usize = 8_000;

#[derive(Debug, Error)]
pub enum CommentError {
    #[error("comment rejected")]
    Rejected,
    #[error("unknown article")]
    UnknownArticle,
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("field too long: {0}")]
    FieldTooLong(&'static str),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// A raw submission from the public comment form. The `website` field is a
/// honeypot: it is hidden from humans, so any non-empty value marks the
/// submission as automated.
#[derive(Debug, Clone)]
pub struct CommentSubmission {
    pub article_id: Uuid,
    pub author_name: String,
    pub author_email: String,
    pub body: String,
    pub website: String,
}

#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentsRepo>,
    articles: Arc<dyn ArticlesRepo>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentsRepo>, articles: Arc<dyn ArticlesRepo>) -> Self {
        Self { comments, articles }
    }

    /// Validates and stores a visitor comment. New comments are always held
    /// for moderation; nothing becomes publicly visible here.
    pub async fn submit(
        &self,
        submission: CommentSubmission,
    ) -> Result<CommentRecord, CommentError> {
        if !submission.website.trim().is_empty() {
            return Err(CommentError::Rejected);
        }

        let author_name = required_field(&submission.author_name, "author_name")?;
        let author_email = required_field(&submission.author_email, "author_email")?;
        let body = required_field(&submission.body, "body")?;

        if author_name.len() > MAX_NAME_LEN {
            return Err(CommentError::FieldTooLong("author_name"));
        }
        if author_email.len() > MAX_EMAIL_LEN {
            return Err(CommentError::FieldTooLong("author_email"));
        }
        if body.len() > MAX_BODY_LEN {
            return Err(CommentError::FieldTooLong("body"));
        }

        let article = self
            .articles
            .find_by_id(submission.article_id)
            .await?
            .filter(|article| article.published)
            .ok_or(CommentError::UnknownArticle)?;

        let comment = self
            .comments
            .create_comment(CreateCommentParams {
                article_id: article.id,
                author_name,
                author_email,
                body,
            })
            .await?;

        Ok(comment)
    }
}

fn required_field(value: &str, name: &'static str) -> Result<String, CommentError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CommentError::MissingField(name));
    }
    Ok(trimmed.to_string())
}
