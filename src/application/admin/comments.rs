//! Comment moderation: approve, reply, delete.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::application::repos::{CommentModerationFilter, CommentsRepo, RepoError};
use crate::domain::entities::{CommentListRecord, CommentRecord};

#[derive(Debug, Error)]
pub enum AdminCommentError {
    #[error("comment not found")]
    NotFound,
    #[error("reply must not be empty")]
    EmptyReply,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone)]
pub struct AdminCommentService {
    comments: Arc<dyn CommentsRepo>,
}

impl AdminCommentService {
    pub fn new(comments: Arc<dyn CommentsRepo>) -> Self {
        Self { comments }
    }

    pub async fn list(
        &self,
        filter: CommentModerationFilter,
    ) -> Result<Vec<CommentListRecord>, AdminCommentError> {
        Ok(self.comments.list_for_moderation(filter).await?)
    }

    pub async fn approve(&self, id: Uuid) -> Result<CommentRecord, AdminCommentError> {
        self.set_approved(id, true).await
    }

    pub async fn unapprove(&self, id: Uuid) -> Result<CommentRecord, AdminCommentError> {
        self.set_approved(id, false).await
    }

    /// Stores the admin's reply. Replying also approves the comment, since a
    /// reply would otherwise be invisible to the visitor.
    pub async fn reply(&self, id: Uuid, reply: &str) -> Result<CommentRecord, AdminCommentError> {
        let trimmed = reply.trim();
        if trimmed.is_empty() {
            return Err(AdminCommentError::EmptyReply);
        }

        match self.comments.set_admin_reply(id, trimmed).await {
            Ok(_) => self.set_approved(id, true).await,
            Err(RepoError::NotFound) => Err(AdminCommentError::NotFound),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AdminCommentError> {
        match self.comments.delete_comment(id).await {
            Ok(()) => Ok(()),
            Err(RepoError::NotFound) => Err(AdminCommentError::NotFound),
            Err(err) => Err(err.into()),
        }
    }

    async fn set_approved(
        &self,
        id: Uuid,
        approved: bool,
    ) -> Result<CommentRecord, AdminCommentError> {
        match self.comments.set_approved(id, approved).await {
            Ok(comment) => Ok(comment),
            Err(RepoError::NotFound) => Err(AdminCommentError::NotFound),
            Err(err) => Err(err.into()),
        }
    }
}
