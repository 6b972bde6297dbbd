use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{
        CommentModerationFilter, CommentsRepo, CreateCommentParams, RepoError,
    },
    domain::entities::{CommentListRecord, CommentRecord},
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: Uuid,
    article_id: Uuid,
    author_name: String,
    author_email: String,
    body: String,
    approved: bool,
    admin_reply: Option<String>,
    admin_reply_at: Option<OffsetDateTime>,
    created_at: OffsetDateTime,
}

impl From<CommentRow> for CommentRecord {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            article_id: row.article_id,
            author_name: row.author_name,
            author_email: row.author_email,
            body: row.body,
            approved: row.approved,
            admin_reply: row.admin_reply,
            admin_reply_at: row.admin_reply_at,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CommentListRow {
    id: Uuid,
    article_id: Uuid,
    author_name: String,
    author_email: String,
    body: String,
    approved: bool,
    admin_reply: Option<String>,
    admin_reply_at: Option<OffsetDateTime>,
    created_at: OffsetDateTime,
    article_title: String,
    article_slug: String,
}

impl From<CommentListRow> for CommentListRecord {
    fn from(row: CommentListRow) -> Self {
        Self {
            comment: CommentRecord {
                id: row.id,
                article_id: row.article_id,
                author_name: row.author_name,
                author_email: row.author_email,
                body: row.body,
                approved: row.approved,
                admin_reply: row.admin_reply,
                admin_reply_at: row.admin_reply_at,
                created_at: row.created_at,
            },
            article_title: row.article_title,
            article_slug: row.article_slug,
        }
    }
}

const COMMENT_COLUMNS: &str = "id, article_id, author_name, author_email, body, approved, \
     admin_reply, admin_reply_at, created_at";

#[async_trait]
impl CommentsRepo for PostgresRepositories {
    async fn approved_for_article(
        &self,
        article_id: Uuid,
    ) -> Result<Vec<CommentRecord>, RepoError> {
        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments \
             WHERE article_id = $1 AND approved = TRUE \
             ORDER BY created_at"
        ))
        .bind(article_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(CommentRecord::from).collect())
    }

    async fn list_for_moderation(
        &self,
        filter: CommentModerationFilter,
    ) -> Result<Vec<CommentListRecord>, RepoError> {
        let clause = match filter {
            CommentModerationFilter::All => "",
            CommentModerationFilter::Pending => " WHERE co.approved = FALSE",
            CommentModerationFilter::Approved => " WHERE co.approved = TRUE",
        };
        let sql = format!(
            "SELECT co.id, co.article_id, co.author_name, co.author_email, co.body, \
             co.approved, co.admin_reply, co.admin_reply_at, co.created_at, \
             a.title AS article_title, a.slug AS article_slug \
             FROM comments co \
             INNER JOIN articles a ON a.id = co.article_id{clause} \
             ORDER BY co.created_at DESC"
        );

        let rows = sqlx::query_as::<_, CommentListRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(CommentListRecord::from).collect())
    }

    async fn create_comment(
        &self,
        params: CreateCommentParams,
    ) -> Result<CommentRecord, RepoError> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            "INSERT INTO comments (article_id, author_name, author_email, body) \
             VALUES ($1, $2, $3, $4) RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(params.article_id)
        .bind(&params.author_name)
        .bind(&params.author_email)
        .bind(&params.body)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(CommentRecord::from(row))
    }

    async fn set_approved(&self, id: Uuid, approved: bool) -> Result<CommentRecord, RepoError> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            "UPDATE comments SET approved = $2 WHERE id = $1 RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(approved)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(CommentRecord::from(row))
    }

    async fn set_admin_reply(&self, id: Uuid, reply: &str) -> Result<CommentRecord, RepoError> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            "UPDATE comments SET admin_reply = $2, admin_reply_at = now() \
             WHERE id = $1 RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(reply)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(CommentRecord::from(row))
    }

    async fn delete_comment(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn count_pending(&self) -> Result<u64, RepoError> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE approved = FALSE")
                .fetch_one(self.pool())
                .await
                .map_err(map_sqlx_error)?;

        Ok(total.max(0) as u64)
    }

    async fn count_comments(&self) -> Result<u64, RepoError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments")
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(total.max(0) as u64)
    }
}
