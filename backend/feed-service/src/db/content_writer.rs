use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use super::content_repo::{COMMENT_COLUMNS, POST_COLUMNS};
use super::{ContentWriter, PgContentRepository};
use crate::error::Result;
use crate::models::{Comment, NewComment, NewPost, Post, PostChanges, Share};

const SHARE_COLUMNS: &str = "id, post_id, user_id, caption, created_at";

#[async_trait]
impl ContentWriter for PgContentRepository {
    async fn insert_post(&self, new_post: NewPost) -> Result<Post> {
        let sql = format!(
            "INSERT INTO posts AS p \
             (id, user_id, title, content, media_type, created_at, updated_at, is_deleted) \
             VALUES ($1, $2, $3, $4, $5, NOW(), NOW(), FALSE) \
             RETURNING {POST_COLUMNS}"
        );

        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(Uuid::new_v4())
            .bind(new_post.author_id)
            .bind(new_post.title)
            .bind(new_post.content)
            .bind(new_post.media_type)
            .fetch_one(self.pool())
            .await?;

        debug!(post_id = %post.id, author_id = %post.author_id, "inserted post");
        Ok(post)
    }

    async fn update_post(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>> {
        let sql = format!(
            "UPDATE posts AS p \
             SET title = COALESCE($3, p.title), \
                 content = COALESCE($4, p.content), \
                 media_type = COALESCE($5, p.media_type), \
                 updated_at = NOW() \
             WHERE p.id = $1 AND p.user_id = $2 AND p.is_deleted = FALSE \
             RETURNING {POST_COLUMNS}"
        );

        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(post_id)
            .bind(author_id)
            .bind(changes.title)
            .bind(changes.content)
            .bind(changes.media_type)
            .fetch_optional(self.pool())
            .await?;
        Ok(post)
    }

    async fn soft_delete_post(&self, post_id: Uuid, author_id: Uuid) -> Result<bool> {
        let affected = sqlx::query(
            r#"
            UPDATE posts
            SET is_deleted = TRUE, updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND is_deleted = FALSE
            "#,
        )
        .bind(post_id)
        .bind(author_id)
        .execute(self.pool())
        .await?
        .rows_affected();
        Ok(affected > 0)
    }

    async fn insert_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool> {
        let inserted = sqlx::query_as::<_, (Uuid,)>(
            r#"
            INSERT INTO likes (id, user_id, post_id, created_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (user_id, post_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(post_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(inserted.is_some())
    }

    async fn delete_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool> {
        let affected = sqlx::query(
            r#"
            DELETE FROM likes
            WHERE user_id = $1 AND post_id = $2
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .execute(self.pool())
        .await?
        .rows_affected();
        Ok(affected > 0)
    }

    async fn insert_share(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        caption: Option<String>,
    ) -> Result<(Share, bool)> {
        let insert = format!(
            "INSERT INTO shares (id, user_id, post_id, caption, created_at) \
             VALUES ($1, $2, $3, $4, NOW()) \
             ON CONFLICT (user_id, post_id) DO NOTHING \
             RETURNING {SHARE_COLUMNS}"
        );

        let created = sqlx::query_as::<_, Share>(&insert)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(post_id)
            .bind(caption)
            .fetch_optional(self.pool())
            .await?;

        if let Some(share) = created {
            return Ok((share, true));
        }

        let select = format!("SELECT {SHARE_COLUMNS} FROM shares WHERE user_id = $1 AND post_id = $2");
        let existing = sqlx::query_as::<_, Share>(&select)
            .bind(user_id)
            .bind(post_id)
            .fetch_one(self.pool())
            .await?;
        Ok((existing, false))
    }

    async fn insert_comment(&self, new_comment: NewComment) -> Result<Comment> {
        let sql = format!(
            "INSERT INTO comments \
             (id, post_id, user_id, parent_comment_id, content, is_deleted, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, FALSE, NOW(), NOW()) \
             RETURNING {COMMENT_COLUMNS}"
        );

        let comment = sqlx::query_as::<_, Comment>(&sql)
            .bind(Uuid::new_v4())
            .bind(new_comment.post_id)
            .bind(new_comment.user_id)
            .bind(new_comment.parent_comment_id)
            .bind(new_comment.content)
            .fetch_one(self.pool())
            .await?;
        Ok(comment)
    }

    async fn soft_delete_comment(&self, comment_id: Uuid, user_id: Uuid) -> Result<bool> {
        let affected = sqlx::query(
            r#"
            UPDATE comments
            SET is_deleted = TRUE, updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND is_deleted = FALSE
            "#,
        )
        .bind(comment_id)
        .bind(user_id)
        .execute(self.pool())
        .await?
        .rows_affected();
        Ok(affected > 0)
    }
}
