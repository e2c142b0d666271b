/// Content Repository
///
/// PostgreSQL reads over `posts`, `comments`, `likes` and `shares`.
use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::{ContentStore, PostScope};
use crate::error::Result;
use crate::models::{Comment, EngagementCounts, EngagementKind, Post, PostEngagement};
use crate::utils::sql_count;

/// Post columns aliased to the `Post` field names
pub(crate) const POST_COLUMNS: &str = "p.id, p.user_id AS author_id, p.title, p.content, \
     p.media_type, p.created_at, p.updated_at, p.is_deleted";

pub(crate) const COMMENT_COLUMNS: &str =
    "id, post_id, user_id, parent_comment_id, content, is_deleted, created_at, updated_at";

/// Per-post engagement subqueries; `$2` is an optional lower time bound
const ENGAGEMENT_COLUMNS: &str = r#"
    (SELECT COUNT(*) FROM likes l
        WHERE l.post_id = p.id
          AND ($2::timestamptz IS NULL OR l.created_at >= $2)) AS likes,
    (SELECT COUNT(*) FROM comments c
        WHERE c.post_id = p.id AND c.is_deleted = FALSE
          AND ($2::timestamptz IS NULL OR c.created_at >= $2)) AS comments,
    (SELECT COUNT(*) FROM shares s
        WHERE s.post_id = p.id
          AND ($2::timestamptz IS NULL OR s.created_at >= $2)) AS shares
"#;

#[derive(Clone)]
pub struct PgContentRepository {
    pool: PgPool,
}

impl PgContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ContentStore for PgContentRepository {
    async fn posts_by(&self, authors: &HashSet<Uuid>, include_deleted: bool) -> Result<Vec<Post>> {
        let authors: Vec<Uuid> = authors.iter().copied().collect();
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts p \
             WHERE p.user_id = ANY($1) AND ($2 OR p.is_deleted = FALSE)"
        );

        let posts = sqlx::query_as::<_, Post>(&sql)
            .bind(authors)
            .bind(include_deleted)
            .fetch_all(&self.pool)
            .await?;
        Ok(posts)
    }

    async fn posts_by_page(
        &self,
        authors: &HashSet<Uuid>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Post>> {
        if limit == 0 || authors.is_empty() {
            return Ok(Vec::new());
        }
        let author_count = authors.len();
        let authors: Vec<Uuid> = authors.iter().copied().collect();
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts p \
             WHERE p.user_id = ANY($1) AND p.is_deleted = FALSE \
             ORDER BY p.created_at DESC, p.id ASC \
             LIMIT $2 OFFSET $3"
        );

        let posts = sqlx::query_as::<_, Post>(&sql)
            .bind(authors)
            .bind(sql_count(limit))
            .bind(sql_count(offset))
            .fetch_all(&self.pool)
            .await?;

        debug!(
            authors = author_count,
            limit,
            offset,
            returned = posts.len(),
            "fetched feed page"
        );
        Ok(posts)
    }

    async fn posts_created_since(&self, since: DateTime<Utc>) -> Result<Vec<Post>> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts p \
             WHERE p.created_at >= $1 AND p.is_deleted = FALSE"
        );

        let posts = sqlx::query_as::<_, Post>(&sql)
            .bind(since)
            .fetch_all(&self.pool)
            .await?;
        Ok(posts)
    }

    async fn count_engagement(
        &self,
        post_id: Uuid,
        kind: EngagementKind,
        since: Option<DateTime<Utc>>,
    ) -> Result<i64> {
        let sql = match kind {
            EngagementKind::Like => {
                "SELECT COUNT(*) FROM likes \
                 WHERE post_id = $1 AND ($2::timestamptz IS NULL OR created_at >= $2)"
            }
            EngagementKind::Comment => {
                "SELECT COUNT(*) FROM comments \
                 WHERE post_id = $1 AND is_deleted = FALSE \
                 AND ($2::timestamptz IS NULL OR created_at >= $2)"
            }
            EngagementKind::Share => {
                "SELECT COUNT(*) FROM shares \
                 WHERE post_id = $1 AND ($2::timestamptz IS NULL OR created_at >= $2)"
            }
        };

        let count: i64 = sqlx::query_scalar(sql)
            .bind(post_id)
            .bind(since)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn engagement_counts(
        &self,
        post_ids: &[Uuid],
        since: Option<DateTime<Utc>>,
    ) -> Result<HashMap<Uuid, EngagementCounts>> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let sql = format!(
            "SELECT p.id, {ENGAGEMENT_COLUMNS} FROM UNNEST($1::uuid[]) AS p(id)"
        );

        let rows = sqlx::query_as::<_, (Uuid, i64, i64, i64)>(&sql)
            .bind(post_ids)
            .bind(since)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, likes, comments, shares)| {
                (
                    id,
                    EngagementCounts {
                        likes,
                        comments,
                        shares,
                    },
                )
            })
            .collect())
    }

    /// Candidates and their counts come from one statement so the ranking
    /// sees a single snapshot.
    async fn engaged_posts(
        &self,
        scope: PostScope,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<PostEngagement>> {
        let filter = match scope {
            PostScope::CreatedSince(_) => "p.created_at >= $1",
            PostScope::Author(_) => "p.user_id = $1",
        };
        let sql = format!(
            "SELECT {POST_COLUMNS}, {ENGAGEMENT_COLUMNS} FROM posts p \
             WHERE p.is_deleted = FALSE AND {filter}"
        );

        let query = sqlx::query_as::<_, PostEngagement>(&sql);
        let query = match scope {
            PostScope::CreatedSince(threshold) => query.bind(threshold),
            PostScope::Author(author_id) => query.bind(author_id),
        };
        let rows = query.bind(since).fetch_all(&self.pool).await?;

        debug!(scope = ?scope, rows = rows.len(), "aggregated post engagement");
        Ok(rows)
    }

    async fn get_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts p \
             WHERE p.id = $1 AND p.is_deleted = FALSE"
        );

        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn list_posts(
        &self,
        author_id: Option<Uuid>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Post>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts p \
             WHERE p.is_deleted = FALSE AND ($1::uuid IS NULL OR p.user_id = $1) \
             ORDER BY p.created_at DESC, p.id ASC \
             LIMIT $2 OFFSET $3"
        );

        let posts = sqlx::query_as::<_, Post>(&sql)
            .bind(author_id)
            .bind(sql_count(limit))
            .bind(sql_count(offset))
            .fetch_all(&self.pool)
            .await?;
        Ok(posts)
    }

    async fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let sql = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments \
             WHERE post_id = $1 AND parent_comment_id IS NULL AND is_deleted = FALSE \
             ORDER BY created_at ASC, id ASC"
        );

        let comments = sqlx::query_as::<_, Comment>(&sql)
            .bind(post_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(comments)
    }

    async fn replies_to(&self, comment_id: Uuid) -> Result<Vec<Comment>> {
        let sql = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments \
             WHERE parent_comment_id = $1 AND is_deleted = FALSE \
             ORDER BY created_at ASC, id ASC"
        );

        let replies = sqlx::query_as::<_, Comment>(&sql)
            .bind(comment_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(replies)
    }

    async fn get_comment(&self, comment_id: Uuid) -> Result<Option<Comment>> {
        let sql = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments \
             WHERE id = $1 AND is_deleted = FALSE"
        );

        let comment = sqlx::query_as::<_, Comment>(&sql)
            .bind(comment_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(comment)
    }

    async fn liked_by(&self, user_id: Uuid, post_ids: &[Uuid]) -> Result<HashSet<Uuid>> {
        if post_ids.is_empty() {
            return Ok(HashSet::new());
        }
        let liked: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT post_id FROM likes
            WHERE user_id = $1 AND post_id = ANY($2)
            "#,
        )
        .bind(user_id)
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(liked.into_iter().collect())
    }
}
