/// Store contracts consumed by the feed core and the social write path,
/// with a PostgreSQL implementation and an in-memory one.
use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::models::{
    Comment, EngagementCounts, EngagementKind, Interaction, NewComment, NewInteraction, NewPost,
    Post, PostChanges, PostEngagement, Share,
};
use crate::utils::{newest_first, paginate};

pub mod content_repo;
pub mod content_writer;
pub mod graph_repo;
pub mod interaction_repo;
pub mod memory;

pub use content_repo::PgContentRepository;
pub use graph_repo::PgGraphRepository;
pub use interaction_repo::PgInteractionRepository;
pub use memory::MemoryStore;

/// Which posts an engagement aggregation covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostScope {
    /// Non-deleted posts created at or after the instant
    CreatedSince(DateTime<Utc>),
    /// Non-deleted posts written by the user
    Author(Uuid),
}

/// Follow edges between users
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocialGraph: Send + Sync {
    /// Users that `follower_id` follows
    async fn followees_of(&self, follower_id: Uuid) -> Result<HashSet<Uuid>>;

    async fn followers_count(&self, user_id: Uuid) -> Result<i64>;

    async fn following_count(&self, user_id: Uuid) -> Result<i64>;

    /// Returns `true` when a new edge was created
    async fn create_follow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool>;

    /// Returns `true` when an edge was removed
    async fn delete_follow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool>;
}

/// Read access to posts, comments, likes and shares
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Posts written by any of `authors`, in no particular order
    async fn posts_by(&self, authors: &HashSet<Uuid>, include_deleted: bool) -> Result<Vec<Post>>;

    /// Page of non-deleted posts by `authors`, newest first
    async fn posts_by_page(
        &self,
        authors: &HashSet<Uuid>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Post>> {
        if limit == 0 || authors.is_empty() {
            return Ok(Vec::new());
        }
        let mut posts: Vec<Post> = self
            .posts_by(authors, false)
            .await?
            .into_iter()
            .filter(|p| !p.is_deleted)
            .collect();
        posts.sort_by(newest_first);
        Ok(paginate(posts, limit, offset))
    }

    /// Non-deleted posts with `created_at >= since`
    async fn posts_created_since(&self, since: DateTime<Utc>) -> Result<Vec<Post>>;

    /// Number of `kind` events on the post, limited to `created_at >= since`
    /// when given. Deleted comments are never counted.
    async fn count_engagement(
        &self,
        post_id: Uuid,
        kind: EngagementKind,
        since: Option<DateTime<Utc>>,
    ) -> Result<i64>;

    async fn engagement_counts(
        &self,
        post_ids: &[Uuid],
        since: Option<DateTime<Utc>>,
    ) -> Result<HashMap<Uuid, EngagementCounts>> {
        let mut out = HashMap::with_capacity(post_ids.len());
        for post_id in post_ids {
            let mut counts = EngagementCounts::default();
            for kind in EngagementKind::ALL {
                counts.set(kind, self.count_engagement(*post_id, kind, since).await?);
            }
            out.insert(*post_id, counts);
        }
        Ok(out)
    }

    /// Posts in `scope` paired with their engagement counts since `since`
    async fn engaged_posts(
        &self,
        scope: PostScope,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<PostEngagement>> {
        let posts = match scope {
            PostScope::CreatedSince(threshold) => self.posts_created_since(threshold).await?,
            PostScope::Author(author_id) => {
                let authors = HashSet::from([author_id]);
                self.posts_by(&authors, false)
                    .await?
                    .into_iter()
                    .filter(|p| !p.is_deleted)
                    .collect()
            }
        };

        let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let mut counts = self.engagement_counts(&ids, since).await?;

        Ok(posts
            .into_iter()
            .map(|post| {
                let counts = counts.remove(&post.id).unwrap_or_default();
                PostEngagement { post, counts }
            })
            .collect())
    }

    /// Non-deleted post by id
    async fn get_post(&self, post_id: Uuid) -> Result<Option<Post>>;

    /// Non-deleted posts, optionally by one author, newest first
    async fn list_posts(
        &self,
        author_id: Option<Uuid>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Post>>;

    /// Non-deleted top-level comments on a post, oldest first
    async fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>>;

    /// Non-deleted direct replies to a comment, oldest first
    async fn replies_to(&self, comment_id: Uuid) -> Result<Vec<Comment>>;

    /// Non-deleted comment by id
    async fn get_comment(&self, comment_id: Uuid) -> Result<Option<Comment>>;

    /// Subset of `post_ids` the user has liked
    async fn liked_by(&self, user_id: Uuid, post_ids: &[Uuid]) -> Result<HashSet<Uuid>>;
}

/// Mutations used by the social write path only
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentWriter: Send + Sync {
    async fn insert_post(&self, new_post: NewPost) -> Result<Post>;

    /// Applies `changes` when the post exists, is not deleted and belongs to
    /// `author_id`
    async fn update_post(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>>;

    async fn soft_delete_post(&self, post_id: Uuid, author_id: Uuid) -> Result<bool>;

    /// Returns `true` when a new like was created
    async fn insert_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool>;

    async fn delete_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool>;

    /// Returns the share for (post, user) and whether it was just created
    async fn insert_share(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        caption: Option<String>,
    ) -> Result<(Share, bool)>;

    async fn insert_comment(&self, new_comment: NewComment) -> Result<Comment>;

    async fn soft_delete_comment(&self, comment_id: Uuid, user_id: Uuid) -> Result<bool>;
}

/// Append-only interaction log
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InteractionSink: Send + Sync {
    async fn record(&self, event: NewInteraction) -> Result<Interaction>;
}

/// Create database connection pool
pub async fn create_pool(config: &DatabaseConfig) -> std::result::Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.url)
        .await
}
