//! Shared fixtures for feed-service integration tests.
//!
//! Everything runs against `MemoryStore`; rows are seeded with explicit
//! timestamps so ordering and window checks are deterministic.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use feed_service::config::Config;
use feed_service::db::{ContentStore, MemoryStore};
use feed_service::error::Result;
use feed_service::models::{Comment, EngagementKind, FollowEdge, Like, Post, Share};
use feed_service::services::InteractionRecorder;
use feed_service::{AppState, EngagementService, FeedAssembler, PostService, SocialService, TrendingRanker};
use uuid::Uuid;

/// Fixed clock used by the trending tests
pub fn base_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-06-01T12:00:00Z")
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

pub fn hours_ago(hours: i64) -> DateTime<Utc> {
    base_time() - Duration::hours(hours)
}

pub fn minutes_ago(minutes: i64) -> DateTime<Utc> {
    base_time() - Duration::minutes(minutes)
}

pub fn memory_config() -> Config {
    Config::from_lookup(|key| match key {
        "STORAGE_BACKEND" => Some("memory".to_string()),
        _ => None,
    })
    .expect("memory config")
}

pub struct Fixture {
    pub store: Arc<MemoryStore>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
        }
    }

    pub async fn post(&self, author_id: Uuid, created_at: DateTime<Utc>) -> Post {
        let post = Post {
            id: Uuid::new_v4(),
            author_id,
            title: None,
            content: format!("post by {author_id}"),
            media_type: None,
            created_at,
            updated_at: created_at,
            is_deleted: false,
        };
        self.store.put_post(post.clone()).await;
        post
    }

    pub async fn deleted_post(&self, author_id: Uuid, created_at: DateTime<Utc>) -> Post {
        let mut post = self.post(author_id, created_at).await;
        post.is_deleted = true;
        self.store.put_post(post.clone()).await;
        post
    }

    pub async fn like(&self, post: &Post, user_id: Uuid, created_at: DateTime<Utc>) {
        self.store
            .put_like(Like {
                id: Uuid::new_v4(),
                post_id: post.id,
                user_id,
                created_at,
            })
            .await;
    }

    pub async fn comment(
        &self,
        post: &Post,
        user_id: Uuid,
        created_at: DateTime<Utc>,
        parent_comment_id: Option<Uuid>,
    ) -> Comment {
        let comment = Comment {
            id: Uuid::new_v4(),
            post_id: post.id,
            user_id,
            parent_comment_id,
            content: "nice".to_string(),
            is_deleted: false,
            created_at,
            updated_at: created_at,
        };
        self.store.put_comment(comment.clone()).await;
        comment
    }

    pub async fn deleted_comment(
        &self,
        post: &Post,
        user_id: Uuid,
        created_at: DateTime<Utc>,
    ) -> Comment {
        let mut comment = self.comment(post, user_id, created_at, None).await;
        comment.is_deleted = true;
        self.store.put_comment(comment.clone()).await;
        comment
    }

    pub async fn share(&self, post: &Post, user_id: Uuid, created_at: DateTime<Utc>) {
        self.store
            .put_share(Share {
                id: Uuid::new_v4(),
                post_id: post.id,
                user_id,
                caption: None,
                created_at,
            })
            .await;
    }

    pub async fn follow(&self, follower_id: Uuid, followee_id: Uuid) {
        self.store
            .put_follow(FollowEdge {
                follower_id,
                followee_id,
                created_at: base_time(),
            })
            .await;
    }

    pub fn feed(&self) -> FeedAssembler {
        FeedAssembler::new(self.store.clone(), self.store.clone())
    }

    pub fn trending(&self) -> TrendingRanker {
        TrendingRanker::new(self.store.clone())
    }

    pub fn engagement(&self) -> EngagementService {
        EngagementService::new(self.store.clone(), self.store.clone())
    }

    pub fn posts(&self) -> PostService {
        PostService::new(
            self.store.clone(),
            self.store.clone(),
            InteractionRecorder::new(self.store.clone()),
        )
    }

    pub fn social(&self) -> SocialService {
        SocialService::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            InteractionRecorder::new(self.store.clone()),
        )
    }

    pub fn app_state(&self) -> AppState {
        AppState::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            &memory_config(),
        )
    }
}

/// Content store that only provides the required `ContentStore` methods,
/// so paging, batched counts and aggregation run through the trait
/// defaults.
pub struct DefaultsOnly(pub Arc<MemoryStore>);

#[async_trait]
impl ContentStore for DefaultsOnly {
    async fn posts_by(&self, authors: &HashSet<Uuid>, include_deleted: bool) -> Result<Vec<Post>> {
        self.0.posts_by(authors, include_deleted).await
    }

    async fn posts_created_since(&self, since: DateTime<Utc>) -> Result<Vec<Post>> {
        self.0.posts_created_since(since).await
    }

    async fn count_engagement(
        &self,
        post_id: Uuid,
        kind: EngagementKind,
        since: Option<DateTime<Utc>>,
    ) -> Result<i64> {
        self.0.count_engagement(post_id, kind, since).await
    }

    async fn get_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        self.0.get_post(post_id).await
    }

    async fn list_posts(
        &self,
        author_id: Option<Uuid>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Post>> {
        self.0.list_posts(author_id, limit, offset).await
    }

    async fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        self.0.comments_for_post(post_id).await
    }

    async fn replies_to(&self, comment_id: Uuid) -> Result<Vec<Comment>> {
        self.0.replies_to(comment_id).await
    }

    async fn get_comment(&self, comment_id: Uuid) -> Result<Option<Comment>> {
        self.0.get_comment(comment_id).await
    }

    async fn liked_by(&self, user_id: Uuid, post_ids: &[Uuid]) -> Result<HashSet<Uuid>> {
        self.0.liked_by(user_id, post_ids).await
    }
}

impl Fixture {
    /// Services wired to `DefaultsOnly` instead of the store's own overrides
    pub fn defaults_only(&self) -> Arc<DefaultsOnly> {
        Arc::new(DefaultsOnly(self.store.clone()))
    }
}
