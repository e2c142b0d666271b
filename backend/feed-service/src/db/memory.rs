//! In-memory implementation of every store contract.
//!
//! All collections live behind one `tokio::sync::RwLock`, so each call sees
//! a consistent snapshot. Used by the integration tests and by
//! `STORAGE_BACKEND=memory` for local development.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ContentStore, ContentWriter, InteractionSink, PostScope, SocialGraph};
use crate::error::{AppError, Result};
use crate::models::{
    Comment, EngagementCounts, EngagementKind, FollowEdge, Interaction, Like, NewComment,
    NewInteraction, NewPost, Post, PostChanges, PostEngagement, Share,
};
use crate::utils::{newest_first, paginate};

#[derive(Default)]
struct MemoryState {
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
    /// Keyed by (post_id, user_id)
    likes: HashMap<(Uuid, Uuid), Like>,
    /// Keyed by (post_id, user_id)
    shares: HashMap<(Uuid, Uuid), Share>,
    /// Keyed by (follower_id, followee_id)
    follows: HashMap<(Uuid, Uuid), FollowEdge>,
    interactions: Vec<Interaction>,
}

fn in_window(created_at: DateTime<Utc>, since: Option<DateTime<Utc>>) -> bool {
    since.map_or(true, |threshold| created_at >= threshold)
}

fn oldest_first(a: &Comment, b: &Comment) -> std::cmp::Ordering {
    a.created_at
        .cmp(&b.created_at)
        .then_with(|| a.id.cmp(&b.id))
}

impl MemoryState {
    fn count(&self, post_id: Uuid, kind: EngagementKind, since: Option<DateTime<Utc>>) -> i64 {
        let n = match kind {
            EngagementKind::Like => self
                .likes
                .values()
                .filter(|l| l.post_id == post_id && in_window(l.created_at, since))
                .count(),
            EngagementKind::Comment => self
                .comments
                .values()
                .filter(|c| {
                    c.post_id == post_id && !c.is_deleted && in_window(c.created_at, since)
                })
                .count(),
            EngagementKind::Share => self
                .shares
                .values()
                .filter(|s| s.post_id == post_id && in_window(s.created_at, since))
                .count(),
        };
        n as i64
    }

    fn counts(&self, post_id: Uuid, since: Option<DateTime<Utc>>) -> EngagementCounts {
        let mut counts = EngagementCounts::default();
        for kind in EngagementKind::ALL {
            counts.set(kind, self.count(post_id, kind, since));
        }
        counts
    }

    fn live_post(&self, post_id: Uuid) -> Option<&Post> {
        self.posts.get(&post_id).filter(|p| !p.is_deleted)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a post as-is, timestamps included
    pub async fn put_post(&self, post: Post) {
        self.state.write().await.posts.insert(post.id, post);
    }

    pub async fn put_comment(&self, comment: Comment) {
        self.state.write().await.comments.insert(comment.id, comment);
    }

    pub async fn put_like(&self, like: Like) {
        self.state
            .write()
            .await
            .likes
            .insert((like.post_id, like.user_id), like);
    }

    pub async fn put_share(&self, share: Share) {
        self.state
            .write()
            .await
            .shares
            .insert((share.post_id, share.user_id), share);
    }

    pub async fn put_follow(&self, edge: FollowEdge) {
        self.state
            .write()
            .await
            .follows
            .insert((edge.follower_id, edge.followee_id), edge);
    }

    /// Snapshot of the interaction log in insertion order
    pub async fn interactions(&self) -> Vec<Interaction> {
        self.state.read().await.interactions.clone()
    }
}

#[async_trait]
impl SocialGraph for MemoryStore {
    async fn followees_of(&self, follower_id: Uuid) -> Result<HashSet<Uuid>> {
        let state = self.state.read().await;
        Ok(state
            .follows
            .keys()
            .filter(|(follower, _)| *follower == follower_id)
            .map(|(_, followee)| *followee)
            .collect())
    }

    async fn followers_count(&self, user_id: Uuid) -> Result<i64> {
        let state = self.state.read().await;
        Ok(state.follows.keys().filter(|(_, f)| *f == user_id).count() as i64)
    }

    async fn following_count(&self, user_id: Uuid) -> Result<i64> {
        let state = self.state.read().await;
        Ok(state.follows.keys().filter(|(f, _)| *f == user_id).count() as i64)
    }

    async fn create_follow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        let key = (follower_id, followee_id);
        if state.follows.contains_key(&key) {
            return Ok(false);
        }
        state.follows.insert(
            key,
            FollowEdge {
                follower_id,
                followee_id,
                created_at: Utc::now(),
            },
        );
        Ok(true)
    }

    async fn delete_follow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        Ok(state.follows.remove(&(follower_id, followee_id)).is_some())
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn posts_by(&self, authors: &HashSet<Uuid>, include_deleted: bool) -> Result<Vec<Post>> {
        let state = self.state.read().await;
        Ok(state
            .posts
            .values()
            .filter(|p| authors.contains(&p.author_id) && (include_deleted || !p.is_deleted))
            .cloned()
            .collect())
    }

    async fn posts_created_since(&self, since: DateTime<Utc>) -> Result<Vec<Post>> {
        let state = self.state.read().await;
        Ok(state
            .posts
            .values()
            .filter(|p| !p.is_deleted && p.created_at >= since)
            .cloned()
            .collect())
    }

    async fn count_engagement(
        &self,
        post_id: Uuid,
        kind: EngagementKind,
        since: Option<DateTime<Utc>>,
    ) -> Result<i64> {
        Ok(self.state.read().await.count(post_id, kind, since))
    }

    async fn engagement_counts(
        &self,
        post_ids: &[Uuid],
        since: Option<DateTime<Utc>>,
    ) -> Result<HashMap<Uuid, EngagementCounts>> {
        let state = self.state.read().await;
        Ok(post_ids
            .iter()
            .map(|id| (*id, state.counts(*id, since)))
            .collect())
    }

    async fn engaged_posts(
        &self,
        scope: PostScope,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<PostEngagement>> {
        let state = self.state.read().await;
        Ok(state
            .posts
            .values()
            .filter(|p| !p.is_deleted)
            .filter(|p| match scope {
                PostScope::CreatedSince(threshold) => p.created_at >= threshold,
                PostScope::Author(author_id) => p.author_id == author_id,
            })
            .map(|p| PostEngagement {
                post: p.clone(),
                counts: state.counts(p.id, since),
            })
            .collect())
    }

    async fn get_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        Ok(self.state.read().await.live_post(post_id).cloned())
    }

    async fn list_posts(
        &self,
        author_id: Option<Uuid>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Post>> {
        let state = self.state.read().await;
        let mut posts: Vec<Post> = state
            .posts
            .values()
            .filter(|p| !p.is_deleted && author_id.map_or(true, |a| p.author_id == a))
            .cloned()
            .collect();
        posts.sort_by(newest_first);
        Ok(paginate(posts, limit, offset))
    }

    async fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let state = self.state.read().await;
        let mut comments: Vec<Comment> = state
            .comments
            .values()
            .filter(|c| c.post_id == post_id && c.parent_comment_id.is_none() && !c.is_deleted)
            .cloned()
            .collect();
        comments.sort_by(oldest_first);
        Ok(comments)
    }

    async fn replies_to(&self, comment_id: Uuid) -> Result<Vec<Comment>> {
        let state = self.state.read().await;
        let mut replies: Vec<Comment> = state
            .comments
            .values()
            .filter(|c| c.parent_comment_id == Some(comment_id) && !c.is_deleted)
            .cloned()
            .collect();
        replies.sort_by(oldest_first);
        Ok(replies)
    }

    async fn get_comment(&self, comment_id: Uuid) -> Result<Option<Comment>> {
        let state = self.state.read().await;
        Ok(state
            .comments
            .get(&comment_id)
            .filter(|c| !c.is_deleted)
            .cloned())
    }

    async fn liked_by(&self, user_id: Uuid, post_ids: &[Uuid]) -> Result<HashSet<Uuid>> {
        let state = self.state.read().await;
        Ok(post_ids
            .iter()
            .filter(|post_id| state.likes.contains_key(&(**post_id, user_id)))
            .copied()
            .collect())
    }
}

#[async_trait]
impl ContentWriter for MemoryStore {
    async fn insert_post(&self, new_post: NewPost) -> Result<Post> {
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            author_id: new_post.author_id,
            title: new_post.title,
            content: new_post.content,
            media_type: new_post.media_type,
            created_at: now,
            updated_at: now,
            is_deleted: false,
        };
        self.state.write().await.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update_post(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>> {
        let mut state = self.state.write().await;
        let Some(post) = state
            .posts
            .get_mut(&post_id)
            .filter(|p| !p.is_deleted && p.author_id == author_id)
        else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            post.title = Some(title);
        }
        if let Some(content) = changes.content {
            post.content = content;
        }
        if let Some(media_type) = changes.media_type {
            post.media_type = Some(media_type);
        }
        post.updated_at = Utc::now();
        Ok(Some(post.clone()))
    }

    async fn soft_delete_post(&self, post_id: Uuid, author_id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        match state
            .posts
            .get_mut(&post_id)
            .filter(|p| !p.is_deleted && p.author_id == author_id)
        {
            Some(post) => {
                post.is_deleted = true;
                post.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn insert_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        if !state.posts.contains_key(&post_id) {
            return Err(AppError::NotFound(format!("Post {} not found", post_id)));
        }
        let key = (post_id, user_id);
        if state.likes.contains_key(&key) {
            return Ok(false);
        }
        state.likes.insert(
            key,
            Like {
                id: Uuid::new_v4(),
                post_id,
                user_id,
                created_at: Utc::now(),
            },
        );
        Ok(true)
    }

    async fn delete_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        Ok(state.likes.remove(&(post_id, user_id)).is_some())
    }

    async fn insert_share(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        caption: Option<String>,
    ) -> Result<(Share, bool)> {
        let mut state = self.state.write().await;
        if !state.posts.contains_key(&post_id) {
            return Err(AppError::NotFound(format!("Post {} not found", post_id)));
        }
        if let Some(existing) = state.shares.get(&(post_id, user_id)) {
            return Ok((existing.clone(), false));
        }
        let share = Share {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            caption,
            created_at: Utc::now(),
        };
        state.shares.insert((post_id, user_id), share.clone());
        Ok((share, true))
    }

    async fn insert_comment(&self, new_comment: NewComment) -> Result<Comment> {
        let mut state = self.state.write().await;
        if !state.posts.contains_key(&new_comment.post_id) {
            return Err(AppError::NotFound(format!(
                "Post {} not found",
                new_comment.post_id
            )));
        }
        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            post_id: new_comment.post_id,
            user_id: new_comment.user_id,
            parent_comment_id: new_comment.parent_comment_id,
            content: new_comment.content,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };
        state.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn soft_delete_comment(&self, comment_id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        match state
            .comments
            .get_mut(&comment_id)
            .filter(|c| !c.is_deleted && c.user_id == user_id)
        {
            Some(comment) => {
                comment.is_deleted = true;
                comment.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl InteractionSink for MemoryStore {
    async fn record(&self, event: NewInteraction) -> Result<Interaction> {
        let interaction = Interaction {
            id: Uuid::new_v4(),
            user_id: event.user_id,
            target_type: event.target_type,
            target_id: event.target_id,
            interaction_type: event.interaction_type,
            metadata: event.metadata,
            created_at: Utc::now(),
        };
        self.state
            .write()
            .await
            .interactions
            .push(interaction.clone());
        Ok(interaction)
    }
}
