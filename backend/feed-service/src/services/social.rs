/// Likes, shares and follows
///
/// Every operation is idempotent: repeating it returns `false` (or the
/// existing share) instead of failing.
use std::sync::Arc;

use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::interactions::InteractionRecorder;
use super::{normalize_optional, require_actor};
use crate::db::{ContentStore, ContentWriter, SocialGraph};
use crate::error::{AppError, Result};
use crate::models::{InteractionType, Post, Share, TargetType};

#[derive(Clone)]
pub struct SocialService {
    graph: Arc<dyn SocialGraph>,
    content: Arc<dyn ContentStore>,
    writer: Arc<dyn ContentWriter>,
    recorder: InteractionRecorder,
}

impl SocialService {
    pub fn new(
        graph: Arc<dyn SocialGraph>,
        content: Arc<dyn ContentStore>,
        writer: Arc<dyn ContentWriter>,
        recorder: InteractionRecorder,
    ) -> Self {
        Self {
            graph,
            content,
            writer,
            recorder,
        }
    }

    async fn live_post(&self, post_id: Uuid) -> Result<Post> {
        self.content
            .get_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))
    }

    /// Returns `true` when a new like was created
    pub async fn like_post(&self, actor: Option<Uuid>, post_id: Uuid) -> Result<bool> {
        let user_id = require_actor(actor)?;
        let post = self.live_post(post_id).await?;

        let created = self.writer.insert_like(post_id, user_id).await?;
        if created {
            info!(post_id = %post_id, user_id = %user_id, "post liked");
            self.recorder
                .emit(
                    user_id,
                    TargetType::Post,
                    post_id,
                    InteractionType::Like,
                    json!({ "liked_user_id": post.author_id.to_string() }),
                )
                .await;
        }
        Ok(created)
    }

    /// Returns `true` when a like was removed
    pub async fn unlike_post(&self, actor: Option<Uuid>, post_id: Uuid) -> Result<bool> {
        let user_id = require_actor(actor)?;
        self.live_post(post_id).await?;

        let removed = self.writer.delete_like(post_id, user_id).await?;
        if removed {
            info!(post_id = %post_id, user_id = %user_id, "post unliked");
        }
        Ok(removed)
    }

    /// Returns the actor's share of the post and whether it was just created
    pub async fn share_post(
        &self,
        actor: Option<Uuid>,
        post_id: Uuid,
        caption: Option<String>,
    ) -> Result<(Share, bool)> {
        let user_id = require_actor(actor)?;
        let post = self.live_post(post_id).await?;

        let (share, created) = self
            .writer
            .insert_share(post_id, user_id, normalize_optional(caption))
            .await?;
        if created {
            info!(post_id = %post_id, user_id = %user_id, "post shared");
            self.recorder
                .emit(
                    user_id,
                    TargetType::Post,
                    post_id,
                    InteractionType::Share,
                    json!({ "shared_user_id": post.author_id.to_string() }),
                )
                .await;
        }
        Ok((share, created))
    }

    /// Returns `true` when a new follow edge was created
    pub async fn follow_user(&self, actor: Option<Uuid>, followee_id: Uuid) -> Result<bool> {
        let follower_id = require_actor(actor)?;
        if follower_id == followee_id {
            return Err(AppError::Validation("You cannot follow yourself".to_string()));
        }

        let created = self.graph.create_follow(follower_id, followee_id).await?;
        if created {
            info!(follower_id = %follower_id, followee_id = %followee_id, "user followed");
            self.recorder
                .emit(
                    follower_id,
                    TargetType::User,
                    followee_id,
                    InteractionType::Follow,
                    json!({ "followed_user_id": followee_id.to_string() }),
                )
                .await;
        }
        Ok(created)
    }

    /// Returns `true` when an edge was removed
    pub async fn unfollow_user(&self, actor: Option<Uuid>, followee_id: Uuid) -> Result<bool> {
        let follower_id = require_actor(actor)?;
        let removed = self.graph.delete_follow(follower_id, followee_id).await?;
        if removed {
            info!(follower_id = %follower_id, followee_id = %followee_id, "user unfollowed");
        }
        Ok(removed)
    }
}
