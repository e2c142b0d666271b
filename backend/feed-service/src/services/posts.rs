/// Post and comment operations
///
/// Entity lookups plus the authoring side of the write path. Mutations are
/// guarded by authentication and authorship and emit interaction events.
use std::sync::Arc;

use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::interactions::InteractionRecorder;
use super::{normalize_optional, require_actor, require_content};
use crate::db::{ContentStore, ContentWriter};
use crate::error::{AppError, Result};
use crate::models::{Comment, InteractionType, NewComment, NewPost, Post, PostChanges, TargetType};

const POST_NOT_OWNED: &str = "Post not found or you don't have permission";
const COMMENT_NOT_OWNED: &str = "Comment not found or you don't have permission";

#[derive(Clone)]
pub struct PostService {
    content: Arc<dyn ContentStore>,
    writer: Arc<dyn ContentWriter>,
    recorder: InteractionRecorder,
}

impl PostService {
    pub fn new(
        content: Arc<dyn ContentStore>,
        writer: Arc<dyn ContentWriter>,
        recorder: InteractionRecorder,
    ) -> Self {
        Self {
            content,
            writer,
            recorder,
        }
    }

    pub async fn get_post(&self, post_id: Uuid) -> Result<Post> {
        self.content
            .get_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))
    }

    pub async fn list_posts(
        &self,
        author_id: Option<Uuid>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Post>> {
        self.content.list_posts(author_id, limit, offset).await
    }

    pub async fn create_post(
        &self,
        actor: Option<Uuid>,
        title: Option<String>,
        content: String,
        media_type: Option<String>,
    ) -> Result<Post> {
        let author_id = require_actor(actor)?;
        let content = require_content(&content, "Content cannot be empty")?;

        let post = self
            .writer
            .insert_post(NewPost {
                author_id,
                title: normalize_optional(title),
                content,
                media_type: normalize_optional(media_type),
            })
            .await?;

        info!(post_id = %post.id, author_id = %author_id, "post created");
        self.recorder
            .emit(
                author_id,
                TargetType::Post,
                post.id,
                InteractionType::View,
                json!({ "action": "post_created" }),
            )
            .await;

        Ok(post)
    }

    pub async fn update_post(
        &self,
        actor: Option<Uuid>,
        post_id: Uuid,
        changes: PostChanges,
    ) -> Result<Post> {
        let author_id = require_actor(actor)?;
        let content = match changes.content {
            Some(raw) => Some(require_content(&raw, "Content cannot be empty")?),
            None => None,
        };
        let changes = PostChanges {
            title: changes.title.map(|t| t.trim().to_string()),
            content,
            media_type: changes.media_type.map(|m| m.trim().to_string()),
        };

        let post = self
            .writer
            .update_post(post_id, author_id, changes)
            .await?
            .ok_or_else(|| AppError::NotFound(POST_NOT_OWNED.to_string()))?;

        info!(post_id = %post.id, "post updated");
        Ok(post)
    }

    /// Soft delete; the post disappears from every read.
    pub async fn delete_post(&self, actor: Option<Uuid>, post_id: Uuid) -> Result<()> {
        let author_id = require_actor(actor)?;
        if !self.writer.soft_delete_post(post_id, author_id).await? {
            return Err(AppError::NotFound(POST_NOT_OWNED.to_string()));
        }
        info!(post_id = %post_id, "post deleted");
        Ok(())
    }

    /// Top-level comments on a live post, oldest first
    pub async fn post_comments(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        self.get_post(post_id).await?;
        self.content.comments_for_post(post_id).await
    }

    /// Direct replies to a live comment, oldest first
    pub async fn comment_replies(&self, comment_id: Uuid) -> Result<Vec<Comment>> {
        if self.content.get_comment(comment_id).await?.is_none() {
            return Err(AppError::NotFound("Comment not found".to_string()));
        }
        self.content.replies_to(comment_id).await
    }

    pub async fn create_comment(
        &self,
        actor: Option<Uuid>,
        post_id: Uuid,
        content: String,
        parent_comment_id: Option<Uuid>,
    ) -> Result<Comment> {
        let user_id = require_actor(actor)?;
        let post = self.get_post(post_id).await?;

        if let Some(parent_id) = parent_comment_id {
            let parent_ok = self
                .content
                .get_comment(parent_id)
                .await?
                .is_some_and(|parent| parent.post_id == post_id);
            if !parent_ok {
                return Err(AppError::NotFound("Parent comment not found".to_string()));
            }
        }

        let content = require_content(&content, "Comment cannot be empty")?;
        let comment = self
            .writer
            .insert_comment(NewComment {
                post_id,
                user_id,
                content,
                parent_comment_id,
            })
            .await?;

        info!(comment_id = %comment.id, post_id = %post_id, "comment created");
        self.recorder
            .emit(
                user_id,
                TargetType::Comment,
                comment.id,
                InteractionType::Comment,
                json!({
                    "post_id": post.id.to_string(),
                    "post_owner_id": post.author_id.to_string(),
                }),
            )
            .await;

        Ok(comment)
    }

    pub async fn delete_comment(&self, actor: Option<Uuid>, comment_id: Uuid) -> Result<()> {
        let user_id = require_actor(actor)?;
        if !self.writer.soft_delete_comment(comment_id, user_id).await? {
            return Err(AppError::NotFound(COMMENT_NOT_OWNED.to_string()));
        }
        info!(comment_id = %comment_id, "comment deleted");
        Ok(())
    }
}
