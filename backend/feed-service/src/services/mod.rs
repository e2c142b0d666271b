//! Service layer for feed-service
//!
//! Read path:
//! - feed: home feed assembly from the social graph
//! - trending: windowed engagement ranking
//! - engagement: user statistics and per-post counts
//!
//! Write path:
//! - posts: post and comment authoring plus lookups
//! - social: likes, shares and follows
//! - interactions: best-effort interaction log emission

use uuid::Uuid;

use crate::error::{AppError, Result};

pub mod engagement;
pub mod feed;
pub mod interactions;
pub mod posts;
pub mod social;
pub mod trending;

pub use engagement::EngagementService;
pub use feed::FeedAssembler;
pub use interactions::InteractionRecorder;
pub use posts::PostService;
pub use social::SocialService;
pub use trending::TrendingRanker;

pub(crate) fn require_actor(actor: Option<Uuid>) -> Result<Uuid> {
    actor.ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
}

/// Trimmed content, rejected with `message` when blank
pub(crate) fn require_content(raw: &str, message: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional field; blank becomes `None`
pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
