use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity. Never hard-deleted; `is_deleted` hides it from every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: Option<String>,
    pub content: String,
    pub media_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
}

/// Directed follow edge, unique per (follower, followee)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FollowEdge {
    pub follower_id: Uuid,
    pub followee_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Like entity - unique per (post, user)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Like {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Share entity - unique per (post, user)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Share {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Comment entity. Replies point at a comment on the same post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub parent_comment_id: Option<Uuid>,
    pub content: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Post,
    Comment,
    User,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Post => "post",
            TargetType::Comment => "comment",
            TargetType::User => "user",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionType {
    View,
    Like,
    Comment,
    Share,
    Follow,
}

impl InteractionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionType::View => "view",
            InteractionType::Like => "like",
            InteractionType::Comment => "comment",
            InteractionType::Share => "share",
            InteractionType::Follow => "follow",
        }
    }
}

/// Append-only analytics record written by the social write path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub target_type: TargetType,
    pub target_id: Uuid,
    pub interaction_type: InteractionType,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInteraction {
    pub user_id: Uuid,
    pub target_type: TargetType,
    pub target_id: Uuid,
    pub interaction_type: InteractionType,
    pub metadata: serde_json::Value,
}

/// Engagement events that contribute to a post's score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngagementKind {
    Like,
    Comment,
    Share,
}

impl EngagementKind {
    pub const ALL: [EngagementKind; 3] = [
        EngagementKind::Like,
        EngagementKind::Comment,
        EngagementKind::Share,
    ];

    /// Trending weight of one event of this kind.
    pub fn weight(&self) -> i64 {
        match self {
            EngagementKind::Like => 1,
            EngagementKind::Comment => 2,
            EngagementKind::Share => 3,
        }
    }
}

/// Like / comment / share counts for one post over some time range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct EngagementCounts {
    pub likes: i64,
    pub comments: i64,
    pub shares: i64,
}

impl EngagementCounts {
    pub fn get(&self, kind: EngagementKind) -> i64 {
        match kind {
            EngagementKind::Like => self.likes,
            EngagementKind::Comment => self.comments,
            EngagementKind::Share => self.shares,
        }
    }

    pub fn set(&mut self, kind: EngagementKind, value: i64) {
        match kind {
            EngagementKind::Like => self.likes = value,
            EngagementKind::Comment => self.comments = value,
            EngagementKind::Share => self.shares = value,
        }
    }

    /// Weighted score: likes + 2 * comments + 3 * shares
    pub fn score(&self) -> i64 {
        EngagementKind::ALL
            .iter()
            .map(|kind| kind.weight() * self.get(*kind))
            .sum()
    }

    /// Unweighted sum of all engagement events
    pub fn total(&self) -> i64 {
        self.likes + self.comments + self.shares
    }
}

/// A post together with its engagement counts
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PostEngagement {
    #[sqlx(flatten)]
    pub post: Post,
    #[sqlx(flatten)]
    pub counts: EngagementCounts,
}

/// Trending result item: the post, its in-window counts and its score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingPost {
    #[serde(flatten)]
    pub post: Post,
    pub recent_likes: i64,
    pub recent_comments: i64,
    pub recent_shares: i64,
    pub engagement_score: i64,
}

impl From<PostEngagement> for TrendingPost {
    fn from(item: PostEngagement) -> Self {
        let engagement_score = item.counts.score();
        Self {
            post: item.post,
            recent_likes: item.counts.likes,
            recent_comments: item.counts.comments,
            recent_shares: item.counts.shares,
            engagement_score,
        }
    }
}

/// All-time aggregate statistics for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub user_id: Uuid,
    pub total_posts: i64,
    pub total_likes: i64,
    pub total_comments: i64,
    pub total_shares: i64,
    pub followers_count: i64,
    pub following_count: i64,
    pub engagement_rate: f64,
    pub top_performing_post: Option<Post>,
}

/// Post decorated with counts and the viewer's like state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub likes_count: i64,
    pub comment_count: i64,
    pub share_count: i64,
    pub is_liked_by_viewer: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub author_id: Uuid,
    pub title: Option<String>,
    pub content: String,
    pub media_type: Option<String>,
}

/// Partial update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub media_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub parent_comment_id: Option<Uuid>,
}
