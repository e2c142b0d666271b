/// Engagement statistics
///
/// All-time per-user aggregates and per-post count decoration
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;
use uuid::Uuid;

use crate::db::{ContentStore, PostScope, SocialGraph};
use crate::error::Result;
use crate::metrics::feed::observe_request;
use crate::models::{Post, PostEngagement, PostView, UserStats};
use crate::utils::newest_first;

/// Average engagement per post; 0 for a user without posts.
pub fn engagement_rate(total_engagement: i64, total_posts: i64) -> f64 {
    if total_posts == 0 {
        return 0.0;
    }
    total_engagement as f64 / total_posts.max(1) as f64
}

/// Post with the most all-time engagement. Ties go to the newer post, then
/// the smaller id.
fn top_performing(posts: &[PostEngagement]) -> Option<Post> {
    posts
        .iter()
        .min_by(|a, b| {
            b.counts
                .total()
                .cmp(&a.counts.total())
                .then_with(|| newest_first(&a.post, &b.post))
        })
        .map(|item| item.post.clone())
}

#[derive(Clone)]
pub struct EngagementService {
    graph: Arc<dyn SocialGraph>,
    content: Arc<dyn ContentStore>,
}

impl EngagementService {
    pub fn new(graph: Arc<dyn SocialGraph>, content: Arc<dyn ContentStore>) -> Self {
        Self { graph, content }
    }

    /// Aggregate statistics over the user's non-deleted posts. Users without
    /// any posts or edges get all-zero stats.
    pub async fn user_stats(&self, user_id: Uuid) -> Result<UserStats> {
        let started = Instant::now();
        let result = self.compute_stats(user_id).await;
        observe_request("user_stats", result.is_ok(), started.elapsed());
        result
    }

    async fn compute_stats(&self, user_id: Uuid) -> Result<UserStats> {
        let posts = self
            .content
            .engaged_posts(PostScope::Author(user_id), None)
            .await?;
        let followers_count = self.graph.followers_count(user_id).await?;
        let following_count = self.graph.following_count(user_id).await?;

        let total_posts = posts.len() as i64;
        let total_likes: i64 = posts.iter().map(|p| p.counts.likes).sum();
        let total_comments: i64 = posts.iter().map(|p| p.counts.comments).sum();
        let total_shares: i64 = posts.iter().map(|p| p.counts.shares).sum();
        let total_engagement = total_likes + total_comments + total_shares;

        debug!(
            user_id = %user_id,
            total_posts,
            total_engagement,
            "computed user stats"
        );

        Ok(UserStats {
            user_id,
            total_posts,
            total_likes,
            total_comments,
            total_shares,
            followers_count,
            following_count,
            engagement_rate: engagement_rate(total_engagement, total_posts),
            top_performing_post: top_performing(&posts),
        })
    }

    /// Decorate posts with all-time counts and the viewer's like state.
    /// Order is preserved.
    pub async fn post_views(&self, posts: Vec<Post>, viewer: Option<Uuid>) -> Result<Vec<PostView>> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let counts = self.content.engagement_counts(&ids, None).await?;
        let liked = match viewer {
            Some(viewer_id) => self.content.liked_by(viewer_id, &ids).await?,
            None => HashSet::new(),
        };

        Ok(posts
            .into_iter()
            .map(|post| {
                let c = counts.get(&post.id).copied().unwrap_or_default();
                let is_liked_by_viewer = liked.contains(&post.id);
                PostView {
                    post,
                    likes_count: c.likes,
                    comment_count: c.comments,
                    share_count: c.shares,
                    is_liked_by_viewer,
                }
            })
            .collect())
    }

    pub async fn post_view(&self, post: Post, viewer: Option<Uuid>) -> Result<PostView> {
        let mut views = self.post_views(vec![post.clone()], viewer).await?;
        Ok(views.pop().unwrap_or(PostView {
            post,
            likes_count: 0,
            comment_count: 0,
            share_count: 0,
            is_liked_by_viewer: false,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MockContentStore, MockSocialGraph};
    use crate::models::EngagementCounts;
    use chrono::{Duration, Utc};

    fn engaged(id: u128, minutes_ago: i64, likes: i64, comments: i64, shares: i64) -> PostEngagement {
        let ts = Utc::now() - Duration::minutes(minutes_ago);
        PostEngagement {
            post: Post {
                id: Uuid::from_u128(id),
                author_id: Uuid::from_u128(7),
                title: None,
                content: "body".into(),
                media_type: None,
                created_at: ts,
                updated_at: ts,
                is_deleted: false,
            },
            counts: EngagementCounts {
                likes,
                comments,
                shares,
            },
        }
    }

    #[test]
    fn test_engagement_rate() {
        assert_eq!(engagement_rate(0, 0), 0.0);
        assert_eq!(engagement_rate(5, 0), 0.0);
        assert_eq!(engagement_rate(9, 3), 3.0);
    }

    #[test]
    fn test_top_performing_uses_unweighted_total() {
        // Two shares weigh more in trending but one more event wins here.
        let shares = engaged(1, 10, 0, 0, 2);
        let likes = engaged(2, 20, 3, 0, 0);
        let top = top_performing(&[shares, likes]).unwrap();
        assert_eq!(top.id, Uuid::from_u128(2));
        assert!(top_performing(&[]).is_none());
    }

    #[test]
    fn test_top_performing_tie_prefers_newer() {
        let older = engaged(1, 60, 1, 1, 0);
        let newer = engaged(2, 5, 2, 0, 0);
        assert_eq!(top_performing(&[older, newer]).unwrap().id, Uuid::from_u128(2));
    }

    #[tokio::test]
    async fn test_stats_for_user_without_posts() {
        let mut content = MockContentStore::new();
        content.expect_engaged_posts().returning(|_, _| Ok(Vec::new()));
        let mut graph = MockSocialGraph::new();
        graph.expect_followers_count().returning(|_| Ok(2));
        graph.expect_following_count().returning(|_| Ok(0));

        let service = EngagementService::new(Arc::new(graph), Arc::new(content));
        let stats = service.user_stats(Uuid::new_v4()).await.unwrap();

        assert_eq!(stats.total_posts, 0);
        assert_eq!(stats.engagement_rate, 0.0);
        assert_eq!(stats.followers_count, 2);
        assert!(stats.top_performing_post.is_none());
    }
}
