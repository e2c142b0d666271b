/// Trending Service
///
/// Scores the posts created inside a time window and returns the top-N
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::ranking::{rank_trending, trending_threshold};
use crate::db::{ContentStore, PostScope};
use crate::error::Result;
use crate::metrics::feed::{observe_request, TRENDING_CANDIDATE_COUNT};
use crate::models::TrendingPost;

#[derive(Clone)]
pub struct TrendingRanker {
    content: Arc<dyn ContentStore>,
}

impl TrendingRanker {
    pub fn new(content: Arc<dyn ContentStore>) -> Self {
        Self { content }
    }

    /// Top `limit` posts from the last `window_hours` hours
    pub async fn get_trending(&self, limit: usize, window_hours: u32) -> Result<Vec<TrendingPost>> {
        self.get_trending_at(limit, window_hours, Utc::now()).await
    }

    /// Same as [`get_trending`](Self::get_trending) with an explicit clock
    pub async fn get_trending_at(
        &self,
        limit: usize,
        window_hours: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<TrendingPost>> {
        let started = Instant::now();
        let result = self.rank(limit, window_hours, now).await;
        observe_request("trending", result.is_ok(), started.elapsed());
        result
    }

    async fn rank(
        &self,
        limit: usize,
        window_hours: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<TrendingPost>> {
        if window_hours == 0 || limit == 0 {
            return Ok(Vec::new());
        }

        let threshold = trending_threshold(now, window_hours);
        let candidates = self
            .content
            .engaged_posts(PostScope::CreatedSince(threshold), Some(threshold))
            .await?;
        TRENDING_CANDIDATE_COUNT.observe(candidates.len() as f64);

        let candidate_count = candidates.len();
        let ranked = rank_trending(candidates, limit);

        debug!(
            window_hours,
            limit,
            candidates = candidate_count,
            returned = ranked.len(),
            "ranked trending posts"
        );
        Ok(ranked)
    }
}
