//! Trending ranking rules
//!
//! Algorithm:
//! - Window: posts and engagement events with `created_at >= now - window_hours`
//! - Score = likes + 2 * comments + 3 * shares, counted inside the window
//! - Order: score descending, then `created_at` descending, then `id` ascending
//!
//! The functions here are pure; fetching candidates is the service's job.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};

use crate::models::{PostEngagement, TrendingPost};
use crate::utils::newest_first;

/// Lower bound of the trending window. Saturates at the earliest
/// representable instant instead of overflowing.
pub fn trending_threshold(now: DateTime<Utc>, window_hours: u32) -> DateTime<Utc> {
    now.checked_sub_signed(Duration::hours(i64::from(window_hours)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Score, order and truncate candidates to the top `limit`.
pub fn rank_trending(candidates: Vec<PostEngagement>, limit: usize) -> Vec<TrendingPost> {
    let mut ranked: Vec<TrendingPost> = candidates.into_iter().map(TrendingPost::from).collect();
    ranked.sort_by(trending_order);
    ranked.truncate(limit);
    ranked
}

fn trending_order(a: &TrendingPost, b: &TrendingPost) -> Ordering {
    b.engagement_score
        .cmp(&a.engagement_score)
        .then_with(|| newest_first(&a.post, &b.post))
}
