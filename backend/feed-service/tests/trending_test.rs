//! Integration Tests: Trending Ranker
//!
//! Coverage:
//! - Posts created before the window and deleted posts are excluded
//! - Only in-window likes/comments/shares count toward the score
//! - Weighted score ordering (likes 1, comments 2, shares 3)
//! - Zero window, short candidate lists and limit truncation
//! - Window start is inclusive for posts and events
//! - Default trait aggregation ranks the same as the store override

mod common;

use common::{base_time, hours_ago, minutes_ago, Fixture};
use feed_service::TrendingRanker;
use uuid::Uuid;

#[tokio::test]
async fn test_shares_and_likes_beat_single_comment() {
    let fx = Fixture::new();
    let author = Uuid::new_v4();
    let fan = Uuid::new_v4();

    // A: 0 likes, 1 comment, 0 shares -> 2
    let a = fx.post(author, hours_ago(2)).await;
    fx.comment(&a, fan, hours_ago(1), None).await;
    // B: 1 like, 0 comments, 1 share -> 4
    let b = fx.post(author, hours_ago(3)).await;
    fx.like(&b, fan, hours_ago(1)).await;
    fx.share(&b, fan, hours_ago(1)).await;

    let trending = fx
        .trending()
        .get_trending_at(10, 24, base_time())
        .await
        .unwrap();

    assert_eq!(trending.len(), 2);
    assert_eq!(trending[0].post.id, b.id);
    assert_eq!(trending[0].engagement_score, 4);
    assert_eq!(trending[0].recent_likes, 1);
    assert_eq!(trending[0].recent_shares, 1);
    assert_eq!(trending[1].post.id, a.id);
    assert_eq!(trending[1].engagement_score, 2);
    assert_eq!(trending[1].recent_comments, 1);
}

#[tokio::test]
async fn test_old_and_deleted_posts_are_excluded() {
    let fx = Fixture::new();
    let author = Uuid::new_v4();
    let fan = Uuid::new_v4();

    let old = fx.post(author, hours_ago(30)).await;
    fx.like(&old, fan, hours_ago(1)).await;
    let deleted = fx.deleted_post(author, hours_ago(1)).await;
    fx.like(&deleted, fan, minutes_ago(30)).await;
    let fresh = fx.post(author, hours_ago(5)).await;

    let trending = fx
        .trending()
        .get_trending_at(10, 24, base_time())
        .await
        .unwrap();

    let ids: Vec<Uuid> = trending.iter().map(|t| t.post.id).collect();
    assert_eq!(ids, vec![fresh.id]);
}

#[tokio::test]
async fn test_events_before_window_do_not_count() {
    let fx = Fixture::new();
    let author = Uuid::new_v4();

    let post = fx.post(author, hours_ago(2)).await;
    // Engagement stamped before the window start is ignored even though the
    // post itself is inside the window.
    fx.like(&post, Uuid::new_v4(), hours_ago(1)).await;
    fx.like(&post, Uuid::new_v4(), hours_ago(5)).await;
    fx.share(&post, Uuid::new_v4(), hours_ago(4)).await;

    let trending = fx
        .trending()
        .get_trending_at(10, 3, base_time())
        .await
        .unwrap();
    assert_eq!(trending.len(), 1);
    assert_eq!(trending[0].recent_likes, 1);
    assert_eq!(trending[0].recent_shares, 0);
    assert_eq!(trending[0].engagement_score, 1);
}

#[tokio::test]
async fn test_deleted_comments_do_not_score() {
    let fx = Fixture::new();
    let author = Uuid::new_v4();
    let post = fx.post(author, hours_ago(1)).await;
    fx.deleted_comment(&post, Uuid::new_v4(), minutes_ago(30)).await;

    let trending = fx
        .trending()
        .get_trending_at(10, 24, base_time())
        .await
        .unwrap();
    assert_eq!(trending[0].recent_comments, 0);
    assert_eq!(trending[0].engagement_score, 0);
}

#[tokio::test]
async fn test_zero_window_is_empty() {
    let fx = Fixture::new();
    let post = fx.post(Uuid::new_v4(), base_time()).await;
    fx.like(&post, Uuid::new_v4(), base_time()).await;

    let trending = fx
        .trending()
        .get_trending_at(5, 0, base_time())
        .await
        .unwrap();
    assert!(trending.is_empty());
}

#[tokio::test]
async fn test_limit_truncates_and_short_lists_return_all() {
    let fx = Fixture::new();
    let author = Uuid::new_v4();
    for i in 0..4 {
        let post = fx.post(author, hours_ago(i + 1)).await;
        for _ in 0..i {
            fx.like(&post, Uuid::new_v4(), minutes_ago(10)).await;
        }
    }
    let ranker = fx.trending();

    let top_two = ranker.get_trending_at(2, 24, base_time()).await.unwrap();
    assert_eq!(top_two.len(), 2);
    assert_eq!(top_two[0].engagement_score, 3);
    assert_eq!(top_two[1].engagement_score, 2);

    let all = ranker.get_trending_at(50, 24, base_time()).await.unwrap();
    assert_eq!(all.len(), 4);
}

#[tokio::test]
async fn test_equal_scores_prefer_newer_posts() {
    let fx = Fixture::new();
    let author = Uuid::new_v4();
    let older = fx.post(author, hours_ago(4)).await;
    let newer = fx.post(author, hours_ago(1)).await;

    let trending = fx
        .trending()
        .get_trending_at(10, 24, base_time())
        .await
        .unwrap();
    assert_eq!(trending[0].post.id, newer.id);
    assert_eq!(trending[1].post.id, older.id);
}

#[tokio::test]
async fn test_window_start_is_inclusive() {
    let fx = Fixture::new();
    let post = fx.post(Uuid::new_v4(), hours_ago(3)).await;
    fx.like(&post, Uuid::new_v4(), hours_ago(3)).await;

    let trending = fx
        .trending()
        .get_trending_at(10, 3, base_time())
        .await
        .unwrap();
    assert_eq!(trending.len(), 1);
    assert_eq!(trending[0].post.id, post.id);
    assert_eq!(trending[0].recent_likes, 1);
    assert_eq!(trending[0].engagement_score, 1);
}

#[tokio::test]
async fn test_default_aggregation_matches_store_override() {
    let fx = Fixture::new();
    let author = Uuid::new_v4();
    let fan = Uuid::new_v4();

    let a = fx.post(author, hours_ago(2)).await;
    fx.comment(&a, fan, hours_ago(1), None).await;
    fx.deleted_comment(&a, fan, hours_ago(1)).await;
    let b = fx.post(author, hours_ago(3)).await;
    fx.like(&b, fan, hours_ago(3)).await;
    fx.share(&b, fan, hours_ago(1)).await;
    fx.post(author, hours_ago(4)).await;
    fx.deleted_post(author, hours_ago(1)).await;

    let overridden = fx
        .trending()
        .get_trending_at(10, 3, base_time())
        .await
        .unwrap();
    let defaults = TrendingRanker::new(fx.defaults_only())
        .get_trending_at(10, 3, base_time())
        .await
        .unwrap();

    let summary = |ranked: &[feed_service::models::TrendingPost]| {
        ranked
            .iter()
            .map(|t| (t.post.id, t.engagement_score))
            .collect::<Vec<_>>()
    };
    assert_eq!(summary(&defaults), vec![(b.id, 4), (a.id, 2)]);
    assert_eq!(summary(&defaults), summary(&overridden));
}
