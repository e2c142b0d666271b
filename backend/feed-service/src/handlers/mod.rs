//! HTTP gateway
//!
//! Maps `/api/v1` requests onto the feed services. Viewer identity comes
//! from the [`Viewer`](crate::middleware::Viewer) extractor.

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::config::{Config, FeedConfig, TrendingConfig};
use crate::db::{ContentStore, ContentWriter, InteractionSink, SocialGraph};
use crate::metrics::serve_metrics;
use crate::services::{
    EngagementService, FeedAssembler, InteractionRecorder, PostService, SocialService,
    TrendingRanker,
};

pub mod comments;
pub mod feed;
pub mod posts;
pub mod users;

/// Shared handler state
pub struct AppState {
    pub feed: FeedAssembler,
    pub trending: TrendingRanker,
    pub engagement: EngagementService,
    pub posts: PostService,
    pub social: SocialService,
    pub feed_config: FeedConfig,
    pub trending_config: TrendingConfig,
}

impl AppState {
    pub fn new(
        graph: Arc<dyn SocialGraph>,
        content: Arc<dyn ContentStore>,
        writer: Arc<dyn ContentWriter>,
        sink: Arc<dyn InteractionSink>,
        config: &Config,
    ) -> Self {
        let recorder = InteractionRecorder::new(sink);
        Self {
            feed: FeedAssembler::new(graph.clone(), content.clone()),
            trending: TrendingRanker::new(content.clone()),
            engagement: EngagementService::new(graph.clone(), content.clone()),
            posts: PostService::new(content.clone(), writer.clone(), recorder.clone()),
            social: SocialService::new(graph, content, writer, recorder),
            feed_config: config.feed.clone(),
            trending_config: config.trending.clone(),
        }
    }

    /// Clamp a requested page size to the configured bounds
    pub fn page_limit(&self, requested: Option<u32>) -> usize {
        crate::utils::clamp_limit(
            requested,
            self.feed_config.default_limit,
            self.feed_config.max_limit,
        ) as usize
    }
}

/// Outcome of an idempotent mutation
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub message: String,
    /// `false` when the call was a no-op repeat
    pub changed: bool,
}

impl ActionResponse {
    pub fn new(message: impl Into<String>, changed: bool) -> Self {
        Self {
            message: message.into(),
            changed,
        }
    }
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Register every route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/metrics", web::get().to(serve_metrics))
        .service(
            web::scope("/api/v1")
                .service(feed::get_feed)
                .service(feed::get_trending)
                .service(users::get_user_stats)
                .service(users::follow_user)
                .service(users::unfollow_user)
                .service(posts::list_posts)
                .service(posts::create_post)
                .service(posts::get_post)
                .service(posts::update_post)
                .service(posts::delete_post)
                .service(posts::like_post)
                .service(posts::unlike_post)
                .service(posts::share_post)
                .service(comments::list_post_comments)
                .service(comments::create_comment)
                .service(comments::delete_comment)
                .service(comments::list_replies),
        );
}
