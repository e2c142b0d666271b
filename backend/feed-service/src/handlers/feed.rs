/// Feed and trending API handlers
use actix_web::{get, web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::AppState;
use crate::error::{AppError, Result};
use crate::middleware::Viewer;
use crate::models::{PostView, TrendingPost};
use crate::utils::clamp_limit;

/// Query parameters for GET /feed
#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: u32,
}

#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub posts: Vec<PostView>,
    pub count: usize,
    /// Offset of the next page, absent when this page was short
    pub next_offset: Option<u32>,
}

/// Query parameters for GET /trending
#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    pub limit: Option<u32>,
    /// Window size in hours
    pub hours: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct TrendingResponse {
    pub posts: Vec<TrendingPost>,
    pub count: usize,
    pub window_hours: u32,
}

#[get("/feed")]
pub async fn get_feed(
    state: web::Data<AppState>,
    viewer: Viewer,
    query: web::Query<FeedQuery>,
) -> Result<HttpResponse> {
    let limit = state.page_limit(query.limit);
    let offset = query.offset;

    debug!(viewer = ?viewer.id(), limit, offset, "feed request");

    let posts = state
        .feed
        .get_feed(viewer.id(), limit, offset as usize)
        .await?;
    let posts = state.engagement.post_views(posts, viewer.id()).await?;

    let next_offset = (limit > 0 && posts.len() == limit).then(|| offset + limit as u32);
    Ok(HttpResponse::Ok().json(FeedResponse {
        count: posts.len(),
        posts,
        next_offset,
    }))
}

#[get("/trending")]
pub async fn get_trending(
    state: web::Data<AppState>,
    query: web::Query<TrendingQuery>,
) -> Result<HttpResponse> {
    let cfg = &state.trending_config;
    let window_hours = query.hours.unwrap_or(cfg.default_window_hours);
    if window_hours > cfg.max_window_hours {
        return Err(AppError::Validation(format!(
            "hours must be at most {}",
            cfg.max_window_hours
        )));
    }
    let limit = clamp_limit(query.limit, cfg.default_limit, state.feed_config.max_limit);

    debug!(limit, window_hours, "trending request");

    let posts = state
        .trending
        .get_trending(limit as usize, window_hours)
        .await?;
    Ok(HttpResponse::Ok().json(TrendingResponse {
        count: posts.len(),
        posts,
        window_hours,
    }))
}
