//! Feed-service Prometheus collectors and the `/metrics` exporter.
//!
//! `feed` holds read-path latency and outcome counters for feed, trending
//! and stats, the trending candidate histogram, and the interaction-log
//! write counter. Collectors live in the default registry.

use actix_web::HttpResponse;
use prometheus::{Encoder, TextEncoder};

pub mod feed;

/// Registers every collector so a scrape before the first request still
/// lists them.
pub fn register_collectors() {
    lazy_static::initialize(&feed::FEED_REQUEST_DURATION_SECONDS);
    lazy_static::initialize(&feed::FEED_REQUEST_TOTAL);
    lazy_static::initialize(&feed::TRENDING_CANDIDATE_COUNT);
    lazy_static::initialize(&feed::INTERACTION_EVENTS_TOTAL);
}

/// `GET /metrics` in the Prometheus text format
pub async fn serve_metrics() -> HttpResponse {
    register_collectors();

    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&prometheus::gather(), &mut buffer) {
        tracing::error!(error = %err, "failed to encode metrics");
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
