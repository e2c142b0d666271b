use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_histogram_vec, register_int_counter_vec, Histogram,
    HistogramVec, IntCounterVec,
};

lazy_static! {
    /// Duration of read-path requests by operation (feed, trending, stats).
    pub static ref FEED_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "feed_request_duration_seconds",
        "Read-path request duration segmented by operation",
        &["operation"]
    )
    .expect("failed to register feed_request_duration_seconds");

    /// Total read-path requests by operation and result (ok/error).
    pub static ref FEED_REQUEST_TOTAL: IntCounterVec = register_int_counter_vec!(
        "feed_request_total",
        "Total read-path requests segmented by operation and result",
        &["operation", "result"]
    )
    .expect("failed to register feed_request_total");

    /// Posts considered per trending computation.
    pub static ref TRENDING_CANDIDATE_COUNT: Histogram = register_histogram!(
        "trending_candidate_count",
        "Number of in-window posts scored per trending request"
    )
    .expect("failed to register trending_candidate_count");

    /// Interaction log writes by interaction type and result (recorded/failed).
    pub static ref INTERACTION_EVENTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "interaction_events_total",
        "Interaction log writes segmented by type and result",
        &["interaction_type", "result"]
    )
    .expect("failed to register interaction_events_total");
}

/// Observe one read-path call: bump the counter and record its duration.
pub fn observe_request(operation: &str, ok: bool, elapsed: std::time::Duration) {
    let result = if ok { "ok" } else { "error" };
    FEED_REQUEST_TOTAL
        .with_label_values(&[operation, result])
        .inc();
    FEED_REQUEST_DURATION_SECONDS
        .with_label_values(&[operation])
        .observe(elapsed.as_secs_f64());
}
