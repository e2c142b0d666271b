/// Trending Ranker
///
/// Time-windowed weighted engagement ranking of recent posts
pub mod ranking;
pub mod service;

pub use ranking::{rank_trending, trending_threshold};
pub use service::TrendingRanker;
