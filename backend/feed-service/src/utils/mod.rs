use std::cmp::Ordering;

use crate::models::Post;

/// Feed ordering: `created_at` descending, then `id` ascending.
pub fn newest_first(a: &Post, b: &Post) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| a.id.cmp(&b.id))
}

/// Return the `[offset, offset + limit)` window of `items`.
pub fn paginate<T>(items: Vec<T>, limit: usize, offset: usize) -> Vec<T> {
    if limit == 0 {
        return Vec::new();
    }
    items.into_iter().skip(offset).take(limit).collect()
}

/// Apply the default for a missing limit and cap it at `max`.
pub fn clamp_limit(requested: Option<u32>, default: u32, max: u32) -> u32 {
    requested.unwrap_or(default).min(max)
}

/// `LIMIT`/`OFFSET` bind value; sizes past `i64::MAX` saturate.
pub fn sql_count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn post_at(id: Uuid, minutes_ago: i64) -> Post {
        let ts = Utc::now() - Duration::minutes(minutes_ago);
        Post {
            id,
            author_id: Uuid::new_v4(),
            title: None,
            content: "x".to_string(),
            media_type: None,
            created_at: ts,
            updated_at: ts,
            is_deleted: false,
        }
    }

    #[test]
    fn test_newest_first_breaks_ties_by_id() {
        let low = Uuid::from_u128(1);
        let high = Uuid::from_u128(2);
        let a = post_at(high, 5);
        let mut b = post_at(low, 5);
        b.created_at = a.created_at;
        let newer = post_at(Uuid::from_u128(3), 0);

        let mut posts = vec![a.clone(), newer.clone(), b.clone()];
        posts.sort_by(newest_first);

        assert_eq!(posts[0].id, newer.id);
        assert_eq!(posts[1].id, low);
        assert_eq!(posts[2].id, high);
    }

    #[test]
    fn test_paginate_windows() {
        let items: Vec<u32> = (0..5).collect();
        assert_eq!(paginate(items.clone(), 2, 0), vec![0, 1]);
        assert_eq!(paginate(items.clone(), 2, 4), vec![4]);
        assert!(paginate(items.clone(), 0, 0).is_empty());
        assert!(paginate(items, 3, 10).is_empty());
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None, 10, 100), 10);
        assert_eq!(clamp_limit(Some(500), 10, 100), 100);
        assert_eq!(clamp_limit(Some(0), 10, 100), 0);
    }

    #[test]
    fn test_sql_count_saturates() {
        assert_eq!(sql_count(0), 0);
        assert_eq!(sql_count(25), 25);
        assert!(sql_count(usize::MAX) > 0);
        #[cfg(target_pointer_width = "64")]
        assert_eq!(sql_count(usize::MAX), i64::MAX);
    }
}
