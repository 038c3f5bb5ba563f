//! Record identifiers.
//!
//! Ids are decimal millisecond timestamps.  Two records created within
//! the same millisecond would collide, so `next_id` bumps past the
//! largest numeric id already in the list.

use chrono::Utc;

/// Produce an id that is unique among `existing`.
pub fn next_id<'a>(existing: impl IntoIterator<Item = &'a str>) -> String {
    let now = Utc::now().timestamp_millis();
    next_id_at(now, existing)
}

fn next_id_at<'a>(now: i64, existing: impl IntoIterator<Item = &'a str>) -> String {
    let max_existing = existing
        .into_iter()
        .filter_map(|id| id.parse::<i64>().ok())
        .max();

    match max_existing {
        Some(max) if max >= now => (max + 1).to_string(),
        _ => now.to_string(),
    }
}
