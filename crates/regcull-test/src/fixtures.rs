//! Tag and repository fixtures.

use chrono::{DateTime, Duration, TimeZone, Utc};

use regcull_core::Tag;

/// A fixed reference instant for deterministic tests.
///
/// # Panics
///
/// Never panics; the date is a valid constant.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
        .single()
        .expect("valid fixed date")
}

/// Creates a tag created `days` whole days before `now`.
#[must_use]
pub fn tag_aged(name: &str, repository_id: u64, days: i64, now: DateTime<Utc>) -> Tag {
    Tag::new(name, repository_id, now - Duration::days(days))
}

/// Creates tags from `(name, age_in_days)` pairs, in the given order.
#[must_use]
pub fn aged_tags(repository_id: u64, ages: &[(&str, i64)], now: DateTime<Utc>) -> Vec<Tag> {
    ages.iter()
        .map(|&(name, days)| tag_aged(name, repository_id, days, now))
        .collect()
}

/// Creates `count` tags named `{prefix}-{i}`, one minute apart.
///
/// Tag `{prefix}-0` is the newest; the fetch order is newest first.
#[must_use]
pub fn sequential_tags(
    repository_id: u64,
    prefix: &str,
    count: usize,
    now: DateTime<Utc>,
) -> Vec<Tag> {
    (0..count)
        .map(|i| {
            let minutes = i64::try_from(i).unwrap_or(i64::MAX);
            Tag::new(
                format!("{prefix}-{i}"),
                repository_id,
                now - Duration::minutes(minutes),
            )
        })
        .collect()
}
