use crate::record::{LogLevel, LogRecord};
use ahash::AHashSet;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Serialize;

/// Summary statistics over a snapshot of records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_logs: usize,
    pub error_count: usize,
    pub warn_count: usize,
    pub active_services: usize,
    /// Percentage; 0 when the snapshot is empty.
    pub error_rate: f64,
}

/// One fixed-width timeline window. `info_count` covers Info, Debug and
/// Trace together; the frequency view renders three series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineBucket {
    pub bucket_start: DateTime<Utc>,
    pub total: usize,
    pub error_count: usize,
    pub warn_count: usize,
    pub info_count: usize,
}

pub fn summarize<'a, I>(records: I) -> Stats
where
    I: IntoIterator<Item = &'a LogRecord>,
{
    let mut total = 0usize;
    let mut errors = 0usize;
    let mut warns = 0usize;
    let mut services: AHashSet<&str> = AHashSet::new();
    for r in records {
        total += 1;
        match r.level {
            LogLevel::Error => errors += 1,
            LogLevel::Warn => warns += 1,
            _ => {}
        }
        services.insert(r.service.as_str());
    }
    let error_rate = if total == 0 {
        0.0
    } else {
        errors as f64 / total as f64 * 100.0
    };
    Stats {
        total_logs: total,
        error_count: errors,
        warn_count: warns,
        active_services: services.len(),
        error_rate,
    }
}

/// Display-friendly default for `timeline`.
pub const DEFAULT_TARGET_BUCKETS: usize = 60;

// Human-friendly bucket widths, in seconds, up to one day. Wider spans fall
// back to whole-day multiples.
const WIDTH_LADDER_SECS: [i64; 13] = [
    1, 5, 10, 30, 60, 300, 600, 1800, 3600, 10_800, 21_600, 43_200, 86_400,
];

/// Contiguous fixed-width buckets spanning `[min, max]` of the given
/// records, including empty buckets. Empty input yields an empty vec.
pub fn timeline<'a, I>(records: I, target_buckets: usize) -> Vec<TimelineBucket>
where
    I: IntoIterator<Item = &'a LogRecord>,
{
    let points: Vec<(DateTime<Utc>, LogLevel)> =
        records.into_iter().map(|r| (r.timestamp, r.level)).collect();
    if points.is_empty() {
        return Vec::new();
    }
    let min = points.iter().map(|(t, _)| *t).min().unwrap();
    let max = points.iter().map(|(t, _)| *t).max().unwrap();
    let span_secs = (max - min).num_seconds().max(0);
    let width = bucket_width(span_secs, target_buckets.max(1));

    let start = floor_time(min, width);
    let width_secs = width.num_seconds();
    let bucket_count = ((max - start).num_seconds() / width_secs) as usize + 1;

    let mut buckets: Vec<TimelineBucket> = (0..bucket_count)
        .map(|i| TimelineBucket {
            bucket_start: start + Duration::seconds(width_secs * i as i64),
            total: 0,
            error_count: 0,
            warn_count: 0,
            info_count: 0,
        })
        .collect();

    for (t, level) in points {
        let idx = ((t - start).num_seconds() / width_secs) as usize;
        let b = &mut buckets[idx.min(bucket_count - 1)];
        b.total += 1;
        match level {
            LogLevel::Error => b.error_count += 1,
            LogLevel::Warn => b.warn_count += 1,
            _ => b.info_count += 1,
        }
    }
    buckets
}

fn bucket_width(span_secs: i64, target: usize) -> Duration {
    // Smallest ladder step that keeps the bucket count at or under target.
    let raw = (span_secs / target as i64).max(1);
    for step in WIDTH_LADDER_SECS {
        if step >= raw {
            return Duration::seconds(step);
        }
    }
    let days = raw / 86_400 + i64::from(raw % 86_400 != 0);
    Duration::seconds(days * 86_400)
}

fn floor_time(t: DateTime<Utc>, bucket: Duration) -> DateTime<Utc> {
    let secs = bucket.num_seconds();
    if secs <= 0 {
        return t;
    }
    let ts = t.timestamp();
    let floored = ts - ts.rem_euclid(secs);
    Utc.timestamp_opt(floored, 0).unwrap()
}
