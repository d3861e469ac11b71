//! Date labelling shared by every time-series transform.

use chrono::NaiveDate;
use serde::Serialize;

use crate::request::{millis_to_date, DurationType, WidgetRequest};

pub const LATEST: &str = "Latest";

/// X label of bucket `index` out of `len`, starting at `bucket_start` millis.
///
/// The newest point of a year range is "Latest"; otherwise the first bucket
/// takes the caller's normalized start when one is given, else the window
/// start. Remaining labels format the bucket start.
pub fn label(request: &WidgetRequest, bucket_start: i64, index: usize, len: usize) -> String {
    let duration = request.duration_type.unwrap_or(DurationType::Custom);
    if duration == DurationType::Year && index + 1 == len {
        return LATEST.to_string();
    }
    let start = if index == 0 {
        if let Some(ns) = request.normalized_start.as_deref().filter(|s| !s.is_empty()) {
            return ns.chars().take(10).collect();
        }
        request.start_time
    } else {
        bucket_start.max(request.start_time)
    };
    let date = millis_to_date(start);
    format_date(date, duration)
}

pub fn format_date(date: NaiveDate, duration: DurationType) -> String {
    match duration {
        DurationType::Week => date.format("%a").to_string(),
        DurationType::Month => date.format("%d %b").to_string(),
        DurationType::Year => date.format("%b %y").to_string(),
        DurationType::Custom => date.format("%Y-%m-%d").to_string(),
    }
}

pub fn labels(request: &WidgetRequest, keys: &[i64]) -> Vec<String> {
    keys.iter()
        .enumerate()
        .map(|(i, &k)| label(request, k, i, keys.len()))
        .collect()
}

/// Millisecond span of one bucket, clipped to the request window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BucketDates {
    pub min: i64,
    pub max: i64,
}

pub fn bucket_dates(request: &WidgetRequest, keys: &[i64]) -> Vec<BucketDates> {
    keys.iter()
        .enumerate()
        .map(|(i, &k)| {
            let next = keys.get(i + 1).map(|n| n - 1).unwrap_or(request.end_time);
            BucketDates {
                min: k.max(request.start_time),
                max: next.min(request.end_time),
            }
        })
        .collect()
}

/// Compact duration such as `2d 4h`, `3h 12m` or `45m`.
pub fn format_duration(millis: i64) -> String {
    let minutes = millis.max(0) / 60_000;
    let (days, hours, mins) = (minutes / 1440, (minutes % 1440) / 60, minutes % 60);
    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-01-01T00:00:00Z .. 2024-01-07T23:59:59Z
    const MON: i64 = 1_704_067_200_000;
    const DAY: i64 = 86_400_000;

    fn request(duration: Option<DurationType>) -> WidgetRequest {
        WidgetRequest {
            org_id: "o".to_string(),
            start_time: MON,
            end_time: MON + 7 * DAY - 1000,
            duration_type: duration,
            ..Default::default()
        }
    }

    #[test]
    fn week_range_uses_weekdays_through_the_last_bucket() {
        let req = request(Some(DurationType::Week));
        let keys: Vec<i64> = (0..7).map(|d| MON + d * DAY).collect();
        let out = labels(&req, &keys);
        assert_eq!(out.first().map(String::as_str), Some("Mon"));
        assert_eq!(out.last().map(String::as_str), Some("Sun"));
    }

    #[test]
    fn year_range_marks_newest_bucket_latest() {
        let req = request(Some(DurationType::Year));
        let out = labels(&req, &[MON, MON + 31 * DAY]);
        assert_eq!(out, vec!["Jan 24", LATEST]);
    }

    #[test]
    fn month_range_uses_day_and_month() {
        let req = request(Some(DurationType::Month));
        assert_eq!(labels(&req, &[MON + DAY]), vec!["02 Jan"]);
    }

    #[test]
    fn first_bucket_is_clipped_to_window_start() {
        let req = request(None);
        // bucket opens the week before the window
        assert_eq!(labels(&req, &[MON - 3 * DAY]), vec!["2024-01-01"]);
    }

    #[test]
    fn sparse_first_bucket_takes_window_start() {
        let req = request(None);
        // first returned bucket opens two days into the window
        assert_eq!(
            labels(&req, &[MON + 2 * DAY, MON + 3 * DAY]),
            vec!["2024-01-01", "2024-01-04"]
        );
    }

    #[test]
    fn single_bucket_takes_normalized_start() {
        let mut req = request(None);
        req.normalized_start = Some("2023-12-28T00:00:00Z".to_string());
        assert_eq!(labels(&req, &[MON]), vec!["2023-12-28"]);
    }

    #[test]
    fn bucket_dates_are_clipped_and_contiguous() {
        let req = request(None);
        let dates = bucket_dates(&req, &[MON - DAY, MON + 3 * DAY]);
        assert_eq!(dates[0], BucketDates { min: MON, max: MON + 3 * DAY - 1 });
        assert_eq!(dates[1].max, req.end_time);
    }

    #[test]
    fn durations_are_compact() {
        assert_eq!(format_duration(2 * DAY + 4 * 3_600_000), "2d 4h");
        assert_eq!(format_duration(3 * 3_600_000 + 12 * 60_000), "3h 12m");
        assert_eq!(format_duration(0), "0m");
    }
}
