//! Reduces the 3-hourly forecast feed to one sample per calendar day.

use std::collections::HashSet;

use crate::model::{DailySummary, ForecastEntry};

/// Number of days shown in the daily forecast.
pub const MAX_FORECAST_DAYS: usize = 5;

/// Keep the first entry of each calendar day, for at most [`MAX_FORECAST_DAYS`] days.
///
/// Output order is the order in which each day was first seen. The first entry of
/// a day is kept whatever its time of day.
pub fn aggregate_daily<I>(entries: I) -> Vec<DailySummary>
where
    I: IntoIterator<Item = ForecastEntry>,
{
    aggregate_daily_limited(entries, MAX_FORECAST_DAYS)
}

/// Same as [`aggregate_daily`] with an explicit day limit.
///
/// Entries without a resolvable day are skipped.
pub fn aggregate_daily_limited<I>(entries: I, max_days: usize) -> Vec<DailySummary>
where
    I: IntoIterator<Item = ForecastEntry>,
{
    let mut seen = HashSet::new();

    entries
        .into_iter()
        .filter_map(|entry| entry.day_key().map(|day| DailySummary { day, entry }))
        .filter(|summary| seen.insert(summary.day))
        .take(max_days)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    const HOUR: i64 = 3600;

    fn entry_at(y: i32, m: u32, d: u32, h: u32) -> ForecastEntry {
        let dt = Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap();
        ForecastEntry {
            timestamp: dt.timestamp(),
            date: dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            temperature_c: f64::from(h),
            feels_like_c: f64::from(h) - 1.0,
            humidity_pct: 60,
            wind_speed_mps: 2.5,
            condition: "clear sky".into(),
        }
    }

    /// A feed of `count` samples every three hours starting at `start`.
    fn feed(start: ForecastEntry, count: usize) -> Vec<ForecastEntry> {
        (0..count)
            .map(|i| {
                let mut e = start.clone();
                e.timestamp += 3 * HOUR * i as i64;
                e.date = String::new();
                e
            })
            .collect()
    }

    #[test]
    fn keeps_first_entry_per_day() {
        let input = vec![
            entry_at(2024, 3, 10, 9),
            entry_at(2024, 3, 10, 12),
            entry_at(2024, 3, 11, 0),
        ];

        let out = aggregate_daily(input.clone());

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].entry, input[0]);
        assert_eq!(out[1].entry, input[2]);
        assert_eq!(out[0].day, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert_eq!(out[1].day, NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(aggregate_daily(Vec::new()).is_empty());
    }

    #[test]
    fn late_first_sample_still_represents_today() {
        let input = vec![entry_at(2024, 3, 10, 21), entry_at(2024, 3, 11, 0)];

        let out = aggregate_daily(input);

        assert_eq!(out[0].entry.temperature_c, 21.0);
    }

    #[test]
    fn full_feed_is_truncated_to_five_days() {
        // 40 samples = the provider's 5 days of 3-hour steps, starting mid-day
        // so the feed spans six calendar days.
        let input = feed(entry_at(2024, 3, 10, 15), 40);

        let out = aggregate_daily(input.clone());

        assert_eq!(out.len(), MAX_FORECAST_DAYS);
        assert_eq!(out[0].entry, input[0]);
        assert_eq!(out[1].entry, input[3]);
        assert_eq!(out[4].day, NaiveDate::from_ymd_opt(2024, 3, 14).unwrap());
    }

    #[test]
    fn fewer_days_returns_all_of_them() {
        let out = aggregate_daily(feed(entry_at(2024, 3, 10, 0), 16));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn order_follows_first_appearance_not_calendar() {
        let input = vec![
            entry_at(2024, 3, 12, 0),
            entry_at(2024, 3, 10, 0),
            entry_at(2024, 3, 12, 3),
            entry_at(2024, 3, 11, 0),
        ];

        let days: Vec<u32> = aggregate_daily(input)
            .iter()
            .map(|s| chrono::Datelike::day(&s.day))
            .collect();

        assert_eq!(days, vec![12, 10, 11]);
    }

    #[test]
    fn output_is_bounded_and_days_are_unique() {
        for count in [0, 1, 7, 8, 9, 23, 40, 60] {
            for start_hour in [0, 3, 12, 21] {
                let input = feed(entry_at(2024, 12, 29, start_hour), count);
                let distinct: HashSet<_> = input.iter().filter_map(|e| e.day_key()).collect();

                let out = aggregate_daily(input.clone());

                assert!(out.len() <= MAX_FORECAST_DAYS);
                assert!(out.len() <= distinct.len());

                let days: HashSet<_> = out.iter().map(|s| s.day).collect();
                assert_eq!(days.len(), out.len());

                for summary in &out {
                    let first = input
                        .iter()
                        .find(|e| e.day_key() == Some(summary.day))
                        .expect("day must come from the input");
                    assert_eq!(&summary.entry, first);
                }
            }
        }
    }

    #[test]
    fn custom_limit_is_honoured() {
        let out = aggregate_daily_limited(feed(entry_at(2024, 3, 10, 0), 40), 2);
        assert_eq!(out.len(), 2);

        assert!(aggregate_daily_limited(feed(entry_at(2024, 3, 10, 0), 40), 0).is_empty());
    }
}
