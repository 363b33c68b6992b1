//! When records are posted: hour, weekday and quarter histograms.

use super::prepare::PreparedRecord;
use serde::Serialize;

/// Posting activity by time of day, day of week and quarter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimePatterns {
    /// Record count by hour (0-23)
    pub hourly_distribution: [usize; 24],
    /// Record count by weekday (0=Monday, 6=Sunday)
    pub weekday_distribution: [usize; 7],
    /// Record count by quarter (index 0 = Q1)
    pub quarterly_distribution: [usize; 4],
    /// Hour with the most records; earliest hour wins ties
    pub peak_hour: u8,
    /// Weekday with the most records; Monday wins ties
    pub busiest_day: u8,
}

impl Default for TimePatterns {
    fn default() -> Self {
        Self {
            hourly_distribution: [0; 24],
            weekday_distribution: [0; 7],
            quarterly_distribution: [0; 4],
            peak_hour: 0,
            busiest_day: 0,
        }
    }
}

impl TimePatterns {
    pub fn compute(records: &[PreparedRecord]) -> Self {
        let mut patterns = Self::default();
        for record in records {
            let cal = &record.calendar;
            patterns.hourly_distribution[cal.hour as usize % 24] += 1;
            patterns.weekday_distribution[cal.weekday as usize % 7] += 1;
            patterns.quarterly_distribution[(cal.quarter as usize).saturating_sub(1) % 4] += 1;
        }
        patterns.peak_hour = argmax(&patterns.hourly_distribution) as u8;
        patterns.busiest_day = argmax(&patterns.weekday_distribution) as u8;
        patterns
    }

    /// Day name from a Monday-based index.
    pub fn day_name(day: u8) -> &'static str {
        match day {
            0 => "Monday",
            1 => "Tuesday",
            2 => "Wednesday",
            3 => "Thursday",
            4 => "Friday",
            5 => "Saturday",
            6 => "Sunday",
            _ => "Unknown",
        }
    }

    /// Hour display (e.g., "10am-11am").
    pub fn hour_display(hour: u8) -> String {
        let twelve = |h: u8| if h % 12 == 0 { 12 } else { h % 12 };
        let period = |h: u8| if h % 24 < 12 { "am" } else { "pm" };
        let next = (hour + 1) % 24;
        format!(
            "{}{}-{}{}",
            twelve(hour),
            period(hour),
            twelve(next),
            period(next)
        )
    }
}

/// Index of the first maximum.
fn argmax(counts: &[usize]) -> usize {
    counts
        .iter()
        .enumerate()
        .fold((0, 0), |(best_i, best), (i, &c)| {
            if c > best {
                (i, c)
            } else {
                (best_i, best)
            }
        })
        .0
}
