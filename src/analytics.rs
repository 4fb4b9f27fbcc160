//! Focus statistics over recorded timer sessions.

use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, Utc};

use crate::project::FocusSession;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusSummary {
    pub total_minutes: u64,
    pub today_minutes: u64,
    pub week_minutes: u64,
    pub sessions: usize,
    /// Consecutive days with at least one session, ending today.
    pub streak_days: u32,
}

impl FocusSummary {
    pub fn compute(sessions: &[FocusSession], now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let week_start = today - ChronoDuration::days(6);
        let mut summary = FocusSummary {
            sessions: sessions.len(),
            ..Default::default()
        };
        let mut days: Vec<NaiveDate> = Vec::with_capacity(sessions.len());
        for session in sessions {
            let day = session.completed_at.date_naive();
            let minutes = u64::from(session.minutes);
            summary.total_minutes += minutes;
            if day == today {
                summary.today_minutes += minutes;
            }
            if day >= week_start && day <= today {
                summary.week_minutes += minutes;
            }
            days.push(day);
        }
        days.sort_unstable();
        days.dedup();

        let mut cursor = today;
        while days.binary_search(&cursor).is_ok() {
            summary.streak_days += 1;
            match cursor.pred_opt() {
                Some(prev) => cursor = prev,
                None => break,
            }
        }
        summary
    }
}

/// `3725` -> `"1h 2m 5s"`.
pub fn format_hms(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours}h {minutes}m {secs}s")
}
