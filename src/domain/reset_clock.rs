//! Weekly reset boundary arithmetic.
//!
//! Allowance is granted at a fixed civil wall-clock moment every week:
//! Monday 09:00 in the household's timezone. Working in civil time keeps
//! the boundary pinned to 09:00 across DST changes, so a reset week is
//! occasionally 167 or 169 hours long in UTC terms.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Hour of day (local civil time) at which the weekly reset fires.
const RESET_HOUR: i64 = 9;

/// Computes weekly reset boundaries in a fixed timezone.
#[derive(Debug, Clone)]
pub struct ResetClock {
    tz: Tz,
}

impl ResetClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Earliest reset boundary at or after `instant`.
    ///
    /// An instant already on a boundary maps to itself, so the alignment
    /// is idempotent: `next_boundary(next_boundary(t)) == next_boundary(t)`.
    pub fn next_boundary(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        let local = instant.with_timezone(&self.tz);
        let days_from_monday = local.weekday().num_days_from_monday() as i64;
        let monday = local.date_naive() - Duration::days(days_from_monday);
        let candidate = self.boundary_for_week(monday);
        if instant > candidate {
            self.boundary_for_week(monday + Duration::days(7))
        } else {
            candidate
        }
    }

    /// Number of full reset weeks elapsed between `start` and `now`.
    ///
    /// `start` is first aligned to its boundary (the anchor). The moment
    /// the anchor arrives counts as zero resets elapsed; each subsequent
    /// boundary crossing adds one. The count is measured in civil days so
    /// a 23- or 25-hour DST day still advances the week exactly once.
    pub fn elapsed_resets(&self, start: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
        let anchor = self.next_boundary(start);
        if now < anchor {
            return 0;
        }
        let anchor_local = anchor.with_timezone(&self.tz);
        let now_local = now.with_timezone(&self.tz);
        let days = (now_local.date_naive() - anchor_local.date_naive()).num_days();
        let mut weeks = days / 7;
        if days % 7 == 0 && now_local.time() < anchor_local.time() {
            // Same weekday as the anchor but before 09:00; the boundary
            // has not fired yet this week.
            weeks -= 1;
        }
        weeks.max(0) as u32
    }

    /// Boundary instant for the week beginning on `monday`.
    fn boundary_for_week(&self, monday: NaiveDate) -> DateTime<Utc> {
        let mut wall = monday.and_time(NaiveTime::MIN) + Duration::hours(RESET_HOUR);
        // A wall time that falls in a DST gap rolls forward hour by hour
        // until it resolves.
        loop {
            if let Some(resolved) = self.tz.from_local_datetime(&wall).earliest() {
                return resolved.with_timezone(&Utc);
            }
            wall += Duration::hours(1);
        }
    }
}

impl Default for ResetClock {
    fn default() -> Self {
        Self::new(chrono_tz::America::Los_Angeles)
    }
}
