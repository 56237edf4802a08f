//! Presentation clock (PCR) tracking and wall-clock synchronisation.

use std::fmt;

use chrono::{DateTime, FixedOffset, Offset, Timelike, Utc};
use log::info;

use crate::constants::PCR_TICKS_PER_CENTITIME;

/// 27 MHz presentation clock, reconstructed from `base * 300 + extension`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct SystemClock(pub i64);

impl SystemClock {
    pub fn from_pcr(ticks: u64) -> Self {
        // a 42-bit value always fits
        Self(ticks as i64)
    }

    /// Hundredths of a second.
    pub fn centitime(self) -> i64 {
        self.0 / PCR_TICKS_PER_CENTITIME
    }
}

/// A rendered `hh:mm:ss.cc` time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub hours:   u32,
    pub minutes: u32,
    pub seconds: u32,
    pub centis:  u32,
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:02}",
            self.hours, self.minutes, self.seconds, self.centis
        )
    }
}

/// Latest PCR plus the once-only offset to broadcast wall time.
#[derive(Debug, Default)]
pub struct ClockTracker {
    current: SystemClock,
    offset:  Option<i64>,
    zone:    Option<FixedOffset>,
}

impl ClockTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value wins; no smoothing.
    pub fn observe_pcr(&mut self, clock: SystemClock) {
        self.current = clock;
    }

    pub fn current(&self) -> SystemClock {
        self.current
    }

    /// Centitime offset between wall time and the presentation clock, 0 until synced.
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0)
    }

    pub fn is_synced(&self) -> bool {
        self.offset.is_some()
    }

    /// Fixes the offset from the first non-zero wall time seen.
    ///
    /// Returns `true` only for the call that established it.
    pub fn observe_wall_time(&mut self, wall: DateTime<FixedOffset>) -> bool {
        if self.offset.is_some() || wall.timestamp() == 0 {
            return false;
        }
        let offset = wall.timestamp() * 100 - self.current.centitime();
        info!("wall clock {} at PCR {} (offset {} cs)", wall, self.current.0, offset);
        self.offset = Some(offset);
        self.zone = Some(*wall.offset());
        true
    }

    /// Renders a presentation clock value as time of day.
    ///
    /// After synchronisation the instant is shown in the zone the wall time was
    /// broadcast in; before it, the bare clock is shown as UTC time since the epoch.
    pub fn render(&self, clock: SystemClock) -> Timestamp {
        let total = clock.centitime() + self.offset();
        let secs = total.div_euclid(100);
        let centis = total.rem_euclid(100) as u32;

        let zone = self.zone.unwrap_or_else(|| Utc.fix());
        let instant = DateTime::<Utc>::from_timestamp(secs, 0)
            .unwrap_or_default()
            .with_timezone(&zone);

        Timestamp {
            hours:   instant.hour(),
            minutes: instant.minute(),
            seconds: instant.second(),
            centis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn jst(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(9 * 3600)
            .unwrap()
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .unwrap()
    }

    #[test]
    fn one_second_of_ticks_is_100_centitime() {
        assert_eq!(SystemClock(27_000_000).centitime(), 100);
        assert_eq!(SystemClock(269_999).centitime(), 0);
        assert_eq!(SystemClock(270_000).centitime(), 1);
    }

    #[test]
    fn unsynced_clock_renders_elapsed_time() {
        let tracker = ClockTracker::new();
        let ts = tracker.render(SystemClock(27_000_000 * 3723 + 270_000 * 45));
        assert_eq!(ts.to_string(), "01:02:03.45");
    }

    #[test]
    fn offset_applies_clock_delta_to_wall_time() {
        let mut tracker = ClockTracker::new();
        let v0 = SystemClock(27_000_000 * 50);
        tracker.observe_pcr(v0);
        assert!(tracker.observe_wall_time(jst(2024, 4, 1, 21, 0, 0)));

        let v1 = SystemClock(v0.0 + 27_000_000 * 90 + 270_000 * 12);
        assert_eq!(tracker.render(v1).to_string(), "21:01:30.12");
        assert_eq!(tracker.render(v0).to_string(), "21:00:00.00");
    }

    #[test]
    fn first_wall_time_wins() {
        let mut tracker = ClockTracker::new();
        tracker.observe_pcr(SystemClock(0));
        assert!(tracker.observe_wall_time(jst(2024, 4, 1, 21, 0, 0)));
        let first = tracker.offset();

        tracker.observe_pcr(SystemClock(27_000_000 * 5));
        assert!(!tracker.observe_wall_time(jst(2030, 1, 1, 0, 0, 0)));
        assert_eq!(tracker.offset(), first);
    }

    #[test]
    fn epoch_wall_time_is_ignored() {
        let mut tracker = ClockTracker::new();
        let epoch = Utc.timestamp_opt(0, 0).unwrap().fixed_offset();
        assert!(!tracker.observe_wall_time(epoch));
        assert!(!tracker.is_synced());
    }

    #[test]
    fn rendering_wraps_at_midnight() {
        let mut tracker = ClockTracker::new();
        tracker.observe_pcr(SystemClock(0));
        tracker.observe_wall_time(jst(2024, 4, 1, 23, 59, 59));
        let ts = tracker.render(SystemClock(27_000_000 * 2));
        assert_eq!(ts.to_string(), "00:00:01.00");
    }
}
