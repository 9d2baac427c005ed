use std::time::{Duration, Instant};

use crate::config::GameConfig;

/// Time between ticks for a given score: one speed-up step every
/// `speedup_every` foods, never faster than `min_interval`.
pub fn tick_interval(config: &GameConfig, score: u32) -> Duration {
    let steps = score / config.speedup_every.max(1);
    let reduction = config.speedup_step.saturating_mul(steps);

    config
        .start_interval
        .saturating_sub(reduction)
        .max(config.min_interval)
}

/// Deadline-based tick timer. Re-arming always starts a full interval from
/// the given instant; elapsed time from the previous interval is discarded.
#[derive(Debug, Clone)]
pub struct TickScheduler {
    interval: Duration,
    next_due: Instant,
}

impl TickScheduler {
    pub fn new(interval: Duration, now: Instant) -> Self {
        TickScheduler { interval, next_due: now + interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    pub fn rearm(&mut self, interval: Duration, now: Instant) {
        self.interval = interval;
        self.next_due = now + interval;
    }

    /// Reports whether a tick is due at `now` and, if so, schedules the next
    /// one. At most one tick is delivered per call; if the loop fell more
    /// than a whole interval behind, the backlog is dropped.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }

        self.next_due += self.interval;
        if self.next_due <= now {
            self.next_due = now + self.interval;
        }
        true
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_interval_at_start() {
        let config = GameConfig::default();
        assert_eq!(tick_interval(&config, 0), ms(140));
        assert_eq!(tick_interval(&config, 3), ms(140));
    }

    #[test]
    fn test_interval_speeds_up_every_four_foods() {
        let config = GameConfig::default();
        assert_eq!(tick_interval(&config, 4), ms(132));
        assert_eq!(tick_interval(&config, 7), ms(132));
        assert_eq!(tick_interval(&config, 8), ms(124));
        assert_eq!(tick_interval(&config, 16), ms(108));
    }

    #[test]
    fn test_interval_is_clamped() {
        let config = GameConfig::default();
        // 140 - 8 * 8 = 76, 140 - 9 * 8 = 68 -> 70
        assert_eq!(tick_interval(&config, 32), ms(76));
        assert_eq!(tick_interval(&config, 36), ms(70));
        assert_eq!(tick_interval(&config, 10_000), ms(70));
        assert_eq!(tick_interval(&config, u32::MAX), ms(70));
    }

    #[test]
    fn test_interval_is_bounded_and_non_increasing() {
        let config = GameConfig::default();
        let mut previous = tick_interval(&config, 0);

        for score in 0..200 {
            let interval = tick_interval(&config, score);
            assert!(interval >= ms(70) && interval <= ms(140));
            assert!(interval <= previous);
            previous = interval;
        }
    }

    #[test]
    fn test_scheduler_fires_on_deadline() {
        let start = Instant::now();
        let mut scheduler = TickScheduler::new(ms(100), start);

        assert!(!scheduler.poll(start + ms(99)));
        assert!(scheduler.poll(start + ms(100)));
        assert!(!scheduler.poll(start + ms(150)));
        assert!(scheduler.poll(start + ms(205)));
        assert_eq!(scheduler.next_due(), start + ms(300));
    }

    #[test]
    fn test_scheduler_drops_backlog() {
        let start = Instant::now();
        let mut scheduler = TickScheduler::new(ms(100), start);

        assert!(scheduler.poll(start + ms(550)));
        assert!(!scheduler.poll(start + ms(560)));
        assert_eq!(scheduler.next_due(), start + ms(650));
    }

    #[test]
    fn test_rearm_starts_a_full_interval() {
        let start = Instant::now();
        let mut scheduler = TickScheduler::new(ms(140), start);

        scheduler.rearm(ms(132), start + ms(60));
        assert_eq!(scheduler.interval(), ms(132));
        assert!(!scheduler.poll(start + ms(140)));
        assert!(scheduler.poll(start + ms(192)));
    }

    #[test]
    fn test_remaining() {
        let start = Instant::now();
        let scheduler = TickScheduler::new(ms(100), start);

        assert_eq!(scheduler.remaining(start + ms(30)), ms(70));
        assert_eq!(scheduler.remaining(start + ms(130)), Duration::ZERO);
    }
}
