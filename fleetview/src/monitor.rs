//! Message-rate instrumentation, one monitor per channel.
//!
//! Counts raw arrivals in windows of at least one second. The window
//! boundary is checked only when a message arrives, never on a timer: a
//! channel that goes quiet emits no trailing partial sample, and a window
//! stretches until the next arrival closes it. The arrival that closes a
//! window is counted toward the next one.

use std::fmt;
use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_secs(1);

/// The two independent inbound streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Taxis,
    Clients,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Taxis => write!(f, "taxis"),
            Channel::Clients => write!(f, "clients"),
        }
    }
}

/// Message count over one closed window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSample {
    pub channel: Channel,
    pub count: u64,
    /// Actual span of the window: at least one second, longer if the
    /// channel went quiet before the closing arrival.
    pub window: Duration,
}

pub struct ThroughputMonitor {
    channel: Channel,
    count: u64,
    window_start: Instant,
}

impl ThroughputMonitor {
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            count: 0,
            window_start: Instant::now(),
        }
    }

    /// Records one raw arrival, regardless of whether the payload later
    /// parses. Returns the sample for the closed window when at least a
    /// second has passed since the window opened.
    pub fn record(&mut self) -> Option<RateSample> {
        self.record_at(Instant::now())
    }

    fn record_at(&mut self, now: Instant) -> Option<RateSample> {
        let elapsed = now.duration_since(self.window_start);
        let sample = if elapsed >= WINDOW {
            let closed = RateSample {
                channel: self.channel,
                count: self.count,
                window: elapsed,
            };
            self.count = 0;
            self.window_start = now;
            Some(closed)
        } else {
            None
        };
        self.count += 1;
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor_started_at(start: Instant) -> ThroughputMonitor {
        ThroughputMonitor {
            channel: Channel::Taxis,
            count: 0,
            window_start: start,
        }
    }

    #[test]
    fn silent_channel_emits_nothing_until_the_next_arrival() {
        let t0 = Instant::now();
        let mut monitor = monitor_started_at(t0);

        // Five messages inside 600ms, then two seconds of silence.
        for i in 1..=5 {
            let sample = monitor.record_at(t0 + Duration::from_millis(i * 100));
            assert!(sample.is_none());
        }

        // The sixth arrival closes the stretched window with exactly the
        // five messages counted before it.
        let sample = monitor
            .record_at(t0 + Duration::from_millis(2600))
            .expect("sixth arrival closes the window");
        assert_eq!(sample.count, 5);
        assert!(sample.window >= Duration::from_secs(2));
    }

    #[test]
    fn closing_arrival_counts_toward_the_next_window() {
        let t0 = Instant::now();
        let mut monitor = monitor_started_at(t0);

        for i in 1..=3 {
            assert!(monitor.record_at(t0 + Duration::from_millis(i * 10)).is_none());
        }
        let first = monitor
            .record_at(t0 + Duration::from_millis(1100))
            .expect("window closed");
        assert_eq!(first.count, 3);

        // Only the closing arrival has been seen in the new window.
        let second = monitor
            .record_at(t0 + Duration::from_millis(2200))
            .expect("second window closed");
        assert_eq!(second.count, 1);
    }

    #[test]
    fn sub_second_bursts_never_emit() {
        let t0 = Instant::now();
        let mut monitor = monitor_started_at(t0);
        for i in 0..100 {
            assert!(monitor.record_at(t0 + Duration::from_millis(i * 9)).is_none());
        }
    }
}
