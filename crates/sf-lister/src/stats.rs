//! Accounting for a traversal run.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Counters collected over one bucket traversal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraversalSummary {
    /// When the traversal started
    pub started_at: Option<DateTime<Utc>>,

    /// When the traversal completed
    pub completed_at: Option<DateTime<Utc>>,

    /// Objects pushed through the stream
    pub objects_emitted: u64,

    /// Total size in bytes of the emitted objects
    pub bytes_listed: u64,

    /// Sparse prefixes drained inline during partitioning
    pub small_prefixes: u64,

    /// Full-page prefixes recursed into or handed off
    pub large_prefixes: u64,

    /// Size of the final partition set
    pub partitions: usize,

    /// Re-expansion passes the partitioner took
    pub rebalance_passes: u32,
}

impl TraversalSummary {
    /// Create a summary stamped with the current time.
    pub fn new() -> Self {
        Self {
            started_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    /// Mark the traversal complete.
    pub fn complete(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// Wall-clock duration of the traversal.
    pub fn duration(&self) -> Option<Duration> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// Listing throughput in objects per second.
    pub fn objects_per_second(&self) -> Option<f64> {
        self.duration().map(|d| {
            let secs = d.num_milliseconds() as f64 / 1000.0;
            if secs > 0.0 {
                self.objects_emitted as f64 / secs
            } else {
                0.0
            }
        })
    }

    /// The listed byte total in a log-friendly unit. Buckets this tool is
    /// aimed at run from gigabytes up, so binary units suffice.
    pub fn bytes_display(&self) -> String {
        const UNITS: [(u64, &str); 4] = [
            (1 << 40, "TiB"),
            (1 << 30, "GiB"),
            (1 << 20, "MiB"),
            (1 << 10, "KiB"),
        ];

        for (scale, unit) in UNITS {
            if self.bytes_listed >= scale {
                return format!("{:.2} {unit}", self.bytes_listed as f64 / scale as f64);
            }
        }
        format!("{} B", self.bytes_listed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration as StdDuration;

    #[test]
    fn test_summary_new() {
        let summary = TraversalSummary::new();
        assert!(summary.started_at.is_some());
        assert!(summary.completed_at.is_none());
        assert_eq!(summary.objects_emitted, 0);
    }

    #[test]
    fn test_summary_duration() {
        let mut summary = TraversalSummary::new();
        sleep(StdDuration::from_millis(10));
        summary.complete();

        let duration = summary.duration().unwrap();
        assert!(duration.num_milliseconds() >= 10);
    }

    #[test]
    fn test_summary_throughput() {
        let mut summary = TraversalSummary::new();
        summary.objects_emitted = 1000;
        sleep(StdDuration::from_millis(10));
        summary.complete();

        assert!(summary.objects_per_second().unwrap() > 0.0);
    }

    #[test]
    fn test_summary_default_has_no_duration() {
        let summary = TraversalSummary::default();
        assert!(summary.duration().is_none());
        assert!(summary.objects_per_second().is_none());
    }

    #[test]
    fn test_bytes_display_picks_the_unit() {
        let mut summary = TraversalSummary::default();
        assert_eq!(summary.bytes_display(), "0 B");

        summary.bytes_listed = 1536;
        assert_eq!(summary.bytes_display(), "1.50 KiB");

        summary.bytes_listed = 5 * (1 << 30);
        assert_eq!(summary.bytes_display(), "5.00 GiB");

        summary.bytes_listed = 3 * (1 << 40);
        assert_eq!(summary.bytes_display(), "3.00 TiB");
    }
}
