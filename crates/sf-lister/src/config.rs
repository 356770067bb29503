//! Traversal configuration.

use crate::s3::RetryConfig;

/// Configuration for one bucket traversal.
///
/// Carried explicitly down the call chain; the engine reads no process-wide
/// state.
#[derive(Debug, Clone)]
pub struct TraversalConfig {
    /// Partitioner target: stop descending once this many prefixes have been
    /// processed, and re-expand until the partition set approaches it.
    pub target_partitions: usize,
    /// Maximum objects per list page; a probe returning this many objects
    /// classifies the prefix as large.
    pub page_cap: usize,
    /// Cap on simultaneous drain calls, and the size of the sink worker pool.
    pub concurrency: usize,
    /// Per-worker buffer of the object stream; bounds memory and provides
    /// backpressure when the sink falls behind.
    pub channel_capacity: usize,
    /// Retry behavior for every list request.
    pub retry: RetryConfig,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            target_partitions: 500,
            page_cap: 1000,
            concurrency: 256,
            channel_capacity: 1024,
            retry: RetryConfig::default(),
        }
    }
}

impl TraversalConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the partitioner target.
    pub fn with_target_partitions(mut self, target: usize) -> Self {
        self.target_partitions = target;
        self
    }

    /// Set the page cap.
    pub fn with_page_cap(mut self, page_cap: usize) -> Self {
        self.page_cap = page_cap;
        self
    }

    /// Set the drain/sink concurrency.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the per-worker stream buffer size.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Set the retry configuration.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = TraversalConfig::default();
        assert_eq!(config.target_partitions, 500);
        assert_eq!(config.page_cap, 1000);
        assert_eq!(config.concurrency, 256);
        assert_eq!(config.channel_capacity, 1024);
        assert_eq!(config.retry.max_retries, 10);
    }

    #[test]
    fn test_config_builder() {
        let config = TraversalConfig::new()
            .with_target_partitions(50)
            .with_page_cap(100)
            .with_concurrency(8)
            .with_channel_capacity(32);

        assert_eq!(config.target_partitions, 50);
        assert_eq!(config.page_cap, 100);
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.channel_capacity, 32);
    }
}
