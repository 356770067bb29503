//! sf-lister - parallel S3 listing engine for s3fan.
//!
//! Enumerating a bucket with millions of keys through one paginated listing
//! takes hours. This crate splits the work instead:
//!
//! - The [`Partitioner`] probes single-character prefix extensions and
//!   recursively descends into dense regions, draining sparse ones inline.
//! - The [`ParallelLister`] fully paginates every discovered dense prefix
//!   under a global concurrency cap.
//! - Both push objects into a bounded [`sink::ObjectRouter`] feeding a pool
//!   of sink workers.
//!
//! [`Traversal`] wires the three together; the CLI is a thin wrapper
//! around it.
//!
//! # Example
//!
//! ```ignore
//! use sf_lister::{SinkMode, Traversal, TraversalConfig};
//! use sf_lister::s3::{create_client, S3Config, SdkStore};
//!
//! let client = create_client(&S3Config::new()).await?;
//! let store = SdkStore::new(client);
//! let traversal = Traversal::new(store, "my-bucket", TraversalConfig::new(), SinkMode::Text);
//! let summary = traversal.run().await?;
//! eprintln!("listed {} objects", summary.objects_emitted);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod alphabet;
pub mod config;
pub mod parallel;
pub mod partition;
pub mod s3;
pub mod sink;
pub mod stats;
pub mod traversal;

pub use alphabet::PARTITION_ALPHABET;
pub use config::TraversalConfig;
pub use parallel::ParallelLister;
pub use partition::{PartitionOutcome, Partitioner};
pub use s3::{BackoffLister, ListPage, ObjectStore, RetryConfig, S3Config, SdkStore};
pub use sink::{ObjectRouter, SinkMode, SinkPool};
pub use stats::TraversalSummary;
pub use traversal::Traversal;

/// An object discovered during a traversal.
///
/// The minimum a sink needs: key, size, and modification time. Immutable
/// from the moment it is routed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    /// The object key (full path within the bucket)
    pub key: String,

    /// Size of the object in bytes
    pub size: u64,

    /// Last modified timestamp (if the store reported one)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_info_json_shape() {
        let obj = ObjectInfo {
            key: "data/part-0001".to_string(),
            size: 4096,
            last_modified: None,
        };

        let line = serde_json::to_string(&obj).unwrap();
        assert_eq!(line, r#"{"key":"data/part-0001","size":4096}"#);
    }

    #[test]
    fn test_object_info_json_with_timestamp() {
        let obj = ObjectInfo {
            key: "a".to_string(),
            size: 1,
            last_modified: DateTime::from_timestamp(1_700_000_000, 0),
        };

        let line = serde_json::to_string(&obj).unwrap();
        assert!(line.contains("last_modified"));
        assert!(line.contains("2023-11-14"));
    }
}
