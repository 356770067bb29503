//! The minimal object-store surface the engine consumes.
//!
//! The engine never talks to the SDK directly; it goes through
//! [`ObjectStore`] so tests can substitute a deterministic in-memory bucket.

use async_trait::async_trait;
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::Client;
use chrono::DateTime;
use sf_error::{Error, Result};

use crate::ObjectInfo;

/// One response to a list request.
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    /// Objects on this page, in the order the store returned them
    /// (key-sorted for S3).
    pub objects: Vec<ObjectInfo>,
    /// Whether more results follow.
    pub truncated: bool,
    /// Opaque token for the next page, when truncated.
    pub continuation: Option<String>,
}

/// The two operations the engine needs from an object store.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Fetch one page of keys under `prefix`, at most `max_keys` objects.
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation: Option<&str>,
        max_keys: i32,
    ) -> Result<ListPage>;

    /// Resolve the bucket's region. `None` means the default region.
    async fn bucket_region(&self, bucket: &str) -> Result<Option<String>>;
}

/// [`ObjectStore`] backed by the AWS SDK.
#[derive(Debug, Clone)]
pub struct SdkStore {
    client: Client,
}

impl SdkStore {
    /// Wrap an SDK client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for SdkStore {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation: Option<&str>,
        max_keys: i32,
    ) -> Result<ListPage> {
        let mut req = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .max_keys(max_keys);

        if !prefix.is_empty() {
            req = req.prefix(prefix);
        }

        if let Some(token) = continuation {
            req = req.continuation_token(token);
        }

        let resp = req.send().await.map_err(|e| {
            if e.code() == Some("NoSuchBucket") {
                Error::BucketNotFound(bucket.to_string())
            } else {
                Error::Request(format!("list objects failed: {e}"))
            }
        })?;

        let objects = resp
            .contents
            .unwrap_or_default()
            .into_iter()
            .filter_map(|obj| {
                let key = obj.key?;
                let last_modified = obj
                    .last_modified
                    .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos()));
                Some(ObjectInfo {
                    key,
                    size: obj.size.unwrap_or(0).max(0) as u64,
                    last_modified,
                })
            })
            .collect();

        let truncated = resp.is_truncated == Some(true);

        Ok(ListPage {
            objects,
            truncated,
            continuation: if truncated {
                resp.next_continuation_token
            } else {
                None
            },
        })
    }

    async fn bucket_region(&self, bucket: &str) -> Result<Option<String>> {
        let resp = self
            .client
            .get_bucket_location()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| {
                if e.code() == Some("NoSuchBucket") {
                    Error::BucketNotFound(bucket.to_string())
                } else {
                    Error::Request(format!("bucket location lookup failed: {e}"))
                }
            })?;

        // S3 reports the default region as an absent or empty constraint.
        Ok(resp.location_constraint.and_then(|c| {
            let region = c.as_str();
            if region.is_empty() || region == "us-east-1" {
                None
            } else {
                Some(region.to_string())
            }
        }))
    }
}
