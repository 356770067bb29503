//! Probe and drain: the two listing operations the engine performs,
//! wrapped in the retry discipline.

use sf_error::Result;
use std::sync::Arc;
use tracing::trace;

use super::retry::{with_backoff, RetryConfig};
use super::store::{ListPage, ObjectStore};
use crate::sink::ObjectRouter;

/// Listing operations with backoff applied to every page request.
///
/// A page is fetched (and on transient failure, retried whole) before any of
/// its objects reach the stream, so a failed page never partially emits.
pub struct BackoffLister<S: ObjectStore> {
    store: Arc<S>,
    retry: RetryConfig,
    page_cap: usize,
}

impl<S: ObjectStore> BackoffLister<S> {
    /// Create a lister over `store`.
    pub fn new(store: Arc<S>, retry: RetryConfig, page_cap: usize) -> Self {
        Self {
            store,
            retry,
            page_cap,
        }
    }

    /// Fetch a single page for `prefix` to measure its density.
    ///
    /// No continuation is followed; a full page means "at least page-cap
    /// objects live here", which is all the partitioner needs to know.
    pub async fn probe(&self, bucket: &str, prefix: &str) -> Result<ListPage> {
        with_backoff(&self.retry, "probe", || {
            self.store
                .list_page(bucket, prefix, None, self.page_cap as i32)
        })
        .await
    }

    /// Follow continuation tokens until `prefix` is exhausted, routing every
    /// object into the stream. Returns the number of objects routed.
    ///
    /// When `skip_exact` is set, an object whose key equals `prefix` is
    /// dropped: the partitioner already emitted it at probe time.
    pub async fn drain(
        &self,
        bucket: &str,
        prefix: &str,
        router: &ObjectRouter,
        skip_exact: bool,
    ) -> Result<u64> {
        let mut continuation: Option<String> = None;
        let mut count: u64 = 0;

        loop {
            let page = with_backoff(&self.retry, "drain", || {
                self.store
                    .list_page(bucket, prefix, continuation.as_deref(), self.page_cap as i32)
            })
            .await?;

            for object in page.objects {
                if skip_exact && count == 0 && object.key == prefix {
                    trace!(prefix, "skipping already-emitted exact-key object");
                    continue;
                }
                router.route(object).await?;
                count += 1;
            }

            if page.truncated {
                continuation = page.continuation;
                if continuation.is_none() {
                    break;
                }
            } else {
                break;
            }
        }

        Ok(count)
    }
}
