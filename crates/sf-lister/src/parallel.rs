//! Parallel draining of the partition set.

use sf_error::{Error, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, trace};

use crate::s3::{BackoffLister, ObjectStore};
use crate::sink::ObjectRouter;

/// Fully paginates every partition prefix under a global concurrency cap.
pub struct ParallelLister<S: ObjectStore> {
    lister: Arc<BackoffLister<S>>,
    router: Arc<ObjectRouter>,
    bucket: String,
    semaphore: Arc<Semaphore>,
}

impl<S: ObjectStore> ParallelLister<S> {
    /// Create a lister with a permit pool of `concurrency`.
    pub fn new(
        lister: Arc<BackoffLister<S>>,
        router: Arc<ObjectRouter>,
        bucket: impl Into<String>,
        concurrency: usize,
    ) -> Self {
        Self {
            lister,
            router,
            bucket: bucket.into(),
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    /// Drain every prefix in `partitions`, routing each object exactly once.
    ///
    /// All prefixes are scheduled up front; the semaphore caps how many
    /// drains run at a time. Prefixes recorded in `exact_emitted` had their
    /// exact-key object routed during partitioning, so their drain skips it.
    ///
    /// Returns the number of objects routed. The first drain failure aborts
    /// the traversal; remaining tasks are dropped with the set.
    pub async fn run(
        &self,
        partitions: Vec<String>,
        exact_emitted: &HashSet<String>,
    ) -> Result<u64> {
        let total = partitions.len();
        debug!(prefixes = total, "draining partition set");
        if total == 0 {
            return Ok(0);
        }

        // Every task announces itself once it holds a permit; waiting for
        // all announcements keeps the dispatcher from joining a working-set
        // it has not finished populating.
        let (scheduled_tx, mut scheduled_rx) = mpsc::channel::<()>(total);
        let mut tasks: JoinSet<Result<u64>> = JoinSet::new();

        for prefix in partitions {
            let lister = Arc::clone(&self.lister);
            let router = Arc::clone(&self.router);
            let semaphore = Arc::clone(&self.semaphore);
            let scheduled = scheduled_tx.clone();
            let bucket = self.bucket.clone();
            let skip_exact = exact_emitted.contains(&prefix);

            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| Error::Setup(format!("drain permit pool closed: {e}")))?;
                let _ = scheduled.send(()).await;

                let count = lister.drain(&bucket, &prefix, &router, skip_exact).await?;
                trace!(prefix = %prefix, objects = count, "drained prefix");
                Ok(count)
            });
        }
        drop(scheduled_tx);

        for _ in 0..total {
            let _ = scheduled_rx.recv().await;
        }

        let mut emitted: u64 = 0;
        while let Some(joined) = tasks.join_next().await {
            let count = joined
                .map_err(|e| Error::Other(anyhow::anyhow!("drain task failed: {e}")))??;
            emitted += count;
        }

        debug!(prefixes = total, objects = emitted, "partition set drained");
        Ok(emitted)
    }
}
