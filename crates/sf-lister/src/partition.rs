//! Adaptive prefix partitioning.
//!
//! The partitioner probes every single-character extension of a prefix with
//! one page request and classifies each by density. Sparse extensions are
//! drained straight into the object stream; full-page extensions are
//! recursed into on their own tasks, until enough prefixes have been
//! processed to hand the remainder to the parallel lister.
//!
//! A full page is a lower bound (at least page-cap objects live under the
//! prefix), not proof of density; recursion exposes the true hot zones,
//! while inline draining keeps one-request regions from ever costing a
//! drain permit.

use parking_lot::Mutex;
use sf_error::{Error, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tokio_util::task::TaskTracker;
use tracing::{debug, trace};

use crate::alphabet::PARTITION_ALPHABET;
use crate::s3::{BackoffLister, ObjectStore};
use crate::sink::ObjectRouter;

/// Ceiling on damped re-expansion passes, so an undersized bucket cannot
/// loop the counter down to zero without progress.
const MAX_REBALANCE_PASSES: u32 = 10;

/// What a partitioning run produced.
#[derive(Debug, Default)]
pub struct PartitionOutcome {
    /// Prefixes dense enough to hand to the parallel lister. Pairwise
    /// non-prefix: no member extends another.
    pub partitions: Vec<String>,
    /// Prefixes whose exact-key object was already routed at probe time;
    /// drains of these prefixes must skip that object.
    pub exact_emitted: HashSet<String>,
    /// Sparse prefixes drained inline.
    pub small_prefixes: u64,
    /// Full-page prefixes recursed into or handed off.
    pub large_prefixes: u64,
    /// Re-expansion passes taken after the initial descent.
    pub rebalance_passes: u32,
}

#[derive(Default)]
struct Progress {
    processed: usize,
    partitions: Vec<String>,
    exact_emitted: HashSet<String>,
    small: u64,
    large: u64,
    fatal: Option<Error>,
}

/// Concurrent recursive prefix partitioner.
pub struct Partitioner<S: ObjectStore> {
    lister: Arc<BackoffLister<S>>,
    router: Arc<ObjectRouter>,
    bucket: String,
    target: usize,
    page_cap: usize,
    state: Mutex<Progress>,
}

impl<S: ObjectStore> Partitioner<S> {
    /// Create a partitioner for one bucket traversal.
    pub fn new(
        lister: Arc<BackoffLister<S>>,
        router: Arc<ObjectRouter>,
        bucket: impl Into<String>,
        target: usize,
        page_cap: usize,
    ) -> Self {
        Self {
            lister,
            router,
            bucket: bucket.into(),
            target,
            page_cap,
            state: Mutex::new(Progress::default()),
        }
    }

    /// Partition the bucket's key space, draining sparse regions as a side
    /// effect.
    pub async fn run(self: Arc<Self>) -> Result<PartitionOutcome> {
        let tracker = TaskTracker::new();
        Self::spawn_expand(&self, &tracker, String::new());
        tracker.close();
        tracker.wait().await;
        self.check_fatal()?;

        // The initial descent can terminate with far fewer partitions than
        // the target. Damping the processed counter and re-expanding the
        // survivors biases the next pass toward deeper descent.
        let mut passes = 0;
        loop {
            let current = self.state.lock().partitions.len();
            if current == 0 || current >= self.target || passes >= MAX_REBALANCE_PASSES {
                break;
            }
            passes += 1;

            let stale = {
                let mut st = self.state.lock();
                st.processed = st.processed * 3 / 4;
                debug!(
                    partitions = current,
                    target = self.target,
                    processed = st.processed,
                    pass = passes,
                    "partition set below target, re-expanding"
                );
                std::mem::take(&mut st.partitions)
            };

            let tracker = TaskTracker::new();
            for prefix in stale {
                Self::spawn_expand(&self, &tracker, prefix);
            }
            tracker.close();
            tracker.wait().await;
            self.check_fatal()?;
        }

        let mut st = self.state.lock();
        debug!(
            partitions = st.partitions.len(),
            small = st.small,
            large = st.large,
            passes,
            "partitioning settled"
        );
        Ok(PartitionOutcome {
            partitions: std::mem::take(&mut st.partitions),
            exact_emitted: std::mem::take(&mut st.exact_emitted),
            small_prefixes: st.small,
            large_prefixes: st.large,
            rebalance_passes: passes,
        })
    }

    fn spawn_expand(this: &Arc<Self>, tracker: &TaskTracker, prefix: String) {
        let this = Arc::clone(this);
        let child_tracker = tracker.clone();
        tracker.spawn(async move {
            this.expand(child_tracker, prefix).await;
        });
    }

    /// Probe every extension of `prefix`, classifying each by page size.
    async fn expand(self: Arc<Self>, tracker: TaskTracker, prefix: String) {
        {
            let mut st = self.state.lock();
            if st.fatal.is_some() {
                return;
            }
            if st.processed >= self.target {
                trace!(prefix = %prefix, processed = st.processed, "target reached, keeping prefix for the parallel lister");
                st.partitions.push(prefix);
                return;
            }
        }

        for symbol in PARTITION_ALPHABET {
            if self.aborted() {
                return;
            }

            let mut extended = String::with_capacity(prefix.len() + 1);
            extended.push_str(&prefix);
            extended.push(symbol);

            let page = match self.lister.probe(&self.bucket, &extended).await {
                Ok(page) => page,
                Err(e) => {
                    self.record_fatal(e);
                    return;
                }
            };

            let count = page.objects.len();
            if count == 0 {
                continue;
            }

            if count >= self.page_cap {
                // A key equal to the probed prefix sorts first and is
                // invisible to every longer extension, so it must leave
                // through this probe.
                let exact = page
                    .objects
                    .first()
                    .is_some_and(|object| object.key == extended);

                if exact {
                    trace!(prefix = %extended, "exact-key object on a full page");
                    let object = page.objects.into_iter().next().expect("non-empty page");
                    if self.router.route(object).await.is_err() {
                        self.record_fatal(Error::StreamClosed);
                        return;
                    }
                    self.state.lock().exact_emitted.insert(extended.clone());
                }

                {
                    let mut st = self.state.lock();
                    st.processed += 1;
                    st.large += 1;
                    trace!(prefix = %extended, processed = st.processed, "full page, descending");
                }

                // A full page holding only the exact key happens against
                // stores that report fullness without truncating; there is
                // nothing underneath to descend into.
                if !(exact && count == 1) {
                    Self::spawn_expand(&self, &tracker, extended);
                }
            } else {
                {
                    let mut st = self.state.lock();
                    st.processed += 1;
                    st.small += 1;
                    trace!(prefix = %extended, objects = count, processed = st.processed, "sparse prefix, draining inline");
                }

                for object in page.objects {
                    if self.router.route(object).await.is_err() {
                        self.record_fatal(Error::StreamClosed);
                        return;
                    }
                }
            }
        }
    }

    fn aborted(&self) -> bool {
        self.state.lock().fatal.is_some()
    }

    fn record_fatal(&self, error: Error) {
        let mut st = self.state.lock();
        if st.fatal.is_none() {
            st.fatal = Some(error);
        }
    }

    fn check_fatal(&self) -> Result<()> {
        match self.state.lock().fatal.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
