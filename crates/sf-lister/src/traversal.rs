//! Traversal coordination.
//!
//! Wires the partitioner, the parallel lister and the sink pool together
//! and walks the run through its phases:
//!
//! ```text
//!         init ── start ──▶ partitioning
//!  partitioning ── done ──▶ listing
//!       listing ── done ──▶ draining
//!      draining ── done ──▶ complete
//!    (any phase) ── fatal ──▶ aborted
//! ```
//!
//! Partitioning and listing both emit objects; draining waits for the sink
//! workers to consume what remains in the stream.

use sf_error::Result;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::config::TraversalConfig;
use crate::parallel::ParallelLister;
use crate::partition::Partitioner;
use crate::s3::{BackoffLister, ObjectStore};
use crate::sink::{ObjectRouter, SinkMode, SinkPool};
use crate::stats::TraversalSummary;

/// Where a traversal currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Init,
    Partitioning,
    Listing,
    Draining,
    Complete,
    Aborted,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Init => "init",
            Phase::Partitioning => "partitioning",
            Phase::Listing => "listing",
            Phase::Draining => "draining",
            Phase::Complete => "complete",
            Phase::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// One all-or-nothing bucket traversal.
pub struct Traversal<S: ObjectStore> {
    store: Arc<S>,
    bucket: String,
    config: TraversalConfig,
    mode: SinkMode,
}

impl<S: ObjectStore> Traversal<S> {
    /// Set up a traversal of `bucket`.
    pub fn new(
        store: S,
        bucket: impl Into<String>,
        config: TraversalConfig,
        mode: SinkMode,
    ) -> Self {
        Self {
            store: Arc::new(store),
            bucket: bucket.into(),
            config,
            mode,
        }
    }

    /// Run the traversal to completion.
    ///
    /// Any fatal aborts the whole run: objects already emitted stay
    /// emitted, but no completeness claim survives.
    pub async fn run(&self) -> Result<TraversalSummary> {
        let mut summary = TraversalSummary::new();
        let mut phase = Phase::Init;

        let lister = Arc::new(BackoffLister::new(
            Arc::clone(&self.store),
            self.config.retry.clone(),
            self.config.page_cap,
        ));

        let (router, receivers) =
            ObjectRouter::new(self.config.concurrency, self.config.channel_capacity);
        let router = Arc::new(router);
        let sink = SinkPool::spawn(self.mode, receivers);

        phase = self.advance(phase, Phase::Partitioning);
        let partitioner = Arc::new(Partitioner::new(
            Arc::clone(&lister),
            Arc::clone(&router),
            &self.bucket,
            self.config.target_partitions,
            self.config.page_cap,
        ));
        let outcome = match partitioner.run().await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.advance(phase, Phase::Aborted);
                return Err(e);
            }
        };

        summary.small_prefixes = outcome.small_prefixes;
        summary.large_prefixes = outcome.large_prefixes;
        summary.partitions = outcome.partitions.len();
        summary.rebalance_passes = outcome.rebalance_passes;

        phase = self.advance(phase, Phase::Listing);
        let parallel = ParallelLister::new(
            Arc::clone(&lister),
            Arc::clone(&router),
            &self.bucket,
            self.config.concurrency,
        );
        if let Err(e) = parallel
            .run(outcome.partitions, &outcome.exact_emitted)
            .await
        {
            self.advance(phase, Phase::Aborted);
            return Err(e);
        }
        drop(parallel);

        phase = self.advance(phase, Phase::Draining);
        summary.objects_emitted = router.emitted();
        summary.bytes_listed = router.bytes();
        drop(router);
        let consumed = sink.join().await;
        debug_assert_eq!(consumed, summary.objects_emitted);

        self.advance(phase, Phase::Complete);
        summary.complete();

        debug!(
            bucket = %self.bucket,
            objects = summary.objects_emitted,
            partitions = summary.partitions,
            small = summary.small_prefixes,
            large = summary.large_prefixes,
            passes = summary.rebalance_passes,
            "traversal complete"
        );

        Ok(summary)
    }

    fn advance(&self, from: Phase, to: Phase) -> Phase {
        debug!(bucket = %self.bucket, from = %from, to = %to, "traversal phase change");
        to
    }
}
