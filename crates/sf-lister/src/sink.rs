//! The object stream and its consumers.
//!
//! Producers (partitioner and parallel lister) push [`ObjectInfo`] values
//! into an [`ObjectRouter`], which distributes them round-robin across one
//! bounded channel per sink worker. The bounded channels are the
//! backpressure mechanism: a fast store against a slow terminal blocks the
//! producers instead of growing a queue.
//!
//! Dropping the last router handle closes every channel; workers drain what
//! remains and exit, which is how the producer side signals completion.

use crate::ObjectInfo;
use futures::future::join_all;
use sf_error::{Error, Result};
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

/// What each sink worker does with an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkMode {
    /// One tab-separated line per object on stdout.
    Text,
    /// One JSON document per line on stdout.
    Json,
    /// Count only; used when per-object output is suppressed.
    Count,
}

/// Round-robin distributor feeding the sink worker pool.
pub struct ObjectRouter {
    senders: Vec<mpsc::Sender<ObjectInfo>>,
    next_worker: AtomicUsize,
    emitted: AtomicU64,
    bytes: AtomicU64,
}

impl ObjectRouter {
    /// Create a router with one bounded channel per worker.
    pub fn new(workers: usize, buffer: usize) -> (Self, Vec<mpsc::Receiver<ObjectInfo>>) {
        let workers = workers.max(1);
        let mut senders = Vec::with_capacity(workers);
        let mut receivers = Vec::with_capacity(workers);

        for _ in 0..workers {
            let (tx, rx) = mpsc::channel(buffer.max(1));
            senders.push(tx);
            receivers.push(rx);
        }

        let router = Self {
            senders,
            next_worker: AtomicUsize::new(0),
            emitted: AtomicU64::new(0),
            bytes: AtomicU64::new(0),
        };

        (router, receivers)
    }

    /// Route one object to a worker, waiting if its channel is full.
    pub async fn route(&self, object: ObjectInfo) -> Result<()> {
        let idx = self.next_worker.fetch_add(1, Ordering::Relaxed) % self.senders.len();
        self.bytes.fetch_add(object.size, Ordering::Relaxed);

        self.senders[idx]
            .send(object)
            .await
            .map_err(|_| Error::StreamClosed)?;

        self.emitted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Objects routed so far.
    pub fn emitted(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }

    /// Total size in bytes of the objects routed so far.
    pub fn bytes(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }

    /// Number of workers fed by this router.
    pub fn num_workers(&self) -> usize {
        self.senders.len()
    }
}

/// Format one object as the text output line.
pub fn format_text_line(object: &ObjectInfo) -> String {
    match &object.last_modified {
        Some(ts) => format!("Object: {} \t {} \t {}", ts, object.size, object.key),
        None => format!("Object: - \t {} \t {}", object.size, object.key),
    }
}

/// The pool of sink workers consuming the routed object stream.
pub struct SinkPool {
    handles: Vec<JoinHandle<()>>,
    counter: Arc<AtomicU64>,
}

impl SinkPool {
    /// Spawn one worker per receiver.
    pub fn spawn(mode: SinkMode, receivers: Vec<mpsc::Receiver<ObjectInfo>>) -> Self {
        let counter = Arc::new(AtomicU64::new(0));
        let handles = receivers
            .into_iter()
            .map(|rx| {
                let counter = counter.clone();
                tokio::spawn(sink_worker(mode, rx, counter))
            })
            .collect();

        Self { handles, counter }
    }

    /// Wait for every worker to drain its channel and exit.
    ///
    /// Returns the number of objects consumed. Meaningful once all producer
    /// handles to the router are gone.
    pub async fn join(self) -> u64 {
        join_all(self.handles).await;
        self.counter.load(Ordering::Relaxed)
    }
}

async fn sink_worker(mode: SinkMode, mut rx: mpsc::Receiver<ObjectInfo>, counter: Arc<AtomicU64>) {
    while let Some(object) = rx.recv().await {
        counter.fetch_add(1, Ordering::Relaxed);

        match mode {
            SinkMode::Count => {}
            SinkMode::Text => {
                let line = format_text_line(&object);
                if let Err(e) = writeln!(io::stdout().lock(), "{line}") {
                    warn!(error = %e, "failed to write to stdout");
                }
            }
            SinkMode::Json => match serde_json::to_string(&object) {
                Ok(line) => {
                    if let Err(e) = writeln!(io::stdout().lock(), "{line}") {
                        warn!(error = %e, "failed to write to stdout");
                    }
                }
                Err(e) => warn!(key = %object.key, error = %e, "failed to serialize object"),
            },
        }
    }
}
