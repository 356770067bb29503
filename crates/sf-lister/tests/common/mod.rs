//! Deterministic in-memory object store for engine tests.

// Shared between test binaries; not every binary uses every helper.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use sf_error::{Error, Result};
use sf_lister::{ListPage, ObjectInfo, ObjectStore};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

fn fixed_timestamp() -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(1_600_000_000, 0)
}

struct MockInner {
    bucket: String,
    objects: BTreeMap<String, u64>,
    failures: Mutex<HashMap<String, VecDeque<Error>>>,
    region: Option<String>,
    request_delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    high_water: AtomicUsize,
}

/// Clonable handle onto one mock bucket; clones share all counters.
#[derive(Clone)]
pub struct MockStore {
    inner: Arc<MockInner>,
}

impl MockStore {
    pub fn new(bucket: &str) -> Self {
        Self {
            inner: Arc::new(MockInner {
                bucket: bucket.to_string(),
                objects: BTreeMap::new(),
                failures: Mutex::new(HashMap::new()),
                region: None,
                request_delay: None,
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                high_water: AtomicUsize::new(0),
            }),
        }
    }

    /// Populate the bucket before any clone is taken.
    pub fn with_objects<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let inner = Arc::get_mut(&mut self.inner).expect("populate before cloning");
        for key in keys {
            inner.objects.insert(key.into(), 1);
        }
        self
    }

    pub fn with_region(mut self, region: &str) -> Self {
        let inner = Arc::get_mut(&mut self.inner).expect("populate before cloning");
        inner.region = Some(region.to_string());
        self
    }

    /// Sleep this long inside every list call (drives the virtual clock).
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        let inner = Arc::get_mut(&mut self.inner).expect("populate before cloning");
        inner.request_delay = Some(delay);
        self
    }

    /// Script failures for one prefix; they are consumed first-in first-out
    /// before any page is served for it.
    pub fn fail_next(&self, prefix: &str, errors: Vec<Error>) {
        self.inner
            .failures
            .lock()
            .entry(prefix.to_string())
            .or_default()
            .extend(errors);
    }

    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    /// Most list calls ever in flight at once.
    pub fn high_water(&self) -> usize {
        self.inner.high_water.load(Ordering::SeqCst)
    }

    pub fn keys(&self) -> Vec<String> {
        self.inner.objects.keys().cloned().collect()
    }
}

#[async_trait]
impl ObjectStore for MockStore {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation: Option<&str>,
        max_keys: i32,
    ) -> Result<ListPage> {
        if bucket != self.inner.bucket {
            return Err(Error::BucketNotFound(bucket.to_string()));
        }

        if let Some(error) = self
            .inner
            .failures
            .lock()
            .get_mut(prefix)
            .and_then(|queue| queue.pop_front())
        {
            return Err(error);
        }

        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.inner.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.high_water.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.inner.request_delay {
            tokio::time::sleep(delay).await;
        }

        let mut objects = Vec::new();
        let mut truncated = false;
        for (key, size) in self.inner.objects.iter() {
            if !key.starts_with(prefix) {
                continue;
            }
            if let Some(token) = continuation {
                if key.as_str() <= token {
                    continue;
                }
            }
            if objects.len() == max_keys as usize {
                truncated = true;
                break;
            }
            objects.push(ObjectInfo {
                key: key.clone(),
                size: *size,
                last_modified: fixed_timestamp(),
            });
        }

        self.inner.in_flight.fetch_sub(1, Ordering::SeqCst);

        let continuation = if truncated {
            objects.last().map(|o| o.key.clone())
        } else {
            None
        };

        Ok(ListPage {
            objects,
            truncated,
            continuation,
        })
    }

    async fn bucket_region(&self, bucket: &str) -> Result<Option<String>> {
        if bucket != self.inner.bucket {
            return Err(Error::BucketNotFound(bucket.to_string()));
        }
        Ok(self.inner.region.clone())
    }
}

/// Drain router receivers into one shared vector for assertions.
pub fn spawn_collectors(
    receivers: Vec<mpsc::Receiver<ObjectInfo>>,
) -> (Vec<JoinHandle<()>>, Arc<Mutex<Vec<ObjectInfo>>>) {
    let collected = Arc::new(Mutex::new(Vec::new()));
    let handles = receivers
        .into_iter()
        .map(|mut rx| {
            let collected = collected.clone();
            tokio::spawn(async move {
                while let Some(object) = rx.recv().await {
                    collected.lock().push(object);
                }
            })
        })
        .collect();
    (handles, collected)
}

/// Keys `0000..count` zero-padded under `prefix`.
pub fn numbered_keys(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{prefix}{i:04}")).collect()
}
