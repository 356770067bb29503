//! S3 access: client construction, the minimal listing surface, and the
//! retry discipline wrapped around it.

pub mod client;
pub mod http;
pub mod list;
pub mod retry;
pub mod store;

pub use client::{create_client, S3Config};
pub use http::HttpSettings;
pub use list::BackoffLister;
pub use retry::{with_backoff, RetryConfig};
pub use store::{ListPage, ObjectStore, SdkStore};
