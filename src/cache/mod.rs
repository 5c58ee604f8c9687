//! insightArc content cache
//!
//! A process-wide key/value store holding timestamped envelopes:
//!
//! - **Store**: where envelopes live (`MemoryStore`, or `FileStore` on disk)
//! - **LocalCache**: expiry-aware reads and writes on top of a store
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! enabled = true
//! path = ".insightarc-cache.json"
//!
//! [blog]
//! cache_expire_hours = 0.5
//! ```
//!
//! Entries are overwritten on the next successful fetch and never swept;
//! the last writer wins.

mod clock;
mod keys;
mod local;
mod lock;
mod store;

pub use clock::{Clock, SystemClock};
pub use keys::{BLOG_LIST_KEY, INSPIRATION_LIST_KEY, content_key, list_key};
pub use local::LocalCache;
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};

#[cfg(test)]
pub(crate) use clock::testing::ManualClock;
