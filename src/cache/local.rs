//! Expiry-aware cache over a [`KeyValueStore`].

use std::sync::Arc;

use insightarc_api_types::CacheEnvelope;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use super::{Clock, KeyValueStore, SystemClock};

const MILLIS_PER_HOUR: f64 = 60.0 * 60.0 * 1000.0;

#[derive(Deserialize)]
struct Stamp {
    timestamp: i64,
}

/// Timestamped envelopes in a shared store.
///
/// Failures never reach the caller: unreadable or corrupt entries count as a
/// miss, and failed writes are logged and dropped.
pub struct LocalCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl LocalCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Whether `key` holds an entry younger than `expire_hours`.
    ///
    /// With `expire_hours <= 0` any readable entry is valid.
    pub fn is_valid(&self, key: &str, expire_hours: f64) -> bool {
        let Some(raw) = self.read(key) else {
            return false;
        };
        let Ok(Stamp { timestamp }) = serde_json::from_str::<Stamp>(&raw) else {
            debug!(target = "insightarc::cache", key, "Cache entry has no readable timestamp");
            return false;
        };
        if expire_hours <= 0.0 {
            return true;
        }

        let elapsed = self.clock.now_millis().saturating_sub(timestamp);
        #[allow(clippy::cast_precision_loss)]
        let elapsed = elapsed as f64;
        elapsed < expire_hours * MILLIS_PER_HOUR
    }

    /// Write `data` under `key` stamped with the current time, replacing any
    /// previous entry.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, data: &T) {
        let envelope = CacheEnvelope {
            timestamp: self.clock.now_millis(),
            data,
        };
        let serialized = match serde_json::to_string(&envelope) {
            Ok(serialized) => serialized,
            Err(err) => {
                warn!(target = "insightarc::cache", key, error = %err, "Failed to serialize cache entry");
                return;
            }
        };
        match self.store.set(key, serialized) {
            Ok(()) => debug!(target = "insightarc::cache", key, "Cache entry saved"),
            Err(err) => {
                warn!(target = "insightarc::cache", key, error = %err, "Failed to persist cache entry");
            }
        }
    }

    /// Cached payload for `key`, or `None` when absent, expired or unreadable.
    pub fn get<T: DeserializeOwned>(&self, key: &str, expire_hours: f64) -> Option<T> {
        if !self.is_valid(key, expire_hours) {
            debug!(target = "insightarc::cache", key, "Cache miss");
            return None;
        }
        let raw = self.read(key)?;
        match serde_json::from_str::<CacheEnvelope<T>>(&raw) {
            Ok(envelope) => {
                debug!(target = "insightarc::cache", key, "Cache hit");
                Some(envelope.data)
            }
            Err(err) => {
                debug!(target = "insightarc::cache", key, error = %err, "Discarding unreadable cache entry");
                None
            }
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(err) => {
                warn!(target = "insightarc::cache", key, error = %err, "Cache store read failed");
                None
            }
        }
    }
}
