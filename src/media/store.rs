//! Media Cache Store Module
//!
//! Read-modify-write cache over one storage slot. Storage failures never
//! escape `get`/`set`/`has`/`cleanup`/`clear`: a failed read is treated as
//! an empty cache and a failed write is logged and dropped. Callers that
//! need to tell "empty" from "unreadable" use [`MediaCacheStore::try_load`].

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{estimate_size, MediaCacheRecord, MediaCacheStats, MediaKind, MediaProfile};
use crate::cache::current_timestamp_ms;
use crate::error::StorageError;
use crate::storage::KeyValueStore;

/// Persisted shape: URL to record.
pub type RecordMap = BTreeMap<String, MediaCacheRecord>;

// == Media Cache Store ==
pub struct MediaCacheStore {
    profile: MediaProfile,
    storage: Arc<dyn KeyValueStore>,
    /// Serialises every read-modify-write of the slot
    write_lock: Mutex<()>,
}

impl MediaCacheStore {
    pub fn new(profile: MediaProfile, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            profile,
            storage,
            write_lock: Mutex::new(()),
        }
    }

    pub fn profile(&self) -> &MediaProfile {
        &self.profile
    }

    pub fn name(&self) -> &'static str {
        self.profile.name
    }

    // == Load / Persist ==
    /// Reads the record map, reporting why it could not be read.
    pub async fn try_load(&self) -> Result<RecordMap, StorageError> {
        match self.storage.get_item(&self.profile.slot).await? {
            None => Ok(RecordMap::new()),
            Some(raw) => {
                serde_json::from_str(&raw).map_err(|err| StorageError::Corrupt(err.to_string()))
            }
        }
    }

    async fn load(&self) -> RecordMap {
        match self.try_load().await {
            Ok(records) => records,
            Err(err) => {
                warn!(cache = self.name(), error = %err, "Media cache unreadable, treating as empty");
                RecordMap::new()
            }
        }
    }

    async fn persist(&self, records: &RecordMap) {
        let raw = match serde_json::to_string(records) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(cache = self.name(), error = %err, "Media cache serialization failed");
                return;
            }
        };

        if let Err(err) = self.storage.set_item(&self.profile.slot, raw).await {
            warn!(cache = self.name(), error = %err, "Media cache write failed");
        }
    }

    // == Get ==
    /// Returns the stored payload if present and fresh.
    ///
    /// A stale record is removed and the removal persisted.
    pub async fn get(&self, url: &str) -> Option<String> {
        self.get_record(url).await.map(|record| record.data)
    }

    /// Same as [`MediaCacheStore::get`], decoding the payload to raw bytes.
    pub async fn get_bytes(&self, url: &str) -> Option<Vec<u8>> {
        let record = self.get_record(url).await?;
        if record.kind.is_text() {
            return Some(record.data.into_bytes());
        }

        match STANDARD.decode(record.data.as_bytes()) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                warn!(cache = self.name(), url, error = %err, "Cached media is not valid base64");
                None
            }
        }
    }

    async fn get_record(&self, url: &str) -> Option<MediaCacheRecord> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await;

        let fresh = records.get(url)?.is_fresh_at(current_timestamp_ms());
        if fresh {
            debug!(cache = self.name(), url, "Media cache hit");
            return records.remove(url);
        }

        records.remove(url);
        self.persist(&records).await;
        debug!(cache = self.name(), url, "Media cache entry expired on read");
        None
    }

    // == Has ==
    pub async fn has(&self, url: &str) -> bool {
        self.get_record(url).await.is_some()
    }

    // == Set ==
    /// Stores a payload.
    ///
    /// Payloads of a kind the profile does not accept, or larger than the
    /// profile's byte limit, are dropped with a log line and no error.
    ///
    /// # Arguments
    /// * `url` - Source URL, the record key
    /// * `data` - SVG text or base64-encoded raster bytes
    /// * `hint` - Media kind, when the caller knows it better than the URL
    /// * `ttl` - Optional TTL (uses the profile's default if None)
    pub async fn set(
        &self,
        url: &str,
        data: impl Into<String>,
        hint: Option<MediaKind>,
        ttl: Option<Duration>,
    ) {
        let data = data.into();
        let kind = self.profile.resolve_kind(url, hint);

        if !self.profile.accepts(kind) {
            warn!(cache = self.name(), url, %kind, "Media kind not accepted by this cache, skipping");
            return;
        }

        let size_bytes = estimate_size(&data, kind);
        if size_bytes > self.profile.max_bytes {
            warn!(
                cache = self.name(),
                url,
                size_bytes,
                max_bytes = self.profile.max_bytes,
                "Media payload too large, skipping"
            );
            return;
        }

        let ttl = ttl.unwrap_or(self.profile.default_ttl);
        let record = MediaCacheRecord {
            url: url.to_string(),
            data,
            stored_at: current_timestamp_ms(),
            ttl_ms: ttl.as_millis() as u64,
            kind,
            size_bytes,
        };

        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await;
        records.insert(url.to_string(), record);

        let evicted = evict_oldest(&mut records, self.profile.max_entries, url);
        if evicted > 0 {
            info!(cache = self.name(), evicted, "Media cache over capacity, evicted oldest records");
        }

        self.persist(&records).await;
        debug!(cache = self.name(), url, %kind, size_bytes, "Media cached");
    }

    /// Stores raw bytes, base64-encoding binary kinds.
    ///
    /// SVG bytes that are not UTF-8 are dropped with a log line.
    pub async fn set_bytes(
        &self,
        url: &str,
        bytes: &[u8],
        hint: Option<MediaKind>,
        ttl: Option<Duration>,
    ) {
        let kind = self.profile.resolve_kind(url, hint);
        let data = if kind.is_text() {
            match String::from_utf8(bytes.to_vec()) {
                Ok(text) => text,
                Err(err) => {
                    warn!(cache = self.name(), url, error = %err, "Vector media is not UTF-8, skipping");
                    return;
                }
            }
        } else {
            STANDARD.encode(bytes)
        };

        self.set(url, data, Some(kind), ttl).await;
    }

    // == Cleanup ==
    /// Removes every stale record in one pass.
    ///
    /// Returns the number of records removed.
    pub async fn cleanup(&self) -> usize {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await;

        let now = current_timestamp_ms();
        let before = records.len();
        records.retain(|_, record| record.is_fresh_at(now));
        let removed = before - records.len();

        if removed > 0 {
            self.persist(&records).await;
            info!(cache = self.name(), removed, "Media cache cleanup removed stale records");
        } else {
            debug!(cache = self.name(), "Media cache cleanup: nothing stale");
        }
        removed
    }

    // == Clear ==
    /// Removes the whole persisted map.
    pub async fn clear(&self) {
        let _guard = self.write_lock.lock().await;
        if let Err(err) = self.storage.remove_item(&self.profile.slot).await {
            warn!(cache = self.name(), error = %err, "Media cache clear failed");
        } else {
            info!(cache = self.name(), "Media cache cleared");
        }
    }

    // == Stats ==
    /// Aggregates over the current records without checking freshness.
    pub async fn stats(&self) -> MediaCacheStats {
        let records = self.load().await;
        MediaCacheStats::from_records(records.values())
    }
}

/// Drops records with the smallest `stored_at` until at most `max` remain.
///
/// Among records stored in the same millisecond, `keep` goes last.
pub(super) fn evict_oldest(records: &mut RecordMap, max: usize, keep: &str) -> usize {
    if records.len() <= max {
        return 0;
    }

    let mut by_age: Vec<(u64, bool, String)> = records
        .values()
        .map(|record| (record.stored_at, record.url == keep, record.url.clone()))
        .collect();
    by_age.sort();

    let excess = records.len() - max;
    for (_, _, url) in by_age.into_iter().take(excess) {
        records.remove(&url);
    }
    excess
}
