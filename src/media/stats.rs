//! Media Cache Statistics Module
//!
//! Aggregates over the persisted records, stale ones included.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{MediaCacheRecord, MediaKind};

// == Media Cache Stats ==
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct MediaCacheStats {
    /// Number of records
    pub count: usize,
    /// Smallest `stored_at`, None when empty
    pub oldest_timestamp: Option<u64>,
    /// Largest `stored_at`, None when empty
    pub newest_timestamp: Option<u64>,
    /// Sum of estimated sizes
    pub total_bytes: u64,
    pub count_by_kind: BTreeMap<MediaKind, usize>,
}

impl MediaCacheStats {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a MediaCacheRecord>) -> Self {
        let mut stats = Self::default();

        for record in records {
            stats.count += 1;
            stats.total_bytes += record.size_bytes as u64;
            *stats.count_by_kind.entry(record.kind).or_insert(0) += 1;

            stats.oldest_timestamp = Some(match stats.oldest_timestamp {
                Some(oldest) => oldest.min(record.stored_at),
                None => record.stored_at,
            });
            stats.newest_timestamp = Some(match stats.newest_timestamp {
                Some(newest) => newest.max(record.stored_at),
                None => record.stored_at,
            });
        }

        stats
    }
}
