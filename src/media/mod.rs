//! Media Cache Module
//!
//! Persistent, size-bounded caches for flags, crests and badges. Two
//! instances share one implementation and differ only in their
//! [`MediaProfile`]: vector icons (SVG text) and raster images (base64).
//!
//! Each cache persists its whole record map as one JSON document in a
//! single slot of the [`KeyValueStore`](crate::storage::KeyValueStore).

mod stats;
mod store;


pub use stats::MediaCacheStats;
pub use store::{MediaCacheStore, RecordMap};

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::is_fresh;

/// Default number of records per cache.
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Default largest accepted payload, in estimated bytes.
pub const DEFAULT_MAX_BYTES: usize = 5 * 1024 * 1024;

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

// == Media Kind ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Svg,
    Png,
    Jpg,
    Jpeg,
    Webp,
}

impl MediaKind {
    pub const ALL: [MediaKind; 5] = [
        MediaKind::Svg,
        MediaKind::Png,
        MediaKind::Jpg,
        MediaKind::Jpeg,
        MediaKind::Webp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Svg => "svg",
            MediaKind::Png => "png",
            MediaKind::Jpg => "jpg",
            MediaKind::Jpeg => "jpeg",
            MediaKind::Webp => "webp",
        }
    }

    /// Text payloads are stored verbatim; binary ones base64-encoded.
    pub fn is_text(&self) -> bool {
        matches!(self, MediaKind::Svg)
    }

    /// Kind implied by the file extension of `url`, ignoring query and fragment.
    pub fn from_url(url: &str) -> Option<Self> {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let file = path.rsplit('/').next().unwrap_or(path);
        let (_, ext) = file.rsplit_once('.')?;
        ext.parse().ok()
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().trim_start_matches("image/").to_ascii_lowercase();
        match lower.as_str() {
            "svg" | "svg+xml" => Ok(MediaKind::Svg),
            "png" => Ok(MediaKind::Png),
            "jpg" => Ok(MediaKind::Jpg),
            "jpeg" => Ok(MediaKind::Jpeg),
            "webp" => Ok(MediaKind::Webp),
            other => Err(format!("unknown media kind: {other}")),
        }
    }
}

/// Estimated decoded size of a payload.
///
/// Text is counted as-is; base64 data is counted at three quarters of its
/// encoded length.
pub fn estimate_size(data: &str, kind: MediaKind) -> usize {
    if kind.is_text() {
        data.len()
    } else {
        data.len() * 3 / 4
    }
}

// == Media Cache Record ==
/// One cached media payload as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaCacheRecord {
    pub url: String,
    /// SVG text or base64-encoded raster bytes
    pub data: String,
    /// Store timestamp (Unix milliseconds)
    pub stored_at: u64,
    pub ttl_ms: u64,
    pub kind: MediaKind,
    /// Estimated decoded size
    pub size_bytes: usize,
}

impl MediaCacheRecord {
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    pub fn is_fresh_at(&self, now_ms: u64) -> bool {
        is_fresh(self.stored_at, self.ttl(), now_ms)
    }
}

// == Media Profile ==
/// What a media cache accepts and how long it keeps it.
#[derive(Debug, Clone)]
pub struct MediaProfile {
    /// Short name, also used in the maintenance API paths
    pub name: &'static str,
    /// Storage slot holding the serialized record map
    pub slot: String,
    pub default_ttl: Duration,
    pub accepted: Vec<MediaKind>,
    /// Kind assumed when neither hint nor URL tells
    pub fallback_kind: MediaKind,
    pub max_entries: usize,
    pub max_bytes: usize,
}

impl MediaProfile {
    /// Vector icons: country flags and competition logos.
    pub fn icons() -> Self {
        Self {
            name: "icons",
            slot: "matchday.media.icons".to_string(),
            default_ttl: 30 * DAY,
            accepted: vec![MediaKind::Svg],
            fallback_kind: MediaKind::Svg,
            max_entries: DEFAULT_MAX_ENTRIES,
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }

    /// Raster images: team crests and player photos.
    pub fn images() -> Self {
        Self {
            name: "images",
            slot: "matchday.media.images".to_string(),
            default_ttl: 7 * DAY,
            accepted: vec![MediaKind::Png, MediaKind::Jpg, MediaKind::Jpeg, MediaKind::Webp],
            fallback_kind: MediaKind::Png,
            max_entries: DEFAULT_MAX_ENTRIES,
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn max_entries(mut self, n: usize) -> Self {
        self.max_entries = n;
        self
    }

    pub fn max_bytes(mut self, n: usize) -> Self {
        self.max_bytes = n;
        self
    }

    pub fn slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = slot.into();
        self
    }

    pub fn accepts(&self, kind: MediaKind) -> bool {
        self.accepted.contains(&kind)
    }

    /// Hint first, then URL extension, then the profile fallback.
    pub fn resolve_kind(&self, url: &str, hint: Option<MediaKind>) -> MediaKind {
        hint.or_else(|| MediaKind::from_url(url))
            .unwrap_or(self.fallback_kind)
    }
}
