//! Fixture Module
//!
//! Fixture model as delivered by the upstream API, the status vocabulary,
//! and the volatility/TTL policy that decides how long a fixture set may be
//! cached.

mod ttl;
mod volatility;


pub use ttl::{TtlDecision, TtlPolicy};
pub use volatility::{classify, classify_now, Volatility, VolatilityReport};

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Status Vocabulary ==
/// Match is being played or interrupted mid-game.
pub const LIVE_STATUSES: &[&str] = &["1H", "HT", "2H", "ET", "BT", "P", "SUSP", "INT", "LIVE"];
/// Match has not started.
pub const SCHEDULED_STATUSES: &[&str] = &["TBD", "NS"];
/// Match is over.
pub const FINISHED_STATUSES: &[&str] = &["FT", "AET", "PEN"];
/// Match will not be played as scheduled.
pub const CANCELLED_STATUSES: &[&str] = &["PST", "CANC", "ABD", "AWD", "WO"];

/// Partition of the upstream short status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusGroup {
    Live,
    Scheduled,
    Finished,
    Cancelled,
    /// A code outside the known vocabulary
    Other,
}

impl StatusGroup {
    /// Classifies a short status code. Matching is exact.
    pub fn of(short: &str) -> Self {
        if LIVE_STATUSES.contains(&short) {
            StatusGroup::Live
        } else if SCHEDULED_STATUSES.contains(&short) {
            StatusGroup::Scheduled
        } else if FINISHED_STATUSES.contains(&short) {
            StatusGroup::Finished
        } else if CANCELLED_STATUSES.contains(&short) {
            StatusGroup::Cancelled
        } else {
            StatusGroup::Other
        }
    }
}

// == Fixture ==
/// Match status as reported upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureStatus {
    /// Short code, e.g. `NS`, `1H`, `FT`
    pub short: String,
    /// Human readable status
    #[serde(default)]
    pub long: Option<String>,
    /// Minutes played
    #[serde(default)]
    pub elapsed: Option<u16>,
}

/// One match of a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub id: u64,
    /// Kick-off, RFC 3339 or a bare `YYYY-MM-DD`
    pub date: String,
    pub status: FixtureStatus,
}

impl Fixture {
    /// Builds a fixture from a status code and date, as tests and callers
    /// that already hold parsed data need.
    pub fn new(short: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id: 0,
            date: date.into(),
            status: FixtureStatus {
                short: short.into(),
                long: None,
                elapsed: None,
            },
        }
    }

    pub fn status_group(&self) -> StatusGroup {
        StatusGroup::of(&self.status.short)
    }

    /// Kick-off date in the device's local time zone.
    ///
    /// Returns None when the date cannot be parsed.
    pub fn local_date(&self) -> Option<NaiveDate> {
        if let Ok(instant) = DateTime::parse_from_rfc3339(&self.date) {
            return Some(instant.with_timezone(&Local).date_naive());
        }
        let day = self.date.get(..10)?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }
}

#[derive(Deserialize)]
struct FixtureItem {
    fixture: Fixture,
}

#[derive(Deserialize)]
struct FixtureEnvelope {
    response: Vec<FixtureItem>,
}

/// Extracts the fixture list from a raw upstream response of the form
/// `{"response": [{"fixture": {...}, ...}, ...]}`.
pub fn fixtures_from_response(raw: &Value) -> Result<Vec<Fixture>, serde_json::Error> {
    let envelope = FixtureEnvelope::deserialize(raw)?;
    Ok(envelope.response.into_iter().map(|item| item.fixture).collect())
}
