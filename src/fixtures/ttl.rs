//! TTL selection for fixture sets.

use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;

use super::volatility::{classify, classify_now, Volatility, VolatilityReport};
use super::Fixture;
use crate::keys::CacheKey;

const SECOND: Duration = Duration::from_secs(1);
const MINUTE: Duration = Duration::from_secs(60);
const HOUR: Duration = Duration::from_secs(60 * 60);
const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Maps a volatility class to a cache lifetime.
///
/// | current round | class           | TTL     |
/// |---------------|-----------------|---------|
/// | any           | live            | 15 s    |
/// | yes           | anything else   | 2 min   |
/// | no            | scheduled today | 5 min   |
/// | no            | finished        | 30 days |
/// | no            | future / empty  | 2 h     |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    pub live: Duration,
    pub current_round: Duration,
    pub today_scheduled: Duration,
    pub finished: Duration,
    pub future: Duration,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            live: 15 * SECOND,
            current_round: 2 * MINUTE,
            today_scheduled: 5 * MINUTE,
            finished: 30 * DAY,
            future: 2 * HOUR,
        }
    }
}

/// Cache key and lifetime chosen for one round's fixtures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TtlDecision {
    pub key: String,
    #[serde(rename = "ttl_ms", serialize_with = "as_millis")]
    pub ttl: Duration,
    pub report: VolatilityReport,
}

impl TtlDecision {
    pub fn volatility(&self) -> Volatility {
        self.report.volatility
    }
}

fn as_millis<S: serde::Serializer>(ttl: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(ttl.as_millis() as u64)
}

impl TtlPolicy {
    /// TTL for a class. Live data wins over the current-round rule, which
    /// wins over every other class.
    pub fn ttl_for(&self, volatility: Volatility, is_current_round: bool) -> Duration {
        match (volatility, is_current_round) {
            (Volatility::Live, _) => self.live,
            (_, true) => self.current_round,
            (Volatility::TodayScheduled, false) => self.today_scheduled,
            (Volatility::Finished, false) => self.finished,
            (Volatility::Future | Volatility::Empty, false) => self.future,
        }
    }

    /// Classifies `fixtures` against the local date and picks key and TTL.
    pub fn resolve(
        &self,
        fixtures: &[Fixture],
        league: u32,
        season: u16,
        round: &str,
        is_current_round: bool,
    ) -> TtlDecision {
        self.decide(classify_now(fixtures), league, season, round, is_current_round)
    }

    /// Same as [`TtlPolicy::resolve`] with an explicit local date.
    pub fn resolve_on(
        &self,
        fixtures: &[Fixture],
        today: NaiveDate,
        league: u32,
        season: u16,
        round: &str,
        is_current_round: bool,
    ) -> TtlDecision {
        self.decide(classify(fixtures, today), league, season, round, is_current_round)
    }

    fn decide(
        &self,
        report: VolatilityReport,
        league: u32,
        season: u16,
        round: &str,
        is_current_round: bool,
    ) -> TtlDecision {
        TtlDecision {
            key: CacheKey::round_fixtures(league, season, round).to_string(),
            ttl: self.ttl_for(report.volatility, is_current_round),
            report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> TtlPolicy {
        TtlPolicy::default()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, 30).unwrap()
    }

    #[test]
    fn test_decision_table() {
        let p = policy();
        let cases = [
            (Volatility::Live, true, 15 * SECOND),
            (Volatility::TodayScheduled, true, 2 * MINUTE),
            (Volatility::Finished, true, 2 * MINUTE),
            (Volatility::Future, true, 2 * MINUTE),
            (Volatility::Empty, true, 2 * MINUTE),
            (Volatility::Live, false, 15 * SECOND),
            (Volatility::TodayScheduled, false, 5 * MINUTE),
            (Volatility::Finished, false, 30 * DAY),
            (Volatility::Future, false, 2 * HOUR),
            (Volatility::Empty, false, 2 * HOUR),
        ];

        for (volatility, current, expected) in cases {
            assert_eq!(p.ttl_for(volatility, current), expected, "{volatility:?} current={current}");
        }
    }

    #[test]
    fn test_empty_current_round() {
        let decision = policy().resolve(&[], 39, 2024, "R1", true);
        assert_eq!(decision.ttl.as_millis(), 120_000);
        assert_eq!(decision.key, "fixtures:39:2024:R1");
        assert_eq!(decision.volatility(), Volatility::Empty);
    }

    #[test]
    fn test_finished_past_round() {
        let decision = policy().resolve(&[Fixture::new("FT", "2024-08-16")], 39, 2024, "R1", false);
        assert_eq!(decision.ttl.as_millis(), 2_592_000_000);
    }

    #[test]
    fn test_live_past_round() {
        let decision = policy().resolve(&[Fixture::new("1H", "2024-08-16")], 39, 2024, "R1", false);
        assert_eq!(decision.ttl.as_millis(), 15_000);
    }

    #[test]
    fn test_resolve_on_today_scheduled() {
        let fixtures = [Fixture::new("NS", "2024-11-30"), Fixture::new("FT", "2024-11-29")];
        let decision = policy().resolve_on(&fixtures, today(), 140, 2024, "R14", false);
        assert_eq!(decision.ttl, 5 * MINUTE);
        assert_eq!(decision.key, "fixtures:140:2024:R14");
    }

    #[test]
    fn test_cancelled_round_gets_future_ttl() {
        let fixtures = [Fixture::new("PST", "2024-11-30"), Fixture::new("CANC", "2024-11-30")];
        let decision = policy().resolve_on(&fixtures, today(), 39, 2024, "R9", false);
        assert_eq!(decision.volatility(), Volatility::Future);
        assert_eq!(decision.ttl, 2 * HOUR);
    }

    #[test]
    fn test_decision_serializes_ttl_in_millis() {
        let decision = policy().resolve(&[], 39, 2024, "R1", true);
        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["ttl_ms"], 120_000);
        assert_eq!(json["report"]["volatility"], "empty");
    }
}
