//! Volatility classification of fixture sets.
//!
//! A round containing a single live match changes every few seconds no
//! matter how many of its other matches are over, so the classes are
//! checked in strict precedence order: live, scheduled today, finished,
//! future.

use chrono::{Local, NaiveDate};
use serde::Serialize;

use super::{Fixture, StatusGroup};

/// How quickly a fixture set is expected to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Volatility {
    /// No fixtures at all
    Empty,
    /// At least one match in play
    Live,
    /// A match kicks off later today
    TodayScheduled,
    /// Matches are over and nothing is pending today
    Finished,
    /// Everything else, including rounds made only of cancelled matches
    Future,
}

/// Classification result with the predicates it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VolatilityReport {
    pub volatility: Volatility,
    pub fixture_count: usize,
    pub has_live: bool,
    pub has_today_scheduled: bool,
    pub has_finished: bool,
    /// Non-empty set where every match is postponed, cancelled, abandoned or awarded
    pub all_cancelled: bool,
}

/// Classifies `fixtures` against `today` (the caller's local date).
///
/// Cancelled statuses never select a class on their own; they fall through
/// to whatever the rest of the set implies.
pub fn classify(fixtures: &[Fixture], today: NaiveDate) -> VolatilityReport {
    let mut has_live = false;
    let mut has_today_scheduled = false;
    let mut has_finished = false;
    let mut cancelled = 0usize;

    for fixture in fixtures {
        match fixture.status_group() {
            StatusGroup::Live => has_live = true,
            StatusGroup::Scheduled => {
                if fixture.local_date() == Some(today) {
                    has_today_scheduled = true;
                }
            }
            StatusGroup::Finished => has_finished = true,
            StatusGroup::Cancelled => cancelled += 1,
            StatusGroup::Other => {}
        }
    }

    let volatility = if fixtures.is_empty() {
        Volatility::Empty
    } else if has_live {
        Volatility::Live
    } else if has_today_scheduled {
        Volatility::TodayScheduled
    } else if has_finished {
        Volatility::Finished
    } else {
        Volatility::Future
    };

    VolatilityReport {
        volatility,
        fixture_count: fixtures.len(),
        has_live,
        has_today_scheduled,
        has_finished,
        all_cancelled: !fixtures.is_empty() && cancelled == fixtures.len(),
    }
}

/// Classifies `fixtures` against the current local date.
pub fn classify_now(fixtures: &[Fixture]) -> VolatilityReport {
    classify(fixtures, Local::now().date_naive())
}
