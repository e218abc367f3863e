//! Cache key definitions.
//!
//! Every upstream resource the client reads is named by a [`CacheKey`]. The
//! rendered string (`Display`) is the key used by the object cache and the
//! request coordinator. Each concept renders with its own prefix followed by
//! `:`, so keys of different concepts can never collide.

use std::fmt;

/// Identifies one upstream resource.
///
/// String fields are caller-validated identifiers (already URL-encoded where
/// the upstream requires it) and are rendered verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    // Reference data
    /// All countries known to the upstream
    Countries,
    /// A single country by name or code
    Country { name: String },
    /// Competitions played in a country
    Leagues { country: String },
    /// A single competition
    League { id: u32 },

    // Season structure
    /// Round names of a competition season
    Rounds { league: u32, season: u16 },
    /// The round the upstream marks as in progress
    CurrentRound { league: u32, season: u16 },
    /// Fixtures of one round
    RoundFixtures {
        league: u32,
        season: u16,
        round: String,
    },
    /// League table
    Standings { league: u32, season: u16 },
    /// Top scorers of a competition season
    TopScorers { league: u32, season: u16 },

    // Teams and players
    /// Team profile
    Team { id: u32 },
    /// All fixtures of a team in a season
    TeamFixtures { team: u32, season: u16 },
    /// Current squad of a team
    Squad { team: u32 },
    /// Player profile and season statistics
    Player { id: u32, season: u16 },

    // Single match
    /// Details of one fixture
    Fixture { id: u64 },
}

impl CacheKey {
    /// Convenience constructor for round fixtures.
    pub fn round_fixtures(league: u32, season: u16, round: impl Into<String>) -> Self {
        CacheKey::RoundFixtures {
            league,
            season,
            round: round.into(),
        }
    }

    /// Concept prefix of the rendered key.
    pub fn concept(&self) -> &'static str {
        match self {
            CacheKey::Countries => "countries",
            CacheKey::Country { .. } => "country",
            CacheKey::Leagues { .. } => "leagues",
            CacheKey::League { .. } => "league",
            CacheKey::Rounds { .. } => "rounds",
            CacheKey::CurrentRound { .. } => "current_round",
            CacheKey::RoundFixtures { .. } => "fixtures",
            CacheKey::Standings { .. } => "standings",
            CacheKey::TopScorers { .. } => "top_scorers",
            CacheKey::Team { .. } => "team",
            CacheKey::TeamFixtures { .. } => "team_fixtures",
            CacheKey::Squad { .. } => "squad",
            CacheKey::Player { .. } => "player",
            CacheKey::Fixture { .. } => "fixture",
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let concept = self.concept();
        match self {
            CacheKey::Countries => write!(f, "{concept}:"),
            CacheKey::Country { name } => write!(f, "{concept}:{name}"),
            CacheKey::Leagues { country } => write!(f, "{concept}:{country}"),
            CacheKey::League { id } | CacheKey::Team { id } => write!(f, "{concept}:{id}"),
            CacheKey::Rounds { league, season }
            | CacheKey::CurrentRound { league, season }
            | CacheKey::Standings { league, season }
            | CacheKey::TopScorers { league, season } => write!(f, "{concept}:{league}:{season}"),
            CacheKey::RoundFixtures {
                league,
                season,
                round,
            } => write!(f, "{concept}:{league}:{season}:{round}"),
            CacheKey::TeamFixtures { team, season } => write!(f, "{concept}:{team}:{season}"),
            CacheKey::Squad { team } => write!(f, "{concept}:{team}"),
            CacheKey::Player { id, season } => write!(f, "{concept}:{id}:{season}"),
            CacheKey::Fixture { id } => write!(f, "{concept}:{id}"),
        }
    }
}

impl From<&CacheKey> for String {
    fn from(key: &CacheKey) -> Self {
        key.to_string()
    }
}
