//! Data Loading Service
//!
//! The read path every screen goes through: object cache first, then one
//! shared upstream fetch per key, then a store with a TTL chosen for the
//! data. Media loads do not come through here.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::cache::ObjectCache;
use crate::coordinator::RequestCoordinator;
use crate::error::{FetchError, FetchResult};
use crate::fixtures::{fixtures_from_response, TtlPolicy};
use crate::keys::CacheKey;

// == Upstream ==
/// The sports API client.
///
/// Implementations own transport, authentication and timeouts. Errors are
/// passed through unchanged; nothing here retries.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn fetch(&self, key: &CacheKey) -> anyhow::Result<Value>;
}

// == Service ==
pub struct MatchdayService {
    objects: Arc<ObjectCache<Value>>,
    coordinator: Arc<RequestCoordinator<Value>>,
    upstream: Arc<dyn Upstream>,
    policy: TtlPolicy,
}

impl MatchdayService {
    pub fn new(
        objects: Arc<ObjectCache<Value>>,
        coordinator: Arc<RequestCoordinator<Value>>,
        upstream: Arc<dyn Upstream>,
    ) -> Self {
        Self {
            objects,
            coordinator,
            upstream,
            policy: TtlPolicy::default(),
        }
    }

    /// Replaces the fixture TTL table.
    pub fn with_policy(mut self, policy: TtlPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &TtlPolicy {
        &self.policy
    }

    pub fn objects(&self) -> &Arc<ObjectCache<Value>> {
        &self.objects
    }

    // == Generic Load ==
    /// Returns the cached response for `key`, fetching it on a miss.
    ///
    /// # Arguments
    /// * `key` - Resource to load
    /// * `ttl` - Lifetime of the stored response (object cache default if None)
    pub async fn load(&self, key: &CacheKey, ttl: Option<Duration>) -> FetchResult<Value> {
        let rendered = key.to_string();
        if let Some(value) = self.objects.get(&rendered) {
            debug!(key = %rendered, "Served from object cache");
            return Ok(value);
        }

        let objects = Arc::clone(&self.objects);
        let upstream = Arc::clone(&self.upstream);
        let owned_key = key.clone();
        let store_key = rendered.clone();

        self.coordinator
            .execute(&rendered, move || async move {
                let value = upstream.fetch(&owned_key).await.map_err(FetchError::upstream)?;
                objects.set(store_key, value.clone(), ttl);
                Ok(value)
            })
            .await
    }

    // == Round Fixtures ==
    /// Loads the fixtures of one round, cached for as long as their
    /// statuses allow.
    ///
    /// A response that does not decode as a fixture list is reported as
    /// [`FetchError::Decode`] and not stored.
    pub async fn round_fixtures(
        &self,
        league: u32,
        season: u16,
        round: &str,
        is_current_round: bool,
    ) -> FetchResult<Value> {
        let key = CacheKey::round_fixtures(league, season, round);
        let rendered = key.to_string();
        if let Some(value) = self.objects.get(&rendered) {
            debug!(key = %rendered, "Served from object cache");
            return Ok(value);
        }

        let objects = Arc::clone(&self.objects);
        let upstream = Arc::clone(&self.upstream);
        let policy = self.policy;
        let round = round.to_string();

        self.coordinator
            .execute(&rendered, move || async move {
                let value = upstream.fetch(&key).await.map_err(FetchError::upstream)?;
                let fixtures = fixtures_from_response(&value)?;

                let decision = policy.resolve(&fixtures, league, season, &round, is_current_round);
                info!(
                    key = %decision.key,
                    volatility = ?decision.volatility(),
                    fixtures = fixtures.len(),
                    ttl_secs = decision.ttl.as_secs(),
                    "Caching round fixtures"
                );

                objects.set(decision.key, value.clone(), Some(decision.ttl));
                Ok(value)
            })
            .await
    }
}
