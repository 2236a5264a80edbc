//! Quota Limiters: daily caps on lifespan spend, dungeon attempts and
//! ranking challenges.
//!
//! Counters live in a [`CounterStore`] keyed by kind, character and day, so
//! the daily reset is nothing more than a new key. Granting quota is one
//! atomic increment-and-compare; there is no read-then-write path.

mod clock;
mod error;
mod limiter;
mod store;

use std::sync::Arc;

use chrono::{Duration, FixedOffset};
use game_core::CharacterId;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

pub use clock::{Clock, DayKey, ManualClock, SystemClock};
pub use error::QuotaError;
pub use limiter::{QuotaCharge, QuotaLimiter, QuotaResult, QuotaStatus};
pub use store::{CounterStore, CounterUpdate, InMemoryCounterStore};

use crate::config::QuotaConfig;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QuotaKind {
    Lifespan,
    DungeonAttempts,
    RankingChallenges,
}

/// Outcome of the two-cap dungeon entry check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Admitted { charge: QuotaCharge, remaining: u64 },
    /// Today's lifespan is spent; the attempt counter was not touched.
    RetreatLocked,
    Exhausted { remaining: u64 },
}

/// The three limiters sharing one store and clock.
#[derive(Clone)]
pub struct QuotaLimiters {
    lifespan: QuotaLimiter,
    dungeon_attempts: QuotaLimiter,
    ranking_challenges: QuotaLimiter,
}

impl QuotaLimiters {
    pub fn new(
        config: &QuotaConfig,
        store: Arc<dyn CounterStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, QuotaError> {
        let offset = FixedOffset::east_opt(config.utc_offset_hours * 3600).ok_or_else(|| {
            QuotaError::Store(format!("utc offset {}h is out of range", config.utc_offset_hours))
        })?;
        let ttl = Duration::hours(i64::from(config.key_ttl_hours));
        let limiter =
            |kind, cap| QuotaLimiter::new(kind, cap, offset, ttl, store.clone(), clock.clone());

        Ok(Self {
            lifespan: limiter(QuotaKind::Lifespan, config.lifespan_daily),
            dungeon_attempts: limiter(QuotaKind::DungeonAttempts, config.dungeon_attempts_daily),
            ranking_challenges: limiter(
                QuotaKind::RankingChallenges,
                config.ranking_challenges_daily,
            ),
        })
    }

    pub fn get(&self, kind: QuotaKind) -> &QuotaLimiter {
        match kind {
            QuotaKind::Lifespan => &self.lifespan,
            QuotaKind::DungeonAttempts => &self.dungeon_attempts,
            QuotaKind::RankingChallenges => &self.ranking_challenges,
        }
    }

    /// Both caps must pass: lifespan must not be retreat-locked, and one
    /// dungeon attempt must be available (and is consumed).
    pub async fn admit_dungeon(&self, character: CharacterId) -> Result<Admission, QuotaError> {
        if self.lifespan.peek(character).await?.retreat_locked {
            tracing::warn!(%character, "dungeon entry refused: retreat locked");
            return Ok(Admission::RetreatLocked);
        }
        match self.dungeon_attempts.charge(character, 1).await? {
            (result, Some(charge)) => Ok(Admission::Admitted {
                charge,
                remaining: result.remaining,
            }),
            (result, None) => Ok(Admission::Exhausted {
                remaining: result.remaining,
            }),
        }
    }

    pub async fn refund(&self, charge: &QuotaCharge) -> Result<(), QuotaError> {
        self.get(charge.kind).refund(charge).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn limiters(config: QuotaConfig) -> QuotaLimiters {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2026, 7, 1, 4, 0, 0).unwrap()));
        let store = Arc::new(InMemoryCounterStore::new(clock.clone()));
        QuotaLimiters::new(&config, store, clock).unwrap()
    }

    #[tokio::test]
    async fn retreat_lock_bars_entry_despite_attempts_left() {
        let limiters = limiters(QuotaConfig::default());
        let character = CharacterId(3);

        limiters.get(QuotaKind::Lifespan).consume(character, 200).await.unwrap();

        assert_eq!(limiters.admit_dungeon(character).await.unwrap(), Admission::RetreatLocked);
        let attempts = limiters.get(QuotaKind::DungeonAttempts).peek(character).await.unwrap();
        assert_eq!(attempts.consumed, 0);
    }

    #[tokio::test]
    async fn attempts_run_out() {
        let limiters = limiters(QuotaConfig {
            dungeon_attempts_daily: 1,
            ..QuotaConfig::default()
        });
        let character = CharacterId(4);

        assert!(matches!(
            limiters.admit_dungeon(character).await.unwrap(),
            Admission::Admitted { remaining: 0, .. }
        ));
        assert_eq!(
            limiters.admit_dungeon(character).await.unwrap(),
            Admission::Exhausted { remaining: 0 }
        );
    }

    #[test]
    fn kind_names() {
        assert_eq!(QuotaKind::RankingChallenges.to_string(), "ranking_challenges");
        assert_eq!("lifespan".parse::<QuotaKind>().unwrap(), QuotaKind::Lifespan);
    }
}
