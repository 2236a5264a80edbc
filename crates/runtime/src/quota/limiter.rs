//! Daily-capped limiters over the counter store.

use std::sync::Arc;

use chrono::{Duration, FixedOffset};
use game_core::CharacterId;
use serde::{Deserialize, Serialize};

use super::QuotaKind;
use super::clock::{Clock, DayKey};
use super::error::QuotaError;
use super::store::CounterStore;

/// Answer to a consumption attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaResult {
    pub accepted: bool,
    pub remaining: u64,
    /// Lifespan only: today's cap is reached and dungeon entry is barred.
    pub retreat_locked: bool,
}

/// Read-only view of a counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaStatus {
    pub consumed: u64,
    pub remaining: u64,
    pub retreat_locked: bool,
}

/// Quota granted to one caller, kept so it can be given back if the action
/// it paid for is never committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaCharge {
    pub kind: QuotaKind,
    pub character: CharacterId,
    key: String,
    pub amount: u64,
}

/// One daily cap for one [`QuotaKind`].
#[derive(Clone)]
pub struct QuotaLimiter {
    kind: QuotaKind,
    cap: u64,
    offset: FixedOffset,
    ttl: Duration,
    store: Arc<dyn CounterStore>,
    clock: Arc<dyn Clock>,
}

impl QuotaLimiter {
    pub fn new(
        kind: QuotaKind,
        cap: u64,
        offset: FixedOffset,
        ttl: Duration,
        store: Arc<dyn CounterStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            kind,
            cap,
            offset,
            ttl,
            store,
            clock,
        }
    }

    pub fn kind(&self) -> QuotaKind {
        self.kind
    }

    pub fn cap(&self) -> u64 {
        self.cap
    }

    /// Counter key for the character today: `quota:{kind}:{character}:{yyyy-mm-dd}`.
    pub fn key(&self, character: CharacterId) -> String {
        let day = DayKey::at(self.clock.now(), self.offset);
        format!("quota:{}:{}:{}", self.kind, character.0, day)
    }

    pub async fn consume(
        &self,
        character: CharacterId,
        amount: i64,
    ) -> Result<QuotaResult, QuotaError> {
        self.charge(character, amount).await.map(|(result, _)| result)
    }

    /// Like [`consume`](Self::consume), also returning the charge on success.
    pub async fn charge(
        &self,
        character: CharacterId,
        amount: i64,
    ) -> Result<(QuotaResult, Option<QuotaCharge>), QuotaError> {
        let amount = u64::try_from(amount)
            .ok()
            .filter(|amount| *amount > 0)
            .ok_or(QuotaError::InvalidAmount {
                kind: self.kind,
                amount,
            })?;

        let key = self.key(character);
        let update = self.store.increment_and_compare(&key, amount, self.cap, self.ttl).await?;
        let result = QuotaResult {
            accepted: update.accepted,
            remaining: self.cap.saturating_sub(update.value),
            retreat_locked: self.locks_at(update.value),
        };

        if update.accepted {
            tracing::debug!(
                kind = %self.kind,
                %character,
                amount,
                remaining = result.remaining,
                "quota consumed"
            );
            let charge = QuotaCharge {
                kind: self.kind,
                character,
                key,
                amount,
            };
            Ok((result, Some(charge)))
        } else {
            tracing::warn!(
                kind = %self.kind,
                %character,
                amount,
                remaining = result.remaining,
                "quota rejected"
            );
            Ok((result, None))
        }
    }

    pub async fn peek(&self, character: CharacterId) -> Result<QuotaStatus, QuotaError> {
        let consumed = self.store.get(&self.key(character)).await?;
        Ok(QuotaStatus {
            consumed,
            remaining: self.cap.saturating_sub(consumed),
            retreat_locked: self.locks_at(consumed),
        })
    }

    /// Gives a charge back. The charge's own day key is used, so a refund
    /// issued after midnight still lands on the day it was taken from.
    pub async fn refund(&self, charge: &QuotaCharge) -> Result<(), QuotaError> {
        let value = self.store.release(&charge.key, charge.amount).await?;
        tracing::warn!(
            kind = %charge.kind,
            character = %charge.character,
            amount = charge.amount,
            value,
            "quota refunded"
        );
        Ok(())
    }

    fn locks_at(&self, consumed: u64) -> bool {
        self.kind == QuotaKind::Lifespan && consumed >= self.cap
    }
}
