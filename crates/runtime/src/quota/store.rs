//! Atomic counter store behind the quota limiters.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use super::clock::{Clock, SystemClock};
use super::error::QuotaError;

/// Result of one increment-and-compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterUpdate {
    pub accepted: bool,
    /// Counter value after the call (unchanged when rejected).
    pub value: u64,
}

/// Key-value counters with per-key expiry.
///
/// `increment_and_compare` is the only way quota is granted and must be a
/// single atomic step: two concurrent calls can never both observe room
/// below the cap.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Adds `amount` if the result stays within `cap`, refreshing the key's
    /// expiry to `ttl` from now.
    async fn increment_and_compare(
        &self,
        key: &str,
        amount: u64,
        cap: u64,
        ttl: Duration,
    ) -> Result<CounterUpdate, QuotaError>;

    /// Current value, 0 for missing or expired keys.
    async fn get(&self, key: &str) -> Result<u64, QuotaError>;

    /// Gives back previously granted quota, saturating at zero.
    async fn release(&self, key: &str, amount: u64) -> Result<u64, QuotaError>;
}

#[derive(Debug, Clone, Copy)]
struct Counter {
    value: u64,
    expires_at: DateTime<Utc>,
}

/// Process-local [`CounterStore`] for tests and single-node deployments.
pub struct InMemoryCounterStore {
    counters: Mutex<HashMap<String, Counter>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryCounterStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            counters: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Number of keys currently held, expired ones included until touched.
    pub fn len(&self) -> usize {
        self.counters.lock().map(|counters| counters.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every expired key.
    pub fn purge_expired(&self) -> Result<usize, QuotaError> {
        let now = self.clock.now();
        let mut counters = self.counters.lock().map_err(|_| QuotaError::LockPoisoned)?;
        let before = counters.len();
        counters.retain(|_, counter| counter.expires_at > now);
        Ok(before - counters.len())
    }

    fn live_value(counters: &mut HashMap<String, Counter>, key: &str, now: DateTime<Utc>) -> u64 {
        match counters.get(key) {
            Some(counter) if counter.expires_at > now => counter.value,
            Some(_) => {
                counters.remove(key);
                0
            }
            None => 0,
        }
    }
}

impl Default for InMemoryCounterStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn increment_and_compare(
        &self,
        key: &str,
        amount: u64,
        cap: u64,
        ttl: Duration,
    ) -> Result<CounterUpdate, QuotaError> {
        let now = self.clock.now();
        let mut counters = self.counters.lock().map_err(|_| QuotaError::LockPoisoned)?;

        let current = Self::live_value(&mut counters, key, now);
        let Some(next) = current.checked_add(amount).filter(|next| *next <= cap) else {
            return Ok(CounterUpdate {
                accepted: false,
                value: current,
            });
        };

        counters.insert(
            key.to_owned(),
            Counter {
                value: next,
                expires_at: now + ttl,
            },
        );
        Ok(CounterUpdate {
            accepted: true,
            value: next,
        })
    }

    async fn get(&self, key: &str) -> Result<u64, QuotaError> {
        let now = self.clock.now();
        let mut counters = self.counters.lock().map_err(|_| QuotaError::LockPoisoned)?;
        Ok(Self::live_value(&mut counters, key, now))
    }

    async fn release(&self, key: &str, amount: u64) -> Result<u64, QuotaError> {
        let now = self.clock.now();
        let mut counters = self.counters.lock().map_err(|_| QuotaError::LockPoisoned)?;
        Self::live_value(&mut counters, key, now);

        match counters.get_mut(key) {
            Some(counter) => {
                counter.value = counter.value.saturating_sub(amount);
                Ok(counter.value)
            }
            None => Ok(0),
        }
    }
}
