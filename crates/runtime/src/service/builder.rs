//! Builder for [`GameService`].

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use game_core::Catalog;
use tokio::sync::Mutex;

use super::{GameService, Inner};
use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::events::EventBus;
use crate::oracle::CharacterOracle;
use crate::quota::{Clock, CounterStore, InMemoryCounterStore, QuotaLimiters, SystemClock};
use crate::repository::{
    BattleRepository, InMemoryBattleRepository, InMemoryRunRepository, RunRepository,
};

/// Builder for [`GameService`] with flexible configuration.
///
/// Catalog and character oracle are required; everything else defaults to
/// the in-memory implementations and the system clock.
#[derive(Default)]
pub struct GameServiceBuilder {
    config: RuntimeConfig,
    catalog: Option<Arc<Catalog>>,
    characters: Option<Arc<dyn CharacterOracle>>,
    runs: Option<Arc<dyn RunRepository>>,
    battles: Option<Arc<dyn BattleRepository>>,
    counters: Option<Arc<dyn CounterStore>>,
    clock: Option<Arc<dyn Clock>>,
    events: Option<EventBus>,
}

impl GameServiceBuilder {
    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn catalog(mut self, catalog: impl Into<Arc<Catalog>>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    pub fn characters(mut self, characters: Arc<dyn CharacterOracle>) -> Self {
        self.characters = Some(characters);
        self
    }

    pub fn run_repository(mut self, runs: Arc<dyn RunRepository>) -> Self {
        self.runs = Some(runs);
        self
    }

    pub fn battle_repository(mut self, battles: Arc<dyn BattleRepository>) -> Self {
        self.battles = Some(battles);
        self
    }

    pub fn counter_store(mut self, counters: Arc<dyn CounterStore>) -> Self {
        self.counters = Some(counters);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Share an existing bus, e.g. one a reward worker already subscribed to.
    pub fn event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn build(self) -> Result<GameService> {
        let catalog = self.catalog.ok_or(RuntimeError::MissingComponent("catalog"))?;
        let characters = self.characters.ok_or(RuntimeError::MissingComponent("character oracle"))?;

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let counters = self
            .counters
            .unwrap_or_else(|| Arc::new(InMemoryCounterStore::new(clock.clone())));
        let quotas = QuotaLimiters::new(&self.config.quota, counters, clock)?;

        let runs = self.runs.unwrap_or_else(|| Arc::new(InMemoryRunRepository::new()));
        let battles = self.battles.unwrap_or_else(|| Arc::new(InMemoryBattleRepository::new()));
        // Continue numbering after any session that survived a restart.
        let next_battle = battles.list()?.last().map_or(1, |last| last.0 + 1);

        let events = self
            .events
            .unwrap_or_else(|| EventBus::with_capacity(self.config.event_buffer_size));

        tracing::info!(
            effects = catalog.effect_count(),
            skills = catalog.skill_count(),
            nodes = catalog.atlas().len(),
            next_battle,
            "game service ready"
        );

        Ok(GameService {
            inner: Arc::new(Inner {
                catalog,
                config: self.config,
                characters,
                runs,
                battles,
                quotas,
                events,
                locks: Mutex::new(HashMap::new()),
                next_battle: AtomicU64::new(next_battle),
            }),
        })
    }
}
