//! Runtime orchestration for the cultivation game core.
//!
//! This crate wraps the pure rules in `game-core` with everything that needs
//! I/O or shared state: persisted runs and battles, daily quota counters, the
//! character oracle and the event bus. Consumers embed [`GameService`] and
//! subscribe to events through [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`service`] hosts the service and its builder
//! - [`quota`] implements the daily quota limiters over a counter store
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`oracle`] and [`repository`] provide data adapters reused by other crates
//! - [`config`] reads runtime settings from the environment
pub mod config;
pub mod error;
pub mod events;
pub mod oracle;
pub mod quota;
pub mod repository;
pub mod service;

pub use config::{QuotaConfig, RuntimeConfig};
pub use error::{Result, RuntimeError};
pub use events::{EventBus, GameEvent, RunEnding, Topic};
pub use oracle::{CharacterOracle, InMemoryCharacterOracle};
pub use quota::{
    Admission, Clock, CounterStore, InMemoryCounterStore, ManualClock, QuotaCharge, QuotaError,
    QuotaKind, QuotaLimiter, QuotaLimiters, QuotaResult, QuotaStatus, SystemClock,
};
pub use repository::{
    BattleRepository, FileBattleRepository, InMemoryBattleRepository, InMemoryRunRepository,
    RepositoryError, RunRepository,
};
pub use service::{ActionOutcome, GameService, GameServiceBuilder};
