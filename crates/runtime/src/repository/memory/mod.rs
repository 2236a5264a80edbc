//! In-memory repository implementations for tests and local runs.

mod battle;
mod run;

pub use battle::InMemoryBattleRepository;
pub use run::InMemoryRunRepository;
