//! Repository layer for dynamic runtime data.
//!
//! Repositories handle data that CHANGES during play:
//! - Live dungeon runs, one per character
//! - Battle sessions, durable between exchanges
//!
//! Static content (effects, templates, maps) lives in the catalog, not here.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileBattleRepository;
pub use memory::{InMemoryBattleRepository, InMemoryRunRepository};
pub use traits::{BattleRepository, RunRepository};
