//! Content loaders for reading game data from files.
//!
//! Every loader exposes `load(path)` for files on disk and `parse(source)`
//! for text already in memory (bundled content, tests).

pub mod buffs;
pub mod config;
pub mod effects;
pub mod enemies;
pub mod factory;
pub mod map;
pub mod skills;

pub use buffs::BuffLoader;
pub use config::ConfigLoader;
pub use effects::EffectLoader;
pub use enemies::EnemyLoader;
pub use factory::{ContentFactory, bundled_catalog, bundled_config};
pub use map::MapLoader;
pub use skills::SkillLoader;

use std::path::Path;

use serde::de::DeserializeOwned;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

pub(crate) fn parse_ron<T: DeserializeOwned>(source: &str, what: &str) -> LoadResult<T> {
    ron::from_str(source).map_err(|e| anyhow::anyhow!("Failed to parse {} RON: {}", what, e))
}
