//! Data-driven content definitions and loaders.
//!
//! This crate houses the static world content and the loaders that turn its
//! RON/TOML files into a validated [`game_core::Catalog`]:
//! - Effect rows (data-driven via RON, kinds checked on load)
//! - Buff templates (data-driven via RON)
//! - Skills and enemy templates (data-driven via RON)
//! - Secret realm maps (one RON file per map)
//! - Rule parameters (data-driven via TOML)
//!
//! Content is loaded once at startup and never mutated while serving.

pub mod bundled;

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    BuffLoader, ConfigLoader, ContentFactory, EffectLoader, EnemyLoader, LoadResult, MapLoader,
    SkillLoader, bundled_catalog, bundled_config,
};
