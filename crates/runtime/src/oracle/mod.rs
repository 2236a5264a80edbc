//! Read-only adapters over data owned by the surrounding application.
//!
//! Oracles expose data the runtime consumes but never writes. Mutable state
//! lives in [`repositories`](crate::repository).
mod character;

pub use character::{CharacterOracle, InMemoryCharacterOracle};
