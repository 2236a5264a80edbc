//! Character snapshots supplied by the surrounding application.

use std::collections::HashMap;
use std::sync::RwLock;

use game_core::{CharacterId, CharacterSnapshot};

use crate::repository::RepositoryError;

/// Read-only source of the acting character's attributes and skills.
///
/// Queried once per action; the rules never cache a snapshot between
/// actions, so realm or equipment changes apply from the next action on.
pub trait CharacterOracle: Send + Sync {
    fn character(&self, id: CharacterId) -> Result<Option<CharacterSnapshot>, RepositoryError>;
}

/// In-memory [`CharacterOracle`] for tests, demos and local runs.
#[derive(Default)]
pub struct InMemoryCharacterOracle {
    characters: RwLock<HashMap<CharacterId, CharacterSnapshot>>,
}

impl InMemoryCharacterOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_character(self, snapshot: CharacterSnapshot) -> Self {
        if let Ok(mut characters) = self.characters.write() {
            characters.insert(snapshot.id, snapshot);
        }
        self
    }

    /// Inserts or replaces a snapshot.
    pub fn upsert(&self, snapshot: CharacterSnapshot) -> Result<(), RepositoryError> {
        let mut characters = self.characters.write().map_err(|_| RepositoryError::LockPoisoned)?;
        characters.insert(snapshot.id, snapshot);
        Ok(())
    }
}

impl CharacterOracle for InMemoryCharacterOracle {
    fn character(&self, id: CharacterId) -> Result<Option<CharacterSnapshot>, RepositoryError> {
        let characters = self.characters.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(characters.get(&id).cloned())
    }
}
