//! File-based BattleRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use game_core::{BattleRef, BattleSession};

use crate::repository::{BattleRepository, RepositoryError, Result};

/// File-based implementation of [`BattleRepository`].
///
/// # File Format
///
/// Sessions are stored as `battle_{ref}.bin` in bincode format, written to
/// a temp file first and renamed into place so a reader never observes a
/// partial session.
pub struct FileBattleRepository {
    base_dir: PathBuf,
}

impl FileBattleRepository {
    /// Create a new file-based battle repository.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn session_path(&self, battle: BattleRef) -> PathBuf {
        self.base_dir.join(format!("battle_{}.bin", battle.0))
    }
}

impl BattleRepository for FileBattleRepository {
    fn load(&self, battle: BattleRef) -> Result<Option<BattleSession>> {
        let path = self.session_path(battle);

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let session: BattleSession = bincode::deserialize(&bytes)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        if session.battle != battle {
            return Err(RepositoryError::CorruptedData(format!(
                "{} holds battle {}",
                path.display(),
                session.battle.0
            )));
        }
        Ok(Some(session))
    }

    fn save(&self, session: &BattleSession) -> Result<()> {
        let path = self.session_path(session.battle);
        let temp_path = path.with_extension("bin.tmp");

        let bytes = bincode::serialize(session)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(battle = session.battle.0, round = session.round, "saved battle session");
        Ok(())
    }

    fn delete(&self, battle: BattleRef) -> Result<()> {
        let path = self.session_path(battle);

        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!(battle = battle.0, "deleted battle session");
        }
        Ok(())
    }

    fn list(&self) -> Result<Vec<BattleRef>> {
        let mut battles = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            let parsed = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.strip_prefix("battle_"))
                .and_then(|name| name.strip_suffix(".bin"))
                .and_then(|id| id.parse::<u64>().ok());
            if let Some(id) = parsed {
                battles.push(BattleRef(id));
            }
        }

        battles.sort_unstable();
        Ok(battles)
    }
}
