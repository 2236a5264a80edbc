//! Content factory for building the catalog from data files.

use std::path::{Path, PathBuf};

use game_core::{Catalog, GameConfig};

use crate::bundled;
use crate::loaders::{
    BuffLoader, ConfigLoader, EffectLoader, EnemyLoader, LoadResult, MapLoader, SkillLoader,
};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── effects.ron
/// ├── buffs.ron
/// ├── skills.ron
/// ├── enemies.ron
/// └── maps/
///     └── azure_ravine.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load and validate every content table.
    ///
    /// Maps are read from `maps/*.ron` in file-name order; each file's stem
    /// is the map name.
    pub fn load_catalog(&self) -> LoadResult<Catalog> {
        let effects = EffectLoader::load(&self.data_dir.join("effects.ron"))?;
        let templates = BuffLoader::load(&self.data_dir.join("buffs.ron"))?;
        let skills = SkillLoader::load(&self.data_dir.join("skills.ron"))?;
        let enemies = EnemyLoader::load(&self.data_dir.join("enemies.ron"))?;

        let mut builder = Catalog::builder()
            .effects(effects)
            .templates(templates)
            .skills(skills)
            .enemies(enemies);
        for (name, path) in self.map_files()? {
            builder = builder.nodes(MapLoader::load(&path, &name)?);
        }

        builder
            .build()
            .map_err(|e| anyhow::anyhow!("Invalid content in {}: {}", self.data_dir.display(), e))
    }

    fn map_files(&self) -> LoadResult<Vec<(String, PathBuf)>> {
        let maps_dir = self.data_dir.join("maps");
        let entries = std::fs::read_dir(&maps_dir).map_err(|e| {
            anyhow::anyhow!("Failed to read map directory {}: {}", maps_dir.display(), e)
        })?;

        let mut maps = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "ron") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                maps.push((stem.to_owned(), path));
            }
        }
        maps.sort();
        Ok(maps)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Builds the catalog from the content compiled into the binary.
pub fn bundled_catalog() -> LoadResult<Catalog> {
    let mut builder = Catalog::builder()
        .effects(EffectLoader::parse(bundled::EFFECTS)?)
        .templates(BuffLoader::parse(bundled::BUFFS)?)
        .skills(SkillLoader::parse(bundled::SKILLS)?)
        .enemies(EnemyLoader::parse(bundled::ENEMIES)?);
    for (name, source) in bundled::MAPS {
        builder = builder.nodes(MapLoader::parse(source, name)?);
    }
    builder
        .build()
        .map_err(|e| anyhow::anyhow!("Invalid bundled content: {}", e))
}

pub fn bundled_config() -> LoadResult<GameConfig> {
    ConfigLoader::parse(bundled::CONFIG)
}
