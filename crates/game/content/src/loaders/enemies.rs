//! Enemy template loader.

use std::path::Path;

use game_core::EnemyTemplate;

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Loader for enemy templates from RON files.
///
/// RON format: `Vec<EnemyTemplate>`. Attributes are a sparse map, e.g.
/// `attributes: { Vitality: 6.0, Speed: 10.0 }`.
pub struct EnemyLoader;

impl EnemyLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<EnemyTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(source: &str) -> LoadResult<Vec<EnemyTemplate>> {
        parse_ron(source, "enemy")
    }
}

#[cfg(test)]
mod tests {
    use game_core::{Realm, StatKind};

    use super::*;

    #[test]
    fn sparse_attributes_default_to_zero() {
        let enemies = EnemyLoader::parse(
            r#"[(
                id: "wolf",
                name: "Grey Wolf",
                attributes: { Speed: 9.0 },
                skills: ["bite"],
            )]"#,
        )
        .unwrap();

        let wolf = &enemies[0];
        assert_eq!(wolf.realm, Realm::QiRefining);
        assert_eq!(wolf.attributes.get(StatKind::Speed), 9.0);
        assert_eq!(wolf.attributes.get(StatKind::Vitality), 0.0);
        assert_eq!(wolf.rank, 0);
    }
}
