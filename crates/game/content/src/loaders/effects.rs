//! Effect table loader.

use std::path::Path;

use game_core::{EffectDefinition, EffectRecord};

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Loader for effect rows from RON files.
///
/// RON format: `Vec<EffectRecord>`. Each row is converted to an
/// [`EffectDefinition`]; an unknown `kind` fails the whole file.
pub struct EffectLoader;

impl EffectLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<EffectDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(source: &str) -> LoadResult<Vec<EffectDefinition>> {
        let records: Vec<EffectRecord> = parse_ron(source, "effect table")?;
        records
            .into_iter()
            .map(|record| {
                let id = record.id.clone();
                EffectDefinition::try_from(record)
                    .map_err(|e| anyhow::anyhow!("Invalid effect row '{}': {}", id, e))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use game_core::{EffectKind, Formula, TriggerCondition};

    use super::*;

    #[test]
    fn parses_triggered_rows() {
        let effects = EffectLoader::parse(
            r#"[
                (id: "burn", kind: "damage", formula: Flat(value: 5.0), trigger: Some(OnTick)),
            ]"#,
        )
        .unwrap();

        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].kind, EffectKind::Damage);
        assert_eq!(effects[0].formula, Formula::flat(5.0));
        assert_eq!(effects[0].trigger, Some(TriggerCondition::OnTick));
    }

    #[test]
    fn unknown_kind_names_the_row() {
        let source = r#"[(id: "warp", kind: "teleport", formula: Flat(value: 1.0))]"#;
        let error = EffectLoader::parse(source).unwrap_err().to_string();

        assert!(error.contains("warp"), "{error}");
        assert!(error.contains("teleport"), "{error}");
    }
}
