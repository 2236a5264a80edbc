//! Skill loader.

use std::path::Path;

use game_core::SkillDefinition;

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Loader for skill definitions from RON files.
///
/// RON format: `Vec<SkillDefinition>`
pub struct SkillLoader;

impl SkillLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<SkillDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(source: &str) -> LoadResult<Vec<SkillDefinition>> {
        parse_ron(source, "skill")
    }
}
