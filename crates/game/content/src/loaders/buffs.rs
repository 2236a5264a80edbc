//! Buff template loader.

use std::path::Path;

use game_core::BuffTemplate;

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Loader for buff templates from RON files.
///
/// RON format: `Vec<BuffTemplate>`. File order is the template
/// registration order used for trigger sequencing.
pub struct BuffLoader;

impl BuffLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<BuffTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(source: &str) -> LoadResult<Vec<BuffTemplate>> {
        parse_ron(source, "buff template")
    }
}

#[cfg(test)]
mod tests {
    use game_core::{BuffDuration, BuffTags, StackPolicy};

    use super::*;

    #[test]
    fn tags_parse_from_flag_names() {
        let templates = BuffLoader::parse(
            r#"[(
                id: "venom",
                name: "Venom",
                effects: ["venom_tick"],
                stack_policy: StackUpToN,
                max_stack: 5,
                duration: Turns(3),
                tags: "DEBUFF | DOT",
            )]"#,
        )
        .unwrap();

        let venom = &templates[0];
        assert_eq!(venom.stack_policy, StackPolicy::StackUpToN);
        assert_eq!(venom.max_stack, 5);
        assert_eq!(venom.duration, BuffDuration::Turns(3));
        assert_eq!(venom.tags, BuffTags::DEBUFF | BuffTags::DOT);
    }

    #[test]
    fn max_stack_defaults_to_one() {
        let templates = BuffLoader::parse(
            r#"[(
                id: "ward",
                name: "Ward",
                effects: ["ward"],
                stack_policy: RefreshDuration,
                duration: Infinite,
            )]"#,
        )
        .unwrap();

        assert_eq!(templates[0].max_stack, 1);
        assert!(templates[0].tags.is_empty());
    }
}
