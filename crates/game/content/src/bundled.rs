//! Content shipped inside the binary.
//!
//! The same files live under `data/` so they can be edited and loaded from
//! disk with [`ContentFactory`](crate::loaders::ContentFactory).

pub const CONFIG: &str = include_str!("../data/config.toml");
pub const EFFECTS: &str = include_str!("../data/effects.ron");
pub const BUFFS: &str = include_str!("../data/buffs.ron");
pub const SKILLS: &str = include_str!("../data/skills.ron");
pub const ENEMIES: &str = include_str!("../data/enemies.ron");

/// `(map name, RON source)` for every bundled secret realm.
pub const MAPS: &[(&str, &str)] =
    &[("azure_ravine", include_str!("../data/maps/azure_ravine.ron"))];

/// Entry node of the bundled starter realm.
pub const STARTER_ENTRY: &str = "ravine_gate";
