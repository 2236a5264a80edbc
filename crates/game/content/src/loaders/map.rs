//! Map data loader.
//!
//! A map file lists the nodes of one secret realm. Nodes from every map
//! share a single atlas, so choices may cross into another map's nodes.

use std::path::Path;

use game_core::MapNode;

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Loader for map data from RON files.
pub struct MapLoader;

impl MapLoader {
    /// Load map nodes from a RON file.
    ///
    /// RON format: `Vec<MapNode>`. Every node must name `map_name` as its
    /// map.
    pub fn load(path: &Path, map_name: &str) -> LoadResult<Vec<MapNode>> {
        let content = read_file(path)?;
        Self::parse(&content, map_name)
    }

    pub fn parse(source: &str, map_name: &str) -> LoadResult<Vec<MapNode>> {
        let nodes: Vec<MapNode> = parse_ron(source, "map")?;

        if let Some(stray) = nodes.iter().find(|node| node.map != map_name) {
            anyhow::bail!(
                "Node '{}' in map '{}' claims to belong to map '{}'",
                stray.id,
                map_name,
                stray.map
            );
        }
        Ok(nodes)
    }
}
