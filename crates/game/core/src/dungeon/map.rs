//! Static dungeon layout: nodes, their kinds and outgoing choices.

use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::state::{ChoiceId, EnemyId, NodeId};

/// An outgoing edge from a map node.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeChoice {
    pub id: ChoiceId,
    pub label: String,
    pub next: NodeId,
    /// Lifespan spent when taking this choice.
    #[cfg_attr(feature = "serde", serde(default))]
    pub lifespan_cost: u32,
}

impl NodeChoice {
    pub fn new(id: impl Into<ChoiceId>, label: impl Into<String>, next: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            next: next.into(),
            lifespan_cost: 0,
        }
    }

    pub fn costing(mut self, lifespan: u32) -> Self {
        self.lifespan_cost = lifespan;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    /// Plain node; the run continues through its choices.
    Passage,
    /// Entering starts a battle; winning moves the run to `victory`.
    Battle { enemy: EnemyId, victory: NodeId },
    /// Entering completes the run.
    Terminal,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapNode {
    pub id: NodeId,
    /// Name of the map (secret realm) this node belongs to.
    pub map: String,
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    /// Whether a run may start here.
    #[cfg_attr(feature = "serde", serde(default))]
    pub entry: bool,
    pub kind: NodeKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub choices: ArrayVec<NodeChoice, { GameConfig::MAX_NODE_CHOICES }>,
}

impl MapNode {
    pub fn new(
        id: impl Into<NodeId>,
        map: impl Into<String>,
        title: impl Into<String>,
        kind: NodeKind,
    ) -> Self {
        Self {
            id: id.into(),
            map: map.into(),
            title: title.into(),
            description: String::new(),
            entry: false,
            kind,
            choices: ArrayVec::new(),
        }
    }

    pub fn as_entry(mut self) -> Self {
        self.entry = true;
        self
    }

    /// Builder: append a choice. Choices beyond the node capacity are dropped.
    pub fn with_choice(mut self, choice: NodeChoice) -> Self {
        let _ = self.choices.try_push(choice);
        self
    }

    pub fn choice(&self, id: &ChoiceId) -> Option<&NodeChoice> {
        self.choices.iter().find(|choice| &choice.id == id)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, NodeKind::Terminal)
    }
}

/// Every node of every map, keyed by id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DungeonAtlas {
    nodes: BTreeMap<NodeId, MapNode>,
}

impl DungeonAtlas {
    pub fn node(&self, id: &NodeId) -> Option<&MapNode> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &MapNode> {
        self.nodes.values()
    }

    /// Nodes a run may start from, ordered by id.
    pub fn entries(&self) -> impl Iterator<Item = &MapNode> {
        self.nodes.values().filter(|node| node.entry)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Inserts a node, returning the previous node with the same id.
    pub(crate) fn insert(&mut self, node: MapNode) -> Option<MapNode> {
        self.nodes.insert(node.id.clone(), node)
    }
}
