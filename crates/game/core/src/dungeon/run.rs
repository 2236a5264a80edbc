use crate::state::{BattleRef, CharacterId, NodeId};

/// Where a character stands in a dungeon.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DungeonPhase {
    NotStarted,
    InProgress { node: NodeId },
    InBattle { node: NodeId, battle: BattleRef },
    Completed { node: NodeId },
    /// Left the dungeon; `defeated` separates a lost battle from a voluntary exit.
    Quit { defeated: bool },
}

impl DungeonPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Quit { .. })
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::InProgress { .. } | Self::InBattle { .. })
    }

    pub fn node(&self) -> Option<&NodeId> {
        match self {
            Self::InProgress { node } | Self::InBattle { node, .. } | Self::Completed { node } => {
                Some(node)
            }
            Self::NotStarted | Self::Quit { .. } => None,
        }
    }

    pub fn battle(&self) -> Option<BattleRef> {
        match self {
            Self::InBattle { battle, .. } => Some(*battle),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress { .. } => "in_progress",
            Self::InBattle { .. } => "in_battle",
            Self::Completed { .. } => "completed",
            Self::Quit { defeated: false } => "quit",
            Self::Quit { defeated: true } => "defeated",
        }
    }
}

/// A character's single live dungeon run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DungeonRun {
    pub character: CharacterId,
    pub phase: DungeonPhase,
    /// Nodes entered so far, starting with the entry node.
    pub history: Vec<NodeId>,
    /// Lifespan spent on choices during this run.
    pub lifespan_spent: u32,
    pub battles_won: u32,
}

impl DungeonRun {
    pub(crate) fn new(character: CharacterId, entry: NodeId) -> Self {
        Self {
            character,
            phase: DungeonPhase::InProgress { node: entry.clone() },
            history: vec![entry],
            lifespan_spent: 0,
            battles_won: 0,
        }
    }
}
