//! Read-only projections of a run, as returned to the surrounding application.

use crate::state::{BattleRef, CharacterId, ChoiceId, EnemyId, NodeId, ResourcePool};

use super::map::NodeChoice;
use super::run::DungeonPhase;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChoiceView {
    pub id: ChoiceId,
    pub label: String,
    pub lifespan_cost: u32,
}

impl From<&NodeChoice> for ChoiceView {
    fn from(choice: &NodeChoice) -> Self {
        Self {
            id: choice.id.clone(),
            label: choice.label.clone(),
            lifespan_cost: choice.lifespan_cost,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleView {
    pub battle: BattleRef,
    pub round: u32,
    pub enemy: EnemyId,
    pub enemy_name: String,
    pub player_hp: ResourcePool,
    pub player_mp: ResourcePool,
    pub enemy_hp: ResourcePool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DungeonRunView {
    pub character: CharacterId,
    pub phase: DungeonPhase,
    pub title: Option<String>,
    pub history: Vec<NodeId>,
    /// Choices accepted by the next action: node choices, or skills in battle.
    pub choices: Vec<ChoiceView>,
    pub battle: Option<BattleView>,
}

impl DungeonRunView {
    pub fn not_started(character: CharacterId) -> Self {
        Self {
            character,
            phase: DungeonPhase::NotStarted,
            title: None,
            history: Vec::new(),
            choices: Vec::new(),
            battle: None,
        }
    }
}
