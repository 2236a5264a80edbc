use crate::buff::TriggerRecord;
use crate::combat::CombatOutcome;
use crate::state::{BattleRef, CharacterId, CombatantId, CombatantState, EnemyId, NodeId};

/// Combatant id of the enemy side in a dungeon battle.
pub const ENEMY: CombatantId = CombatantId(1);

/// In-progress battle state, persisted between exchanges.
///
/// Index 0 of `combatants` is the cultivator, index 1 the enemy.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSession {
    pub battle: BattleRef,
    pub character: CharacterId,
    pub node: NodeId,
    pub enemy: EnemyId,
    pub combatants: Vec<CombatantState>,
    /// Completed exchanges.
    pub round: u32,
}

impl BattleSession {
    pub fn player(&self) -> Option<&CombatantState> {
        self.combatant(CombatantId::PLAYER)
    }

    pub fn opponent(&self) -> Option<&CombatantState> {
        self.combatant(ENEMY)
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&CombatantState> {
        self.combatants.iter().find(|combatant| combatant.id == id)
    }
}

/// One exchange of a dungeon battle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Exchange {
    pub round: u32,
    pub player: CombatOutcome,
    /// `None` when the enemy fell to the player's action or could not act.
    pub enemy: Option<CombatOutcome>,
    /// Periodic buff effects fired at the end of the exchange.
    pub ticks: Vec<TriggerRecord>,
    pub player_hp: u32,
    pub enemy_hp: u32,
}
