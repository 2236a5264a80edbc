//! Events published by the game service after an action commits.

use game_core::{BattleRef, CharacterId, EnemyId, Exchange, NodeId};
use serde::{Deserialize, Serialize};

use crate::quota::QuotaKind;

/// How a run ended, for downstream reward logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunEnding {
    Completed,
    /// Left voluntarily.
    Quit,
    /// Lost a battle or ran out of rounds.
    Defeated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    DungeonStarted {
        character: CharacterId,
        node: NodeId,
    },
    NodeEntered {
        character: CharacterId,
        node: NodeId,
    },
    BattleStarted {
        character: CharacterId,
        battle: BattleRef,
        enemy: EnemyId,
    },
    BattleExchange {
        character: CharacterId,
        battle: BattleRef,
        exchange: Box<Exchange>,
    },
    RunEnded {
        character: CharacterId,
        node: Option<NodeId>,
        outcome: RunEnding,
    },
    QuotaConsumed {
        character: CharacterId,
        kind: QuotaKind,
        amount: u64,
        remaining: u64,
    },
    QuotaRejected {
        character: CharacterId,
        kind: QuotaKind,
        remaining: u64,
    },
}

impl GameEvent {
    pub fn character(&self) -> CharacterId {
        match self {
            Self::DungeonStarted { character, .. }
            | Self::NodeEntered { character, .. }
            | Self::BattleStarted { character, .. }
            | Self::BattleExchange { character, .. }
            | Self::RunEnded { character, .. }
            | Self::QuotaConsumed { character, .. }
            | Self::QuotaRejected { character, .. } => *character,
        }
    }
}
