//! Transient combatant state passed into and returned from combat math.

use crate::buff::BuffInstance;
use crate::config::GameConfig;

use super::attributes::{Attributes, StatKind};
use super::character::CharacterSnapshot;
use super::common::CombatantId;

/// A bounded resource pool (health or spiritual energy).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourcePool {
    pub current: u32,
    pub max: u32,
}

impl ResourcePool {
    pub fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    /// Subtracts up to `amount`, returning what was actually removed.
    pub fn drain(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.current);
        self.current -= removed;
        removed
    }

    /// Adds up to `amount` without exceeding `max`, returning what was actually added.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let added = amount.min(self.max.saturating_sub(self.current));
        self.current += added;
        added
    }
}

/// Combatant state for one battle participant.
///
/// Supplied by the caller per combat action and returned mutated. The buff
/// list is private to the crate: only [`BuffEngine`](crate::buff::BuffEngine)
/// writes instance fields.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantState {
    pub id: CombatantId,
    pub name: String,
    pub attributes: Attributes,
    pub hp: ResourcePool,
    pub mp: ResourcePool,
    pub(crate) buffs: Vec<BuffInstance>,
    /// Monotonic counter used to stamp new buff instances.
    pub(crate) next_instance: u32,
}

impl CombatantState {
    pub fn new(
        id: CombatantId,
        name: impl Into<String>,
        attributes: Attributes,
        hp: u32,
        mp: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            attributes,
            hp: ResourcePool::full(hp),
            mp: ResourcePool::full(mp),
            buffs: Vec::new(),
            next_instance: 0,
        }
    }

    /// Builds the player's combatant from a character snapshot.
    ///
    /// Pools scale linearly with vitality and spirit.
    pub fn from_character(snapshot: &CharacterSnapshot, config: &GameConfig) -> Self {
        let attrs = snapshot.attributes;
        Self::new(
            CombatantId::PLAYER,
            snapshot.name.clone(),
            attrs,
            pool_size(config.base_hp, config.hp_per_vitality, attrs.get(StatKind::Vitality)),
            pool_size(config.base_mp, config.mp_per_spirit, attrs.get(StatKind::Spirit)),
        )
    }

    pub fn is_alive(&self) -> bool {
        !self.hp.is_empty()
    }

    /// Live buff instances in application order.
    pub fn buffs(&self) -> &[BuffInstance] {
        &self.buffs
    }
}

/// Converts an effect magnitude into whole pool points, flooring fractions.
pub fn points(magnitude: f64) -> u32 {
    if magnitude.is_finite() && magnitude > 0.0 {
        magnitude.floor().min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

fn pool_size(base: f64, per_point: f64, attribute: f64) -> u32 {
    let size = base + per_point * attribute;
    if size.is_finite() && size > 0.0 {
        size.floor() as u32
    } else {
        1
    }
}
