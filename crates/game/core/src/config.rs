/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Exchanges a battle may last before the cultivator is counted as defeated.
    pub max_battle_rounds: u32,

    /// How deep triggered effects may nest inside a combat action.
    ///
    /// A value of 1 lets an on-hit-taken trigger resolve as a nested action,
    /// but that nested action never fires further triggers.
    pub trigger_nesting_limit: u8,

    /// Health pool before vitality scaling.
    pub base_hp: f64,
    /// Additional health per point of vitality.
    pub hp_per_vitality: f64,
    /// Spiritual energy pool before spirit scaling.
    pub base_mp: f64,
    /// Additional spiritual energy per point of spirit.
    pub mp_per_spirit: f64,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of outgoing choices on a single map node.
    pub const MAX_NODE_CHOICES: usize = 8;
    /// Upper bound for any template's `max_stack`.
    pub const MAX_STACK_CEILING: u32 = 99;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_BATTLE_ROUNDS: u32 = 30;
    pub const DEFAULT_TRIGGER_NESTING_LIMIT: u8 = 1;
    pub const DEFAULT_BASE_HP: f64 = 100.0;
    pub const DEFAULT_HP_PER_VITALITY: f64 = 10.0;
    pub const DEFAULT_BASE_MP: f64 = 50.0;
    pub const DEFAULT_MP_PER_SPIRIT: f64 = 5.0;

    pub fn new() -> Self {
        Self {
            max_battle_rounds: Self::DEFAULT_MAX_BATTLE_ROUNDS,
            trigger_nesting_limit: Self::DEFAULT_TRIGGER_NESTING_LIMIT,
            base_hp: Self::DEFAULT_BASE_HP,
            hp_per_vitality: Self::DEFAULT_HP_PER_VITALITY,
            base_mp: Self::DEFAULT_BASE_MP,
            mp_per_spirit: Self::DEFAULT_MP_PER_SPIRIT,
        }
    }

    pub fn with_max_battle_rounds(mut self, rounds: u32) -> Self {
        self.max_battle_rounds = rounds;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
