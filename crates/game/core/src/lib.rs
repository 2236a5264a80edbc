//! Deterministic cultivation rules shared by the runtime and offline tools.
//!
//! `game-core` holds the four rule components of the persistent world:
//! the Effect Catalog ([`effect`], [`catalog`]), the Buff Engine ([`buff`]),
//! the Combat Resolver ([`combat`]) and the Dungeon State Machine
//! ([`dungeon`]). Every API here is a pure function over values supplied by
//! the caller; storage, clocks and quotas live in the runtime crate.
pub mod buff;
pub mod catalog;
pub mod combat;
pub mod config;
pub mod dungeon;
pub mod effect;
pub mod error;
pub mod state;

pub use buff::{
    BuffApplication, BuffDuration, BuffEngine, BuffError, BuffInstance, BuffSource, BuffTags,
    BuffTemplate, DispelReport, ModifierTable, StackPolicy, StackResolution, StatModifier,
    TickReport, TriggerRecord,
};
pub use catalog::{Catalog, CatalogBuilder, CatalogError, EffectRecord};
pub use combat::{
    ActionRequest, BuffRecipient, CombatError, CombatOutcome, CombatResolver, ResolutionPhase,
    SkillDefinition, SkillTarget, TargetOutcome, TargetResult,
};
pub use config::GameConfig;
pub use dungeon::{
    Advance, BattleSession, BattleView, ChoiceView, DungeonAtlas, DungeonError, DungeonMachine,
    DungeonPhase, DungeonRun, DungeonRunView, DungeonStep, ENEMY, EnemyTemplate, Exchange, MapNode,
    NodeChoice, NodeKind,
};
pub use effect::{
    EffectContext, EffectDefinition, EffectError, EffectKind, Formula, ModifierMode, Side,
    TriggerCondition,
};
pub use error::{ErrorCategory, GameError};
pub use state::{
    Attributes, BattleRef, CharacterId, CharacterSnapshot, ChoiceId, CombatantId, CombatantState,
    EffectId, EnemyId, LearnedSkill, NodeId, Realm, ResourcePool, SkillId, StatKind, TemplateId,
};
