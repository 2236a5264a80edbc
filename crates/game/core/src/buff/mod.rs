//! Buff Engine: templates, live instances, stacking, ticking and modifiers.
//!
//! Templates are static catalog data. Instances live on a
//! [`CombatantState`](crate::state::CombatantState) and are only ever mutated
//! through [`BuffEngine`].

mod engine;
mod error;
mod instance;
mod modifiers;
mod template;

pub use engine::{
    BuffApplication, BuffEngine, DispelReport, HitTrigger, StackResolution, TickReport,
    TriggerOutcome, TriggerRecord,
};
pub use error::BuffError;
pub use instance::{BuffInstance, BuffSource};
pub use modifiers::{ModifierTable, StatModifier};
pub use template::{BuffDuration, BuffTags, BuffTemplate, StackPolicy};
