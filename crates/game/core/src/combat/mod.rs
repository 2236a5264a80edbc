//! Combat resolution.
//!
//! Pure functions over a slice of [`CombatantState`](crate::state::CombatantState)
//! values: the caller supplies the battle, gets it back mutated together with
//! a [`CombatOutcome`], and is responsible for storing it between actions.

mod error;
mod outcome;
mod phase;
mod resolver;
mod skill;

pub use error::CombatError;
pub use outcome::{
    AppliedBuff, CombatOutcome, TargetDelta, TargetFailure, TargetOutcome, TargetResult,
    TriggerEffect, TriggerEvent,
};
pub use phase::ResolutionPhase;
pub use resolver::{ActionRequest, CombatResolver};
pub use skill::{BuffRecipient, SkillBuff, SkillDefinition, SkillTarget};
