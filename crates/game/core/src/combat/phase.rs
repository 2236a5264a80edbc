use strum::Display;

/// Stage of a single combat action.
///
/// Phases only move forward. Modifiers are frozen on leaving `Pending`, so
/// a buff applied later in the same action never changes a magnitude that
/// was already computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ResolutionPhase {
    Pending,
    ModifiersResolved,
    EffectsApplied,
    TriggersFired,
    Resolved,
}

impl ResolutionPhase {
    pub const fn next(self) -> Self {
        match self {
            Self::Pending => Self::ModifiersResolved,
            Self::ModifiersResolved => Self::EffectsApplied,
            Self::EffectsApplied => Self::TriggersFired,
            Self::TriggersFired | Self::Resolved => Self::Resolved,
        }
    }
}
