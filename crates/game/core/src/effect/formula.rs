//! Closed set of scaling formula shapes.
//!
//! ## Examples
//!
//! ```ignore
//! // 40 + 2 × caster spirit
//! Formula::Linear { base: 40.0, stat: StatKind::Spirit, side: Side::Caster, coefficient: 2.0 }
//!
//! // 12 per stack
//! Formula::StackMultiplied(Box::new(Formula::Flat { value: 12.0 }))
//!
//! // 30% of the hit that fired the trigger
//! Formula::FromTrigger { coefficient: 0.3 }
//! ```

use crate::state::StatKind;

/// Whose attributes a formula reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Caster,
    Target,
}

/// Formula for calculating an effect magnitude.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Formula {
    /// Fixed value.
    Flat { value: f64 },

    /// `base + coefficient × stat`, reading the caster's or target's attributes.
    Linear {
        base: f64,
        stat: StatKind,
        side: Side,
        coefficient: f64,
    },

    /// `base + per_tier × quality tier`.
    Tiered { base: f64, per_tier: f64 },

    /// Inner formula multiplied by the invoking buff's stack count.
    StackMultiplied(Box<Formula>),

    /// Fraction of the magnitude that fired the trigger (reflect, lifesteal).
    FromTrigger { coefficient: f64 },

    /// Sum of multiple formulas.
    Sum(Vec<Formula>),
}

impl Formula {
    pub const fn flat(value: f64) -> Self {
        Self::Flat { value }
    }

    pub fn per_stack(inner: Formula) -> Self {
        Self::StackMultiplied(Box::new(inner))
    }
}
