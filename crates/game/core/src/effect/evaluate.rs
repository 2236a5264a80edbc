//! Formula evaluation.
//!
//! Evaluation is pure: the same [`EffectContext`] always yields the same
//! magnitude, which keeps combat logs reproducible.

use crate::state::Attributes;

use super::EffectDefinition;
use super::error::EffectError;
use super::formula::{Formula, Side};

/// Inputs a formula may scale against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectContext<'a> {
    /// Caster attributes, with modifiers already resolved.
    pub caster: &'a Attributes,

    /// Target attributes, with modifiers already resolved.
    pub target: &'a Attributes,

    /// Item quality or skill rank. Negative tiers are rejected.
    pub quality_tier: i32,

    /// Stack count of the invoking buff, 0 if not buff-sourced.
    pub stacks: u32,

    /// Magnitude of the event that fired a trigger, 0 otherwise.
    pub trigger_magnitude: f64,
}

impl<'a> EffectContext<'a> {
    pub fn new(caster: &'a Attributes, target: &'a Attributes, quality_tier: i32) -> Self {
        Self {
            caster,
            target,
            quality_tier,
            stacks: 0,
            trigger_magnitude: 0.0,
        }
    }

    pub fn with_stacks(mut self, stacks: u32) -> Self {
        self.stacks = stacks;
        self
    }

    pub fn with_trigger_magnitude(mut self, magnitude: f64) -> Self {
        self.trigger_magnitude = magnitude;
        self
    }

    fn validate(&self) -> Result<(), EffectError> {
        if self.quality_tier < 0 {
            return Err(EffectError::InvalidContext(format!(
                "negative quality tier {}",
                self.quality_tier
            )));
        }
        if !self.caster.is_finite() || !self.target.is_finite() {
            return Err(EffectError::InvalidContext(
                "non-finite attribute snapshot".to_string(),
            ));
        }
        if !self.trigger_magnitude.is_finite() || self.trigger_magnitude < 0.0 {
            return Err(EffectError::InvalidContext(format!(
                "invalid trigger magnitude {}",
                self.trigger_magnitude
            )));
        }
        Ok(())
    }
}

/// Evaluate an effect definition to its raw magnitude.
///
/// ## Error Handling
/// - `InvalidContext` for negative quality tiers, non-finite attributes, or a
///   formula that produces a non-finite value
pub fn evaluate(
    definition: &EffectDefinition,
    ctx: &EffectContext<'_>,
) -> Result<f64, EffectError> {
    ctx.validate()?;
    let magnitude = evaluate_formula(&definition.formula, ctx);
    if magnitude.is_finite() {
        Ok(magnitude)
    } else {
        Err(EffectError::InvalidContext(format!(
            "effect `{}` produced a non-finite magnitude",
            definition.id
        )))
    }
}

fn evaluate_formula(formula: &Formula, ctx: &EffectContext<'_>) -> f64 {
    match formula {
        Formula::Flat { value } => *value,

        Formula::Linear {
            base,
            stat,
            side,
            coefficient,
        } => {
            let attributes = match side {
                Side::Caster => ctx.caster,
                Side::Target => ctx.target,
            };
            base + coefficient * attributes.get(*stat)
        }

        Formula::Tiered { base, per_tier } => base + per_tier * f64::from(ctx.quality_tier),

        Formula::StackMultiplied(inner) => evaluate_formula(inner, ctx) * f64::from(ctx.stacks),

        Formula::FromTrigger { coefficient } => coefficient * ctx.trigger_magnitude,

        Formula::Sum(formulas) => formulas.iter().map(|f| evaluate_formula(f, ctx)).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::EffectKind;
    use crate::state::{EffectId, StatKind};

    fn damage(formula: Formula) -> EffectDefinition {
        EffectDefinition::new(EffectId::new("test"), EffectKind::Damage, formula)
    }

    #[test]
    fn linear_reads_requested_side() {
        let caster = Attributes::new().with(StatKind::Spirit, 10.0);
        let target = Attributes::new().with(StatKind::Spirit, 4.0);
        let ctx = EffectContext::new(&caster, &target, 0);

        let own = damage(Formula::Linear {
            base: 5.0,
            stat: StatKind::Spirit,
            side: Side::Caster,
            coefficient: 2.0,
        });
        let theirs = damage(Formula::Linear {
            base: 5.0,
            stat: StatKind::Spirit,
            side: Side::Target,
            coefficient: 2.0,
        });

        assert_eq!(evaluate(&own, &ctx).unwrap(), 25.0);
        assert_eq!(evaluate(&theirs, &ctx).unwrap(), 13.0);
    }

    #[test]
    fn tiered_and_stacked_compose() {
        let attrs = Attributes::new();
        let ctx = EffectContext::new(&attrs, &attrs, 3).with_stacks(2);
        let def = damage(Formula::Sum(vec![
            Formula::Tiered {
                base: 10.0,
                per_tier: 5.0,
            },
            Formula::per_stack(Formula::flat(4.0)),
        ]));

        // (10 + 5×3) + 4×2
        assert_eq!(evaluate(&def, &ctx).unwrap(), 33.0);
    }

    #[test]
    fn stack_multiplied_is_zero_outside_buffs() {
        let attrs = Attributes::new();
        let ctx = EffectContext::new(&attrs, &attrs, 0);
        let def = damage(Formula::per_stack(Formula::flat(7.0)));
        assert_eq!(evaluate(&def, &ctx).unwrap(), 0.0);
    }

    #[test]
    fn from_trigger_scales_triggering_hit() {
        let attrs = Attributes::new();
        let ctx = EffectContext::new(&attrs, &attrs, 0).with_trigger_magnitude(80.0);
        let def = damage(Formula::FromTrigger { coefficient: 0.25 });
        assert_eq!(evaluate(&def, &ctx).unwrap(), 20.0);
    }

    #[test]
    fn same_context_same_magnitude() {
        let caster = Attributes::cultivation(3.0, 9.0, 1.0, 2.0, 4.0);
        let ctx = EffectContext::new(&caster, &caster, 2).with_stacks(1);
        let def = damage(Formula::Sum(vec![
            Formula::Linear {
                base: 1.5,
                stat: StatKind::Willpower,
                side: Side::Caster,
                coefficient: 0.7,
            },
            Formula::Tiered {
                base: 0.0,
                per_tier: 3.3,
            },
        ]));
        assert_eq!(evaluate(&def, &ctx).unwrap(), evaluate(&def, &ctx).unwrap());
    }

    #[test]
    fn negative_tier_is_rejected() {
        let attrs = Attributes::new();
        let ctx = EffectContext::new(&attrs, &attrs, -1);
        let result = evaluate(&damage(Formula::flat(1.0)), &ctx);
        assert!(matches!(result, Err(EffectError::InvalidContext(_))));
    }

    #[test]
    fn non_finite_attributes_are_rejected() {
        let caster = Attributes::new().with(StatKind::Spirit, f64::NAN);
        let target = Attributes::new();
        let ctx = EffectContext::new(&caster, &target, 0);
        let result = evaluate(&damage(Formula::flat(1.0)), &ctx);
        assert!(matches!(result, Err(EffectError::InvalidContext(_))));
    }
}
