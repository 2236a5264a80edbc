//! Stat modifier aggregation.
//!
//! Stat-modify effects from every live buff fold into one [`StatModifier`]
//! per stat. Additive and multiplicative parts are tracked separately and
//! combined as:
//!
//! ```text
//! result = (base + Σadditive) × Π(1 + multiplicative)
//! ```

use strum::IntoEnumIterator;

use crate::effect::ModifierMode;
use crate::state::{Attributes, StatKind};

/// Aggregate modifier for a single stat.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatModifier {
    pub additive: f64,
    pub multiplier: f64,
}

impl StatModifier {
    pub const IDENTITY: Self = Self {
        additive: 0.0,
        multiplier: 1.0,
    };

    /// Folds one stat-modify magnitude into the aggregate.
    pub fn add(&mut self, mode: ModifierMode, magnitude: f64) {
        match mode {
            ModifierMode::Additive => self.additive += magnitude,
            ModifierMode::Multiplicative => self.multiplier *= 1.0 + magnitude,
        }
    }

    /// Builder: fold one magnitude.
    pub fn with(mut self, mode: ModifierMode, magnitude: f64) -> Self {
        self.add(mode, magnitude);
        self
    }

    /// Applies the aggregate to a base value.
    pub fn apply(&self, base: f64) -> f64 {
        (base + self.additive) * self.multiplier
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for StatModifier {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// One [`StatModifier`] per [`StatKind`], frozen before any effect is computed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModifierTable {
    modifiers: [StatModifier; StatKind::COUNT],
}

impl ModifierTable {
    pub fn new() -> Self {
        Self {
            modifiers: [StatModifier::IDENTITY; StatKind::COUNT],
        }
    }

    pub fn get(&self, stat: StatKind) -> StatModifier {
        self.modifiers[stat as usize]
    }

    pub fn add(&mut self, stat: StatKind, mode: ModifierMode, magnitude: f64) {
        self.modifiers[stat as usize].add(mode, magnitude);
    }

    /// Applies every modifier to its base attribute.
    pub fn resolve(&self, base: &Attributes) -> Attributes {
        StatKind::iter().fold(*base, |attrs, stat| {
            attrs.with(stat, self.get(stat).apply(base.get(stat)))
        })
    }
}

impl Default for ModifierTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn additive_before_multiplicative() {
        let modifier = StatModifier::IDENTITY
            .with(ModifierMode::Multiplicative, 0.2)
            .with(ModifierMode::Additive, 10.0);

        assert_eq!(modifier.apply(50.0), 72.0);
    }

    #[test]
    fn multipliers_compound() {
        let modifier = StatModifier::IDENTITY
            .with(ModifierMode::Multiplicative, 0.5)
            .with(ModifierMode::Multiplicative, -0.2);

        // 100 × 1.5 × 0.8
        assert!((modifier.apply(100.0) - 120.0).abs() < 1e-9);
    }

    #[test]
    fn table_resolves_each_stat_independently() {
        let mut table = ModifierTable::new();
        table.add(StatKind::Spirit, ModifierMode::Additive, 5.0);
        table.add(StatKind::Defense, ModifierMode::Multiplicative, 1.0);

        let base = Attributes::new()
            .with(StatKind::Spirit, 10.0)
            .with(StatKind::Defense, 8.0)
            .with(StatKind::Speed, 3.0);
        let resolved = table.resolve(&base);

        assert_eq!(resolved.get(StatKind::Spirit), 15.0);
        assert_eq!(resolved.get(StatKind::Defense), 16.0);
        assert_eq!(resolved.get(StatKind::Speed), 3.0);
    }
}
