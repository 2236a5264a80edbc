//! Cultivator attributes and combat stat channels.

use std::collections::BTreeMap;

use strum::{Display, EnumIter, IntoEnumIterator};

/// Every stat a formula can read or a buff can modify.
///
/// The first five are cultivation attributes supplied by the character
/// snapshot. The rest are combat channels that start at zero and exist so
/// buffs have something to modify (e.g. `DamageDealt` scales outgoing damage).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StatKind {
    // ========================================================================
    // Cultivation attributes
    // ========================================================================
    Vitality,
    Spirit,
    Wisdom,
    Speed,
    Willpower,

    // ========================================================================
    // Combat channels
    // ========================================================================
    Attack,
    Defense,
    /// Applied to the magnitude of every damage effect the combatant deals.
    DamageDealt,
    /// Applied to the magnitude of every damage effect the combatant receives.
    DamageTaken,
    /// Applied to the magnitude of every heal the combatant casts.
    HealingDone,
}

impl StatKind {
    pub const COUNT: usize = 10;

    const fn index(self) -> usize {
        self as usize
    }
}

/// Flat table of stat values, one slot per [`StatKind`].
///
/// Serialized as a sparse map so content files only list the stats they set.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "BTreeMap<StatKind, f64>", into = "BTreeMap<StatKind, f64>")
)]
pub struct Attributes {
    values: [f64; StatKind::COUNT],
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds attributes from the five cultivation attributes.
    pub fn cultivation(
        vitality: f64,
        spirit: f64,
        wisdom: f64,
        speed: f64,
        willpower: f64,
    ) -> Self {
        Self::new()
            .with(StatKind::Vitality, vitality)
            .with(StatKind::Spirit, spirit)
            .with(StatKind::Wisdom, wisdom)
            .with(StatKind::Speed, speed)
            .with(StatKind::Willpower, willpower)
    }

    #[inline]
    pub fn get(&self, stat: StatKind) -> f64 {
        self.values[stat.index()]
    }

    #[inline]
    pub fn set(&mut self, stat: StatKind, value: f64) {
        self.values[stat.index()] = value;
    }

    /// Builder: set a single stat.
    pub fn with(mut self, stat: StatKind, value: f64) -> Self {
        self.set(stat, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKind, f64)> + '_ {
        StatKind::iter().map(|stat| (stat, self.get(stat)))
    }

    /// Returns false if any slot holds NaN or infinity.
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}

impl From<BTreeMap<StatKind, f64>> for Attributes {
    fn from(map: BTreeMap<StatKind, f64>) -> Self {
        map.into_iter()
            .fold(Self::new(), |attrs, (stat, value)| attrs.with(stat, value))
    }
}

impl From<Attributes> for BTreeMap<StatKind, f64> {
    fn from(attrs: Attributes) -> Self {
        attrs.iter().filter(|(_, value)| *value != 0.0).collect()
    }
}

/// Cultivation realm (power tier) of a character or enemy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Realm {
    #[default]
    QiRefining,
    FoundationEstablishment,
    GoldenCore,
    NascentSoul,
    SpiritSevering,
    VoidRefining,
}

impl Realm {
    /// Zero-based tier, usable as a default quality tier for innate skills.
    pub const fn tier(self) -> i32 {
        self as i32
    }
}
