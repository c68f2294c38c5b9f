//! Bounded pet statistics and the adjustments applied to them.
//!
//! Every pet carries two [`VitalStat`] values, hunger and happiness, each
//! confined to `0..=100`. All arithmetic clamps, so any integer delta is
//! accepted, including negative and overflowing ones.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer statistic confined to `[VitalStat::MIN, VitalStat::MAX]`.
///
/// # Examples
/// ```
/// use pet_backend::domain::VitalStat;
///
/// let hunger = VitalStat::clamp(90);
/// assert_eq!(hunger.increase(20).value(), 100);
/// assert_eq!(VitalStat::clamp(5).decrease(10).value(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "i64")]
pub struct VitalStat(u8);

impl VitalStat {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 100;

    /// Starting value for freshly added pets.
    pub const DEFAULT: Self = Self(50);

    /// Clamp an arbitrary integer into range.
    #[must_use]
    pub fn clamp(value: i64) -> Self {
        let bounded = value.clamp(i64::from(Self::MIN), i64::from(Self::MAX));
        // In range after the clamp above.
        Self(u8::try_from(bounded).unwrap_or(Self::MAX))
    }

    /// `min(current + delta, 100)`, never below zero.
    #[must_use]
    pub fn increase(self, delta: i64) -> Self {
        Self::clamp(i64::from(self.0).saturating_add(delta))
    }

    /// `max(current - delta, 0)`, never above one hundred.
    #[must_use]
    pub fn decrease(self, delta: i64) -> Self {
        Self::clamp(i64::from(self.0).saturating_sub(delta))
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl Default for VitalStat {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<VitalStat> for u8 {
    fn from(stat: VitalStat) -> Self {
        stat.0
    }
}

/// Raised when a stored statistic lies outside `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("vital stat {0} is outside 0..=100")]
pub struct VitalStatRangeError(pub i64);

impl TryFrom<i64> for VitalStat {
    type Error = VitalStatRangeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self::clamp(value))
        } else {
            Err(VitalStatRangeError(value))
        }
    }
}

impl fmt::Display for VitalStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which statistic an adjustment targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Hunger,
    Happiness,
}

impl StatKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hunger => "hunger",
            Self::Happiness => "happiness",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A signed change to one statistic.
///
/// The delta saturates at ±100: anything larger has the same clamped effect
/// on a value in range, and the bound keeps the figure representable as a
/// SQL `INTEGER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatAdjustment {
    kind: StatKind,
    delta: i32,
}

impl StatAdjustment {
    const LIMIT: i64 = VitalStat::MAX as i64;

    #[must_use]
    pub fn new(kind: StatKind, delta: i64) -> Self {
        let bounded = delta.clamp(-Self::LIMIT, Self::LIMIT);
        Self {
            kind,
            delta: i32::try_from(bounded).unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn increase(kind: StatKind, amount: u32) -> Self {
        Self::new(kind, i64::from(amount))
    }

    #[must_use]
    pub fn decrease(kind: StatKind, amount: u32) -> Self {
        Self::new(kind, -i64::from(amount))
    }

    #[must_use]
    pub const fn kind(self) -> StatKind {
        self.kind
    }

    #[must_use]
    pub const fn delta(self) -> i32 {
        self.delta
    }

    /// Apply the adjustment to `current`.
    #[must_use]
    pub fn apply_to(self, current: VitalStat) -> VitalStat {
        current.increase(i64::from(self.delta))
    }
}
