//! Ordered-threshold classification of metric values into severity tiers.
//!
//! A [`Tiers`] list is a sequence of [`TierRule`]s checked most severe first.
//! The first rule whose [`Bound`] the value crosses decides the tier; a value
//! that crosses nothing is [`Severity::Normal`]. The comparison direction lives
//! in each bound, so "higher is worse" (load, temperature) and "lower is worse"
//! (battery, free memory) use the same evaluator.
//!
//! # Examples
//!
//! ```rust
//! use barseg_core::tier::{Bound, Severity, TierRule, Tiers};
//!
//! let tiers = Tiers::new(vec![
//!     TierRule::new(Bound::Above(90.0), Severity::Urgent),
//!     TierRule::new(Bound::Above(70.0), Severity::Bad),
//! ])
//! .unwrap();
//!
//! assert_eq!(tiers.classify(95.0), Severity::Urgent);
//! assert_eq!(tiers.classify(75.0), Severity::Bad);
//! assert_eq!(tiers.classify(20.0), Severity::Normal);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::SegmentError;

/// Severity tier of a segment.
///
/// Ordered from most favorable to most severe, so `Severity::Bad > Severity::Degraded`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Deserialize, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Favorable reading (plenty of free memory)
    Good,
    /// Nothing to report
    #[default]
    Normal,
    /// Worth a glance
    Degraded,
    /// Needs attention soon
    Bad,
    /// Needs attention now; rendered with the urgent flag
    Urgent,
}

impl Severity {
    /// CSS class for this tier, or `None` for [`Severity::Normal`].
    #[must_use]
    pub const fn class(self) -> Option<&'static str> {
        match self {
            Self::Good => Some("good"),
            Self::Normal => None,
            Self::Degraded => Some("degraded"),
            Self::Bad => Some("bad"),
            Self::Urgent => Some("urgent"),
        }
    }

    /// Whether the segment should carry the urgent flag.
    #[must_use]
    pub const fn is_urgent(self) -> bool {
        matches!(self, Self::Urgent)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Good => "good",
            Self::Normal => "normal",
            Self::Degraded => "degraded",
            Self::Bad => "bad",
            Self::Urgent => "urgent",
        };
        f.write_str(name)
    }
}

/// A one-sided comparison against a boundary value.
///
/// NaN never crosses a bound, so a NaN reading classifies as Normal.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    /// `value > boundary`
    Above(f64),
    /// `value >= boundary`
    AtLeast(f64),
    /// `value < boundary`
    Below(f64),
    /// `value <= boundary`
    AtMost(f64),
}

impl Bound {
    /// Check whether `value` satisfies this bound.
    #[must_use]
    pub fn is_crossed_by(self, value: f64) -> bool {
        match self {
            Self::Above(b) => value > b,
            Self::AtLeast(b) => value >= b,
            Self::Below(b) => value < b,
            Self::AtMost(b) => value <= b,
        }
    }

    /// The boundary value being compared against.
    #[must_use]
    pub fn boundary(self) -> f64 {
        match self {
            Self::Above(b) | Self::AtLeast(b) | Self::Below(b) | Self::AtMost(b) => b,
        }
    }

    /// True for bounds that are crossed by rising values.
    #[must_use]
    pub const fn is_rising(self) -> bool {
        matches!(self, Self::Above(_) | Self::AtLeast(_))
    }
}

/// One entry of a tier list.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct TierRule {
    /// Condition that selects this tier
    pub bound: Bound,
    /// Tier selected when the condition holds
    pub tier: Severity,
}

impl TierRule {
    #[must_use]
    pub const fn new(bound: Bound, tier: Severity) -> Self {
        Self { bound, tier }
    }
}

/// Validated, ordered list of tier rules.
///
/// Rules that compare in the same direction must have their boundaries
/// ordered toward increasing severity: descending for rising bounds,
/// ascending for falling bounds. Mixed directions are allowed, which is how
/// the memory policy pairs "below 2GB is degraded" with "above 12GB is good".
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(try_from = "Vec<TierRule>", into = "Vec<TierRule>")]
pub struct Tiers {
    rules: Vec<TierRule>,
}

impl Tiers {
    /// Build a tier list, checking boundary order.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::Config`] if a boundary is NaN or if two rules
    /// with the same direction are out of order.
    pub fn new(rules: Vec<TierRule>) -> Result<Self, SegmentError> {
        let mut last_rising: Option<f64> = None;
        let mut last_falling: Option<f64> = None;

        for rule in &rules {
            let boundary = rule.bound.boundary();
            if boundary.is_nan() {
                return Err(SegmentError::config("tier boundary must be a number"));
            }

            let (last, in_order) = if rule.bound.is_rising() {
                let ok = last_rising.map_or(true, |prev| boundary <= prev);
                (&mut last_rising, ok)
            } else {
                let ok = last_falling.map_or(true, |prev| boundary >= prev);
                (&mut last_falling, ok)
            };

            if !in_order {
                return Err(SegmentError::config_with_value(
                    "tier boundaries must be ordered from most to least severe",
                    format!("{:?}", rule.bound),
                ));
            }
            *last = Some(boundary);
        }

        Ok(Self { rules })
    }

    /// Tier list that always classifies as Normal.
    #[must_use]
    pub const fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    #[must_use]
    pub fn rules(&self) -> &[TierRule] {
        &self.rules
    }

    /// Classify a value. Always returns exactly one tier.
    #[must_use]
    pub fn classify(&self, value: f64) -> Severity {
        self.rules
            .iter()
            .find(|rule| rule.bound.is_crossed_by(value))
            .map_or(Severity::Normal, |rule| rule.tier)
    }

    /// Battery remaining percentage: lower is worse.
    #[must_use]
    pub fn battery() -> Self {
        Self::from_static(&[
            TierRule::new(Bound::AtMost(5.0), Severity::Urgent),
            TierRule::new(Bound::AtMost(15.0), Severity::Bad),
            TierRule::new(Bound::AtMost(25.0), Severity::Degraded),
        ])
    }

    /// Five minute load average: higher is worse.
    #[must_use]
    pub fn load() -> Self {
        Self::from_static(&[
            TierRule::new(Bound::Above(8.0), Severity::Urgent),
            TierRule::new(Bound::Above(4.0), Severity::Bad),
            TierRule::new(Bound::Above(1.0), Severity::Degraded),
        ])
    }

    /// Available memory in gigabytes: lower is worse, lots is good.
    #[must_use]
    pub fn memory() -> Self {
        Self::from_static(&[
            TierRule::new(Bound::Below(0.5), Severity::Urgent),
            TierRule::new(Bound::Below(1.0), Severity::Bad),
            TierRule::new(Bound::Below(2.0), Severity::Degraded),
            TierRule::new(Bound::Above(12.0), Severity::Good),
        ])
    }

    /// CPU temperature in Celsius: higher is worse.
    #[must_use]
    pub fn temperature() -> Self {
        Self::from_static(&[
            TierRule::new(Bound::Above(90.0), Severity::Urgent),
            TierRule::new(Bound::Above(70.0), Severity::Bad),
            TierRule::new(Bound::Above(60.0), Severity::Degraded),
        ])
    }

    // Built-in policies are known to be ordered.
    fn from_static(rules: &[TierRule]) -> Self {
        Self {
            rules: rules.to_vec(),
        }
    }
}

impl TryFrom<Vec<TierRule>> for Tiers {
    type Error = SegmentError;

    fn try_from(rules: Vec<TierRule>) -> Result<Self, Self::Error> {
        Self::new(rules)
    }
}

impl From<Tiers> for Vec<TierRule> {
    fn from(tiers: Tiers) -> Self {
        tiers.rules
    }
}

/// Classify `value` against `tiers`.
#[must_use]
pub fn classify(value: f64, tiers: &Tiers) -> Severity {
    tiers.classify(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn battery_examples() {
        let tiers = Tiers::battery();
        assert_eq!(tiers.classify(3.0), Severity::Urgent);
        assert_eq!(tiers.classify(5.0), Severity::Urgent);
        assert_eq!(tiers.classify(10.0), Severity::Bad);
        assert_eq!(tiers.classify(15.0), Severity::Bad);
        assert_eq!(tiers.classify(20.0), Severity::Degraded);
        assert_eq!(tiers.classify(25.0), Severity::Degraded);
        assert_eq!(tiers.classify(26.0), Severity::Normal);
        assert_eq!(tiers.classify(50.0), Severity::Normal);
    }

    #[test]
    fn battery_is_total_and_monotonic_over_percentages() {
        let tiers = Tiers::battery();
        let mut previous = Severity::Urgent;
        for pct in 0..=100 {
            let tier = tiers.classify(f64::from(pct));
            assert!(tier <= previous, "tier rose at {pct}%");
            previous = tier;
        }
        assert_eq!(previous, Severity::Normal);
    }

    #[test]
    fn rising_policies_are_strict() {
        let load = Tiers::load();
        assert_eq!(load.classify(8.0), Severity::Bad);
        assert_eq!(load.classify(8.01), Severity::Urgent);
        assert_eq!(load.classify(1.0), Severity::Normal);
        assert_eq!(load.classify(1.5), Severity::Degraded);

        let temp = Tiers::temperature();
        assert_eq!(temp.classify(91.0), Severity::Urgent);
        assert_eq!(temp.classify(71.0), Severity::Bad);
        assert_eq!(temp.classify(65.0), Severity::Degraded);
        assert_eq!(temp.classify(60.0), Severity::Normal);
    }

    #[test]
    fn memory_has_a_good_tier() {
        let mem = Tiers::memory();
        assert_eq!(mem.classify(0.2), Severity::Urgent);
        assert_eq!(mem.classify(0.5), Severity::Bad);
        assert_eq!(mem.classify(1.5), Severity::Degraded);
        assert_eq!(mem.classify(4.0), Severity::Normal);
        assert_eq!(mem.classify(12.0), Severity::Normal);
        assert_eq!(mem.classify(16.0), Severity::Good);
    }

    #[test]
    fn nan_is_normal() {
        assert_eq!(Tiers::temperature().classify(f64::NAN), Severity::Normal);
        assert_eq!(Tiers::battery().classify(f64::NAN), Severity::Normal);
    }

    #[test]
    fn empty_tiers_are_always_normal() {
        assert_eq!(Tiers::empty().classify(1e9), Severity::Normal);
        assert_eq!(classify(-3.0, &Tiers::default()), Severity::Normal);
    }

    #[test]
    fn builtin_policies_pass_validation() {
        for tiers in [Tiers::battery(), Tiers::load(), Tiers::memory(), Tiers::temperature()] {
            let rebuilt = Tiers::new(tiers.rules().to_vec()).unwrap();
            assert_eq!(rebuilt, tiers);
        }
    }

    #[test]
    fn out_of_order_rules_are_rejected() {
        let err = Tiers::new(vec![
            TierRule::new(Bound::Above(4.0), Severity::Bad),
            TierRule::new(Bound::Above(8.0), Severity::Urgent),
        ])
        .unwrap_err();
        assert!(matches!(err, SegmentError::Config { .. }));

        let err = Tiers::new(vec![
            TierRule::new(Bound::AtMost(15.0), Severity::Bad),
            TierRule::new(Bound::AtMost(5.0), Severity::Urgent),
        ]);
        assert!(err.is_err());

        let err = Tiers::new(vec![TierRule::new(Bound::Below(f64::NAN), Severity::Bad)]);
        assert!(err.is_err());
    }

    #[test]
    fn severity_classes() {
        assert_eq!(Severity::Normal.class(), None);
        assert_eq!(Severity::Urgent.class(), Some("urgent"));
        assert_eq!(Severity::Good.class(), Some("good"));
        assert!(Severity::Urgent.is_urgent());
        assert!(!Severity::Bad.is_urgent());
        assert!(Severity::Urgent > Severity::Bad);
        assert!(Severity::Good < Severity::Normal);
        assert_eq!(Severity::default(), Severity::Normal);
    }

    #[test]
    fn tiers_deserialize_with_validation() {
        let tiers: Tiers = ron::from_str("[(bound: above(4.0), tier: bad)]").unwrap();
        assert_eq!(tiers.classify(5.0), Severity::Bad);

        let bad = ron::from_str::<Tiers>(
            "[(bound: above(4.0), tier: bad), (bound: above(8.0), tier: urgent)]",
        );
        assert!(bad.is_err());
    }
}
