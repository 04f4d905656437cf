//! Battery segment: charge level icon and tiered low-charge warnings.

use barseg_core::{DisplayDescriptor, GlobalConfig, Segment, SegmentError, Tiers};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Charging state reported by the power supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryStatus {
    Charging,
    Discharging,
    NotCharging,
    Full,
    Unknown,
    /// No battery present; the segment is hidden
    Disconnected,
}

impl fmt::Display for BatteryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Charging => "Charging",
            Self::Discharging => "Discharging",
            Self::NotCharging => "Not charging",
            Self::Full => "Full",
            Self::Unknown => "Unknown",
            Self::Disconnected => "Disconnected",
        };
        f.write_str(name)
    }
}

/// Battery snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct BatteryInfo {
    /// Remaining charge; values outside 0-100 are clamped
    #[serde(deserialize_with = "crate::saturating::to_i32")]
    pub remaining_percent: i32,
    pub status: BatteryStatus,
}

impl BatteryInfo {
    #[must_use]
    pub const fn new(remaining_percent: i32, status: BatteryStatus) -> Self {
        Self {
            remaining_percent,
            status,
        }
    }

    /// Remaining charge clamped to 0-100.
    #[must_use]
    pub fn remaining_pct(&self) -> u8 {
        // In range after the clamp.
        self.remaining_percent.clamp(0, 100) as u8
    }
}

/// Icon key for a battery snapshot.
///
/// `mdi-battery`, plus `-charging` while charging, plus `-outline` for the
/// first decile or `-N0` for deciles 1-9. A full battery gets no suffix.
#[must_use]
pub fn icon_id(info: &BatteryInfo) -> String {
    let mut id = String::from("mdi-battery");
    if info.status == BatteryStatus::Charging {
        id.push_str("-charging");
    }
    match info.remaining_pct() / 10 {
        0 => id.push_str("-outline"),
        tenth @ 1..=9 => id.push_str(&format!("-{tenth}0")),
        _ => {}
    }
    id
}

/// Builds the battery segment.
#[derive(Debug, Clone, PartialEq)]
pub struct BatterySegment {
    tiers: Tiers,
}

impl Default for BatterySegment {
    fn default() -> Self {
        Self {
            tiers: Tiers::battery(),
        }
    }
}

impl BatterySegment {
    #[must_use]
    pub const fn new(tiers: Tiers) -> Self {
        Self { tiers }
    }

    /// Build with caller-supplied text (e.g. a time-remaining estimate).
    #[must_use]
    pub fn build_with_text(
        &self,
        info: &BatteryInfo,
        text: impl Into<String>,
    ) -> Option<DisplayDescriptor> {
        if info.status == BatteryStatus::Disconnected {
            return None;
        }

        let pct = info.remaining_pct();
        Some(
            DisplayDescriptor::new(icon_id(info), text)
                .with_severity(self.tiers.classify(f64::from(pct)))
                .with_percentage(pct)
                .with_tooltip(format!("{}, {pct}%", info.status)),
        )
    }
}

impl Segment for BatterySegment {
    type Snapshot = BatteryInfo;

    fn name(&self) -> &str {
        "battery"
    }

    fn build(&self, info: &BatteryInfo) -> Option<DisplayDescriptor> {
        self.build_with_text(info, format!("{}%", info.remaining_pct()))
    }

    fn configure(&mut self, config: &GlobalConfig) -> Result<(), SegmentError> {
        self.tiers = config.battery.tiers.clone();
        Ok(())
    }
}

/// Build a battery segment with the default policy and `N%` text.
#[must_use]
pub fn build(info: &BatteryInfo) -> Option<DisplayDescriptor> {
    BatterySegment::default().build(info)
}
