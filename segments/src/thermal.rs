//! CPU temperature segment.

use barseg_core::{ColorName, DisplayDescriptor, GlobalConfig, Segment, SegmentError, Tiers};
use serde::{Deserialize, Serialize};

/// Temperature snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct TemperatureInfo {
    pub celsius: f64,
}

impl TemperatureInfo {
    #[must_use]
    pub const fn new(celsius: f64) -> Self {
        Self { celsius }
    }
}

/// Builds the temperature segment.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureSegment {
    tiers: Tiers,
}

impl Default for TemperatureSegment {
    fn default() -> Self {
        Self {
            tiers: Tiers::temperature(),
        }
    }
}

impl TemperatureSegment {
    #[must_use]
    pub const fn new(tiers: Tiers) -> Self {
        Self { tiers }
    }
}

impl Segment for TemperatureSegment {
    type Snapshot = TemperatureInfo;

    fn name(&self) -> &str {
        "temperature"
    }

    fn build(&self, info: &TemperatureInfo) -> Option<DisplayDescriptor> {
        // Whole degrees, truncated toward zero, padded to two columns.
        let degrees = info.celsius.trunc() as i64;
        Some(
            DisplayDescriptor::new("mdi-fan", format!("{degrees:2}℃"))
                .with_icon_color(ColorName::DimIcon)
                .with_severity(self.tiers.classify(info.celsius))
                .with_tooltip(format!("{:.1}℃", info.celsius)),
        )
    }

    fn configure(&mut self, config: &GlobalConfig) -> Result<(), SegmentError> {
        self.tiers = config.temperature.tiers.clone();
        Ok(())
    }
}

/// Build a temperature segment with the default policy.
#[must_use]
pub fn build(info: &TemperatureInfo) -> Option<DisplayDescriptor> {
    TemperatureSegment::default().build(info)
}
