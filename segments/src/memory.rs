//! Available memory segment.

use barseg_core::format::bytes_to_iec;
use barseg_core::{
    ClickAction, ColorName, DisplayDescriptor, GlobalConfig, Segment, SegmentError, Tiers,
};
use serde::{Deserialize, Serialize};

const BYTES_PER_GB: f64 = 1e9;

/// Memory snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct MemoryInfo {
    /// Memory available for new allocations; negative input reads as zero
    #[serde(deserialize_with = "crate::saturating::to_u64")]
    pub available_bytes: u64,
}

impl MemoryInfo {
    #[must_use]
    pub const fn new(available_bytes: u64) -> Self {
        Self { available_bytes }
    }

    /// Available memory in decimal gigabytes; thresholds are expressed in these.
    #[must_use]
    pub fn available_gb(&self) -> f64 {
        self.available_bytes as f64 / BYTES_PER_GB
    }
}

/// Builds the memory segment.
#[derive(Debug, Clone, PartialEq)]
pub struct MemorySegment {
    tiers: Tiers,
    on_click: ClickAction,
}

impl Default for MemorySegment {
    fn default() -> Self {
        Self {
            tiers: Tiers::memory(),
            on_click: GlobalConfig::default().commands.task_manager,
        }
    }
}

impl MemorySegment {
    #[must_use]
    pub const fn new(tiers: Tiers, on_click: ClickAction) -> Self {
        Self { tiers, on_click }
    }
}

impl Segment for MemorySegment {
    type Snapshot = MemoryInfo;

    fn name(&self) -> &str {
        "memory"
    }

    fn build(&self, info: &MemoryInfo) -> Option<DisplayDescriptor> {
        let gb = info.available_gb();
        Some(
            DisplayDescriptor::new("mdi-memory", bytes_to_iec(info.available_bytes))
                .with_icon_color(ColorName::DimIcon)
                .with_severity(self.tiers.classify(gb))
                .with_tooltip(format!("{gb:.2} GB available"))
                .with_click_action(self.on_click.clone()),
        )
    }

    fn configure(&mut self, config: &GlobalConfig) -> Result<(), SegmentError> {
        self.tiers = config.memory.tiers.clone();
        self.on_click = config.commands.task_manager.clone();
        Ok(())
    }
}

/// Build a memory segment with the default policy.
#[must_use]
pub fn build(info: &MemoryInfo) -> Option<DisplayDescriptor> {
    MemorySegment::default().build(info)
}
