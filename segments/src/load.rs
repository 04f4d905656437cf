//! System load segment.

use barseg_core::{
    ClickAction, ColorName, DisplayDescriptor, GlobalConfig, Segment, SegmentError, Severity, Tiers,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Load average snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct LoadInfo {
    /// 1, 5 and 15 minute load averages
    pub loads: [f64; 3],
    /// Time since boot, in seconds on the wire
    #[serde(with = "crate::secs")]
    pub uptime: Duration,
}

impl LoadInfo {
    #[must_use]
    pub const fn new(loads: [f64; 3], uptime: Duration) -> Self {
        Self { loads, uptime }
    }

    /// The 5 minute average, which drives the segment.
    #[must_use]
    pub const fn five_minute(&self) -> f64 {
        self.loads[1]
    }
}

/// Builds the load segment.
///
/// The 5 minute average is not meaningful right after boot, so the segment
/// stays at [`Severity::Normal`] and carries no click action until `warmup`
/// has elapsed.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadSegment {
    tiers: Tiers,
    warmup: Duration,
    on_click: ClickAction,
}

impl Default for LoadSegment {
    fn default() -> Self {
        let config = GlobalConfig::default();
        Self {
            tiers: Tiers::load(),
            warmup: config.load.warmup(),
            on_click: config.commands.task_manager,
        }
    }
}

impl LoadSegment {
    #[must_use]
    pub fn new(tiers: Tiers, warmup: Duration, on_click: ClickAction) -> Self {
        Self {
            tiers,
            warmup,
            on_click,
        }
    }

    fn warmed_up(&self, info: &LoadInfo) -> bool {
        info.uptime >= self.warmup
    }

    fn severity(&self, info: &LoadInfo) -> Severity {
        if self.warmed_up(info) {
            self.tiers.classify(info.five_minute())
        } else {
            Severity::Normal
        }
    }
}

impl Segment for LoadSegment {
    type Snapshot = LoadInfo;

    fn name(&self) -> &str {
        "load"
    }

    fn build(&self, info: &LoadInfo) -> Option<DisplayDescriptor> {
        let [one, five, fifteen] = info.loads;
        let mut out = DisplayDescriptor::new("mdi-heart-pulse", format!("{five:.2}"))
            .with_icon_color(ColorName::DimIcon)
            .with_severity(self.severity(info))
            .with_tooltip(format!("Load: {one:.2} {five:.2} {fifteen:.2}"));
        if self.warmed_up(info) {
            out = out.with_click_action(self.on_click.clone());
        }
        Some(out)
    }

    fn configure(&mut self, config: &GlobalConfig) -> Result<(), SegmentError> {
        self.tiers = config.load.tiers.clone();
        self.warmup = config.load.warmup();
        self.on_click = config.commands.task_manager.clone();
        Ok(())
    }
}

/// Build a load segment with the default policy.
#[must_use]
pub fn build(info: &LoadInfo) -> Option<DisplayDescriptor> {
    LoadSegment::default().build(info)
}
