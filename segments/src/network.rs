//! Network throughput segment.
//!
//! Shows no text: upload and download are two icons whose brightness tracks
//! the current rate.

use barseg_core::format::grey_intensity;
use barseg_core::{Color, DisplayDescriptor, GlobalConfig, Glyph, Segment, SegmentError};
use serde::{Deserialize, Serialize};

/// Throughput snapshot, in bytes per second.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct NetworkSpeed {
    pub rx_bytes_per_second: f64,
    pub tx_bytes_per_second: f64,
}

impl NetworkSpeed {
    #[must_use]
    pub const fn new(rx_bytes_per_second: f64, tx_bytes_per_second: f64) -> Self {
        Self {
            rx_bytes_per_second,
            tx_bytes_per_second,
        }
    }
}

/// Builds the network segment.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkSegment {
    reference_max: f64,
}

impl Default for NetworkSegment {
    fn default() -> Self {
        Self {
            reference_max: GlobalConfig::default().network.reference_max,
        }
    }
}

impl NetworkSegment {
    #[must_use]
    pub const fn new(reference_max: f64) -> Self {
        Self { reference_max }
    }
}

impl Segment for NetworkSegment {
    type Snapshot = NetworkSpeed;

    fn name(&self) -> &str {
        "network"
    }

    fn build(&self, speed: &NetworkSpeed) -> Option<DisplayDescriptor> {
        let tx = grey_intensity(speed.tx_bytes_per_second, self.reference_max);
        let rx = grey_intensity(speed.rx_bytes_per_second, self.reference_max);
        Some(
            DisplayDescriptor::new("mdi-upload-network", "")
                .with_icon_color(Color::Grey(tx))
                .with_extra_icon(Glyph::new("mdi-download-network", Some(Color::Grey(rx))))
                .with_tooltip(format!(
                    "Up {:.0} B/s, down {:.0} B/s",
                    speed.tx_bytes_per_second, speed.rx_bytes_per_second
                )),
        )
    }

    fn configure(&mut self, config: &GlobalConfig) -> Result<(), SegmentError> {
        let reference_max = config.network.reference_max;
        if !(reference_max > 0.0) {
            return Err(SegmentError::config_with_value(
                "network reference_max must be positive",
                reference_max.to_string(),
            ));
        }
        self.reference_max = reference_max;
        Ok(())
    }
}

/// Build a network segment with the default reference rate.
#[must_use]
pub fn build(speed: &NetworkSpeed) -> Option<DisplayDescriptor> {
    NetworkSegment::default().build(speed)
}
