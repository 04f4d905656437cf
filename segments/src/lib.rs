//! # barseg-segments
//!
//! One builder per metric, turning a snapshot into a
//! [`DisplayDescriptor`](barseg_core::DisplayDescriptor):
//!
//! - [`battery`] - charge icon by decile, low-charge tiers
//! - [`load`] - 5 minute load average with a boot warm-up window
//! - [`memory`] - available memory, including a favorable tier
//! - [`thermal`] - CPU temperature
//! - [`network`] - upload and download brightness
//! - [`media`] - now playing, fitted to a character budget
//! - [`clock`] - local time
//!
//! Every builder is a pure function of its snapshot and policy. The free
//! `build` function in each module uses the default policy; the segment
//! structs take theirs from [`GlobalConfig`].
//!
//! ```rust
//! use barseg_segments::{MetricSnapshot, SegmentSet};
//! use barseg_core::{GlobalConfig, Severity};
//!
//! let set = SegmentSet::from_config(&GlobalConfig::default()).unwrap();
//! let snapshot = MetricSnapshot::from_json_line(
//!     r#"{"kind":"battery","remaining_percent":12,"status":"discharging"}"#,
//! )
//! .unwrap();
//!
//! let out = set.build(&snapshot).unwrap();
//! assert_eq!(out.icon_id, "mdi-battery-10");
//! assert_eq!(out.severity, Some(Severity::Bad));
//! ```

use barseg_core::config::CommandConfig;
use barseg_core::{ClickAction, DisplayDescriptor, GlobalConfig, Segment, SegmentError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod battery;
pub mod clock;
pub mod load;
pub mod media;
pub mod memory;
pub mod network;
pub mod thermal;

pub use battery::{BatteryInfo, BatterySegment, BatteryStatus};
pub use clock::{ClockSegment, ClockTime};
pub use load::{LoadInfo, LoadSegment};
pub use media::{MediaInfo, MediaSegment, PlaybackStatus};
pub use memory::{MemoryInfo, MemorySegment};
pub use network::{NetworkSegment, NetworkSpeed};
pub use thermal::{TemperatureInfo, TemperatureSegment};

/// Durations as fractional seconds. Negative or NaN input reads as zero.
pub(crate) mod secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        if !(secs > 0.0) {
            return Ok(Duration::ZERO);
        }
        Ok(Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX))
    }
}

/// Integers that saturate at the target type's bounds instead of failing.
/// Fractions are truncated and NaN reads as zero.
pub(crate) mod saturating {
    use serde::{de, Deserializer};
    use std::fmt;

    struct Wide;

    impl de::Visitor<'_> for Wide {
        type Value = i128;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i128, E> {
            Ok(i128::from(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i128, E> {
            Ok(i128::from(v))
        }

        #[allow(clippy::cast_possible_truncation)]
        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i128, E> {
            // `as` saturates and maps NaN to zero.
            Ok(v as i128)
        }
    }

    fn wide<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i128, D::Error> {
        deserializer.deserialize_any(Wide)
    }

    pub fn to_i32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
        let v = wide(deserializer)?;
        Ok(i32::try_from(v).unwrap_or(if v < 0 { i32::MIN } else { i32::MAX }))
    }

    pub fn to_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let v = wide(deserializer)?;
        Ok(u64::try_from(v).unwrap_or(if v < 0 { 0 } else { u64::MAX }))
    }
}

/// A metric sample of any kind, tagged by `kind` on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetricSnapshot {
    Battery(BatteryInfo),
    Load(LoadInfo),
    Memory(MemoryInfo),
    Temperature(TemperatureInfo),
    Network(NetworkSpeed),
    Media(MediaInfo),
    Clock(ClockTime),
}

impl MetricSnapshot {
    /// Decode one JSON line.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::Parse`] if the line is not a valid snapshot.
    pub fn from_json_line(line: &str) -> Result<Self, SegmentError> {
        serde_json::from_str(line.trim())
            .map_err(|e| SegmentError::parse_with_source("invalid metric snapshot", e))
    }

    /// Which segment consumes this snapshot.
    #[must_use]
    pub const fn kind(&self) -> SegmentKind {
        match self {
            Self::Battery(_) => SegmentKind::Battery,
            Self::Load(_) => SegmentKind::Load,
            Self::Memory(_) => SegmentKind::Memory,
            Self::Temperature(_) => SegmentKind::Temperature,
            Self::Network(_) => SegmentKind::Network,
            Self::Media(_) => SegmentKind::Media,
            Self::Clock(_) => SegmentKind::Clock,
        }
    }
}

/// Segment names, as used on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Battery,
    Load,
    Memory,
    Temperature,
    Network,
    Media,
    Clock,
}

impl SegmentKind {
    pub const ALL: [Self; 7] = [
        Self::Battery,
        Self::Load,
        Self::Memory,
        Self::Temperature,
        Self::Network,
        Self::Media,
        Self::Clock,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Battery => "battery",
            Self::Load => "load",
            Self::Memory => "memory",
            Self::Temperature => "temperature",
            Self::Network => "network",
            Self::Media => "media",
            Self::Clock => "clock",
        }
    }

    /// The configured click command for this segment, if it has one.
    #[must_use]
    pub const fn click_action(self, commands: &CommandConfig) -> Option<&ClickAction> {
        match self {
            Self::Load | Self::Memory => Some(&commands.task_manager),
            Self::Clock => Some(&commands.calendar),
            _ => None,
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unknown segment name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown segment '{0}'. Valid segments: battery, load, memory, temperature, network, media, clock")]
pub struct UnknownSegment(pub String);

impl FromStr for SegmentKind {
    type Err = UnknownSegment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "battery" | "bat" => Ok(Self::Battery),
            "load" => Ok(Self::Load),
            "memory" | "mem" => Ok(Self::Memory),
            "temperature" | "temp" | "thermal" => Ok(Self::Temperature),
            "network" | "net" => Ok(Self::Network),
            "media" => Ok(Self::Media),
            "clock" => Ok(Self::Clock),
            _ => Err(UnknownSegment(s.to_owned())),
        }
    }
}

/// All segments, configured once and dispatched by snapshot kind.
#[derive(Debug, Clone, Default)]
pub struct SegmentSet {
    pub battery: BatterySegment,
    pub load: LoadSegment,
    pub memory: MemorySegment,
    pub temperature: TemperatureSegment,
    pub network: NetworkSegment,
    pub media: MediaSegment,
    pub clock: ClockSegment,
}

impl SegmentSet {
    /// Build every segment from the global configuration.
    ///
    /// # Errors
    ///
    /// Returns the first policy a segment rejects.
    pub fn from_config(config: &GlobalConfig) -> Result<Self, SegmentError> {
        let mut set = Self::default();
        configure(&mut set.battery, config)?;
        configure(&mut set.load, config)?;
        configure(&mut set.memory, config)?;
        configure(&mut set.temperature, config)?;
        configure(&mut set.network, config)?;
        configure(&mut set.media, config)?;
        configure(&mut set.clock, config)?;
        Ok(set)
    }

    /// Build the display for `snapshot` with the matching segment.
    #[must_use]
    pub fn build(&self, snapshot: &MetricSnapshot) -> Option<DisplayDescriptor> {
        match snapshot {
            MetricSnapshot::Battery(info) => self.battery.build(info),
            MetricSnapshot::Load(info) => self.load.build(info),
            MetricSnapshot::Memory(info) => self.memory.build(info),
            MetricSnapshot::Temperature(info) => self.temperature.build(info),
            MetricSnapshot::Network(speed) => self.network.build(speed),
            MetricSnapshot::Media(info) => self.media.build(info),
            MetricSnapshot::Clock(now) => self.clock.build(now),
        }
    }
}

fn configure<S: Segment>(segment: &mut S, config: &GlobalConfig) -> Result<(), SegmentError> {
    segment.configure(config).inspect_err(|e| {
        tracing::warn!(segment = segment.name(), error = %e, "segment rejected its policy");
    })?;
    tracing::debug!(segment = segment.name(), "configured");
    Ok(())
}
