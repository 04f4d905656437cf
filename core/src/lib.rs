//! # barseg-core
//!
//! Core library for barseg, the status bar segment suite. It holds the
//! metric-to-display transformation primitives and the types every segment
//! builder shares.
//!
//! ## Features
//!
//! - **Display descriptors** - Renderer-agnostic output of every segment
//! - **Tiered classification** - Data-driven severity policies ([`tier`])
//! - **Formatting primitives** - Truncation, elapsed time, continuous scaling ([`format`])
//! - **Configuration management** - RON config with color scheme, icons and policies
//! - **Waybar rendering** - Pango markup and JSON output ([`render`])
//! - **Error handling** - One error type for the fallible edges
//!
//! ## Quick Start
//!
//! ```rust
//! use barseg_core::{DisplayDescriptor, GlobalConfig, Segment, SegmentError};
//! use barseg_core::tier::{Severity, Tiers};
//!
//! // A segment for a fan speed snapshot, in RPM.
//! struct FanSegment {
//!     tiers: Tiers,
//! }
//!
//! impl Segment for FanSegment {
//!     type Snapshot = f64;
//!
//!     fn name(&self) -> &str {
//!         "fan"
//!     }
//!
//!     fn build(&self, rpm: &f64) -> Option<DisplayDescriptor> {
//!         Some(
//!             DisplayDescriptor::new("mdi-fan", format!("{rpm:.0}rpm"))
//!                 .with_severity(self.tiers.classify(*rpm)),
//!         )
//!     }
//!
//!     fn configure(&mut self, _config: &GlobalConfig) -> Result<(), SegmentError> {
//!         Ok(())
//!     }
//! }
//!
//! let fan = FanSegment { tiers: Tiers::empty() };
//! let out = fan.build(&1200.0).unwrap();
//! assert_eq!(out.primary_text, "1200rpm");
//! assert_eq!(out.severity, Some(Severity::Normal));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod config;
pub mod error;
pub mod format;
pub mod render;
pub mod tier;

pub use config::{ColorScheme, GlobalConfig, IconPosition, IconRegistry, IconStyle, ParseOptionError};
pub use error::SegmentError;
pub use render::{WaybarOutput, WaybarRenderer};
pub use tier::{Severity, Tiers};

/// Symbolic color names resolved by a [`ColorScheme`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorName {
    /// Favorable state
    Good,
    /// Mildly concerning state
    Degraded,
    /// Concerning state
    Bad,
    /// De-emphasized icon
    DimIcon,
    /// Highlight color (media icon)
    Accent,
}

impl ColorName {
    /// Color used for a whole segment in the given tier.
    ///
    /// Normal has no color, and Urgent is carried by the urgent flag instead.
    #[must_use]
    pub const fn for_severity(severity: Severity) -> Option<Self> {
        match severity {
            Severity::Good => Some(Self::Good),
            Severity::Degraded => Some(Self::Degraded),
            Severity::Bad => Some(Self::Bad),
            Severity::Normal | Severity::Urgent => None,
        }
    }
}

impl fmt::Display for ColorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Good => "good",
            Self::Degraded => "degraded",
            Self::Bad => "bad",
            Self::DimIcon => "dim-icon",
            Self::Accent => "accent",
        };
        f.write_str(name)
    }
}

/// Color of a glyph: either a scheme entry or a computed grey level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    /// Resolved through the renderer's color scheme
    Named(ColorName),
    /// Raw grey intensity, `#nnnnnn`
    Grey(u8),
}

impl Color {
    /// Hex form of a grey intensity, e.g. `#373737`.
    #[must_use]
    pub fn grey_hex(level: u8) -> String {
        format!("#{level:02x}{level:02x}{level:02x}")
    }
}

impl From<ColorName> for Color {
    fn from(name: ColorName) -> Self {
        Self::Named(name)
    }
}

/// An icon key plus its optional color.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Glyph {
    /// Icon registry key such as `mdi-download-network`
    pub id: String,
    /// Color override for this glyph
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl Glyph {
    #[must_use]
    pub fn new(id: impl Into<String>, color: Option<Color>) -> Self {
        Self {
            id: id.into(),
            color,
        }
    }
}

/// Mouse button a click action is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    #[default]
    Left,
    Middle,
    Right,
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Left => "left",
            Self::Middle => "middle",
            Self::Right => "right",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for MouseButton {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "middle" => Ok(Self::Middle),
            "right" => Ok(Self::Right),
            _ => Err(ParseOptionError {
                input: s.to_owned(),
                valid_options: &["left", "middle", "right"],
            }),
        }
    }
}

/// A command to launch when the segment is clicked.
///
/// This is only a description; launching is the click dispatcher's job.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClickAction {
    /// Button that triggers the command
    #[serde(default)]
    pub button: MouseButton,
    /// Program to execute
    pub program: String,
    /// Arguments passed to the program
    #[serde(default)]
    pub args: Vec<String>,
}

impl ClickAction {
    /// Launch `program` on a left click.
    #[must_use]
    pub fn run_left(program: impl Into<String>) -> Self {
        Self {
            button: MouseButton::Left,
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Add an argument.
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Human readable command line, for tooltips and logs.
    #[must_use]
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Renderer-agnostic output of a segment builder.
///
/// A builder returns `Option<DisplayDescriptor>`; `None` means the segment
/// should be hidden.
///
/// # Examples
///
/// ```rust
/// use barseg_core::{ClickAction, ColorName, DisplayDescriptor, Severity};
///
/// let out = DisplayDescriptor::new("mdi-heart-pulse", "0.42")
///     .with_icon_color(ColorName::DimIcon)
///     .with_severity(Severity::Normal)
///     .with_click_action(ClickAction::run_left("gnome-system-monitor"));
///
/// assert_eq!(out.icon_id, "mdi-heart-pulse");
/// assert!(!out.is_urgent());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DisplayDescriptor {
    /// Icon registry key of the leading glyph
    pub icon_id: String,
    /// Color of the leading glyph
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_color: Option<Color>,
    /// Further glyphs drawn after the leading one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_icons: Vec<Glyph>,
    /// Main text
    pub primary_text: String,
    /// Text drawn between the icons and the main text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_text: Option<String>,
    /// Longer text for hover, if the segment has any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    /// Fill level (0-100) for renderers that draw gauges
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<u8>,
    /// Severity tier; `None` for segments that are never classified
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    /// Command to run on click
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_action: Option<ClickAction>,
}

impl DisplayDescriptor {
    /// Create a descriptor with an icon and main text.
    #[must_use]
    pub fn new(icon_id: impl Into<String>, primary_text: impl Into<String>) -> Self {
        Self {
            icon_id: icon_id.into(),
            icon_color: None,
            extra_icons: Vec::new(),
            primary_text: primary_text.into(),
            secondary_text: None,
            tooltip: None,
            percentage: None,
            severity: None,
            click_action: None,
        }
    }

    #[must_use]
    pub fn with_icon_color(mut self, color: impl Into<Color>) -> Self {
        self.icon_color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_extra_icon(mut self, glyph: Glyph) -> Self {
        self.extra_icons.push(glyph);
        self
    }

    #[must_use]
    pub fn with_secondary_text(mut self, text: impl Into<String>) -> Self {
        self.secondary_text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Add a fill level.
    ///
    /// # Panics
    ///
    /// Panics if `percentage` is greater than 100.
    #[must_use]
    pub fn with_percentage(mut self, percentage: u8) -> Self {
        assert!(
            percentage <= 100,
            "Percentage must be <= 100, got {}",
            percentage
        );
        self.percentage = Some(percentage);
        self
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    #[must_use]
    pub fn with_click_action(mut self, action: ClickAction) -> Self {
        self.click_action = Some(action);
        self
    }

    /// All glyphs in drawing order.
    pub fn glyphs(&self) -> impl Iterator<Item = (&str, Option<Color>)> {
        std::iter::once((self.icon_id.as_str(), self.icon_color))
            .chain(self.extra_icons.iter().map(|g| (g.id.as_str(), g.color)))
    }

    /// Whether the segment should carry the urgent flag.
    #[must_use]
    pub fn is_urgent(&self) -> bool {
        self.severity.is_some_and(Severity::is_urgent)
    }
}

/// Trait for all segment builders.
///
/// A segment turns one metric snapshot into a [`DisplayDescriptor`]. Builds
/// are pure: they read only the snapshot and the segment's own policy, so a
/// segment can be shared between threads and called for every update.
pub trait Segment: Send + Sync {
    /// Metric snapshot this segment consumes.
    type Snapshot;

    /// Get the unique name of this segment, as used on the command line and
    /// in config.
    fn name(&self) -> &str;

    /// Build the display for a snapshot, or `None` to hide the segment.
    fn build(&self, snapshot: &Self::Snapshot) -> Option<DisplayDescriptor>;

    /// Apply the relevant part of the global configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured policy is invalid.
    fn configure(&mut self, config: &GlobalConfig) -> Result<(), SegmentError>;
}
