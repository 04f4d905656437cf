//! Clock segment.

use barseg_core::{ClickAction, ColorName, DisplayDescriptor, GlobalConfig, Segment, SegmentError};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Write};

/// Format used when the configured one cannot be rendered.
pub const DEFAULT_FORMAT: &str = "%a %b %-d %H:%M:%S";

/// Clock snapshot: a timestamp with its UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClockTime {
    pub time: DateTime<FixedOffset>,
}

impl ClockTime {
    /// The current local time.
    #[must_use]
    pub fn now() -> Self {
        Local::now().into()
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for ClockTime {
    fn from(time: DateTime<Tz>) -> Self {
        Self {
            time: time.fixed_offset(),
        }
    }
}

/// Check that `format` is a valid strftime pattern.
///
/// # Errors
///
/// Returns a config error naming the pattern if it is empty or contains an
/// unknown specifier.
pub fn validate_format(format: &str) -> Result<(), SegmentError> {
    if format.is_empty() || StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(SegmentError::config_with_value(
            "invalid clock format",
            format,
        ));
    }
    Ok(())
}

/// Render `time` with `format`, falling back to [`DEFAULT_FORMAT`].
pub fn format_time<Tz>(time: &DateTime<Tz>, format: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut text = String::new();
    if write!(text, "{}", time.format(format)).is_ok() {
        return text;
    }
    tracing::debug!(format, "clock format failed, using default");
    text.clear();
    // The default pattern is always valid.
    let _ = write!(text, "{}", time.format(DEFAULT_FORMAT));
    text
}

/// Builds the clock segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockSegment {
    format: String,
    on_click: ClickAction,
}

impl Default for ClockSegment {
    fn default() -> Self {
        let config = GlobalConfig::default();
        Self {
            format: config.clock.format,
            on_click: config.commands.calendar,
        }
    }
}

impl ClockSegment {
    /// # Errors
    ///
    /// Returns an error if `format` is not a valid strftime pattern.
    pub fn new(format: impl Into<String>, on_click: ClickAction) -> Result<Self, SegmentError> {
        let format = format.into();
        validate_format(&format)?;
        Ok(Self { format, on_click })
    }
}

impl Segment for ClockSegment {
    type Snapshot = ClockTime;

    fn name(&self) -> &str {
        "clock"
    }

    fn build(&self, now: &ClockTime) -> Option<DisplayDescriptor> {
        Some(
            DisplayDescriptor::new("mdi-clock", format_time(&now.time, &self.format))
                .with_icon_color(ColorName::DimIcon)
                .with_tooltip(now.time.format("%A, %-d %B %Y").to_string())
                .with_click_action(self.on_click.clone()),
        )
    }

    fn configure(&mut self, config: &GlobalConfig) -> Result<(), SegmentError> {
        validate_format(&config.clock.format)?;
        self.format.clone_from(&config.clock.format);
        self.on_click = config.commands.calendar.clone();
        Ok(())
    }
}

/// Build a clock segment with the default pattern.
#[must_use]
pub fn build(now: &ClockTime) -> Option<DisplayDescriptor> {
    ClockSegment::default().build(now)
}
