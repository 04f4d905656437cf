//! Configuration loaded from `~/.config/barseg/config.ron`.
//!
//! The file carries the explicit color scheme and icon registry handed to the
//! renderer, the click commands, and the per-segment policies (threshold
//! tiers, ceilings, truncation budgets). Every field has a default, so an
//! empty `()` file is a valid config.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::tier::Tiers;
use crate::{ClickAction, Color, ColorName, SegmentError};

/// Global configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Color scheme used to resolve named colors
    pub colors: ColorScheme,
    /// Icon style
    pub icon_style: IconStyle,
    /// Icon position (before or after the text)
    pub icon_position: IconPosition,
    /// Number of spaces between glyphs and text
    pub icon_spacing: u8,
    /// Overrides for the icon registry
    pub icons: IconRegistry,
    /// External commands attached to click actions
    pub commands: CommandConfig,
    /// Battery segment policy
    pub battery: BatteryPolicy,
    /// Load average segment policy
    pub load: LoadPolicy,
    /// Memory segment policy
    pub memory: MemoryPolicy,
    /// Temperature segment policy
    pub temperature: TemperaturePolicy,
    /// Network throughput segment policy
    pub network: NetworkPolicy,
    /// Media segment policy
    pub media: MediaPolicy,
    /// Clock segment policy
    pub clock: ClockPolicy,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            colors: ColorScheme::default(),
            icon_style: IconStyle::default(),
            icon_position: IconPosition::default(),
            icon_spacing: 1,
            icons: IconRegistry::default(),
            commands: CommandConfig::default(),
            battery: BatteryPolicy::default(),
            load: LoadPolicy::default(),
            memory: MemoryPolicy::default(),
            temperature: TemperaturePolicy::default(),
            network: NetworkPolicy::default(),
            media: MediaPolicy::default(),
            clock: ClockPolicy::default(),
        }
    }
}

/// Named colors handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ColorScheme {
    pub good: String,
    pub degraded: String,
    pub bad: String,
    pub dim_icon: String,
    pub accent: String,
}

impl ColorScheme {
    /// Hex color for a scheme entry.
    #[must_use]
    pub fn get(&self, name: ColorName) -> &str {
        match name {
            ColorName::Good => &self.good,
            ColorName::Degraded => &self.degraded,
            ColorName::Bad => &self.bad,
            ColorName::DimIcon => &self.dim_icon,
            ColorName::Accent => &self.accent,
        }
    }

    /// Resolve any [`Color`] to a markup color string.
    #[must_use]
    pub fn resolve(&self, color: Color) -> String {
        match color {
            Color::Named(name) => self.get(name).to_owned(),
            Color::Grey(level) => Color::grey_hex(level),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            good: "#6d6".to_owned(),
            degraded: "#dd6".to_owned(),
            bad: "#d66".to_owned(),
            dim_icon: "#777".to_owned(),
            accent: "#f70".to_owned(),
        }
    }
}

/// Maps icon keys emitted by the builders to Nerd Font glyphs.
///
/// User entries take precedence over the built-in table. Unknown keys resolve
/// to `None` and the renderer drops the glyph.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct IconRegistry {
    overrides: BTreeMap<String, String>,
}

impl IconRegistry {
    /// Add or replace an entry.
    #[must_use]
    pub fn with_icon(mut self, id: impl Into<String>, glyph: impl Into<String>) -> Self {
        self.overrides.insert(id.into(), glyph.into());
        self
    }

    /// Glyph for an icon key.
    #[must_use]
    pub fn resolve(&self, id: &str) -> Option<&str> {
        self.overrides
            .get(id)
            .map(String::as_str)
            .or_else(|| builtin_glyph(id))
    }
}

// Nerd Font code points for every key the builders emit.
fn builtin_glyph(id: &str) -> Option<&'static str> {
    let glyph = match id {
        "mdi-battery" => "\u{f0079}",
        "mdi-battery-outline" => "\u{f008e}",
        "mdi-battery-10" => "\u{f007a}",
        "mdi-battery-20" => "\u{f007b}",
        "mdi-battery-30" => "\u{f007c}",
        "mdi-battery-40" => "\u{f007d}",
        "mdi-battery-50" => "\u{f007e}",
        "mdi-battery-60" => "\u{f007f}",
        "mdi-battery-70" => "\u{f0080}",
        "mdi-battery-80" => "\u{f0081}",
        "mdi-battery-90" => "\u{f0082}",
        "mdi-battery-charging" => "\u{f0084}",
        "mdi-battery-charging-outline" => "\u{f089f}",
        "mdi-battery-charging-10" => "\u{f089c}",
        "mdi-battery-charging-20" => "\u{f0086}",
        "mdi-battery-charging-30" => "\u{f0087}",
        "mdi-battery-charging-40" => "\u{f0088}",
        "mdi-battery-charging-50" => "\u{f089d}",
        "mdi-battery-charging-60" => "\u{f0089}",
        "mdi-battery-charging-70" => "\u{f089e}",
        "mdi-battery-charging-80" => "\u{f008a}",
        "mdi-battery-charging-90" => "\u{f008b}",
        "mdi-heart-pulse" => "\u{f05f6}",
        "mdi-memory" => "\u{f035b}",
        "mdi-fan" => "\u{f0210}",
        "mdi-upload-network" => "\u{f06f6}",
        "mdi-download-network" => "\u{f06f4}",
        "mdi-clock" => "\u{f0954}",
        "fa-music" => "\u{f001}",
        _ => return None,
    };
    Some(glyph)
}

/// Commands launched by click actions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CommandConfig {
    /// Opened from the load and memory segments
    pub task_manager: ClickAction,
    /// Opened from the clock segment
    pub calendar: ClickAction,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            task_manager: ClickAction::run_left("gnome-system-monitor"),
            calendar: ClickAction::run_left("gsimplecal"),
        }
    }
}

/// Battery thresholds, on remaining percent.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BatteryPolicy {
    pub tiers: Tiers,
}

impl Default for BatteryPolicy {
    fn default() -> Self {
        Self {
            tiers: Tiers::battery(),
        }
    }
}

/// Load average thresholds and boot warm-up window.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoadPolicy {
    pub tiers: Tiers,
    /// Uptime in seconds below which the load is never classified
    pub warmup_secs: u64,
}

impl LoadPolicy {
    #[must_use]
    pub const fn warmup(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.warmup_secs)
    }
}

impl Default for LoadPolicy {
    fn default() -> Self {
        Self {
            tiers: Tiers::load(),
            warmup_secs: 10 * 60,
        }
    }
}

/// Memory thresholds, on available gigabytes.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MemoryPolicy {
    pub tiers: Tiers,
}

impl Default for MemoryPolicy {
    fn default() -> Self {
        Self {
            tiers: Tiers::memory(),
        }
    }
}

/// Temperature thresholds, in Celsius.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TemperaturePolicy {
    pub tiers: Tiers,
}

impl Default for TemperaturePolicy {
    fn default() -> Self {
        Self {
            tiers: Tiers::temperature(),
        }
    }
}

/// Throughput at which the network glyphs reach full brightness.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkPolicy {
    /// Reference ceiling in bytes per second
    pub reference_max: f64,
}

impl Default for NetworkPolicy {
    fn default() -> Self {
        Self {
            reference_max: 100_000.0,
        }
    }
}

/// Character budgets for the media segment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MediaPolicy {
    /// Initial budget for the artist
    pub artist_budget: usize,
    /// Joint budget for artist and title
    pub total_budget: usize,
}

impl Default for MediaPolicy {
    fn default() -> Self {
        Self {
            artist_budget: 20,
            total_budget: 40,
        }
    }
}

/// Clock pattern, in `chrono` strftime syntax.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClockPolicy {
    pub format: String,
}

impl Default for ClockPolicy {
    fn default() -> Self {
        Self {
            format: "%a %b %-d %H:%M:%S".to_owned(),
        }
    }
}

impl GlobalConfig {
    /// Load configuration from the standard config file location.
    ///
    /// Searches for config in:
    /// 1. ~/.config/barseg/config.ron
    /// 2. ~/.barseg/config.ron (fallback)
    ///
    /// Returns default config if no file is found.
    pub fn load() -> Result<Self, SegmentError> {
        if let Some(config_path) = Self::find_config_file() {
            Self::load_from_file(&config_path)
        } else {
            tracing::debug!("no config file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Self, SegmentError> {
        tracing::debug!(path = %path.display(), "loading config");
        let content = std::fs::read_to_string(path)?;
        Self::from_ron(&content)
    }

    /// Parse and validate configuration text.
    pub fn from_ron(content: &str) -> Result<Self, SegmentError> {
        let config: GlobalConfig = ron::from_str(content).map_err(|e| {
            SegmentError::parse_with_source("Failed to parse config file", e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values serde cannot check on its own.
    pub fn validate(&self) -> Result<(), SegmentError> {
        if !(self.network.reference_max > 0.0) {
            return Err(SegmentError::config_with_value(
                "network.reference_max must be positive",
                self.network.reference_max.to_string(),
            ));
        }
        if self.media.artist_budget == 0 || self.media.total_budget == 0 {
            return Err(SegmentError::config("media budgets must be non-zero"));
        }
        if self.media.artist_budget > self.media.total_budget {
            return Err(SegmentError::config_with_value(
                "media.artist_budget cannot exceed media.total_budget",
                self.media.artist_budget.to_string(),
            ));
        }
        for name in [
            ColorName::Good,
            ColorName::Degraded,
            ColorName::Bad,
            ColorName::DimIcon,
            ColorName::Accent,
        ] {
            let value = self.colors.get(name);
            if !is_markup_color(value) {
                return Err(SegmentError::config_with_value(
                    format!("colors.{name} must be #rgb hex or a color name"),
                    value,
                ));
            }
        }
        if self.clock.format.trim().is_empty() {
            return Err(SegmentError::config("clock.format cannot be empty"));
        }
        for action in [&self.commands.task_manager, &self.commands.calendar] {
            if action.program.trim().is_empty() {
                return Err(SegmentError::config("click command program cannot be empty"));
            }
        }
        Ok(())
    }

    /// Find the config file in standard locations.
    pub fn find_config_file() -> Option<PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_path = config_dir.join("barseg").join("config.ron");
            if xdg_path.exists() {
                return Some(xdg_path);
            }
        }

        if let Some(home_dir) = dirs::home_dir() {
            let home_path = home_dir.join(".barseg").join("config.ron");
            if home_path.exists() {
                return Some(home_path);
            }
        }

        None
    }

    /// Get the default config file path for writing.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("barseg").join("config.ron"))
    }

    /// Serialize to pretty RON.
    pub fn to_ron(&self) -> Result<String, SegmentError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| SegmentError::parse_with_source("Failed to serialize config", e))
    }

    /// Save configuration to a specific file path.
    pub fn save_to_file(&self, path: &Path) -> Result<(), SegmentError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// Example configuration: the defaults plus a sample icon override.
    pub fn example_config() -> Self {
        let mut config = Self::default();
        config.icons = IconRegistry::default().with_icon("mdi-clock", "\u{f0150}");
        config
    }

    /// Save the example configuration with a short header to a file.
    pub fn save_example_config_to_file(path: &Path) -> Result<(), SegmentError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let body = Self::example_config().to_ron()?;
        let content = format!("{EXAMPLE_HEADER}{body}\n");
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Hex (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `#rrrrggggbbbb`) or a
/// plain color name such as `orange`.
fn is_markup_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => {
            matches!(hex.len(), 3 | 4 | 6 | 8 | 12) && hex.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => !value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic()),
    }
}

const EXAMPLE_HEADER: &str = "\
// barseg configuration file
// =========================
// Copy this to ~/.config/barseg/config.ron and edit as needed.
// Every field is optional; removed fields fall back to their defaults.
//
// Tier rules are checked top to bottom, most severe first. Bounds are
// above(x), at_least(x), below(x) or at_most(x); tiers are good, degraded,
// bad or urgent. Rules comparing in the same direction must be ordered
// from most to least severe.
//
// Icons map registry keys (e.g. \"mdi-battery-60\") to Nerd Font glyphs;
// RON accepts 5-digit escapes such as \"\\u{F0079}\".

";

/// Icon position relative to the text.
///
/// # Examples
///
/// ```rust
/// use barseg_core::IconPosition;
///
/// let pos: IconPosition = "after".parse().unwrap();
/// assert_eq!(pos, IconPosition::After);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IconPosition {
    /// Glyphs appear before the text
    #[default]
    Before,
    /// Glyphs appear after the text
    After,
}

impl fmt::Display for IconPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Before => "before",
            Self::After => "after",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for IconPosition {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            _ => Err(ParseOptionError {
                input: s.to_owned(),
                valid_options: &["before", "after"],
            }),
        }
    }
}

/// Icon style.
///
/// # Examples
///
/// ```rust
/// use barseg_core::IconStyle;
///
/// assert_eq!("NerdFont".parse::<IconStyle>().unwrap(), IconStyle::NerdFont);
/// assert_eq!("none".parse::<IconStyle>().unwrap(), IconStyle::None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IconStyle {
    /// Nerd Font glyphs from the icon registry
    #[default]
    NerdFont,
    /// No glyphs, text only
    None,
}

impl fmt::Display for IconStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NerdFont => "nerdfont",
            Self::None => "none",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for IconStyle {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nerdfont" => Ok(Self::NerdFont),
            "none" => Ok(Self::None),
            _ => Err(ParseOptionError {
                input: s.to_owned(),
                valid_options: &["nerdfont", "none"],
            }),
        }
    }
}

/// Error for a command line option outside its fixed set of values
/// ([`IconStyle`], [`IconPosition`], [`MouseButton`](crate::MouseButton)).
#[derive(Debug, thiserror::Error)]
#[error("Invalid value '{input}'. Valid options: {}", valid_options.join(", "))]
pub struct ParseOptionError {
    pub(crate) input: String,
    pub(crate) valid_options: &'static [&'static str],
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::Severity;

    #[test]
    fn empty_file_gives_defaults() {
        let config = GlobalConfig::from_ron("()").unwrap();
        assert_eq!(config, GlobalConfig::default());
        assert_eq!(config.load.warmup_secs, 600);
        assert_eq!(config.network.reference_max, 100_000.0);
        assert_eq!(config.media.total_budget, 40);
    }

    #[test]
    fn partial_override() {
        let config = GlobalConfig::from_ron(
            r##"(
                colors: (bad: "#f00"),
                temperature: (tiers: [(bound: above(80.0), tier: urgent)]),
                commands: (calendar: (program: "gnome-calendar")),
            )"##,
        )
        .unwrap();

        assert_eq!(config.colors.bad, "#f00");
        assert_eq!(config.colors.good, "#6d6");
        assert_eq!(config.temperature.tiers.classify(85.0), Severity::Urgent);
        assert_eq!(config.temperature.tiers.classify(75.0), Severity::Normal);
        assert_eq!(config.commands.calendar.program, "gnome-calendar");
        assert_eq!(config.commands.task_manager.program, "gnome-system-monitor");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(GlobalConfig::from_ron("(network: (reference_max: 0.0))").is_err());
        assert!(GlobalConfig::from_ron("(media: (artist_budget: 50, total_budget: 40))").is_err());
        assert!(GlobalConfig::from_ron("(clock: (format: \"  \"))").is_err());
        assert!(GlobalConfig::from_ron(
            "(load: (tiers: [(bound: above(1.0), tier: degraded), (bound: above(8.0), tier: urgent)]))"
        )
        .is_err());
        assert!(GlobalConfig::from_ron("(not_ron").is_err());
    }

    #[test]
    fn colors_must_be_safe_for_markup() {
        for bad in ["", "#12", "#ggg", "red\" foo=\"x", "dark grey"] {
            let mut config = GlobalConfig::default();
            config.colors.accent = bad.to_owned();
            let err = config.validate().unwrap_err();
            assert!(matches!(err, SegmentError::Config { .. }), "{bad:?}");
        }
        for good in ["#f70", "#ff7700", "#ff7700cc", "orange"] {
            let mut config = GlobalConfig::default();
            config.colors.bad = good.to_owned();
            assert!(config.validate().is_ok(), "{good:?}");
        }
    }

    #[test]
    fn ron_round_trip() {
        let config = GlobalConfig::example_config();
        let text = config.to_ron().unwrap();
        assert_eq!(GlobalConfig::from_ron(&text).unwrap(), config);
    }

    #[test]
    fn example_file_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.ron");
        GlobalConfig::save_example_config_to_file(&path).unwrap();

        let loaded = GlobalConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, GlobalConfig::example_config());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GlobalConfig::load_from_file(&dir.path().join("nope.ron")).unwrap_err();
        assert!(matches!(err, SegmentError::Io(_)));
    }

    #[test]
    fn scheme_resolution() {
        let scheme = ColorScheme::default();
        assert_eq!(scheme.resolve(Color::Named(ColorName::DimIcon)), "#777");
        assert_eq!(scheme.resolve(Color::Grey(0x37)), "#373737");
    }

    #[test]
    fn icon_registry_overrides_builtin() {
        let icons = IconRegistry::default().with_icon("mdi-clock", "C");
        assert_eq!(icons.resolve("mdi-clock"), Some("C"));
        assert_eq!(icons.resolve("fa-music"), Some("\u{f001}"));
        assert_eq!(icons.resolve("mdi-unknown"), None);
    }

    #[test]
    fn every_battery_icon_is_registered() {
        let icons = IconRegistry::default();
        for prefix in ["mdi-battery", "mdi-battery-charging"] {
            assert!(icons.resolve(prefix).is_some());
            assert!(icons.resolve(&format!("{prefix}-outline")).is_some());
            for decile in 1..=9 {
                assert!(icons.resolve(&format!("{prefix}-{decile}0")).is_some());
            }
        }
    }

    #[test]
    fn option_parsing() {
        assert_eq!("After".parse::<IconPosition>().unwrap(), IconPosition::After);
        assert!("left".parse::<IconPosition>().is_err());
        assert!("".parse::<IconStyle>().is_err());
        for style in [IconStyle::NerdFont, IconStyle::None] {
            assert_eq!(style.to_string().parse::<IconStyle>().unwrap(), style);
        }
        let err = "emoji".parse::<IconStyle>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid value 'emoji'. Valid options: nerdfont, none");
    }
}
