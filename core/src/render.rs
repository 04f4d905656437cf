//! Waybar rendering of display descriptors.
//!
//! [`WaybarRenderer`] resolves a descriptor against the explicit color scheme
//! and icon registry from the config and produces the JSON object Waybar
//! expects from a custom module, with Pango markup in `text`.

use serde::{Deserialize, Serialize};

use crate::config::{ColorScheme, GlobalConfig, IconPosition, IconRegistry, IconStyle};
use crate::format::escape_markup;
use crate::tier::Severity;
use crate::{Color, ColorName, DisplayDescriptor};

/// Standard Waybar output format compliant with Waybar's JSON protocol.
///
/// All fields except `text` are optional and will be omitted from JSON
/// serialization if they are `None`. An empty `text` hides the module.
///
/// # Examples
///
/// ```rust
/// use barseg_core::WaybarOutput;
///
/// let output = WaybarOutput::new("50%".to_string())
///     .with_tooltip("Battery: 50%")
///     .with_class("degraded")
///     .with_percentage(50);
///
/// assert_eq!(
///     output.to_json_line().unwrap(),
///     r#"{"text":"50%","tooltip":"Battery: 50%","class":"degraded","percentage":50}"#
/// );
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WaybarOutput {
    /// The main text to display in the bar
    pub text: String,
    /// Optional tooltip text shown on hover
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    /// Optional CSS class for styling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Optional percentage value (0-100) for progress indicators
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<u8>,
}

impl WaybarOutput {
    /// Create a new WaybarOutput with just the required text field.
    #[must_use]
    pub const fn new(text: String) -> Self {
        Self {
            text,
            tooltip: None,
            class: None,
            percentage: None,
        }
    }

    /// Output that makes Waybar hide the module.
    #[must_use]
    pub const fn hidden() -> Self {
        Self::new(String::new())
    }

    /// Add a tooltip to this output.
    #[must_use]
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Add a CSS class to this output.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Add a percentage value to this output.
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

    /// Whether Waybar will hide this output.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.text.is_empty()
    }

    /// Serialize to a single JSON line (without the trailing newline).
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// CSS class names for each severity tier.
///
/// These should correspond to styling definitions in your Waybar CSS.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    /// CSS class for the favorable tier
    pub good: String,
    /// CSS class for the degraded tier
    pub degraded: String,
    /// CSS class for the bad tier
    pub bad: String,
    /// CSS class for the urgent tier
    pub urgent: String,
}

impl Theme {
    /// Get the class name for a tier; Normal has none.
    #[must_use]
    pub fn class_for(&self, severity: Severity) -> Option<&str> {
        match severity {
            Severity::Good => Some(&self.good),
            Severity::Normal => None,
            Severity::Degraded => Some(&self.degraded),
            Severity::Bad => Some(&self.bad),
            Severity::Urgent => Some(&self.urgent),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        let name = |s: Severity| s.class().unwrap_or_default().to_owned();
        Self {
            good: name(Severity::Good),
            degraded: name(Severity::Degraded),
            bad: name(Severity::Bad),
            urgent: name(Severity::Urgent),
        }
    }
}

/// Turns descriptors into [`WaybarOutput`].
///
/// # Examples
///
/// ```rust
/// use barseg_core::{ColorName, DisplayDescriptor, Severity, WaybarRenderer};
///
/// let renderer = WaybarRenderer::default();
/// let out = renderer.render(Some(
///     &DisplayDescriptor::new("mdi-fan", "75℃")
///         .with_icon_color(ColorName::DimIcon)
///         .with_severity(Severity::Bad),
/// ));
///
/// assert_eq!(
///     out.text,
///     "<span color=\"#777\">\u{f0210}</span> <span color=\"#d66\">75℃</span>"
/// );
/// assert_eq!(out.class.as_deref(), Some("bad"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WaybarRenderer {
    scheme: ColorScheme,
    icons: IconRegistry,
    theme: Theme,
    icon_style: IconStyle,
    icon_position: IconPosition,
    icon_spacing: u8,
}

impl WaybarRenderer {
    /// Build a renderer from the global configuration.
    #[must_use]
    pub fn from_config(config: &GlobalConfig) -> Self {
        Self {
            scheme: config.colors.clone(),
            icons: config.icons.clone(),
            theme: Theme::default(),
            icon_style: config.icon_style,
            icon_position: config.icon_position,
            icon_spacing: config.icon_spacing,
        }
    }

    /// Replace the CSS class names.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Render a builder result; `None` renders as a hidden module.
    #[must_use]
    pub fn render(&self, descriptor: Option<&DisplayDescriptor>) -> WaybarOutput {
        let Some(descriptor) = descriptor else {
            return WaybarOutput::hidden();
        };

        let segment_color = descriptor
            .severity
            .and_then(ColorName::for_severity)
            .map(|name| self.scheme.get(name).to_owned());

        let icons = self.render_icons(descriptor, segment_color.as_deref());
        let texts: Vec<String> = descriptor
            .secondary_text
            .iter()
            .chain(std::iter::once(&descriptor.primary_text))
            .filter(|text| !text.is_empty())
            .map(|text| colored(&escape_markup(text), segment_color.as_deref()))
            .collect();

        let parts = match self.icon_position {
            IconPosition::Before => icons.into_iter().chain(texts).collect::<Vec<_>>(),
            IconPosition::After => texts.into_iter().chain(icons).collect::<Vec<_>>(),
        };
        let spacer = " ".repeat(usize::from(self.icon_spacing));

        let mut output = WaybarOutput::new(parts.join(&spacer));
        if let Some(class) = descriptor.severity.and_then(|s| self.theme.class_for(s)) {
            output = output.with_class(class);
        }
        if let Some(percentage) = descriptor.percentage {
            output = output.with_percentage(percentage.min(100));
        }
        if let Some(tooltip) = self.tooltip(descriptor) {
            output = output.with_tooltip(tooltip);
        }
        output
    }

    fn render_icons(&self, descriptor: &DisplayDescriptor, fallback: Option<&str>) -> Vec<String> {
        if self.icon_style == IconStyle::None {
            return Vec::new();
        }

        descriptor
            .glyphs()
            .filter_map(|(id, color)| {
                let glyph = self.icons.resolve(id)?;
                if glyph.trim().is_empty() {
                    return None;
                }
                let color = color.map(|c| self.resolve(c));
                Some(colored(&escape_markup(glyph), color.as_deref().or(fallback)))
            })
            .collect()
    }

    fn resolve(&self, color: Color) -> String {
        self.scheme.resolve(color)
    }

    fn tooltip(&self, descriptor: &DisplayDescriptor) -> Option<String> {
        let mut lines = Vec::new();
        if let Some(tooltip) = &descriptor.tooltip {
            lines.push(escape_markup(tooltip));
        }
        if let Some(action) = &descriptor.click_action {
            lines.push(format!("Click: {}", escape_markup(&action.command_line())));
        }
        (!lines.is_empty()).then(|| lines.join("\n"))
    }
}

impl Default for WaybarRenderer {
    fn default() -> Self {
        Self::from_config(&GlobalConfig::default())
    }
}

fn colored(text: &str, color: Option<&str>) -> String {
    match color {
        Some(color) => format!("<span color=\"{color}\">{text}</span>"),
        None => text.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClickAction, Glyph};

    #[test]
    fn hidden_when_no_descriptor() {
        let out = WaybarRenderer::default().render(None);
        assert!(out.is_hidden());
        assert_eq!(out.to_json_line().unwrap(), r#"{"text":""}"#);
    }

    #[test]
    fn plain_segment_without_severity() {
        let out = WaybarRenderer::default().render(Some(&DisplayDescriptor::new(
            "mdi-clock",
            "Mon Jan 2 15:04:05",
        )));
        assert_eq!(out.text, "\u{f0954} Mon Jan 2 15:04:05");
        assert_eq!(out.class, None);
        assert_eq!(out.tooltip, None);
    }

    #[test]
    fn normal_severity_has_no_class_or_color() {
        let out = WaybarRenderer::default().render(Some(
            &DisplayDescriptor::new("mdi-fan", "40℃").with_severity(Severity::Normal),
        ));
        assert_eq!(out.text, "\u{f0210} 40℃");
        assert_eq!(out.class, None);
    }

    #[test]
    fn urgent_sets_class_but_no_color() {
        let out = WaybarRenderer::default().render(Some(
            &DisplayDescriptor::new("mdi-battery-outline", "3%").with_severity(Severity::Urgent),
        ));
        assert_eq!(out.text, "\u{f008e} 3%");
        assert_eq!(out.class.as_deref(), Some("urgent"));
    }

    #[test]
    fn severity_colors_uncolored_icons_too() {
        let out = WaybarRenderer::default().render(Some(
            &DisplayDescriptor::new("mdi-battery-10", "12%").with_severity(Severity::Bad),
        ));
        assert_eq!(
            out.text,
            "<span color=\"#d66\">\u{f007a}</span> <span color=\"#d66\">12%</span>"
        );
    }

    #[test]
    fn grey_glyphs_and_no_text() {
        let descriptor = DisplayDescriptor::new("mdi-upload-network", "")
            .with_icon_color(Color::Grey(0x37))
            .with_extra_icon(Glyph::new("mdi-download-network", Some(Color::Grey(0xff))));
        let out = WaybarRenderer::default().render(Some(&descriptor));
        assert_eq!(
            out.text,
            "<span color=\"#373737\">\u{f06f6}</span> <span color=\"#ffffff\">\u{f06f4}</span>"
        );
    }

    #[test]
    fn secondary_text_comes_before_primary_and_is_escaped() {
        let descriptor = DisplayDescriptor::new("fa-music", "Me & You - <Band>")
            .with_icon_color(ColorName::Accent)
            .with_secondary_text("1:15/3:30");
        let out = WaybarRenderer::default().render(Some(&descriptor));
        assert_eq!(
            out.text,
            "<span color=\"#f70\">\u{f001}</span> 1:15/3:30 Me &amp; You - &lt;Band&gt;"
        );
    }

    #[test]
    fn icon_position_and_spacing_follow_config() {
        let mut config = GlobalConfig::default();
        config.icon_position = IconPosition::After;
        config.icon_spacing = 2;
        let out = WaybarRenderer::from_config(&config)
            .render(Some(&DisplayDescriptor::new("mdi-clock", "now")));
        assert_eq!(out.text, "now  \u{f0954}");
    }

    #[test]
    fn icon_style_none_drops_glyphs() {
        let mut config = GlobalConfig::default();
        config.icon_style = IconStyle::None;
        let out = WaybarRenderer::from_config(&config)
            .render(Some(&DisplayDescriptor::new("mdi-clock", "now")));
        assert_eq!(out.text, "now");
    }

    #[test]
    fn unknown_icons_are_dropped() {
        let out = WaybarRenderer::default()
            .render(Some(&DisplayDescriptor::new("mdi-does-not-exist", "x")));
        assert_eq!(out.text, "x");
    }

    #[test]
    fn custom_scheme_and_theme() {
        let mut config = GlobalConfig::default();
        config.colors.degraded = "#ffaa00".to_owned();
        let theme = Theme {
            degraded: "warning".to_owned(),
            ..Theme::default()
        };
        let out = WaybarRenderer::from_config(&config).with_theme(theme).render(Some(
            &DisplayDescriptor::new("mdi-heart-pulse", "2.00")
                .with_icon_color(ColorName::DimIcon)
                .with_severity(Severity::Degraded),
        ));
        assert_eq!(out.class.as_deref(), Some("warning"));
        assert!(out.text.ends_with("<span color=\"#ffaa00\">2.00</span>"));
        assert!(out.text.starts_with("<span color=\"#777\">"));
    }

    #[test]
    fn glyph_overrides_are_escaped() {
        let mut config = GlobalConfig::default();
        config.icons = config.icons.with_icon("mdi-memory", "<&>");
        config.icon_style = IconStyle::NerdFont;
        let out = WaybarRenderer::from_config(&config)
            .render(Some(&DisplayDescriptor::new("mdi-memory", "1.0GiB")));
        assert_eq!(out.text, "&lt;&amp;&gt; 1.0GiB");
    }

    #[test]
    fn tooltip_and_percentage() {
        let descriptor = DisplayDescriptor::new("mdi-memory", "3.0GiB")
            .with_tooltip("Song & Dance")
            .with_percentage(42)
            .with_click_action(ClickAction::run_left("gnome-system-monitor"));
        let out = WaybarRenderer::default().render(Some(&descriptor));
        assert_eq!(
            out.tooltip.as_deref(),
            Some("Song &amp; Dance\nClick: gnome-system-monitor")
        );
        assert_eq!(out.percentage, Some(42));
    }
}
