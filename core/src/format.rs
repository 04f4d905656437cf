//! Formatting primitives shared by the segment builders.
//!
//! Everything in here is total: out-of-range inputs are clamped rather than
//! reported, because a status bar always has to show something.

use std::time::Duration;

/// Marker appended to truncated text.
pub const ELLIPSIS: char = '⋯';

/// Number of steps used when mapping throughput to a grey level.
pub const GREY_STEPS: u32 = 200;

/// Darkest grey a throughput indicator can reach, so idle glyphs stay visible.
pub const GREY_FLOOR: u32 = 55;

/// First code point of the lower block elements (`▀`); levels 1-8 follow it.
const LEVEL_GLYPH_BASE: u32 = 0x2580;

/// Number of non-empty level glyphs.
pub const LEVEL_GLYPHS: u32 = 8;

/// Shorten `text` to at most `max_runes` characters.
///
/// Text that already fits is returned unchanged. Longer text keeps its first
/// `max_runes - 1` characters followed by [`ELLIPSIS`]. Counting is done on
/// `char`s, so multi-byte characters are never split. A budget of zero gives
/// an empty string.
///
/// # Examples
///
/// ```rust
/// use barseg_core::format;
///
/// assert_eq!(format::truncate("Short", 10), "Short");
/// assert_eq!(format::truncate("Bohemian Rhapsody", 8), "Bohemia⋯");
/// assert_eq!(format::truncate("Motörhead", 5), "Motö⋯");
/// assert_eq!(format::truncate("anything", 0), "");
/// ```
#[must_use]
pub fn truncate(text: &str, max_runes: usize) -> String {
    if max_runes == 0 {
        return String::new();
    }

    if text.chars().nth(max_runes).is_none() {
        return text.to_owned();
    }

    let mut out: String = text.chars().take(max_runes - 1).collect();
    out.push(ELLIPSIS);
    out
}

/// Number of characters in `text`.
#[must_use]
pub fn rune_len(text: &str) -> usize {
    text.chars().count()
}

/// Split a duration into whole hours, minutes (0-59) and seconds (0-59).
///
/// Sub-second parts are dropped, never rounded.
#[must_use]
pub const fn hms(d: Duration) -> (u64, u64, u64) {
    let secs = d.as_secs();
    (secs / 3600, (secs / 60) % 60, secs % 60)
}

/// Format an elapsed time as `H:MM:SS`, or `M:SS` below one hour.
///
/// # Examples
///
/// ```rust
/// use barseg_core::format;
/// use std::time::Duration;
///
/// assert_eq!(format::format_elapsed(Duration::from_secs(0)), "0:00");
/// assert_eq!(format::format_elapsed(Duration::from_secs(75)), "1:15");
/// assert_eq!(format::format_elapsed(Duration::from_secs(3725)), "1:02:05");
/// ```
#[must_use]
pub fn format_elapsed(d: Duration) -> String {
    let (h, m, s) = hms(d);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

/// Like [`format_elapsed`] for a signed second count; negatives clamp to zero.
#[must_use]
pub fn format_elapsed_secs(secs: i64) -> String {
    format_elapsed(Duration::from_secs(u64::try_from(secs).unwrap_or(0)))
}

/// Map `value` onto `0..=steps` proportionally to `value_max`.
///
/// `value` is clamped to `[0, value_max]` before scaling and the result is
/// floored. A non-positive `value_max` or a NaN `value` maps to 0.
///
/// # Examples
///
/// ```rust
/// use barseg_core::format;
///
/// assert_eq!(format::scale(0.0, 100_000.0, 200), 0);
/// assert_eq!(format::scale(50_000.0, 100_000.0, 200), 100);
/// assert_eq!(format::scale(100_000.0, 100_000.0, 200), 200);
/// assert_eq!(format::scale(200_000.0, 100_000.0, 200), 200);
/// ```
#[must_use]
pub fn scale(value: f64, value_max: f64, steps: u32) -> u32 {
    if !(value_max > 0.0) || value.is_nan() {
        return 0;
    }
    let clamped = value.clamp(0.0, value_max);
    let scaled = (clamped * f64::from(steps) / value_max).floor();
    (scaled as u32).min(steps)
}

/// Grey intensity for a throughput indicator.
///
/// Brightness grows with `bytes_per_second` and saturates at
/// `reference_max`: idle is `55`, saturated is `255`.
#[must_use]
pub fn grey_intensity(bytes_per_second: f64, reference_max: f64) -> u8 {
    let level = scale(bytes_per_second, reference_max, GREY_STEPS) + GREY_FLOOR;
    u8::try_from(level.min(255)).unwrap_or(u8::MAX)
}

/// Vertical bar glyph for a bounded quantity.
///
/// The value is mapped onto nine levels; level 0 has no glyph, levels 1-8
/// are `▁` through `█`.
///
/// # Examples
///
/// ```rust
/// use barseg_core::format;
///
/// assert_eq!(format::level_glyph(0.0, 100.0), None);
/// assert_eq!(format::level_glyph(50.0, 100.0), Some('▄'));
/// assert_eq!(format::level_glyph(100.0, 100.0), Some('█'));
/// ```
#[must_use]
pub fn level_glyph(value: f64, max: f64) -> Option<char> {
    match scale(value, max, LEVEL_GLYPHS) {
        0 => None,
        level => char::from_u32(LEVEL_GLYPH_BASE + level),
    }
}

/// Format bytes with binary (1024-based) IEC units.
///
/// Shows one decimal place from KiB upward.
///
/// # Examples
///
/// ```rust
/// use barseg_core::format;
///
/// assert_eq!(format::bytes_to_iec(512), "512B");
/// assert_eq!(format::bytes_to_iec(1536), "1.5KiB");
/// assert_eq!(format::bytes_to_iec(3 * 1024 * 1024 * 1024), "3.0GiB");
/// ```
#[must_use]
pub fn bytes_to_iec(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB", "PiB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0B".to_owned();
    }

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= THRESHOLD && unit_idx < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{size:.0}{}", UNITS[unit_idx])
    } else {
        format!("{size:.1}{}", UNITS[unit_idx])
    }
}

/// Escape text for inclusion in Pango markup.
#[must_use]
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
