//! Media player segment.

use barseg_core::config::MediaPolicy;
use barseg_core::format::{format_elapsed, rune_len, truncate};
use barseg_core::{ColorName, DisplayDescriptor, GlobalConfig, Segment, SegmentError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Player state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackStatus {
    Playing,
    Paused,
    Stopped,
    /// No player on the bus
    Disconnected,
}

impl PlaybackStatus {
    /// Whether the segment is shown at all.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Playing | Self::Paused)
    }
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Playing => "Playing",
            Self::Paused => "Paused",
            Self::Stopped => "Stopped",
            Self::Disconnected => "Disconnected",
        };
        f.write_str(name)
    }
}

/// Now-playing snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MediaInfo {
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub title: String,
    /// Elapsed time in the current track
    #[serde(with = "crate::secs", default)]
    pub position: Duration,
    /// Track length
    #[serde(with = "crate::secs", default)]
    pub length: Duration,
    pub status: PlaybackStatus,
}

/// Fit artist and title into the policy's character budgets.
///
/// The artist is first cut to `artist_budget` and the title gets what is
/// left of `total_budget`. When the title then leaves room to spare, the
/// artist is cut again from the full name against the title's actual length.
/// The title is never re-cut after that second pass.
///
/// ```rust
/// use barseg_core::config::MediaPolicy;
/// use barseg_segments::media::fit_artist_title;
///
/// let policy = MediaPolicy::default();
/// let (artist, title) =
///     fit_artist_title("A Very Long Artist Name Indeed", "Short", &policy);
/// assert_eq!(artist, "A Very Long Artist Name Indeed");
/// assert_eq!(title, "Short");
/// ```
#[must_use]
pub fn fit_artist_title(artist: &str, title: &str, policy: &MediaPolicy) -> (String, String) {
    let total = policy.total_budget;
    let title_share = total.saturating_sub(policy.artist_budget);

    let mut fitted_artist = truncate(artist, policy.artist_budget);
    let fitted_title = truncate(title, total.saturating_sub(rune_len(&fitted_artist)));
    if rune_len(&fitted_title) < title_share {
        fitted_artist = truncate(artist, total.saturating_sub(rune_len(&fitted_title)));
    }
    (fitted_artist, fitted_title)
}

/// Builds the media segment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MediaSegment {
    policy: MediaPolicy,
}

impl MediaSegment {
    #[must_use]
    pub const fn new(policy: MediaPolicy) -> Self {
        Self { policy }
    }
}

impl Segment for MediaSegment {
    type Snapshot = MediaInfo;

    fn name(&self) -> &str {
        "media"
    }

    fn build(&self, info: &MediaInfo) -> Option<DisplayDescriptor> {
        if !info.status.is_active() {
            return None;
        }

        let (artist, title) = fit_artist_title(&info.artist, &info.title, &self.policy);
        let truncated = artist != info.artist || title != info.title;

        let mut out = DisplayDescriptor::new("fa-music", format!("{title} - {artist}"))
            .with_icon_color(ColorName::Accent);
        if info.status == PlaybackStatus::Playing {
            out = out.with_secondary_text(format!(
                "{}/{}",
                format_elapsed(info.position),
                format_elapsed(info.length)
            ));
        }
        if truncated {
            out = out.with_tooltip(format!("{} - {}", info.title, info.artist));
        }
        Some(out)
    }

    fn configure(&mut self, config: &GlobalConfig) -> Result<(), SegmentError> {
        let policy = &config.media;
        if policy.artist_budget == 0 || policy.artist_budget > policy.total_budget {
            return Err(SegmentError::config_with_value(
                "media artist_budget must be between 1 and total_budget",
                policy.artist_budget.to_string(),
            ));
        }
        self.policy = policy.clone();
        Ok(())
    }
}

/// Build a media segment with the default budgets.
#[must_use]
pub fn build(info: &MediaInfo) -> Option<DisplayDescriptor> {
    MediaSegment::default().build(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(artist: &str, title: &str, status: PlaybackStatus) -> MediaInfo {
        MediaInfo {
            artist: artist.to_owned(),
            title: title.to_owned(),
            position: Duration::from_secs(75),
            length: Duration::from_secs(210),
            status,
        }
    }

    #[test]
    fn hidden_when_stopped_or_disconnected() {
        assert_eq!(build(&track("A", "B", PlaybackStatus::Stopped)), None);
        assert_eq!(build(&track("A", "B", PlaybackStatus::Disconnected)), None);
    }

    #[test]
    fn long_artist_short_title() {
        let out = build(&track(
            "A Very Long Artist Name Indeed",
            "Short",
            PlaybackStatus::Paused,
        ))
        .unwrap();
        assert_eq!(out.primary_text, "Short - A Very Long Artist Name Indeed");
        assert_eq!(out.tooltip, None);
    }

    #[test]
    fn both_long_share_the_budget() {
        let policy = MediaPolicy::default();
        let artist = "Godspeed You! Black Emperor and Friends";
        let title = "Storm: Lift Yr Skinny Fists Like Antennas to Heaven";
        let (a, t) = fit_artist_title(artist, title, &policy);

        assert_eq!(a, "Godspeed You! Black⋯");
        assert_eq!(rune_len(&a), 20);
        assert_eq!(rune_len(&t), 20);
        assert!(t.ends_with('⋯'));
    }

    #[test]
    fn short_artist_leaves_room_for_title() {
        let policy = MediaPolicy::default();
        let title = "A Title That Is Quite A Bit Longer Than Twenty Runes";
        let (a, t) = fit_artist_title("Muse", title, &policy);
        assert_eq!(a, "Muse");
        assert_eq!(rune_len(&t), 36);
    }

    #[test]
    fn pair_never_exceeds_total_budget() {
        let policy = MediaPolicy::default();
        let long = "y".repeat(90);
        let words = [
            "",
            "x",
            "Short",
            "Twenty chars exactly",
            "ünïcödé ärtïst wïth äccents galore",
            long.as_str(),
        ];
        for artist in words {
            for title in words {
                let (a, t) = fit_artist_title(artist, title, &policy);
                assert!(rune_len(&a) + rune_len(&t) <= 40, "{artist:?} / {title:?}");
            }
        }
    }

    #[test]
    fn position_only_while_playing() {
        let playing = build(&track("Artist", "Song", PlaybackStatus::Playing)).unwrap();
        assert_eq!(playing.secondary_text.as_deref(), Some("1:15/3:30"));
        assert_eq!(playing.primary_text, "Song - Artist");
        assert_eq!(playing.icon_id, "fa-music");

        let paused = build(&track("Artist", "Song", PlaybackStatus::Paused)).unwrap();
        assert_eq!(paused.secondary_text, None);
    }

    #[test]
    fn tooltip_carries_untruncated_text() {
        let long = "z".repeat(60);
        let out = build(&track("Artist", &long, PlaybackStatus::Paused)).unwrap();
        assert_eq!(out.tooltip, Some(format!("{long} - Artist")));
    }

    #[test]
    fn configure_rejects_artist_over_total() {
        let mut config = GlobalConfig::default();
        config.media.artist_budget = 50;
        assert!(MediaSegment::default().configure(&config).is_err());
    }
}
