//! Output loops: snapshots from stdin, and the clock ticker.

use barseg_core::{Segment, SegmentError, WaybarOutput, WaybarRenderer};
use barseg_segments::{ClockSegment, ClockTime, MetricSnapshot, SegmentSet};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::{self, MissedTickBehavior};

fn emit<W: Write>(out: &mut W, output: &WaybarOutput) -> Result<(), SegmentError> {
    writeln!(out, "{}", output.to_json_line()?)?;
    out.flush()?;
    Ok(())
}

fn skip_if_temporary(err: SegmentError, message: &str) -> Result<(), SegmentError> {
    if err.is_temporary() {
        tracing::warn!(error = %err, "{message}");
        Ok(())
    } else {
        Err(err)
    }
}

/// Render every snapshot line from `reader` until EOF, or after the first
/// rendered line when `once` is set.
///
/// Blank lines are ignored. Temporary errors (a malformed line, an
/// interrupted read) are logged and skipped; anything else ends the stream.
/// Returns the number of lines written.
pub async fn render_stream<R, W>(
    reader: R,
    out: &mut W,
    segments: &SegmentSet,
    renderer: &WaybarRenderer,
    once: bool,
) -> Result<usize, SegmentError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = reader.lines();
    let mut written = 0;

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                skip_if_temporary(e.into(), "stdin read failed")?;
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let snapshot = match MetricSnapshot::from_json_line(&line) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                skip_if_temporary(e, "skipping malformed snapshot")?;
                continue;
            }
        };

        let descriptor = segments.build(&snapshot);
        tracing::trace!(segment = %snapshot.kind(), hidden = descriptor.is_none(), "rendered");
        emit(out, &renderer.render(descriptor.as_ref()))?;
        written += 1;

        if once {
            break;
        }
    }

    tracing::debug!(written, "snapshot stream ended");
    Ok(written)
}

/// Print the clock segment every `interval`. Returns after one line when
/// `once` is set, otherwise runs until an output error.
pub async fn tick_clock<W: Write>(
    out: &mut W,
    clock: &ClockSegment,
    renderer: &WaybarRenderer,
    interval: Duration,
    once: bool,
) -> Result<(), SegmentError> {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let descriptor = clock.build(&ClockTime::now());
        emit(out, &renderer.render(descriptor.as_ref()))?;
        if once {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_lines(out: &[u8]) -> Vec<serde_json::Value> {
        std::str::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn renders_one_line_per_snapshot() {
        let input = concat!(
            r#"{"kind":"battery","remaining_percent":4,"status":"discharging"}"#,
            "\n",
            r#"{"kind":"temperature","celsius":72.4}"#,
            "\n",
        );
        let mut out = Vec::new();
        let written = render_stream(
            input.as_bytes(),
            &mut out,
            &SegmentSet::default(),
            &WaybarRenderer::default(),
            false,
        )
        .await
        .unwrap();

        assert_eq!(written, 2);
        let lines = parse_lines(&out);
        assert_eq!(lines[0]["class"], "urgent");
        assert_eq!(lines[0]["percentage"], 4);
        assert_eq!(lines[1]["class"], "bad");
        assert!(lines[1]["text"].as_str().unwrap().contains("72℃"));
    }

    #[tokio::test]
    async fn malformed_and_blank_lines_are_skipped() {
        let input = "not json\n\n{\"kind\":\"fan\"}\n{\"kind\":\"memory\",\"available_bytes\":16000000000}\n";
        let mut out = Vec::new();
        let written = render_stream(
            input.as_bytes(),
            &mut out,
            &SegmentSet::default(),
            &WaybarRenderer::default(),
            false,
        )
        .await
        .unwrap();

        assert_eq!(written, 1);
        assert_eq!(parse_lines(&out)[0]["class"], "good");
    }

    #[tokio::test]
    async fn hidden_segment_renders_empty_text() {
        let input = "{\"kind\":\"media\",\"status\":\"stopped\"}\n";
        let mut out = Vec::new();
        render_stream(
            input.as_bytes(),
            &mut out,
            &SegmentSet::default(),
            &WaybarRenderer::default(),
            false,
        )
        .await
        .unwrap();

        assert_eq!(parse_lines(&out)[0]["text"], "");
    }

    #[tokio::test]
    async fn once_stops_after_first_output() {
        let input = "{\"kind\":\"temperature\",\"celsius\":40}\n{\"kind\":\"temperature\",\"celsius\":41}\n";
        let mut out = Vec::new();
        let written = render_stream(
            input.as_bytes(),
            &mut out,
            &SegmentSet::default(),
            &WaybarRenderer::default(),
            true,
        )
        .await
        .unwrap();

        assert_eq!(written, 1);
        assert_eq!(parse_lines(&out).len(), 1);
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn output_errors_end_the_stream() {
        let input = "garbage\n{\"kind\":\"temperature\",\"celsius\":40}\n";
        let err = render_stream(
            input.as_bytes(),
            &mut ClosedPipe,
            &SegmentSet::default(),
            &WaybarRenderer::default(),
            false,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, SegmentError::Io(_)));
        assert!(!err.is_temporary());
    }

    #[tokio::test]
    async fn clock_once_prints_a_line() {
        let mut out = Vec::new();
        tick_clock(
            &mut out,
            &ClockSegment::default(),
            &WaybarRenderer::default(),
            Duration::from_secs(1),
            true,
        )
        .await
        .unwrap();

        let lines = parse_lines(&out);
        assert_eq!(lines.len(), 1);
        assert!(lines[0]["tooltip"].as_str().unwrap().contains("gsimplecal"));
    }
}
