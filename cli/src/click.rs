//! Click dispatch: launch a segment's configured command, detached from the bar.

use barseg_core::{ClickAction, MouseButton, SegmentError};
use std::process::Stdio;
use tokio::process::Command;

/// Launch `action` if it is bound to `button`. Returns whether a command
/// was spawned.
pub fn dispatch(action: &ClickAction, button: MouseButton) -> Result<bool, SegmentError> {
    if action.button != button {
        tracing::debug!(%button, bound = %action.button, "no command bound to this button");
        return Ok(false);
    }
    launch(action)?;
    Ok(true)
}

/// Spawn `action` and return its pid. The child is not waited on.
pub fn launch(action: &ClickAction) -> Result<Option<u32>, SegmentError> {
    let child = Command::new(&action.program)
        .args(&action.args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| SegmentError::launch(&action.program, e.to_string()))?;

    let pid = child.id();
    tracing::info!(command = %action.command_line(), pid = ?pid, "launched click command");
    Ok(pid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_program_is_a_launch_error() {
        let action = ClickAction::run_left("barseg-no-such-program-for-tests");
        let err = launch(&action).unwrap_err();
        assert!(matches!(err, SegmentError::Launch { .. }));
        assert!(err.to_string().contains("barseg-no-such-program-for-tests"));
    }

    #[tokio::test]
    async fn launches_with_arguments() {
        let action = ClickAction::run_left("sh").with_arg("-c").with_arg("exit 0");
        assert!(launch(&action).unwrap().is_some());
    }

    #[tokio::test]
    async fn other_buttons_launch_nothing() {
        // Would fail to spawn if it were launched.
        let action = ClickAction::run_left("barseg-no-such-program-for-tests");
        assert!(!dispatch(&action, MouseButton::Right).unwrap());
        assert!(!dispatch(&action, MouseButton::Middle).unwrap());
        assert!(dispatch(&action, MouseButton::Left).is_err());
    }

    #[tokio::test]
    async fn bound_button_launches() {
        let mut action = ClickAction::run_left("sh").with_arg("-c").with_arg("exit 0");
        action.button = MouseButton::Middle;
        assert!(dispatch(&action, MouseButton::Middle).unwrap());
    }
}
