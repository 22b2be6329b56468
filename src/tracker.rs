//! Checkpoint change detection and logging.
//!
//! Successive positions normally advance one step around the cycle. Anything else
//! (skipped checkpoints or going backwards) points at a clock change or a suspend/resume,
//! and is reported separately.

use crate::schedule::{Checkpoint, Position};

/// The type of change between two consecutive positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointChange {
    /// Still between the same two checkpoints
    None,
    /// Reached the next checkpoint in the cycle
    Advanced { from: Checkpoint, to: Checkpoint },
    /// Landed on a checkpoint that is not the direct successor
    UnexpectedJump { from: Checkpoint, to: Checkpoint },
}

/// Detect what type of change occurred between `previous` and `current`.
pub fn detect_checkpoint_change(previous: &Position, current: &Position) -> CheckpointChange {
    let from = previous.current_checkpoint;
    let to = current.current_checkpoint;

    if from == to {
        // The degenerate single-instant cycle comes back to the same checkpoint after a
        // full day; next_checkpoint does not help there, so a same checkpoint is no change.
        return CheckpointChange::None;
    }

    // Collapsed schedules skip coinciding checkpoints, so the expected successor is the
    // one the previous position was counting down to, not always the next in the cycle
    if previous.next_checkpoint == to {
        CheckpointChange::Advanced { from, to }
    } else {
        CheckpointChange::UnexpectedJump { from, to }
    }
}

/// Detect a change and log it.
pub fn track_checkpoint_change(previous: &Position, current: &Position) -> CheckpointChange {
    let change = detect_checkpoint_change(previous, current);
    log_checkpoint_change(&change, current);
    change
}

fn log_checkpoint_change(change: &CheckpointChange, current: &Position) {
    match change {
        CheckpointChange::None => {}
        CheckpointChange::Advanced { .. } => log_checkpoint_announcement(current),
        CheckpointChange::UnexpectedJump { from, to } => {
            log_pipe!();
            log_warning!("Unexpected jump from {} to {}", from, to);
            log_indented!("{}", jump_description(*from, *to));
            log_indented!("This may indicate a system clock change or time anomaly");
            log_checkpoint_announcement(current);
        }
    }
}

/// Describe an unexpected jump. A jump is read as going backwards when that is the shorter
/// way around the cycle; a tie counts as forwards.
pub(crate) fn jump_description(from: Checkpoint, to: Checkpoint) -> String {
    let forward = from.steps_to(to);
    let backward = to.steps_to(from);
    if backward < forward {
        format!("Went back {} checkpoint(s)", backward)
    } else {
        format!("Skipped {} checkpoint(s)", forward.saturating_sub(1))
    }
}

/// Announce the checkpoint `position` is currently in, and when the next one is due.
pub fn log_checkpoint_announcement(position: &Position) {
    log_block_start!(
        "Reached {} {}",
        position.current_checkpoint.display_name().to_lowercase(),
        position.current_checkpoint.symbol()
    );
    log_indented!(
        "Next: {} in {}",
        position.next_checkpoint.display_name().to_lowercase(),
        crate::utils::format_duration(position.time_until_next)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(current: Checkpoint, next: Checkpoint) -> Position {
        Position {
            current_checkpoint: current,
            next_checkpoint: next,
            time_until_next: Duration::hours(1),
        }
    }

    #[test]
    fn test_same_checkpoint_is_no_change() {
        let previous = at(Checkpoint::Morning, Checkpoint::LateAfternoon);
        let current = at(Checkpoint::Morning, Checkpoint::LateAfternoon);
        assert_eq!(
            detect_checkpoint_change(&previous, &current),
            CheckpointChange::None
        );
    }

    #[test]
    fn test_single_step_advances() {
        let previous = at(Checkpoint::Sunset, Checkpoint::Sunrise);
        let current = at(Checkpoint::Sunrise, Checkpoint::Morning);
        assert_eq!(
            detect_checkpoint_change(&previous, &current),
            CheckpointChange::Advanced {
                from: Checkpoint::Sunset,
                to: Checkpoint::Sunrise
            }
        );
    }

    #[test]
    fn test_expected_skip_in_collapsed_schedule_advances() {
        // Morning and late afternoon coincide with sunrise when daylight is tiny
        let previous = at(Checkpoint::Sunrise, Checkpoint::Sunset);
        let current = at(Checkpoint::Sunset, Checkpoint::Sunrise);
        assert_eq!(
            detect_checkpoint_change(&previous, &current),
            CheckpointChange::Advanced {
                from: Checkpoint::Sunrise,
                to: Checkpoint::Sunset
            }
        );
    }

    #[test]
    fn test_skipped_checkpoints_are_unexpected() {
        let previous = at(Checkpoint::Sunrise, Checkpoint::Morning);
        let current = at(Checkpoint::Sunset, Checkpoint::Sunrise);
        assert_eq!(
            detect_checkpoint_change(&previous, &current),
            CheckpointChange::UnexpectedJump {
                from: Checkpoint::Sunrise,
                to: Checkpoint::Sunset
            }
        );
    }

    #[test]
    fn test_backwards_is_unexpected() {
        let previous = at(Checkpoint::LateAfternoon, Checkpoint::Sunset);
        let current = at(Checkpoint::Morning, Checkpoint::LateAfternoon);
        assert!(matches!(
            detect_checkpoint_change(&previous, &current),
            CheckpointChange::UnexpectedJump { .. }
        ));
    }

    #[test]
    fn test_backwards_jump_is_not_described_as_skipping() {
        assert_eq!(
            jump_description(Checkpoint::LateAfternoon, Checkpoint::Morning),
            "Went back 1 checkpoint(s)"
        );
        assert_eq!(
            jump_description(Checkpoint::Sunset, Checkpoint::Morning),
            "Skipped 1 checkpoint(s)"
        );
        assert_eq!(
            jump_description(Checkpoint::Sunrise, Checkpoint::LateAfternoon),
            "Skipped 1 checkpoint(s)"
        );
        assert_eq!(
            jump_description(Checkpoint::Morning, Checkpoint::Sunrise),
            "Went back 1 checkpoint(s)"
        );
    }
}
