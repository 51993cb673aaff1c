//! Tick sources that drive an [`ExercisePlayer`].
//!
//! The player never reads a clock itself. Something outside it decides when
//! a second has elapsed and calls `tick()`. That is what a [`Metronome`]
//! does, so tests and the `--fast` CLI mode can swap real sleeps for
//! immediate ticks.

use crate::config::PlayerConfig;
use crate::player::{CueSink, ExercisePlayer, TickOutcome};
use std::time::Duration;

/// Source of elapsed-second events
pub trait Metronome {
    /// Block until the next tick is due; false once the source has stopped
    fn wait_tick(&mut self) -> bool;
}

/// Sleeps a fixed interval between ticks
#[derive(Debug, Clone)]
pub struct IntervalMetronome {
    interval: Duration,
}

impl IntervalMetronome {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn from_config(config: &PlayerConfig) -> Self {
        Self::new(Duration::from_millis(config.tick_interval_ms))
    }
}

impl Default for IntervalMetronome {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl Metronome for IntervalMetronome {
    fn wait_tick(&mut self) -> bool {
        std::thread::sleep(self.interval);
        true
    }
}

/// Ticks without waiting, optionally for a limited number of ticks
#[derive(Debug, Clone, Default)]
pub struct ImmediateMetronome {
    remaining: Option<usize>,
}

impl ImmediateMetronome {
    pub fn new() -> Self {
        Self { remaining: None }
    }

    pub fn with_budget(ticks: usize) -> Self {
        Self {
            remaining: Some(ticks),
        }
    }
}

impl Metronome for ImmediateMetronome {
    fn wait_tick(&mut self) -> bool {
        match self.remaining {
            None => true,
            Some(0) => false,
            Some(ref mut n) => {
                *n -= 1;
                true
            }
        }
    }
}

/// Feed ticks to a running player until it stops running or the metronome
/// stops
///
/// Returns the number of ticks the player accepted. Never starts the player.
/// Each tick is armed with the generation current at wait time, so a pause
/// or reset made while waiting turns the pending tick into a no-op.
pub fn drive<C: CueSink, M: Metronome + ?Sized>(
    player: &mut ExercisePlayer<C>,
    metronome: &mut M,
) -> usize {
    let mut delivered = 0;

    while player.is_running() {
        let armed = player.generation();
        if !metronome.wait_tick() {
            tracing::debug!("Metronome stopped after {} ticks", delivered);
            break;
        }
        match player.tick_if_current(armed) {
            TickOutcome::Ignored => break,
            TickOutcome::Completed => {
                delivered += 1;
                break;
            }
            TickOutcome::Counted | TickOutcome::Advanced { .. } => delivered += 1,
        }
    }

    delivered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::RecordingCues;
    use crate::{Cue, ExerciseCategory, ExerciseDefinition, ExerciseStep, RunPhase, StepKind};

    fn definition(durations: &[u32]) -> ExerciseDefinition {
        ExerciseDefinition {
            id: "metronome_test".into(),
            title: "Metronome Test".into(),
            description: String::new(),
            duration_label: "1 min".into(),
            category: ExerciseCategory::Breathing,
            steps: durations
                .iter()
                .enumerate()
                .map(|(i, d)| ExerciseStep {
                    sequence_index: i as u32 + 1,
                    instruction: format!("Step {}", i + 1),
                    duration_seconds: *d,
                    kind: StepKind::Instruction,
                })
                .collect(),
            favorite: false,
        }
    }

    #[test]
    fn test_drive_runs_to_completion() {
        let mut player =
            ExercisePlayer::with_cues(definition(&[4, 4, 4]), RecordingCues::default()).unwrap();
        player.start();

        let ticks = drive(&mut player, &mut ImmediateMetronome::new());

        assert_eq!(ticks, 12);
        assert!(player.is_complete());
        assert_eq!(player.cues().count(Cue::Completion), 1);
    }

    #[test]
    fn test_drive_does_not_start_idle_player() {
        let mut player = ExercisePlayer::new(definition(&[3])).unwrap();
        let ticks = drive(&mut player, &mut ImmediateMetronome::new());
        assert_eq!(ticks, 0);
        assert_eq!(player.phase(), RunPhase::Idle);
    }

    #[test]
    fn test_drive_stops_with_budget() {
        let mut player = ExercisePlayer::new(definition(&[5, 5])).unwrap();
        player.start();

        let ticks = drive(&mut player, &mut ImmediateMetronome::with_budget(7));

        assert_eq!(ticks, 7);
        assert!(player.is_running());
        assert_eq!(player.state().current_step_index, 1);
        assert_eq!(player.state().seconds_remaining, 3);

        // Resuming the drive picks up where it left off
        let rest = drive(&mut player, &mut ImmediateMetronome::new());
        assert_eq!(rest, 3);
        assert!(player.is_complete());
    }

    #[test]
    fn test_interval_metronome_drives_in_real_time() {
        let mut player = ExercisePlayer::new(definition(&[2])).unwrap();
        player.start();

        let started = std::time::Instant::now();
        let mut metronome = IntervalMetronome::new(Duration::from_millis(5));
        let ticks = drive(&mut player, &mut metronome);

        assert_eq!(ticks, 2);
        assert!(player.is_complete());
        assert!(started.elapsed() >= Duration::from_millis(10));
    }

    #[test]
    fn test_interval_from_config() {
        let config = PlayerConfig {
            tick_interval_ms: 250,
            ..PlayerConfig::default()
        };
        let metronome = IntervalMetronome::from_config(&config);
        assert_eq!(metronome.interval, Duration::from_millis(250));
    }
}
