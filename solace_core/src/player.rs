//! Timed, multi-step exercise player.
//!
//! The player is a state machine over [`RunPhase`]:
//!
//! ```text
//! Idle --start--> Running --pause--> Paused --start--> Running
//! Running --tick (last second of last step)--> Completed
//! any --reset--> Idle        any but Completed --force_complete--> Completed
//! ```
//!
//! `tick()` is the only operation that moves time forward. It is driven from
//! outside (see [`crate::metronome`]) once per elapsed second, and is a no-op
//! unless the run is Running.

use crate::{
    Cue, DisplayState, Error, ExerciseDefinition, ExerciseRunState, ExerciseStep, Result,
    RunPhase, StepKind,
};

/// Default number of seconds between breathing pulses
pub const DEFAULT_PULSE_INTERVAL: u32 = 4;

/// Receiver for player cues
///
/// Delivery is best effort: an error is logged and the run carries on.
pub trait CueSink {
    fn cue(&mut self, cue: Cue) -> Result<()>;
}

/// Sink that drops every cue
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentCues;

impl CueSink for SilentCues {
    fn cue(&mut self, _cue: Cue) -> Result<()> {
        Ok(())
    }
}

/// Sink that keeps every cue in order
#[derive(Debug, Default, Clone)]
pub struct RecordingCues {
    pub cues: Vec<Cue>,
}

impl RecordingCues {
    pub fn count(&self, cue: Cue) -> usize {
        self.cues.iter().filter(|c| **c == cue).count()
    }
}

impl CueSink for RecordingCues {
    fn cue(&mut self, cue: Cue) -> Result<()> {
        self.cues.push(cue);
        Ok(())
    }
}

impl<S: CueSink + ?Sized> CueSink for Box<S> {
    fn cue(&mut self, cue: Cue) -> Result<()> {
        (**self).cue(cue)
    }
}

/// What a single `tick()` did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running, or a stale generation; nothing changed
    Ignored,
    /// One second counted off the current step
    Counted,
    /// The current step ran out and the next one began
    Advanced { step_index: usize },
    /// The last step ran out
    Completed,
}

/// Drives one exercise definition through a run
pub struct ExercisePlayer<C: CueSink = SilentCues> {
    definition: ExerciseDefinition,
    state: ExerciseRunState,
    cues: C,
    pulse_interval: u32,
    generation: u64,
}

impl ExercisePlayer<SilentCues> {
    /// Create a player that emits no cues
    pub fn new(definition: ExerciseDefinition) -> Result<Self> {
        Self::with_cues(definition, SilentCues)
    }
}

impl<C: CueSink> ExercisePlayer<C> {
    /// Create a player delivering cues to `cues`
    ///
    /// Rejects definitions with no steps or with a zero-length step, since
    /// neither can be timed.
    pub fn with_cues(definition: ExerciseDefinition, cues: C) -> Result<Self> {
        let first = definition
            .steps
            .first()
            .ok_or_else(|| Error::EmptyExercise(definition.id.clone()))?;
        let first_duration = first.duration_seconds;

        if let Some(step) = definition.steps.iter().find(|s| s.duration_seconds == 0) {
            return Err(Error::InvalidStep {
                exercise: definition.id.clone(),
                index: step.sequence_index,
            });
        }

        tracing::debug!(
            "Loaded exercise '{}' with {} steps ({}s)",
            definition.id,
            definition.steps.len(),
            definition.total_duration_seconds()
        );

        Ok(Self {
            state: ExerciseRunState {
                current_step_index: 0,
                seconds_remaining: first_duration,
                phase: RunPhase::Idle,
            },
            definition,
            cues,
            pulse_interval: DEFAULT_PULSE_INTERVAL,
            generation: 0,
        })
    }

    /// Override the breathing pulse period (zero disables pulses)
    pub fn with_pulse_interval(mut self, seconds: u32) -> Self {
        self.pulse_interval = seconds;
        self
    }

    pub fn definition(&self) -> &ExerciseDefinition {
        &self.definition
    }

    pub fn state(&self) -> &ExerciseRunState {
        &self.state
    }

    pub fn phase(&self) -> RunPhase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    pub fn cues(&self) -> &C {
        &self.cues
    }

    pub fn cues_mut(&mut self) -> &mut C {
        &mut self.cues
    }

    /// Counter bumped by every start, pause, reset and force_complete
    ///
    /// A scheduler captures this when arming a tick and hands it back to
    /// [`Self::tick_if_current`], so a tick armed before a cancellation
    /// never lands on a later run.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn current_step(&self) -> &ExerciseStep {
        &self.definition.steps[self.state.current_step_index]
    }

    fn last_index(&self) -> usize {
        self.definition.steps.len() - 1
    }

    /// Idle or Paused -> Running
    pub fn start(&mut self) -> bool {
        match self.state.phase {
            RunPhase::Idle | RunPhase::Paused => {
                let resumed = self.state.phase == RunPhase::Paused;
                self.state.phase = RunPhase::Running;
                self.generation += 1;
                tracing::info!(
                    "{} exercise '{}' at step {}",
                    if resumed { "Resumed" } else { "Started" },
                    self.definition.id,
                    self.state.current_step_index + 1
                );
                self.emit(Cue::RunStart);
                true
            }
            RunPhase::Running | RunPhase::Completed => false,
        }
    }

    /// Running -> Paused
    pub fn pause(&mut self) -> bool {
        if self.state.phase != RunPhase::Running {
            return false;
        }
        self.state.phase = RunPhase::Paused;
        self.generation += 1;
        tracing::info!(
            "Paused exercise '{}' with {}s left in step {}",
            self.definition.id,
            self.state.seconds_remaining,
            self.state.current_step_index + 1
        );
        true
    }

    /// Count off one elapsed second
    pub fn tick(&mut self) -> TickOutcome {
        if self.state.phase != RunPhase::Running {
            return TickOutcome::Ignored;
        }

        let before = self.state.seconds_remaining;

        if before > 1 {
            if self.current_step().kind == StepKind::Breathing
                && self.pulse_interval > 0
                && before % self.pulse_interval == 0
            {
                self.emit(Cue::BreathingPulse);
            }
            self.state.seconds_remaining = before - 1;
            return TickOutcome::Counted;
        }

        if self.state.current_step_index < self.last_index() {
            let next = self.state.current_step_index + 1;
            self.state.current_step_index = next;
            self.state.seconds_remaining = self.definition.steps[next].duration_seconds;
            tracing::debug!(
                "Exercise '{}' advanced to step {}/{}",
                self.definition.id,
                next + 1,
                self.definition.steps.len()
            );
            self.emit(Cue::StepAdvance { step_index: next });
            TickOutcome::Advanced { step_index: next }
        } else {
            self.finish();
            TickOutcome::Completed
        }
    }

    /// Tick only if no start/pause/reset/force_complete happened since
    /// `generation` was read
    pub fn tick_if_current(&mut self, generation: u64) -> TickOutcome {
        if generation != self.generation {
            tracing::debug!(
                "Dropping stale tick (generation {} != {})",
                generation,
                self.generation
            );
            return TickOutcome::Ignored;
        }
        self.tick()
    }

    /// Any state -> Idle at step 0 with its full duration
    pub fn reset(&mut self) -> bool {
        let fresh = ExerciseRunState {
            current_step_index: 0,
            seconds_remaining: self.definition.steps[0].duration_seconds,
            phase: RunPhase::Idle,
        };
        if self.state == fresh {
            return false;
        }
        self.state = fresh;
        self.generation += 1;
        tracing::info!("Reset exercise '{}'", self.definition.id);
        true
    }

    /// Any non-Completed state -> Completed immediately
    pub fn force_complete(&mut self) -> bool {
        if self.state.phase == RunPhase::Completed {
            return false;
        }
        tracing::info!(
            "Exercise '{}' marked complete at step {}",
            self.definition.id,
            self.state.current_step_index + 1
        );
        self.finish();
        true
    }

    fn finish(&mut self) {
        self.state.current_step_index = self.last_index();
        self.state.seconds_remaining = 0;
        self.state.phase = RunPhase::Completed;
        self.generation += 1;
        tracing::info!("Completed exercise '{}'", self.definition.id);
        self.emit(Cue::Completion);
    }

    /// Overall progress in [0, 1]
    ///
    /// Whole steps done plus the elapsed share of the current step, so the
    /// value moves on every tick. Exactly 1.0 only once Completed.
    pub fn progress(&self) -> f64 {
        if self.state.is_complete() {
            return 1.0;
        }
        let total = self.definition.steps.len() as f64;
        let duration = self.current_step().duration_seconds as f64;
        let elapsed = duration - self.state.seconds_remaining as f64;
        (self.state.current_step_index as f64 + elapsed / duration) / total
    }

    pub fn display_state(&self) -> DisplayState {
        let step = self.current_step();
        DisplayState {
            step_index: self.state.current_step_index,
            step_count: self.definition.steps.len(),
            instruction: step.instruction.clone(),
            kind: step.kind,
            seconds_remaining: self.state.seconds_remaining,
            progress: self.progress(),
            phase: self.state.phase,
            is_complete: self.state.is_complete(),
        }
    }

    fn emit(&mut self, cue: Cue) {
        if let Err(e) = self.cues.cue(cue) {
            tracing::warn!("Failed to deliver {:?} cue: {}", cue, e);
        }
    }
}
