//! Core domain types for the Solace companion.
//!
//! This module defines the fundamental types used throughout the system:
//! - Mood tags and user utterances
//! - Exercise steps, definitions and the catalog
//! - Run state and the display snapshot handed to the presentation layer
//! - Chat transcript messages and urgency notices

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

// ============================================================================
// Mood Types
// ============================================================================

/// Emotional-state category derived from user text
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MoodTag {
    Stressed,
    Anxious,
    Sad,
    Calm,
    Happy,
    Crisis,
}

impl MoodTag {
    pub fn as_str(self) -> &'static str {
        match self {
            MoodTag::Stressed => "stressed",
            MoodTag::Anxious => "anxious",
            MoodTag::Sad => "sad",
            MoodTag::Calm => "calm",
            MoodTag::Happy => "happy",
            MoodTag::Crisis => "crisis",
        }
    }

    /// Notification the presentation layer raises alongside a reply
    pub fn notice(self) -> Option<Notice> {
        match self {
            MoodTag::Crisis => Some(Notice::Urgent("Crisis support resources have been shared")),
            MoodTag::Stressed | MoodTag::Anxious => Some(Notice::Info("Coping strategy suggested")),
            _ => None,
        }
    }
}

impl std::fmt::Display for MoodTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Out-of-band notification derived from a mood tag
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "level", content = "text", rename_all = "snake_case")]
pub enum Notice {
    Urgent(&'static str),
    Info(&'static str),
}

impl Notice {
    pub fn text(&self) -> &'static str {
        match self {
            Notice::Urgent(text) | Notice::Info(text) => text,
        }
    }

    pub fn is_urgent(&self) -> bool {
        matches!(self, Notice::Urgent(_))
    }
}

/// A piece of user text as submitted
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

// ============================================================================
// Exercise Types
// ============================================================================

/// Kind of exercise step, controlling display and cue behavior
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Instruction,
    Breathing,
    Hold,
    Mindfulness,
}

/// A single timed step within an exercise
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseStep {
    /// 1-based position within the exercise
    pub sequence_index: u32,
    pub instruction: String,
    pub duration_seconds: u32,
    pub kind: StepKind,
}

/// Category of coping exercise
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseCategory {
    Breathing,
    Mindfulness,
    Grounding,
    Movement,
    Cognitive,
}

impl ExerciseCategory {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "breathing" => Some(ExerciseCategory::Breathing),
            "mindfulness" => Some(ExerciseCategory::Mindfulness),
            "grounding" => Some(ExerciseCategory::Grounding),
            "movement" => Some(ExerciseCategory::Movement),
            "cognitive" => Some(ExerciseCategory::Cognitive),
            _ => None,
        }
    }
}

/// A complete guided exercise definition
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseDefinition {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration_label: String,
    pub category: ExerciseCategory,
    pub steps: Vec<ExerciseStep>,
    pub favorite: bool,
}

impl ExerciseDefinition {
    pub fn total_duration_seconds(&self) -> u64 {
        self.steps.iter().map(|s| u64::from(s.duration_seconds)).sum()
    }
}

// ============================================================================
// Run State Types
// ============================================================================

/// Lifecycle phase of an exercise run
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Mutable state of one exercise run
///
/// Completed implies the last step with zero seconds remaining. Otherwise
/// `seconds_remaining` is within `1..=duration` of the current step.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExerciseRunState {
    pub current_step_index: usize,
    pub seconds_remaining: u32,
    pub phase: RunPhase,
}

impl ExerciseRunState {
    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    pub fn is_complete(&self) -> bool {
        self.phase == RunPhase::Completed
    }
}

/// Read-only snapshot of a run for display
#[derive(Clone, Debug, Serialize)]
pub struct DisplayState {
    pub step_index: usize,
    pub step_count: usize,
    pub instruction: String,
    pub kind: StepKind,
    pub seconds_remaining: u32,
    pub progress: f64,
    pub phase: RunPhase,
    pub is_complete: bool,
}

/// Feedback prompt emitted by the player
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "cue", rename_all = "snake_case")]
pub enum Cue {
    RunStart,
    StepAdvance { step_index: usize },
    BreathingPulse,
    Completion,
}

// ============================================================================
// Chat Types
// ============================================================================

/// Who wrote a transcript message
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Companion,
}

/// One entry of the chat transcript
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    pub mood: Option<MoodTag>,
}

// ============================================================================
// Catalog Type
// ============================================================================

/// The catalog of guided exercises, keyed by id
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub exercises: HashMap<String, ExerciseDefinition>,
}
