//! Default catalog of guided coping exercises.
//!
//! This module provides the built-in exercises from the coping toolbox,
//! each with a timed step sequence whose total matches its duration label.

use crate::types::*;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog of guided exercises
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns a
/// cached reference. This function is retained for testing and custom catalog creation.
pub fn build_default_catalog() -> Catalog {
    build_default_catalog_internal()
}

/// Number a list of (kind, instruction, seconds) into exercise steps
fn steps(raw: Vec<(StepKind, &str, u32)>) -> Vec<ExerciseStep> {
    raw.into_iter()
        .enumerate()
        .map(|(i, (kind, instruction, duration_seconds))| ExerciseStep {
            sequence_index: i as u32 + 1,
            instruction: instruction.into(),
            duration_seconds,
            kind,
        })
        .collect()
}

/// Repeat a breathing cycle `times` times
fn cycles<'a>(
    cycle: &[(StepKind, &'a str, u32)],
    times: usize,
) -> Vec<(StepKind, &'a str, u32)> {
    cycle
        .iter()
        .copied()
        .cycle()
        .take(cycle.len() * times)
        .collect()
}

/// Internal function that actually builds the catalog
fn build_default_catalog_internal() -> Catalog {
    use StepKind::*;

    let mut exercises = HashMap::new();
    let mut insert = |def: ExerciseDefinition| {
        exercises.insert(def.id.clone(), def);
    };

    // ========================================================================
    // Breathing
    // ========================================================================

    // Box breathing: 4-4-4-4, ten rounds
    let mut box_steps = vec![(
        Instruction,
        "Sit comfortably with your feet flat on the floor and let your shoulders drop",
        12,
    )];
    box_steps.extend(cycles(
        &[
            (Breathing, "Breathe in slowly through your nose", 4),
            (Hold, "Hold your breath gently", 4),
            (Breathing, "Breathe out slowly through your mouth", 4),
            (Hold, "Rest with empty lungs", 4),
        ],
        10,
    ));
    box_steps.push((Mindfulness, "Let your breathing return to its natural rhythm", 8));

    insert(ExerciseDefinition {
        id: "box-breathing".into(),
        title: "Box Breathing".into(),
        description: "4-4-4-4 breathing pattern to calm your nervous system".into(),
        duration_label: "3 min".into(),
        category: ExerciseCategory::Breathing,
        steps: steps(box_steps),
        favorite: true,
    });

    // Wave breathing: rising and falling like the tide
    let mut wave_steps = vec![(
        Instruction,
        "Close your eyes and picture waves rolling onto a quiet shore",
        20,
    )];
    wave_steps.extend(cycles(
        &[
            (Breathing, "Breathe in as the wave rises", 5),
            (Hold, "Pause at the crest", 2),
            (Breathing, "Breathe out as the wave washes back", 7),
        ],
        19,
    ));
    wave_steps.push((Mindfulness, "Notice the calm the waves left behind", 14));

    insert(ExerciseDefinition {
        id: "wave-breathing".into(),
        title: "Wave Breathing".into(),
        description: "Rhythmic breathing like ocean waves for deep calm".into(),
        duration_label: "5 min".into(),
        category: ExerciseCategory::Breathing,
        steps: steps(wave_steps),
        favorite: false,
    });

    // ========================================================================
    // Grounding
    // ========================================================================

    insert(ExerciseDefinition {
        id: "54321-grounding".into(),
        title: "5-4-3-2-1 Grounding".into(),
        description: "Use your senses to ground yourself in the present moment".into(),
        duration_label: "5 min".into(),
        category: ExerciseCategory::Grounding,
        steps: steps(vec![
            (Instruction, "Pause where you are and take one slow breath", 20),
            (Mindfulness, "Look around and name 5 things you can see", 60),
            (Mindfulness, "Notice 4 things you can touch", 60),
            (Mindfulness, "Listen for 3 things you can hear", 60),
            (Mindfulness, "Identify 2 things you can smell", 50),
            (Mindfulness, "Think of 1 thing you can taste", 30),
            (Breathing, "Breathe slowly and feel yourself here, now", 20),
        ]),
        favorite: false,
    });

    // ========================================================================
    // Mindfulness
    // ========================================================================

    insert(ExerciseDefinition {
        id: "body-scan".into(),
        title: "Body Scan Meditation".into(),
        description: "Progressive relaxation through body awareness".into(),
        duration_label: "10 min".into(),
        category: ExerciseCategory::Mindfulness,
        steps: steps(vec![
            (Instruction, "Lie down or sit back and close your eyes", 30),
            (Mindfulness, "Bring your attention to your feet and toes", 60),
            (Mindfulness, "Move your attention up through your calves and knees", 60),
            (Mindfulness, "Notice your thighs and hips, letting them grow heavy", 60),
            (Breathing, "Feel your belly rise and fall with each breath", 60),
            (Mindfulness, "Notice your chest and upper back", 60),
            (Mindfulness, "Let your attention flow down your arms to your fingertips", 60),
            (Hold, "Lift your shoulders to your ears, hold, then let them drop", 60),
            (Mindfulness, "Soften your jaw, your eyes and your forehead", 60),
            (Mindfulness, "Feel your whole body resting, supported and calm", 60),
            (Instruction, "Wiggle your fingers and toes and slowly open your eyes", 30),
        ]),
        favorite: true,
    });

    // ========================================================================
    // Cognitive
    // ========================================================================

    insert(ExerciseDefinition {
        id: "thought-stop".into(),
        title: "Thought Stopping".into(),
        description: "Interrupt negative thought cycles with gentle redirection".into(),
        duration_label: "2 min".into(),
        category: ExerciseCategory::Cognitive,
        steps: steps(vec![
            (Mindfulness, "Notice the thought that keeps returning, without judging it", 20),
            (Instruction, "Say \"stop\" firmly, out loud or in your head", 10),
            (Breathing, "Take slow breaths and let the thought loosen its grip", 30),
            (Mindfulness, "Replace it with a kinder, more balanced thought", 40),
            (Instruction, "Repeat the new thought to yourself three times", 20),
        ]),
        favorite: false,
    });

    // ========================================================================
    // Movement
    // ========================================================================

    insert(ExerciseDefinition {
        id: "gentle-movement".into(),
        title: "Gentle Movement".into(),
        description: "Simple stretches to release tension and boost mood".into(),
        duration_label: "7 min".into(),
        category: ExerciseCategory::Movement,
        steps: steps(vec![
            (Instruction, "Stand tall with your feet hip-width apart", 20),
            (Instruction, "Slowly roll your neck in gentle circles", 60),
            (Instruction, "Roll your shoulders backwards, then forwards", 60),
            (Hold, "Reach one arm overhead and lean into a side stretch, then switch", 60),
            (Hold, "Fold forward softly and let your arms hang", 60),
            (Instruction, "Twist gently from side to side", 60),
            (Breathing, "Reach up as you breathe in, lower your arms as you breathe out", 60),
            (Mindfulness, "Stand still and notice how your body feels now", 40),
        ]),
        favorite: false,
    });

    Catalog { exercises }
}

impl Catalog {
    /// Look up an exercise by id
    pub fn get(&self, id: &str) -> Option<&ExerciseDefinition> {
        self.exercises.get(id)
    }

    /// All exercises sorted by id
    pub fn all(&self) -> Vec<&ExerciseDefinition> {
        let mut all: Vec<_> = self.exercises.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    /// Exercises in one category, sorted by id
    pub fn by_category(&self, category: ExerciseCategory) -> Vec<&ExerciseDefinition> {
        self.all()
            .into_iter()
            .filter(|d| d.category == category)
            .collect()
    }

    /// Favorite exercises, sorted by id
    pub fn favorites(&self) -> Vec<&ExerciseDefinition> {
        self.all().into_iter().filter(|d| d.favorite).collect()
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (id, def) in &self.exercises {
            if id.is_empty() || def.id.is_empty() {
                errors.push("Exercise has empty ID".to_string());
            }
            if id != &def.id {
                errors.push(format!(
                    "Exercise key '{}' doesn't match definition.id '{}'",
                    id, def.id
                ));
            }
            if def.title.is_empty() {
                errors.push(format!("Exercise '{}' has empty title", id));
            }
            if def.steps.is_empty() {
                errors.push(format!("Exercise '{}' has no steps", id));
            }

            for (position, step) in def.steps.iter().enumerate() {
                let expected = position as u32 + 1;
                if step.sequence_index != expected {
                    errors.push(format!(
                        "Exercise '{}': step at position {} has sequence index {}",
                        id, expected, step.sequence_index
                    ));
                }
                if step.duration_seconds == 0 {
                    errors.push(format!(
                        "Exercise '{}': step {} has zero duration",
                        id, step.sequence_index
                    ));
                }
                if step.instruction.is_empty() {
                    errors.push(format!(
                        "Exercise '{}': step {} has no instruction",
                        id, step.sequence_index
                    ));
                }
            }
        }

        errors
    }

    /// Like `validate`, but as an error carrying every problem found
    pub fn ensure_valid(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            return Ok(());
        }
        for error in &errors {
            tracing::error!("Catalog problem: {}", error);
        }
        Err(Error::CatalogValidation(errors.join("; ")))
    }
}
