//! Keyword-based mood classification.
//!
//! Classification walks an ordered rule table and returns the first mood
//! whose keyword set has a member contained in the lower-cased text:
//! 1. Crisis
//! 2. Stressed
//! 3. Anxious
//! 4. Sad
//! 5. Happy
//!
//! Text that matches nothing is `Calm`. Crisis sits first so that crisis
//! language is never masked by a co-occurring stress or anxiety keyword.

use crate::{MoodTag, Utterance};

/// Ordered (mood, keywords) rules, first match wins
pub const MOOD_RULES: &[(MoodTag, &[&str])] = &[
    (
        MoodTag::Crisis,
        &[
            "suicide",
            "kill myself",
            "end it all",
            "don't want to live",
            "hurt myself",
        ],
    ),
    (
        MoodTag::Stressed,
        &["stressed", "overwhelmed", "pressure", "can't cope", "too much"],
    ),
    (
        MoodTag::Anxious,
        &["anxious", "worried", "nervous", "panic", "fear"],
    ),
    (
        MoodTag::Sad,
        &["sad", "depressed", "down", "lonely", "hopeless"],
    ),
    (
        MoodTag::Happy,
        &["happy", "good", "great", "wonderful", "excited"],
    ),
];

/// Mood used when no rule matches
pub const FALLBACK_MOOD: MoodTag = MoodTag::Calm;

/// Classify free text into a mood tag
pub fn classify(text: &str) -> MoodTag {
    let lower = text.to_lowercase();

    let mood = MOOD_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(mood, _)| *mood)
        .unwrap_or(FALLBACK_MOOD);

    tracing::debug!("Classified {} chars as {}", text.len(), mood);
    mood
}

/// Classify a recorded utterance
pub fn classify_utterance(utterance: &Utterance) -> MoodTag {
    classify(&utterance.text)
}
