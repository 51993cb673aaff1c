//! Scripted companion replies.
//!
//! Replies come from an ordered rule table:
//! 1. Crisis mood always gets the crisis resources, nothing else is consulted
//! 2. Topic rules (work, sleep, relationships), some limited to certain moods
//! 3. One template per non-calm mood
//! 4. A uniformly random pick among the default templates
//!
//! Every template acknowledges the feeling, offers something concrete to try,
//! and ends by inviting the user to share more.

use crate::MoodTag;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

pub const CRISIS_TEMPLATE: &str = "I hear you, and I'm really concerned about you. You matter, and there are people who want to help. Please reach out:

🆘 **Crisis Helplines:**
• US: 988 (Suicide & Crisis Lifeline)
• UK: 116 123 (Samaritans)
• Crisis Text Line: Text HOME to 741741

You don't have to go through this alone. Please consider talking to a mental health professional. 💙";

pub const WORK_STRESS_TEMPLATE: &str = "Work stress can feel overwhelming. I understand how that pressure can weigh on you 🌱

Here are some quick strategies:
• Take 3 deep breaths between tasks
• Step away for 2 minutes every hour
• Write down what's bothering you - sometimes getting it out of your head helps

What's the most stressful part of your work situation right now?";

pub const SLEEP_TEMPLATE: &str = "Sleep challenges can affect everything else, can't they? 😔 Your well-being matters.

Some gentle suggestions:
• Try a 10-minute wind-down routine before bed
• Keep your room cool and dark
• Consider limiting screens 1 hour before sleep
• Practice the 4-7-8 breathing technique

How has your sleep been affecting your daily life? I'm here to listen and help you find strategies that work for you. 💙";

pub const RELATIONSHIP_TEMPLATE: &str = "Relationships can bring such joy and sometimes such challenges too. Thank you for sharing this with me 💙

When we're struggling with relationships, it helps to remember:
• Your feelings are valid, no matter what
• Sometimes we can only control our own actions and responses
• It's okay to set boundaries when needed
• You deserve to be treated with kindness and respect

Would you like to talk more about what's happening? I'm here to listen without judgment. 🌸";

pub const STRESSED_TEMPLATE: &str = "I can feel the stress in your words. That overwhelmed feeling is so real, and I want you to know you're not alone in this 🌱

Let's start with your breath - it's something we always have control over:
• Breathe in slowly for 4 counts
• Hold gently for 4 counts
• Exhale slowly for 6 counts
• Repeat 3 times

What's been the biggest source of stress for you lately? Sometimes talking through it can help lighten the load. I'm here to listen. 💙";

pub const ANXIOUS_TEMPLATE: &str = "I can sense that anxious energy you're experiencing. Anxiety can feel so intense, but you're safe right now 💙

Let's try grounding together:
🌿 Look around and name 5 things you can see
✋ Notice 4 things you can touch
👂 Listen for 3 things you can hear
👃 Identify 2 things you can smell
👅 Think of 1 thing you can taste

This feeling will pass. You've gotten through anxious moments before, and you can do it again. What usually helps you feel more grounded? 🌸";

pub const SAD_TEMPLATE: &str = "I can hear the sadness in your words, and I want you to know that it's completely okay to feel this way. Your emotions are valid and important 💙

When we're sad, it can help to:
• Let yourself feel the emotion without fighting it
• Be gentle with yourself, like you would with a dear friend
• Do one small thing that usually brings you comfort
• Remember that feelings come and go like waves

You're being so brave by sharing this with me. Is there anything specific that's been weighing on your heart? I'm here to listen. 🌱";

pub const HAPPY_TEMPLATE: &str = "Your happiness is absolutely beautiful to witness! 🌟 I can feel the positive energy in your message.

These moments of joy are so precious - let's savor this feeling together:
• Take a moment to really notice how happiness feels in your body
• What specifically is bringing you this joy today?
• Consider sharing this feeling with someone you care about

I love seeing you in this wonderful space. What's been the highlight of your day so far? ✨";

/// Replies for calm or unmatched messages, picked uniformly at random
pub const DEFAULT_TEMPLATES: &[&str] = &[
    "Thank you for sharing that with me. I can sense there's something on your mind 💙\n\nWhat's been occupying your thoughts lately? I'm here to listen and support you however I can.",
    "I appreciate you opening up to me. Every feeling and thought you have matters 🌱\n\nIs there something specific you'd like to explore together today? I'm here for whatever you need.",
    "Thank you for trusting me with your thoughts. Creating this space for yourself is already a positive step 💙\n\nWhat would feel most helpful for you right now - talking through something, learning a coping technique, or just having someone listen?",
];

/// What must hold for a rule to fire
#[derive(Clone, Copy, Debug)]
pub enum Trigger {
    /// The classified mood equals this tag
    Mood(MoodTag),
    /// The text mentions a topic keyword, optionally only for some moods
    Topic {
        keywords: &'static [&'static str],
        moods: Option<&'static [MoodTag]>,
    },
}

impl Trigger {
    fn fires(&self, lower_text: &str, mood: MoodTag) -> bool {
        match self {
            Trigger::Mood(m) => *m == mood,
            Trigger::Topic { keywords, moods } => {
                let mood_ok = moods.map_or(true, |allowed| allowed.contains(&mood));
                mood_ok && keywords.iter().any(|k| lower_text.contains(k))
            }
        }
    }
}

/// A (trigger, template) pair in the reply table
#[derive(Clone, Copy, Debug)]
pub struct ResponseRule {
    pub name: &'static str,
    pub trigger: Trigger,
    pub template: &'static str,
}

/// Reply rules in priority order
///
/// The work topic only overrides a stressed mood while sleep and
/// relationship topics override any mood that reaches them.
pub const RESPONSE_RULES: &[ResponseRule] = &[
    ResponseRule {
        name: "crisis",
        trigger: Trigger::Mood(MoodTag::Crisis),
        template: CRISIS_TEMPLATE,
    },
    ResponseRule {
        name: "work",
        trigger: Trigger::Topic {
            keywords: &["work", "job"],
            moods: Some(&[MoodTag::Stressed]),
        },
        template: WORK_STRESS_TEMPLATE,
    },
    ResponseRule {
        name: "sleep",
        trigger: Trigger::Topic {
            keywords: &["sleep", "tired", "exhausted"],
            moods: None,
        },
        template: SLEEP_TEMPLATE,
    },
    ResponseRule {
        name: "relationship",
        trigger: Trigger::Topic {
            keywords: &["relationship", "friend", "family"],
            moods: None,
        },
        template: RELATIONSHIP_TEMPLATE,
    },
    ResponseRule {
        name: "stressed",
        trigger: Trigger::Mood(MoodTag::Stressed),
        template: STRESSED_TEMPLATE,
    },
    ResponseRule {
        name: "anxious",
        trigger: Trigger::Mood(MoodTag::Anxious),
        template: ANXIOUS_TEMPLATE,
    },
    ResponseRule {
        name: "sad",
        trigger: Trigger::Mood(MoodTag::Sad),
        template: SAD_TEMPLATE,
    },
    ResponseRule {
        name: "happy",
        trigger: Trigger::Mood(MoodTag::Happy),
        template: HAPPY_TEMPLATE,
    },
];

/// Find the first rule that fires for this text and mood
pub fn matching_rule(text: &str, mood: MoodTag) -> Option<&'static ResponseRule> {
    let lower = text.to_lowercase();
    RESPONSE_RULES.iter().find(|rule| rule.trigger.fires(&lower, mood))
}

/// Produce a reply using the given random source for default selection
pub fn generate_with<R: Rng + ?Sized>(text: &str, mood: MoodTag, rng: &mut R) -> &'static str {
    if let Some(rule) = matching_rule(text, mood) {
        tracing::debug!("Reply rule '{}' fired for mood {}", rule.name, mood);
        return rule.template;
    }

    tracing::debug!("No reply rule fired for mood {}, using a default", mood);
    DEFAULT_TEMPLATES
        .choose(rng)
        .copied()
        .unwrap_or(DEFAULT_TEMPLATES[0])
}

/// Reply generator owning its random source
pub struct Responder<R = StdRng> {
    rng: R,
}

impl Responder<StdRng> {
    /// Responder seeded from OS entropy
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Responder with a fixed seed, for reproducible default picks
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for Responder<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Responder<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    pub fn generate(&mut self, text: &str, mood: MoodTag) -> &'static str {
        generate_with(text, mood, &mut self.rng)
    }
}
