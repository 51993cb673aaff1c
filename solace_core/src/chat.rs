//! Chat companion session.
//!
//! A submission is classified and answered right away, but the answer is
//! held back for a short "typing" delay. The caller's timer later asks for
//! it with [`ChatSession::deliver`] or [`ChatSession::deliver_due`]. Each
//! submission is delivered at most once, and abandoning the view drops
//! whatever is still pending.

use crate::responder::Responder;
use crate::{classify, ChatMessage, MoodTag, Notice, Sender};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Handle for one user submission awaiting its reply
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubmissionId(u64);

/// A delivered companion reply plus its notice, if any
#[derive(Clone, Debug)]
pub struct Reply {
    pub message: ChatMessage,
    pub notice: Option<Notice>,
}

impl Reply {
    pub fn mood(&self) -> MoodTag {
        self.message.mood.unwrap_or(MoodTag::Calm)
    }
}

#[derive(Debug)]
struct PendingReply {
    text: &'static str,
    mood: MoodTag,
    due_at: DateTime<Utc>,
}

/// Conversation transcript with deferred replies
pub struct ChatSession<R = StdRng> {
    transcript: Vec<ChatMessage>,
    pending: BTreeMap<SubmissionId, PendingReply>,
    responder: Responder<R>,
    typing_delay: Duration,
    next_id: u64,
}

impl ChatSession<StdRng> {
    pub fn new(user_name: &str, typing_delay: Duration) -> Self {
        Self::with_responder(user_name, typing_delay, Responder::new())
    }
}

impl<R: Rng> ChatSession<R> {
    /// Session using the given responder, e.g. one with a seeded rng
    pub fn with_responder(user_name: &str, typing_delay: Duration, responder: Responder<R>) -> Self {
        let welcome = ChatMessage {
            id: Uuid::new_v4(),
            text: welcome_text(user_name),
            sender: Sender::Companion,
            timestamp: Utc::now(),
            mood: None,
        };

        Self {
            transcript: vec![welcome],
            pending: BTreeMap::new(),
            responder,
            typing_delay,
            next_id: 0,
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn typing_delay(&self) -> Duration {
        self.typing_delay
    }

    /// Whether a reply is still being "typed"
    pub fn is_typing(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Record a user message and prepare its reply
    ///
    /// Blank input is ignored and returns None.
    pub fn submit(&mut self, text: &str) -> Option<SubmissionId> {
        self.submit_at(text, Utc::now())
    }

    /// `submit` with an explicit clock reading
    pub fn submit_at(&mut self, text: &str, now: DateTime<Utc>) -> Option<SubmissionId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.transcript.push(ChatMessage {
            id: Uuid::new_v4(),
            text: text.to_string(),
            sender: Sender::User,
            timestamp: now,
            mood: None,
        });

        let mood = classify(text);
        let reply = self.responder.generate(text, mood);

        let id = SubmissionId(self.next_id);
        self.next_id += 1;
        self.pending.insert(
            id,
            PendingReply {
                text: reply,
                mood,
                due_at: now
                    .checked_add_signed(self.typing_delay)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC),
            },
        );

        tracing::debug!("Submission {:?} classified as {}", id, mood);
        Some(id)
    }

    /// Deliver the reply for one submission
    ///
    /// Returns None if it was already delivered or abandoned.
    pub fn deliver(&mut self, id: SubmissionId) -> Option<Reply> {
        self.deliver_at(id, Utc::now())
    }

    /// `deliver` with an explicit clock reading, used as the reply timestamp
    pub fn deliver_at(&mut self, id: SubmissionId, now: DateTime<Utc>) -> Option<Reply> {
        let pending = self.pending.remove(&id)?;
        Some(self.append_reply(pending, now))
    }

    /// Deliver every reply whose typing delay has elapsed, oldest first
    pub fn deliver_due(&mut self, now: DateTime<Utc>) -> Vec<Reply> {
        let due: Vec<SubmissionId> = self
            .pending
            .iter()
            .filter(|(_, p)| p.due_at <= now)
            .map(|(id, _)| *id)
            .collect();

        due.into_iter()
            .filter_map(|id| self.deliver_at(id, now))
            .collect()
    }

    /// Drop all undelivered replies, returning how many were dropped
    pub fn abandon_pending(&mut self) -> usize {
        let dropped = self.pending.len();
        if dropped > 0 {
            tracing::debug!("Abandoned {} pending replies", dropped);
        }
        self.pending.clear();
        dropped
    }

    fn append_reply(&mut self, pending: PendingReply, delivered_at: DateTime<Utc>) -> Reply {
        let message = ChatMessage {
            id: Uuid::new_v4(),
            text: pending.text.to_string(),
            sender: Sender::Companion,
            timestamp: delivered_at,
            mood: Some(pending.mood),
        };
        self.transcript.push(message.clone());

        let notice = pending.mood.notice();
        if let Some(Notice::Urgent(_)) = notice {
            tracing::warn!("Crisis language detected; resources shared");
        }

        Reply { message, notice }
    }
}

fn welcome_text(user_name: &str) -> String {
    format!(
        "Hi {}! I'm so glad you're here. How are you feeling today? 💙",
        user_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crate::responder::{CRISIS_TEMPLATE, DEFAULT_TEMPLATES, WORK_STRESS_TEMPLATE};

    fn session() -> ChatSession {
        ChatSession::with_responder("Sam", Duration::milliseconds(1500), Responder::seeded(7))
    }

    #[test]
    fn test_welcome_message() {
        let chat = session();
        assert_eq!(chat.transcript().len(), 1);
        let welcome = &chat.transcript()[0];
        assert_eq!(welcome.sender, Sender::Companion);
        assert!(welcome.text.starts_with("Hi Sam!"));
        assert!(!chat.is_typing());
    }

    #[test]
    fn test_blank_submission_ignored() {
        let mut chat = session();
        assert!(chat.submit("   ").is_none());
        assert!(chat.submit("").is_none());
        assert_eq!(chat.transcript().len(), 1);
        assert_eq!(chat.pending_count(), 0);
    }

    #[test]
    fn test_submit_then_deliver_once() {
        let mut chat = session();
        let id = chat.submit("  I'm overwhelmed at work  ").unwrap();

        assert!(chat.is_typing());
        assert_eq!(chat.transcript().len(), 2);
        assert_eq!(chat.transcript()[1].text, "I'm overwhelmed at work");

        let reply = chat.deliver(id).unwrap();
        assert_eq!(reply.mood(), MoodTag::Stressed);
        assert_eq!(reply.message.text, WORK_STRESS_TEMPLATE);
        assert_eq!(reply.notice, Some(Notice::Info("Coping strategy suggested")));
        assert_eq!(chat.transcript().len(), 3);

        // Second delivery attempt is a no-op
        assert!(chat.deliver(id).is_none());
        assert_eq!(chat.transcript().len(), 3);
        assert!(!chat.is_typing());
    }

    #[test]
    fn test_crisis_reply_is_urgent() {
        let mut chat = session();
        let id = chat.submit("I want to hurt myself, work is too much").unwrap();
        let reply = chat.deliver(id).unwrap();

        assert_eq!(reply.mood(), MoodTag::Crisis);
        assert_eq!(reply.message.text, CRISIS_TEMPLATE);
        assert!(reply.notice.unwrap().is_urgent());
    }

    #[test]
    fn test_calm_reply_has_no_notice() {
        let mut chat = session();
        let id = chat.submit("just checking in").unwrap();
        let reply = chat.deliver(id).unwrap();

        assert!(reply.notice.is_none());
        assert!(DEFAULT_TEMPLATES.contains(&reply.message.text.as_str()));
    }

    #[test]
    fn test_deliver_due_respects_typing_delay() {
        let mut chat = session();
        let t0 = Utc::now();
        chat.submit_at("I feel sad", t0).unwrap();
        chat.submit_at("now I feel happy", t0 + Duration::milliseconds(1000)).unwrap();

        assert!(chat.deliver_due(t0 + Duration::milliseconds(1000)).is_empty());

        let first = chat.deliver_due(t0 + Duration::milliseconds(1500));
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].mood(), MoodTag::Sad);

        let second = chat.deliver_due(t0 + Duration::seconds(10));
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].mood(), MoodTag::Happy);

        assert!(chat.deliver_due(t0 + Duration::seconds(20)).is_empty());
    }

    #[test]
    fn test_deliver_due_stamps_caller_clock() {
        let mut chat = session();
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        chat.submit_at("I can't sleep", t0).unwrap();

        let delivered_at = t0 + Duration::seconds(2);
        let replies = chat.deliver_due(delivered_at);
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].message.timestamp, delivered_at);
        assert_eq!(chat.transcript()[1].timestamp, t0);
        assert_eq!(chat.transcript()[2].timestamp, delivered_at);
    }

    #[test]
    fn test_huge_typing_delay_does_not_overflow() {
        let mut chat = ChatSession::with_responder(
            "Sam",
            Duration::milliseconds(i64::MAX),
            Responder::seeded(7),
        );
        let id = chat.submit("hello").unwrap();

        // The reply is never due on the clock, but can still be taken directly
        assert!(chat.deliver_due(Utc::now() + Duration::days(365)).is_empty());
        assert!(chat.deliver(id).is_some());
        assert!(!chat.is_typing());
    }

    #[test]
    fn test_abandon_pending_prevents_delivery() {
        let mut chat = session();
        let id = chat.submit("I'm anxious").unwrap();
        assert_eq!(chat.abandon_pending(), 1);
        assert!(chat.deliver(id).is_none());
        assert!(chat.deliver_due(Utc::now() + Duration::seconds(5)).is_empty());
        // User message stays, no reply was added
        assert_eq!(chat.transcript().len(), 2);
    }

    #[test]
    fn test_resend_gets_its_own_reply() {
        let mut chat = session();
        let a = chat.submit("I'm worried").unwrap();
        let b = chat.submit("I'm worried").unwrap();
        assert_ne!(a, b);
        assert!(chat.deliver(a).is_some());
        assert!(chat.deliver(b).is_some());
        assert_eq!(chat.transcript().len(), 5);
    }
}
