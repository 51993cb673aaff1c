#![forbid(unsafe_code)]

//! Core logic for the Solace wellness companion.
//!
//! This crate provides:
//! - Domain types (moods, exercises, run state, chat messages)
//! - Keyword mood classification and scripted replies
//! - The timed exercise player and the metronomes that drive it
//! - The default exercise catalog
//! - Chat sessions with deferred, at-most-once reply delivery
//! - Configuration and logging setup

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod classifier;
pub mod responder;
pub mod player;
pub mod metronome;
pub mod chat;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::Config;
pub use classifier::{classify, classify_utterance};
pub use responder::{generate_with, Responder};
pub use player::{CueSink, ExercisePlayer, RecordingCues, SilentCues, TickOutcome};
pub use metronome::{drive, ImmediateMetronome, IntervalMetronome, Metronome};
pub use chat::{ChatSession, Reply, SubmissionId};
