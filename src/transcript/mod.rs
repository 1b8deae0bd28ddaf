//! Transcript event decoding and classification
//!
//! This module turns reassembled payloads into UI-ready subtitle events:
//! - JSON decoding into `TranscriptEvent` (unknown fields ignored)
//! - Table-driven speaker and status resolution across both wire generations
//! - Suppression of empty interim events

mod classify;
mod engine;
mod event;

pub use classify::ClassifyConfig;
pub use engine::TranscriptEngine;
pub use event::{Speaker, SubtitleEvent, SubtitleStatus, TranscriptEvent, UNKNOWN_TURN};
