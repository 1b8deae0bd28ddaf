//! Subtitle session management
//!
//! This module provides the `SubtitleSession` abstraction that manages:
//! - Fragment reassembly for one logical connection
//! - Transcript decoding and classification
//! - Turn-state monotonicity (no updates after a turn closes)
//! - Session statistics
//! - An optional async pump for transport callbacks that feed a channel

mod config;
mod session;
mod stats;
mod turns;

pub use config::SessionConfig;
pub use session::SubtitleSession;
pub use stats::SessionStats;
pub use turns::TurnTracker;
