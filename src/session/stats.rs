use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::reassembly::ReassemblyStats;

/// Statistics about a subtitle session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    pub session_id: String,

    /// When the session was created
    pub started_at: DateTime<Utc>,

    /// Subtitle events handed to the caller
    pub subtitles_emitted: usize,

    /// Events suppressed because their turn had already closed
    pub turns_suppressed: usize,

    /// Frame texts that failed to parse in either wire representation
    pub malformed_frames: usize,

    /// Reassembler counters (completions, expiry, drops)
    pub reassembly: ReassemblyStats,
}
