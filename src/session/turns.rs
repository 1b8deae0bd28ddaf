use std::collections::HashMap;

use tracing::debug;

use crate::transcript::{Speaker, SubtitleStatus};

/// Tracks the last observed status per `(speaker, turn_id)` so that a turn
/// which reached a terminal status never re-emits.
///
/// This is a per-session guarantee only; state is not persisted across
/// process restarts. Negative turn ids mean "unknown turn" and bypass
/// tracking entirely.
#[derive(Debug, Default)]
pub struct TurnTracker {
    turns: HashMap<(Speaker, i64), SubtitleStatus>,
}

impl TurnTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event for a turn. Returns false when the turn already
    /// closed and the event must be suppressed.
    pub fn admit(&mut self, speaker: Speaker, turn_id: i64, status: SubtitleStatus) -> bool {
        if turn_id < 0 {
            return true;
        }

        let key = (speaker, turn_id);

        if let Some(last) = self.turns.get(&key) {
            if last.is_terminal() {
                debug!(
                    "Suppressing {:?} update for closed turn {} ({:?})",
                    status, turn_id, speaker
                );
                return false;
            }
        }

        self.turns.insert(key, status);
        true
    }

    /// Number of turns seen so far
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
