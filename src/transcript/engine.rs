use tracing::{debug, warn};

use super::classify::ClassifyConfig;
use super::event::{SubtitleEvent, TranscriptEvent, UNKNOWN_TURN};

/// Decodes reassembled payloads into subtitle events.
///
/// Stateless per call: every payload is classified on its own, which keeps
/// the engine replay-safe and trivially testable. Turn-level bookkeeping
/// lives in the session layer.
pub struct TranscriptEngine {
    tables: ClassifyConfig,
}

impl TranscriptEngine {
    pub fn new(tables: ClassifyConfig) -> Self {
        Self { tables }
    }

    /// Decode one reassembled payload; returns at most one subtitle event.
    ///
    /// Decode and classification failures drop the payload with a warning.
    /// The channel is best-effort, so a dropped event is expected background
    /// noise, never an error the caller has to handle.
    pub fn on_payload(&self, payload: &[u8]) -> Option<SubtitleEvent> {
        let event: TranscriptEvent = match serde_json::from_slice(payload) {
            Ok(event) => event,
            Err(e) => {
                warn!("Failed to parse transcript payload: {}", e);
                return None;
            }
        };

        let object = event.object.as_deref();

        let Some(speaker) = self.tables.resolve_speaker(object, event.stream_id) else {
            warn!(
                "Unclassified transcript event: object={:?} stream_id={:?}",
                event.object, event.stream_id
            );
            return None;
        };

        let status = self
            .tables
            .resolve_status(object, event.final_flag, event.is_final);

        let text = event.text.unwrap_or_default();
        if text.is_empty() {
            // Interim events often arrive before any text is recognized;
            // emitting them would flicker blank subtitle lines.
            debug!(
                "Suppressing empty transcript event (turn_id={:?})",
                event.turn_id
            );
            return None;
        }

        Some(SubtitleEvent {
            speaker,
            turn_id: event.turn_id.unwrap_or(UNKNOWN_TURN),
            text,
            status,
        })
    }
}
