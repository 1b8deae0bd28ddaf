use std::collections::HashMap;
use std::time::{Duration, Instant};

use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::frame::RawFrame;

/// Configuration for fragment reassembly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReassemblyConfig {
    /// How long a partially received message may wait for its remaining
    /// parts before being discarded (default: 300 seconds)
    pub stale_after: Duration,

    /// Maximum number of in-flight messages buffered at once
    pub max_pending_messages: usize,

    /// Maximum total buffered chunk bytes across all in-flight messages
    pub max_buffered_bytes: usize,
}

impl Default for ReassemblyConfig {
    fn default() -> Self {
        Self {
            stale_after: Duration::from_secs(300), // 5 minutes
            max_pending_messages: 256,
            max_buffered_bytes: 1024 * 1024, // 1 MiB
        }
    }
}

/// Counters for observing completion and loss rates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReassemblyStats {
    /// Frames handed to `ingest`
    pub frames_ingested: usize,

    /// Messages fully reassembled and decoded
    pub messages_completed: usize,

    /// Frames dropped for out-of-range part indices
    pub invalid_fragments: usize,

    /// Complete messages dropped because base64 decoding failed
    pub decode_errors: usize,

    /// Pending messages discarded by the staleness sweep
    pub expired: usize,

    /// Pending messages discarded to stay within the memory bounds
    pub evicted: usize,
}

/// Decode the concatenated chunk text.
///
/// Newer senders slice one base64 stream, so padding only ever appears at
/// the very end. Legacy senders base64-encode each chunk separately, which
/// puts padding mid-stream; a padding run therefore closes a segment and
/// each segment decodes independently.
fn decode_base64_stream(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let engine = &base64::engine::general_purpose::STANDARD;
    let bytes = encoded.as_bytes();

    let mut decoded = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'=' {
            while i < bytes.len() && bytes[i] == b'=' {
                i += 1;
            }
            decoded.extend(engine.decode(&bytes[start..i])?);
            start = i;
        } else {
            i += 1;
        }
    }
    if start < bytes.len() {
        decoded.extend(engine.decode(&bytes[start..])?);
    }

    Ok(decoded)
}

/// Reassembly state for one in-flight message id
#[derive(Debug)]
struct PendingMessage {
    /// part_index -> payload chunk (last write wins on duplicates)
    parts: HashMap<u32, String>,

    /// Fixed by the first frame seen for this id; later redeclarations are
    /// logged and ignored
    total_parts: u32,

    /// Total chunk bytes held for this message
    buffered_bytes: usize,

    /// Updated on every part arrival; drives expiry and eviction order
    last_seen_at: Instant,
}

/// Reassembles out-of-order, duplicated, or abandoned fragment frames into
/// complete decoded payloads.
///
/// Frames for a message are buffered until every part index `1..=total_parts`
/// has arrived, then the chunks are concatenated in index order and base64
/// decoded. Incomplete messages are swept once they go stale, and the oldest
/// pending message is evicted whenever the count or byte bounds are exceeded,
/// so a peer that opens message ids without finishing them cannot grow the
/// buffer without limit.
///
/// Malformed frames are dropped and counted, never escalated: the channel is
/// best-effort, and a lost fragment only ever means a missing subtitle line.
pub struct FragmentReassembler {
    config: ReassemblyConfig,
    pending: HashMap<String, PendingMessage>,
    buffered_bytes: usize,
    stats: ReassemblyStats,
}

impl FragmentReassembler {
    pub fn new(config: ReassemblyConfig) -> Self {
        Self {
            config,
            pending: HashMap::new(),
            buffered_bytes: 0,
            stats: ReassemblyStats::default(),
        }
    }

    /// Ingest one frame; returns the decoded payload when this frame
    /// completes its message.
    pub fn ingest(&mut self, frame: &RawFrame) -> Option<Vec<u8>> {
        self.ingest_at(frame, Instant::now())
    }

    /// Same as [`ingest`](Self::ingest) with an explicit clock, so expiry
    /// can be driven deterministically by embedders and tests.
    pub fn ingest_at(&mut self, frame: &RawFrame, now: Instant) -> Option<Vec<u8>> {
        self.sweep_stale(now);

        self.stats.frames_ingested += 1;

        if !frame.is_valid() {
            self.stats.invalid_fragments += 1;
            warn!(
                "Dropping invalid fragment: message_id={:?} part={}/{}",
                frame.message_id, frame.part_index, frame.total_parts
            );
            return None;
        }

        let entry = self
            .pending
            .entry(frame.message_id.clone())
            .or_insert_with(|| PendingMessage {
                parts: HashMap::new(),
                total_parts: frame.total_parts,
                buffered_bytes: 0,
                last_seen_at: now,
            });

        if entry.total_parts != frame.total_parts {
            // Senders are not supposed to redeclare the total; keep the
            // first value and still store the chunk.
            warn!(
                "Message {} redeclared total_parts {} -> {}; keeping {}",
                frame.message_id, entry.total_parts, frame.total_parts, entry.total_parts
            );
        }

        entry.last_seen_at = now;

        if let Some(old) = entry
            .parts
            .insert(frame.part_index, frame.payload_chunk.clone())
        {
            debug!(
                "Duplicate part {} for message {}",
                frame.part_index, frame.message_id
            );
            entry.buffered_bytes -= old.len();
            self.buffered_bytes -= old.len();
        }
        entry.buffered_bytes += frame.payload_chunk.len();
        self.buffered_bytes += frame.payload_chunk.len();

        // Check every index rather than the part count: a redeclared total
        // could otherwise let stray high indices stand in for missing ones.
        let complete = (1..=entry.total_parts).all(|i| entry.parts.contains_key(&i));
        if complete {
            let message = self.pending.remove(&frame.message_id)?;
            self.buffered_bytes -= message.buffered_bytes;

            let mut encoded = String::with_capacity(message.buffered_bytes);
            for index in 1..=message.total_parts {
                if let Some(chunk) = message.parts.get(&index) {
                    encoded.push_str(chunk);
                }
            }

            return match decode_base64_stream(&encoded) {
                Ok(payload) => {
                    self.stats.messages_completed += 1;
                    debug!(
                        "Message {} complete: {} parts, {} bytes",
                        frame.message_id,
                        message.total_parts,
                        payload.len()
                    );
                    Some(payload)
                }
                Err(e) => {
                    self.stats.decode_errors += 1;
                    warn!(
                        "Base64 decode failed for message {}: {}",
                        frame.message_id, e
                    );
                    None
                }
            };
        }

        self.enforce_bounds();

        None
    }

    /// Number of messages currently waiting for more parts
    pub fn pending_messages(&self) -> usize {
        self.pending.len()
    }

    /// Total chunk bytes currently buffered
    pub fn buffered_bytes(&self) -> usize {
        self.buffered_bytes
    }

    pub fn stats(&self) -> &ReassemblyStats {
        &self.stats
    }

    /// Drop pending messages whose last part arrived too long ago.
    ///
    /// Expiry is silent data loss: the sender retries or the UI tolerates
    /// a missing line. No completion is ever emitted for an expired id; a
    /// late part starts a fresh message.
    fn sweep_stale(&mut self, now: Instant) {
        let stale_after = self.config.stale_after;
        let before = self.pending.len();

        let mut freed = 0;
        self.pending.retain(|id, message| {
            let stale = now.duration_since(message.last_seen_at) > stale_after;
            if stale {
                info!(
                    "Pending message {} expired with {} of {} parts",
                    id,
                    message.parts.len(),
                    message.total_parts
                );
                freed += message.buffered_bytes;
            }
            !stale
        });

        self.buffered_bytes -= freed;
        self.stats.expired += before - self.pending.len();
    }

    /// Evict the pending message with the oldest `last_seen_at` until both
    /// the count and byte bounds hold again.
    fn enforce_bounds(&mut self) {
        while self.pending.len() > self.config.max_pending_messages
            || self.buffered_bytes > self.config.max_buffered_bytes
        {
            let oldest = self
                .pending
                .iter()
                .min_by_key(|(_, message)| message.last_seen_at)
                .map(|(id, _)| id.clone());

            let Some(id) = oldest else {
                break;
            };

            if let Some(message) = self.pending.remove(&id) {
                self.buffered_bytes -= message.buffered_bytes;
                self.stats.evicted += 1;
                warn!(
                    "Evicted pending message {} ({} of {} parts) to stay within bounds",
                    id,
                    message.parts.len(),
                    message.total_parts
                );
            }
        }
    }
}
