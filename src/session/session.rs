use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::config::SessionConfig;
use super::stats::SessionStats;
use super::turns::TurnTracker;
use crate::frame::RawFrame;
use crate::reassembly::FragmentReassembler;
use crate::transcript::{SubtitleEvent, TranscriptEngine};

/// One live subtitle session: reassembles fragments, classifies transcript
/// events, and enforces turn-state monotonicity.
///
/// Construct one instance per active connection at session start and drop it
/// at session end; all buffers are released with it. The data-flow methods
/// never fail: every malformed or unclassifiable input is dropped with a
/// diagnostic and a counter bump, and shows up to the user as nothing worse
/// than a missing subtitle line.
pub struct SubtitleSession {
    config: SessionConfig,
    reassembler: FragmentReassembler,
    engine: TranscriptEngine,
    turns: TurnTracker,
    started_at: chrono::DateTime<Utc>,
    subtitles_emitted: usize,
    turns_suppressed: usize,
    malformed_frames: usize,
}

impl SubtitleSession {
    pub fn new(config: SessionConfig) -> Self {
        info!("Creating subtitle session: {}", config.session_id);

        Self {
            reassembler: FragmentReassembler::new(config.reassembly.clone()),
            engine: TranscriptEngine::new(config.classify.clone()),
            turns: TurnTracker::new(),
            started_at: Utc::now(),
            subtitles_emitted: 0,
            turns_suppressed: 0,
            malformed_frames: 0,
            config,
        }
    }

    /// Feed one frame; returns a subtitle event when this frame completes a
    /// message that classifies to a visible update.
    pub fn handle_frame(&mut self, frame: &RawFrame) -> Option<SubtitleEvent> {
        let payload = self.reassembler.ingest(frame)?;
        self.deliver(&payload)
    }

    /// Feed raw frame text in either wire representation.
    pub fn handle_raw(&mut self, text: &str) -> Option<SubtitleEvent> {
        match RawFrame::parse(text) {
            Ok(frame) => self.handle_frame(&frame),
            Err(e) => {
                self.malformed_frames += 1;
                warn!("Dropping malformed frame text: {:#}", e);
                None
            }
        }
    }

    fn deliver(&mut self, payload: &[u8]) -> Option<SubtitleEvent> {
        let event = self.engine.on_payload(payload)?;

        if !self.turns.admit(event.speaker, event.turn_id, event.status) {
            self.turns_suppressed += 1;
            return None;
        }

        self.subtitles_emitted += 1;
        Some(event)
    }

    /// Consume frames from a channel until the sender closes, pushing
    /// subtitle events out in production order.
    ///
    /// This is a convenience for transports that deliver frames on a
    /// callback: forward them into the channel and render from the other
    /// end. The session itself stays single-threaded; frames are processed
    /// strictly in arrival order.
    pub async fn run(
        mut self,
        mut frames: mpsc::Receiver<RawFrame>,
        subtitles: mpsc::Sender<SubtitleEvent>,
    ) -> SessionStats {
        info!("Subtitle session {} started", self.config.session_id);

        while let Some(frame) = frames.recv().await {
            if let Some(event) = self.handle_frame(&frame) {
                if subtitles.send(event).await.is_err() {
                    debug!("Subtitle receiver dropped; stopping session");
                    break;
                }
            }
        }

        let stats = self.stats();
        info!(
            "Subtitle session {} finished: {} subtitles from {} frames",
            self.config.session_id, stats.subtitles_emitted, stats.reassembly.frames_ingested
        );

        stats
    }

    /// Current session statistics
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            session_id: self.config.session_id.clone(),
            started_at: self.started_at,
            subtitles_emitted: self.subtitles_emitted,
            turns_suppressed: self.turns_suppressed,
            malformed_frames: self.malformed_frames,
            reassembly: self.reassembler.stats().clone(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}
