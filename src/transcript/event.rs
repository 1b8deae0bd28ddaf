use serde::{Deserialize, Serialize};

/// Sentinel turn id used when an event carries none.
///
/// Consumers must treat negative turn ids as "unknown turn"; they bypass
/// turn-state tracking entirely.
pub const UNKNOWN_TURN: i64 = -1;

/// Decoded logical payload of one completed message.
///
/// Every consumed field is optional because two wire generations are live:
/// newer builds tag events with `object` and close them with `is_final`,
/// older builds rely on `stream_id` and `final`. Fields this engine does not
/// interpret pass through serde unharmed and are simply dropped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranscriptEvent {
    /// Message taxonomy tag ("user.transcription", "message.interrupt", ...)
    #[serde(default)]
    pub object: Option<String>,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub turn_id: Option<i64>,

    /// Legacy speaker discriminator: 0 is the agent, anything else the user
    #[serde(default)]
    pub stream_id: Option<i64>,

    /// Completion flag in the older wire generation
    #[serde(default, rename = "final")]
    pub final_flag: Option<bool>,

    /// Completion flag in the newer wire generation; wins when both present
    #[serde(default)]
    pub is_final: Option<bool>,
}

/// Which side of the conversation produced a subtitle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// The device user
    Local,
    /// The server-side agent
    Remote,
}

/// Where a subtitle line stands within its turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtitleStatus {
    /// Interim text; more updates for this turn may follow
    InProgress,
    /// The turn finished normally
    Final,
    /// The turn was cut off before finishing
    Interrupted,
}

impl SubtitleStatus {
    /// Terminal statuses close a turn; no further updates are emitted for it.
    pub fn is_terminal(self) -> bool {
        matches!(self, SubtitleStatus::Final | SubtitleStatus::Interrupted)
    }
}

/// One UI-ready subtitle update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleEvent {
    pub speaker: Speaker,

    /// Turn this update belongs to; negative means unknown
    pub turn_id: i64,

    /// Always non-empty; empty interim events are suppressed upstream
    pub text: String,

    pub status: SubtitleStatus,
}
