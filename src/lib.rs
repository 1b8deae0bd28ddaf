pub mod config;
pub mod frame;
pub mod reassembly;
pub mod session;
pub mod transcript;

pub use config::Config;
pub use frame::RawFrame;
pub use reassembly::{FragmentReassembler, ReassemblyConfig, ReassemblyStats};
pub use session::{SessionConfig, SessionStats, SubtitleSession, TurnTracker};
pub use transcript::{
    ClassifyConfig, Speaker, SubtitleEvent, SubtitleStatus, TranscriptEngine, TranscriptEvent,
};
