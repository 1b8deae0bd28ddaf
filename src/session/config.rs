use serde::{Deserialize, Serialize};

use crate::reassembly::ReassemblyConfig;
use crate::transcript::ClassifyConfig;

/// Configuration for one subtitle session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Unique session identifier. Message ids are only unique per logical
    /// connection, so a process multiplexing several participants must run
    /// one session each (or prefix message ids with this).
    pub session_id: String,

    /// Reassembly staleness threshold and memory bounds
    pub reassembly: ReassemblyConfig,

    /// Speaker and status classification tables
    pub classify: ClassifyConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("session-{}", uuid::Uuid::new_v4()),
            reassembly: ReassemblyConfig::default(),
            classify: ClassifyConfig::default(),
        }
    }
}
