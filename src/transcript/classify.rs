use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::event::{Speaker, SubtitleStatus};

/// Table-driven classification of transcript events.
///
/// The wire taxonomy has evolved: older builds send hyphenated object tags
/// and lean on `stream_id` for speaker identity, newer builds send dotted
/// tags. Keeping the mapping in data instead of match arms lets new tags
/// ship as configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyConfig {
    /// object tag -> speaker
    pub speaker_tags: HashMap<String, Speaker>,

    /// object tag -> status override; these win over the final flags
    pub status_tags: HashMap<String, SubtitleStatus>,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        let mut speaker_tags = HashMap::new();
        for tag in ["user.transcription", "user-transcription"] {
            speaker_tags.insert(tag.to_string(), Speaker::Local);
        }
        for tag in [
            "assistant.transcription",
            "agent.transcription",
            "agent-transcription",
            "message.interrupt",
            "interrupt",
            "message.state",
            "state",
        ] {
            speaker_tags.insert(tag.to_string(), Speaker::Remote);
        }

        let mut status_tags = HashMap::new();
        for tag in ["message.interrupt", "interrupt", "message.state", "state"] {
            status_tags.insert(tag.to_string(), SubtitleStatus::Interrupted);
        }

        Self {
            speaker_tags,
            status_tags,
        }
    }
}

impl ClassifyConfig {
    /// Resolve the speaker: object tag first, then the legacy
    /// `stream_id == 0 => remote` convention.
    ///
    /// `None` means neither tier resolved; the event is unclassifiable and
    /// must be dropped rather than guessed.
    pub fn resolve_speaker(&self, object: Option<&str>, stream_id: Option<i64>) -> Option<Speaker> {
        if let Some(tag) = object {
            if let Some(speaker) = self.speaker_tags.get(tag) {
                return Some(*speaker);
            }
        }

        stream_id.map(|id| {
            if id == 0 {
                Speaker::Remote
            } else {
                Speaker::Local
            }
        })
    }

    /// Resolve completion status: a tag override wins, then `is_final` takes
    /// precedence over `final`; both absent means still in progress.
    pub fn resolve_status(
        &self,
        object: Option<&str>,
        final_flag: Option<bool>,
        is_final: Option<bool>,
    ) -> SubtitleStatus {
        if let Some(tag) = object {
            if let Some(status) = self.status_tags.get(tag) {
                return *status;
            }
        }

        match is_final.or(final_flag) {
            Some(true) => SubtitleStatus::Final,
            _ => SubtitleStatus::InProgress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_beats_stream_id() {
        let tables = ClassifyConfig::default();

        let speaker = tables.resolve_speaker(Some("user.transcription"), Some(0));
        assert_eq!(speaker, Some(Speaker::Local));
    }

    #[test]
    fn test_unknown_tag_falls_back_to_stream_id() {
        let tables = ClassifyConfig::default();

        assert_eq!(
            tables.resolve_speaker(Some("something.else"), Some(0)),
            Some(Speaker::Remote)
        );
        assert_eq!(
            tables.resolve_speaker(Some("something.else"), Some(7)),
            Some(Speaker::Local)
        );
        assert_eq!(tables.resolve_speaker(Some("something.else"), None), None);
    }

    #[test]
    fn test_is_final_takes_precedence() {
        let tables = ClassifyConfig::default();

        let status = tables.resolve_status(None, Some(true), Some(false));
        assert_eq!(status, SubtitleStatus::InProgress);

        let status = tables.resolve_status(None, Some(false), Some(true));
        assert_eq!(status, SubtitleStatus::Final);
    }

    #[test]
    fn test_interrupt_tag_overrides_final_flags() {
        let tables = ClassifyConfig::default();

        let status = tables.resolve_status(Some("message.interrupt"), Some(true), Some(true));
        assert_eq!(status, SubtitleStatus::Interrupted);
    }
}
