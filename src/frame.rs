use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// One inbound transport frame carrying a fragment of a logical message.
///
/// The real-time channel limits frame size, so a single transcript event is
/// split across several frames sharing a `message_id`. Concatenating the
/// `payload_chunk`s for parts `1..=total_parts` in index order yields the
/// complete base64 text of the event payload.
///
/// Two wire representations are in use and both deserialize into this shape:
/// the legacy pipe-delimited text form
/// `"<message_id>|<part_index>|<total_parts>|<base64_chunk>"`, and a
/// structured JSON object from newer builds.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFrame {
    /// Logical message identifier, shared by all parts of one event
    #[serde(alias = "msg_id")]
    pub message_id: String,

    /// 1-based part index within the message
    #[serde(alias = "part", alias = "index")]
    pub part_index: u32,

    /// Total number of parts in the message
    #[serde(alias = "total", alias = "parts")]
    pub total_parts: u32,

    /// This part's slice of the base64-encoded payload
    #[serde(alias = "content", alias = "chunk")]
    pub payload_chunk: String,
}

impl RawFrame {
    /// Parse frame text in either wire representation.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim_start();
        if trimmed.starts_with('{') {
            serde_json::from_str(trimmed).context("Failed to parse structured frame")
        } else {
            Self::parse_legacy(text)
        }
    }

    /// Parse the legacy pipe-delimited frame text.
    ///
    /// The chunk is everything after the third `|`, so base64 text is taken
    /// as-is even though `|` never appears in it.
    pub fn parse_legacy(text: &str) -> Result<Self> {
        let mut fields = text.splitn(4, '|');
        match (fields.next(), fields.next(), fields.next(), fields.next()) {
            (Some(id), Some(index), Some(total), Some(chunk)) => {
                let part_index = index
                    .trim()
                    .parse::<u32>()
                    .with_context(|| format!("Invalid part index: {:?}", index))?;
                let total_parts = total
                    .trim()
                    .parse::<u32>()
                    .with_context(|| format!("Invalid total parts: {:?}", total))?;

                Ok(Self {
                    message_id: id.to_string(),
                    part_index,
                    total_parts,
                    payload_chunk: chunk.to_string(),
                })
            }
            _ => bail!(
                "Malformed frame text: expected <message_id>|<part_index>|<total_parts>|<chunk>"
            ),
        }
    }

    /// Whether the part indices satisfy `1 <= part_index <= total_parts`.
    pub fn is_valid(&self) -> bool {
        !self.message_id.is_empty() && self.part_index >= 1 && self.part_index <= self.total_parts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_legacy_frame() {
        let frame = RawFrame::parse("msg-42|2|3|SGVsbG8=").unwrap();

        assert_eq!(frame.message_id, "msg-42");
        assert_eq!(frame.part_index, 2);
        assert_eq!(frame.total_parts, 3);
        assert_eq!(frame.payload_chunk, "SGVsbG8=");
        assert!(frame.is_valid());
    }

    #[test]
    fn test_parse_structured_frame() {
        let frame =
            RawFrame::parse(r#"{"message_id":"msg-1","part_index":1,"total_parts":1,"payload_chunk":"QQ=="}"#)
                .unwrap();

        assert_eq!(frame.message_id, "msg-1");
        assert_eq!(frame.part_index, 1);
        assert_eq!(frame.payload_chunk, "QQ==");
    }

    #[test]
    fn test_parse_structured_frame_aliases() {
        let frame = RawFrame::parse(r#"{"msg_id":"msg-2","part":1,"total":2,"content":"QQ=="}"#)
            .unwrap();

        assert_eq!(frame.message_id, "msg-2");
        assert_eq!(frame.part_index, 1);
        assert_eq!(frame.total_parts, 2);
        assert_eq!(frame.payload_chunk, "QQ==");
    }

    #[test]
    fn test_parse_rejects_short_frame() {
        assert!(RawFrame::parse("msg-1|1|QQ==").is_err());
        assert!(RawFrame::parse("").is_err());
    }

    #[test]
    fn test_parse_rejects_non_numeric_indices() {
        assert!(RawFrame::parse("msg-1|one|3|QQ==").is_err());
        assert!(RawFrame::parse("msg-1|1|three|QQ==").is_err());
    }

    #[test]
    fn test_is_valid_bounds() {
        let mut frame = RawFrame::parse_legacy("msg-1|1|3|QQ==").unwrap();
        assert!(frame.is_valid());

        frame.part_index = 0;
        assert!(!frame.is_valid());

        frame.part_index = 4;
        assert!(!frame.is_valid());
    }
}
