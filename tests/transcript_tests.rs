// Integration tests for transcript decoding and classification
//
// These tests exercise the table-driven speaker/status resolution across
// both wire generations (dotted object tags vs. legacy stream_id) and the
// drop semantics for unparseable or unclassifiable payloads.

use agent_subtitles::{ClassifyConfig, Speaker, SubtitleStatus, TranscriptEngine};

fn engine() -> TranscriptEngine {
    TranscriptEngine::new(ClassifyConfig::default())
}

#[test]
fn test_user_transcription_is_local_in_progress() {
    let event = engine()
        .on_payload(br#"{"object":"user.transcription","turn_id":5,"text":"hello"}"#)
        .unwrap();

    assert_eq!(event.speaker, Speaker::Local);
    assert_eq!(event.turn_id, 5);
    assert_eq!(event.text, "hello");
    assert_eq!(event.status, SubtitleStatus::InProgress);
}

#[test]
fn test_assistant_transcription_is_remote() {
    let event = engine()
        .on_payload(br#"{"object":"assistant.transcription","turn_id":2,"text":"hi there"}"#)
        .unwrap();

    assert_eq!(event.speaker, Speaker::Remote);
}

#[test]
fn test_hyphenated_tags_still_resolve() {
    let local = engine()
        .on_payload(br#"{"object":"user-transcription","turn_id":1,"text":"a"}"#)
        .unwrap();
    let remote = engine()
        .on_payload(br#"{"object":"agent-transcription","turn_id":1,"text":"b"}"#)
        .unwrap();

    assert_eq!(local.speaker, Speaker::Local);
    assert_eq!(remote.speaker, Speaker::Remote);
}

#[test]
fn test_is_final_marks_final() {
    let event = engine()
        .on_payload(br#"{"object":"user.transcription","turn_id":5,"text":"hello","is_final":true}"#)
        .unwrap();

    assert_eq!(event.status, SubtitleStatus::Final);
}

#[test]
fn test_legacy_final_flag_marks_final() {
    let event = engine()
        .on_payload(br#"{"stream_id":0,"turn_id":3,"text":"done","final":true}"#)
        .unwrap();

    assert_eq!(event.speaker, Speaker::Remote);
    assert_eq!(event.status, SubtitleStatus::Final);
}

#[test]
fn test_is_final_takes_precedence_over_final() {
    let event = engine()
        .on_payload(br#"{"stream_id":1,"turn_id":3,"text":"still going","final":true,"is_final":false}"#)
        .unwrap();

    assert_eq!(event.status, SubtitleStatus::InProgress);
}

#[test]
fn test_interrupt_tag_maps_to_interrupted() {
    // The tag override wins even when the flags claim a clean finish
    let event = engine()
        .on_payload(br#"{"object":"message.interrupt","turn_id":4,"text":"so as I was","is_final":true}"#)
        .unwrap();

    assert_eq!(event.speaker, Speaker::Remote);
    assert_eq!(event.status, SubtitleStatus::Interrupted);
}

#[test]
fn test_legacy_stream_id_resolves_speaker() {
    let agent = engine()
        .on_payload(br#"{"stream_id":0,"turn_id":1,"text":"agent line"}"#)
        .unwrap();
    let user = engine()
        .on_payload(br#"{"stream_id":1234,"turn_id":1,"text":"user line"}"#)
        .unwrap();

    assert_eq!(agent.speaker, Speaker::Remote);
    assert_eq!(user.speaker, Speaker::Local);
}

#[test]
fn test_unclassifiable_event_is_dropped() {
    // No recognizable tag and no stream_id: drop rather than guess
    let event = engine().on_payload(br#"{"object":"metrics.report","turn_id":1,"text":"x"}"#);

    assert!(event.is_none());
}

#[test]
fn test_empty_text_is_suppressed() {
    let explicit = engine().on_payload(br#"{"object":"user.transcription","turn_id":5,"text":""}"#);
    let missing = engine().on_payload(br#"{"object":"user.transcription","turn_id":5}"#);

    assert!(explicit.is_none());
    assert!(missing.is_none());
}

#[test]
fn test_missing_turn_id_uses_sentinel() {
    let event = engine()
        .on_payload(br#"{"object":"user.transcription","text":"hi"}"#)
        .unwrap();

    assert_eq!(event.turn_id, -1);
}

#[test]
fn test_unknown_fields_are_ignored() {
    let event = engine()
        .on_payload(
            br#"{"object":"user.transcription","turn_id":5,"text":"hi","words":[],"language":"en","latency_ms":120}"#,
        )
        .unwrap();

    assert_eq!(event.text, "hi");
}

#[test]
fn test_unparseable_payload_is_dropped() {
    assert!(engine().on_payload(b"not json at all").is_none());
    assert!(engine().on_payload(&[0xff, 0xfe, 0x00]).is_none());
    assert!(engine().on_payload(br#"["an","array"]"#).is_none());
}

#[test]
fn test_custom_tables_route_new_tags() {
    let mut tables = ClassifyConfig::default();
    tables
        .speaker_tags
        .insert("narrator.transcription".to_string(), Speaker::Remote);

    let event = TranscriptEngine::new(tables)
        .on_payload(br#"{"object":"narrator.transcription","turn_id":9,"text":"meanwhile"}"#)
        .unwrap();

    assert_eq!(event.speaker, Speaker::Remote);
}
