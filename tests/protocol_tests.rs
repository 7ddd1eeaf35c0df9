use scribe_live::protocol::{
    ClientEvent, ServerEvent, StopSession, TranscriptChunk, EMPTY_TRANSCRIPT_MESSAGE,
    SUMMARIZING_STATUS,
};

#[test]
fn test_join_session_deserialization() {
    let json = r#"{"event": "join-session", "data": "s1"}"#;

    let event: ClientEvent = serde_json::from_str(json).unwrap();
    assert_eq!(event, ClientEvent::JoinSession("s1".to_string()));
}

#[test]
fn test_transcript_chunk_deserialization() {
    let json = r#"{
        "event": "transcript-chunk",
        "data": {"sessionId": "s1", "text": "hello world"}
    }"#;

    let event: ClientEvent = serde_json::from_str(json).unwrap();
    assert_eq!(
        event,
        ClientEvent::TranscriptChunk(TranscriptChunk {
            session_id: "s1".to_string(),
            text: "hello world".to_string(),
        })
    );
}

#[test]
fn test_transcript_chunk_missing_text() {
    let json = r#"{"event": "transcript-chunk", "data": {"sessionId": "s1"}}"#;

    let event: ClientEvent = serde_json::from_str(json).unwrap();
    match event {
        ClientEvent::TranscriptChunk(chunk) => assert!(chunk.text.is_empty()),
        other => panic!("unexpected event: {:?}", other),
    }
}

#[test]
fn test_stop_session_with_and_without_transcript() {
    let with: ClientEvent = serde_json::from_str(
        r#"{"event": "stop-session", "data": {"sessionId": "s1", "transcript": "full text"}}"#,
    )
    .unwrap();
    assert_eq!(
        with,
        ClientEvent::StopSession(StopSession {
            session_id: "s1".to_string(),
            transcript: Some("full text".to_string()),
        })
    );

    let without: ClientEvent =
        serde_json::from_str(r#"{"event": "stop-session", "data": {"sessionId": "s1"}}"#)
            .unwrap();
    assert_eq!(
        without,
        ClientEvent::StopSession(StopSession {
            session_id: "s1".to_string(),
            transcript: None,
        })
    );
}

#[test]
fn test_malformed_client_events_are_rejected() {
    for json in [
        r#"{"event": "unknown-event", "data": "s1"}"#,
        r#"{"event": "transcript-chunk", "data": {"text": "no session"}}"#,
        r#"{"event": "join-session"}"#,
        r#"not json"#,
    ] {
        assert!(
            serde_json::from_str::<ClientEvent>(json).is_err(),
            "accepted malformed event: {}",
            json
        );
    }
}

#[test]
fn test_processing_status_serialization() {
    let json = serde_json::to_value(ServerEvent::summarizing()).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "event": "processing-status",
            "data": {"status": SUMMARIZING_STATUS}
        })
    );
}

#[test]
fn test_processing_complete_serialization() {
    let json = serde_json::to_value(ServerEvent::complete(EMPTY_TRANSCRIPT_MESSAGE)).unwrap();

    assert_eq!(json["event"], "processing-complete");
    assert_eq!(json["data"]["summary"], EMPTY_TRANSCRIPT_MESSAGE);
    assert!(ServerEvent::complete("x").is_complete());
    assert!(!ServerEvent::summarizing().is_complete());
}
