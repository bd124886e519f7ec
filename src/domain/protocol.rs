//! Tagged-line protocol carried over the briefing event stream
//!
//! The backend multiplexes progress lines and the final result over a plain
//! server-sent-event channel using a small text convention: unnamed events
//! carry either a `STATUS:` line or the literal `DONE`, and a named
//! `final_briefing` event carries the encoded document. The tags and the
//! separator token live here as named constants so producer and consumer
//! cannot drift apart, and anything that matches no tag parses into a
//! distinguishable error instead of being dropped on the floor.

use thiserror::Error;

/// Prefix tagging incremental progress lines on the unnamed event channel
pub const STATUS_PREFIX: &str = "STATUS:";

/// Literal payload marking the end of the stream on the unnamed channel
pub const DONE_PAYLOAD: &str = "DONE";

/// Name of the event carrying the final briefing document
pub const FINAL_BRIEFING_EVENT: &str = "final_briefing";

/// Token standing in for real newlines inside the final briefing payload
pub const LINE_SEPARATOR: &str = "|||";

/// One parsed signal from the briefing stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamSignal {
    /// A human-readable progress line, order-preserving
    Status(String),

    /// Terminal marker: no further status lines follow
    Done,

    /// Terminal payload: the encoded briefing document, at most once
    FinalBriefing(String),
}

/// A stream payload that matches none of the protocol's tags
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("unrecognized stream payload: {0:?}")]
    UnrecognizedPayload(String),

    #[error("unrecognized stream event: {0:?}")]
    UnrecognizedEvent(String),
}

impl StreamSignal {
    /// Parse a payload delivered on the unnamed (default) event channel
    ///
    /// `STATUS:` lines lose the tag and exactly one following space; every
    /// other character of the payload is preserved verbatim.
    pub fn from_default_event(data: &str) -> Result<Self, ProtocolError> {
        if data == DONE_PAYLOAD {
            return Ok(StreamSignal::Done);
        }
        if let Some(rest) = data.strip_prefix(STATUS_PREFIX) {
            let text = rest.strip_prefix(' ').unwrap_or(rest);
            return Ok(StreamSignal::Status(text.to_string()));
        }
        Err(ProtocolError::UnrecognizedPayload(preview(data)))
    }

    /// Parse a named event and its payload
    pub fn from_named_event(event: &str, data: &str) -> Result<Self, ProtocolError> {
        if event == FINAL_BRIEFING_EVENT {
            return Ok(StreamSignal::FinalBriefing(data.to_string()));
        }
        Err(ProtocolError::UnrecognizedEvent(event.to_string()))
    }

    /// True for the two mutually exclusive terminal signals
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamSignal::Done | StreamSignal::FinalBriefing(_))
    }
}

/// Cap payload previews embedded in error messages
fn preview(data: &str) -> String {
    const MAX_CHARS: usize = 80;
    if data.chars().count() <= MAX_CHARS {
        data.to_string()
    } else {
        let mut cut: String = data.chars().take(MAX_CHARS).collect();
        cut.push_str("...");
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_strips_tag_and_one_space() {
        let signal = StreamSignal::from_default_event("STATUS: Researching company website...")
            .unwrap();
        assert_eq!(
            signal,
            StreamSignal::Status("Researching company website...".to_string())
        );
    }

    #[test]
    fn test_status_preserves_extra_whitespace() {
        // Only one space after the colon is part of the tag.
        let signal = StreamSignal::from_default_event("STATUS:  indented").unwrap();
        assert_eq!(signal, StreamSignal::Status(" indented".to_string()));

        let signal = StreamSignal::from_default_event("STATUS:tight").unwrap();
        assert_eq!(signal, StreamSignal::Status("tight".to_string()));
    }

    #[test]
    fn test_status_empty_text() {
        let signal = StreamSignal::from_default_event("STATUS: ").unwrap();
        assert_eq!(signal, StreamSignal::Status(String::new()));
    }

    #[test]
    fn test_done_is_exact_match() {
        assert_eq!(
            StreamSignal::from_default_event("DONE").unwrap(),
            StreamSignal::Done
        );
        // Near-misses are not silently treated as completion.
        assert!(StreamSignal::from_default_event("DONE ").is_err());
        assert!(StreamSignal::from_default_event("done").is_err());
    }

    #[test]
    fn test_unrecognized_payload_is_distinguishable() {
        let err = StreamSignal::from_default_event("PROGRESS: 40%").unwrap_err();
        assert!(matches!(err, ProtocolError::UnrecognizedPayload(_)));
        assert!(err.to_string().contains("PROGRESS"));
    }

    #[test]
    fn test_final_briefing_event() {
        let signal =
            StreamSignal::from_named_event(FINAL_BRIEFING_EVENT, "### Title|||- one").unwrap();
        assert_eq!(
            signal,
            StreamSignal::FinalBriefing("### Title|||- one".to_string())
        );
        assert!(signal.is_terminal());
    }

    #[test]
    fn test_unknown_named_event() {
        let err = StreamSignal::from_named_event("heartbeat", "ping").unwrap_err();
        assert_eq!(err, ProtocolError::UnrecognizedEvent("heartbeat".to_string()));
    }

    #[test]
    fn test_preview_caps_long_payloads() {
        let long = "x".repeat(500);
        let err = StreamSignal::from_default_event(&long).unwrap_err();
        assert!(err.to_string().len() < 200);
    }
}
