//! Briefing stream command
//!
//! Opens the event stream for one meeting and drives the terminal view from
//! the session reducer until a terminal phase is reached, then closes the
//! transport — on every terminal transition, including the final briefing.

use crate::domain::session::{BriefingPhase, BriefingSession, SessionInput, ViewAction};
use crate::domain::protocol::{ProtocolError, StreamSignal};
use crate::error::{AppError, Result};
use crate::ports::stream::{BriefingStreamCallback, BriefingStreamPort};
use crate::utils::term;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};

/// Bridges stream callbacks to the session reducer and the terminal
///
/// The session itself decides what each input means; this type only executes
/// the returned view actions and wakes the command when the stream is over.
struct TerminalStreamCallback {
    session: Arc<Mutex<BriefingSession>>,
    finished: Arc<Notify>,
}

impl TerminalStreamCallback {
    async fn apply(&self, input: SessionInput) {
        let actions = self.session.lock().await.handle(input);
        let mut close_requested = false;

        for action in actions {
            match action {
                ViewAction::AppendStatus(text) => term::status_line(&text),
                ViewAction::AppendCompletion => term::status_line("Process complete."),
                ViewAction::AppendWarning(text) => term::warning_line(&text),
                ViewAction::AppendConnectionLost => term::warning_line("Connection lost."),
                ViewAction::ShowDocument(document) => term::render_document(&document),
                ViewAction::CloseTransport => close_requested = true,
            }
        }

        if close_requested || self.session.lock().await.is_terminal() {
            self.finished.notify_one();
        }
    }
}

#[async_trait]
impl BriefingStreamCallback for TerminalStreamCallback {
    async fn on_signal(&self, signal: StreamSignal) {
        self.apply(SessionInput::Signal(signal)).await;
    }

    async fn on_protocol_error(&self, error: ProtocolError) {
        self.apply(SessionInput::Malformed(error)).await;
    }

    async fn on_transport_error(&self, detail: String) {
        self.apply(SessionInput::TransportError(detail)).await;
    }

    async fn on_close(&self) {
        self.apply(SessionInput::Closed).await;
        // The transport is gone either way; let the command finish.
        self.finished.notify_one();
    }
}

pub async fn run(
    stream: &dyn BriefingStreamPort,
    meeting_id: &str,
    session: BriefingSession,
) -> Result<()> {
    term::banner("Briefing");
    term::info_line(&format!("Generating your briefing for meeting {meeting_id}..."));

    let session = Arc::new(Mutex::new(session));
    let finished = Arc::new(Notify::new());
    let callback = Box::new(TerminalStreamCallback {
        session: Arc::clone(&session),
        finished: Arc::clone(&finished),
    });

    let mut handle = stream.open(meeting_id, callback).await?;

    finished.notified().await;
    handle.close().await?;

    let phase = session.lock().await.phase();
    log::info!("Briefing stream finished in phase {phase:?}");

    match phase {
        BriefingPhase::Completed | BriefingPhase::Finalized => Ok(()),
        BriefingPhase::Errored => Err(AppError::Stream(
            "briefing stream failed before completing".to_string(),
        )),
        _ => {
            // The server closed without a terminal event; everything received
            // so far is already on screen.
            log::warn!("stream closed before a terminal event");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::TransientErrorPolicy;
    use crate::ports::mocks::{ScriptStep, ScriptedBriefingStream};

    fn status(text: &str) -> ScriptStep {
        ScriptStep::Signal(StreamSignal::Status(text.to_string()))
    }

    fn session(policy: TransientErrorPolicy) -> BriefingSession {
        BriefingSession::new(policy)
    }

    #[tokio::test]
    async fn test_done_path_closes_transport() {
        let stream = ScriptedBriefingStream::new(vec![
            status("Found meeting: Sync"),
            status("Researching..."),
            ScriptStep::Signal(StreamSignal::Done),
            ScriptStep::Close,
        ]);

        run(&stream, "evt42", session(TransientErrorPolicy::Ignore))
            .await
            .unwrap();

        assert!(stream.was_closed());
        assert_eq!(stream.opened_for().as_deref(), Some("evt42"));
    }

    #[tokio::test]
    async fn test_final_briefing_path_closes_transport() {
        let stream = ScriptedBriefingStream::new(vec![
            status("Generating..."),
            ScriptStep::Signal(StreamSignal::FinalBriefing(
                "### Title|||- point one|||- point two".to_string(),
            )),
            ScriptStep::Close,
        ]);

        run(&stream, "evt7", session(TransientErrorPolicy::Ignore))
            .await
            .unwrap();

        assert!(stream.was_closed());
    }

    #[tokio::test]
    async fn test_duplicate_final_briefing_still_succeeds() {
        // A second terminal payload must be dropped by the reducer even if
        // the transport delivers it before the close takes effect.
        let stream = ScriptedBriefingStream::new(vec![
            ScriptStep::Signal(StreamSignal::FinalBriefing("### First".to_string())),
            ScriptStep::Signal(StreamSignal::FinalBriefing("### Second".to_string())),
            ScriptStep::Close,
        ]);

        run(&stream, "evt7", session(TransientErrorPolicy::Ignore))
            .await
            .unwrap();

        assert!(stream.was_closed());
    }

    #[tokio::test]
    async fn test_transport_error_surfaced_is_a_failure() {
        let stream = ScriptedBriefingStream::new(vec![
            status("working"),
            ScriptStep::TransportError("connection reset".to_string()),
        ]);

        let error = run(&stream, "evt1", session(TransientErrorPolicy::Surface))
            .await
            .unwrap_err();

        assert!(matches!(error, AppError::Stream(_)));
        assert!(stream.was_closed());
    }

    #[tokio::test]
    async fn test_clean_close_without_terminal_is_not_a_failure() {
        let stream = ScriptedBriefingStream::new(vec![status("working"), ScriptStep::Close]);

        run(&stream, "evt1", session(TransientErrorPolicy::Ignore))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_malformed_payload_does_not_end_the_stream() {
        let stream = ScriptedBriefingStream::new(vec![
            ScriptStep::Malformed(ProtocolError::UnrecognizedPayload("NOISE".to_string())),
            status("still going"),
            ScriptStep::Signal(StreamSignal::Done),
            ScriptStep::Close,
        ]);

        run(&stream, "evt1", session(TransientErrorPolicy::Surface))
            .await
            .unwrap();
        assert!(stream.was_closed());
    }
}
