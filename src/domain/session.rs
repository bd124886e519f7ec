//! Briefing session state machine
//!
//! A pure reducer over the closed set of inputs one stream can produce. The
//! transport feeds inputs in arrival order; the reducer returns the view
//! actions the rendering layer must carry out. Nothing in here touches the
//! terminal or the network, which keeps every transition testable without a
//! live stream.
//!
//! Phases: `Connecting` → `Streaming` → `Completed` (via `DONE`) or
//! `Finalized` (via the final briefing); `Errored` is reachable from any
//! non-terminal phase. After a terminal phase, further stream input is
//! dropped — the final briefing renders at most once per connection.

use crate::domain::briefing::BriefingDocument;
use crate::domain::protocol::{ProtocolError, StreamSignal};

/// Lifecycle phase of one briefing stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BriefingPhase {
    Connecting,
    Streaming,
    Completed,
    Finalized,
    Errored,
}

impl BriefingPhase {
    /// True once no further stream input may mutate the session
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            BriefingPhase::Completed | BriefingPhase::Finalized | BriefingPhase::Errored
        )
    }
}

/// Treatment of transport-level stream errors
///
/// The two deployed variants are not reconcilable, so the choice is explicit
/// configuration: `Ignore` leans on the transport layer's reconnection and
/// takes no UI action; `Surface` treats any transport error as fatal and
/// reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransientErrorPolicy {
    Ignore,
    Surface,
}

impl std::fmt::Display for TransientErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransientErrorPolicy::Ignore => write!(f, "ignore"),
            TransientErrorPolicy::Surface => write!(f, "surface"),
        }
    }
}

impl std::str::FromStr for TransientErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ignore" => Ok(TransientErrorPolicy::Ignore),
            "surface" => Ok(TransientErrorPolicy::Surface),
            other => Err(format!(
                "unknown transient-error policy {other:?} (expected \"ignore\" or \"surface\")"
            )),
        }
    }
}

/// Everything the transport can feed into the reducer
#[derive(Debug, Clone)]
pub enum SessionInput {
    /// A parsed protocol signal
    Signal(StreamSignal),

    /// A payload that matched none of the protocol's tags
    Malformed(ProtocolError),

    /// The transport failed and will not be retried further
    TransportError(String),

    /// The stream closed without a preceding terminal signal
    Closed,
}

/// Side effects the rendering layer must carry out, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    /// Append one progress line to the progress view
    AppendStatus(String),

    /// Append the fixed completion line to the progress view
    AppendCompletion,

    /// Append a visible warning line (malformed stream payload)
    AppendWarning(String),

    /// Append the visible connection-lost line
    AppendConnectionLost,

    /// Replace the progress view with the decoded document
    ShowDocument(BriefingDocument),

    /// Close the stream transport
    CloseTransport,
}

/// State machine for one briefing stream
#[derive(Debug)]
pub struct BriefingSession {
    phase: BriefingPhase,
    policy: TransientErrorPolicy,
}

impl BriefingSession {
    pub fn new(policy: TransientErrorPolicy) -> Self {
        Self {
            phase: BriefingPhase::Connecting,
            policy,
        }
    }

    pub fn phase(&self) -> BriefingPhase {
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Advance the state machine with one input, returning view actions in
    /// the order they must be applied
    pub fn handle(&mut self, input: SessionInput) -> Vec<ViewAction> {
        if self.phase.is_terminal() {
            log::debug!("dropping stream input after terminal phase {:?}", self.phase);
            return Vec::new();
        }

        match input {
            SessionInput::Signal(StreamSignal::Status(text)) => {
                self.phase = BriefingPhase::Streaming;
                vec![ViewAction::AppendStatus(text)]
            }
            SessionInput::Signal(StreamSignal::Done) => {
                self.phase = BriefingPhase::Completed;
                vec![ViewAction::AppendCompletion, ViewAction::CloseTransport]
            }
            SessionInput::Signal(StreamSignal::FinalBriefing(payload)) => {
                self.phase = BriefingPhase::Finalized;
                vec![
                    ViewAction::ShowDocument(BriefingDocument::decode(&payload)),
                    ViewAction::CloseTransport,
                ]
            }
            SessionInput::Malformed(error) => {
                // Visible but non-terminal: a newer server emitting extra
                // tags degrades to warnings instead of a dead stream.
                vec![ViewAction::AppendWarning(error.to_string())]
            }
            SessionInput::TransportError(detail) => match self.policy {
                TransientErrorPolicy::Ignore => {
                    log::warn!("stream transport error (ignored): {detail}");
                    Vec::new()
                }
                TransientErrorPolicy::Surface => {
                    log::error!("stream transport error: {detail}");
                    self.phase = BriefingPhase::Errored;
                    vec![ViewAction::AppendConnectionLost, ViewAction::CloseTransport]
                }
            },
            SessionInput::Closed => match self.policy {
                TransientErrorPolicy::Ignore => {
                    log::info!("stream closed by server before a terminal event");
                    Vec::new()
                }
                TransientErrorPolicy::Surface => {
                    self.phase = BriefingPhase::Errored;
                    vec![ViewAction::AppendConnectionLost, ViewAction::CloseTransport]
                }
            },
        }
    }
}
