/// Briefing stream port traits
///
/// Defines the interface for the long-lived briefing event stream: a port
/// that opens one stream per meeting, a callback driven as events arrive,
/// and a handle for closing the transport.
/// Implementation: SseBriefingStream (reqwest byte stream).
use crate::domain::protocol::{ProtocolError, StreamSignal};
use crate::error::Result;
use async_trait::async_trait;

/// Callback driven by the stream transport as events arrive
///
/// Calls are made from the transport's receiver task, one at a time, in
/// arrival order.
#[async_trait]
pub trait BriefingStreamCallback: Send + Sync {
    /// A parsed protocol signal arrived
    async fn on_signal(&self, signal: StreamSignal);

    /// A payload arrived that matches none of the protocol's tags
    async fn on_protocol_error(&self, error: ProtocolError);

    /// The transport failed and will not be retried further
    async fn on_transport_error(&self, detail: String);

    /// The stream closed (server end of stream, or local close)
    async fn on_close(&self);
}

/// Handle to one open briefing stream
#[async_trait]
pub trait StreamHandle: Send + std::fmt::Debug {
    /// Close the transport; idempotent, later calls are no-ops
    async fn close(&mut self) -> Result<()>;

    /// Whether the receiver task is still running
    fn is_active(&self) -> bool;
}

/// Port trait for opening briefing streams
#[async_trait]
pub trait BriefingStreamPort: Send + Sync {
    /// Open the stream for one meeting and start delivering events to the
    /// callback; exactly one stream is expected per command invocation
    async fn open(
        &self,
        meeting_id: &str,
        callback: Box<dyn BriefingStreamCallback>,
    ) -> Result<Box<dyn StreamHandle>>;
}
