//! Hand-rolled test doubles for the stream port
//!
//! The scripted stream replays a fixed sequence of transport events to the
//! callback from a spawned task, mirroring how the real adapter delivers
//! them; the recording callback captures everything it is driven with.

use crate::domain::protocol::{ProtocolError, StreamSignal};
use crate::error::Result;
use crate::ports::stream::{BriefingStreamCallback, BriefingStreamPort, StreamHandle};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// One step of a scripted stream
#[derive(Debug, Clone)]
pub enum ScriptStep {
    Signal(StreamSignal),
    Malformed(ProtocolError),
    TransportError(String),
    Close,
}

/// Stream port double that replays a fixed script
#[derive(Clone)]
pub struct ScriptedBriefingStream {
    script: Vec<ScriptStep>,
    closed: Arc<AtomicBool>,
    opened_for: Arc<Mutex<Option<String>>>,
}

impl ScriptedBriefingStream {
    pub fn new(script: Vec<ScriptStep>) -> Self {
        Self {
            script,
            closed: Arc::new(AtomicBool::new(false)),
            opened_for: Arc::new(Mutex::new(None)),
        }
    }

    /// Whether the handle returned by `open` was closed
    pub fn was_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// The meeting identifier the stream was opened for
    pub fn opened_for(&self) -> Option<String> {
        self.opened_for.lock().unwrap().clone()
    }
}

#[async_trait]
impl BriefingStreamPort for ScriptedBriefingStream {
    async fn open(
        &self,
        meeting_id: &str,
        callback: Box<dyn BriefingStreamCallback>,
    ) -> Result<Box<dyn StreamHandle>> {
        *self.opened_for.lock().unwrap() = Some(meeting_id.to_string());

        let script = self.script.clone();
        let active = Arc::new(AtomicBool::new(true));
        let task_active = Arc::clone(&active);

        let task = tokio::spawn(async move {
            for step in script {
                match step {
                    ScriptStep::Signal(signal) => callback.on_signal(signal).await,
                    ScriptStep::Malformed(error) => callback.on_protocol_error(error).await,
                    ScriptStep::TransportError(detail) => {
                        callback.on_transport_error(detail).await;
                    }
                    ScriptStep::Close => {
                        callback.on_close().await;
                        break;
                    }
                }
            }
            task_active.store(false, Ordering::SeqCst);
        });

        Ok(Box::new(ScriptedHandle {
            task: Some(task),
            active,
            closed: Arc::clone(&self.closed),
        }))
    }
}

#[derive(Debug)]
struct ScriptedHandle {
    task: Option<tokio::task::JoinHandle<()>>,
    active: Arc<AtomicBool>,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl StreamHandle for ScriptedHandle {
    async fn close(&mut self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        self.active.store(false, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

/// What a recording callback observed, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedEvent {
    Signal(StreamSignal),
    Protocol(ProtocolError),
    Transport(String),
    Closed,
}

/// Callback double that records everything it is driven with
#[derive(Clone, Default)]
pub struct RecordingCallback {
    events: Arc<Mutex<Vec<RecordedEvent>>>,
}

impl RecordingCallback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl BriefingStreamCallback for RecordingCallback {
    async fn on_signal(&self, signal: StreamSignal) {
        self.events.lock().unwrap().push(RecordedEvent::Signal(signal));
    }

    async fn on_protocol_error(&self, error: ProtocolError) {
        self.events.lock().unwrap().push(RecordedEvent::Protocol(error));
    }

    async fn on_transport_error(&self, detail: String) {
        self.events.lock().unwrap().push(RecordedEvent::Transport(detail));
    }

    async fn on_close(&self) {
        self.events.lock().unwrap().push(RecordedEvent::Closed);
    }
}
