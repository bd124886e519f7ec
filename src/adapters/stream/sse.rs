//! Server-sent-event adapter for the briefing stream
//!
//! Consumes `GET /stream-briefing/{meeting_id}` as a raw byte stream and
//! re-frames it into protocol signals. SSE framing is newline-delimited and
//! TCP chunks do not align with event boundaries, so a line buffer
//! accumulates partial lines and dispatches an event only on its blank-line
//! terminator. Multiple events per chunk, `event:` names, multi-`data:`
//! payloads, comment lines, and CRLF endings are all handled.
//!
//! Error handling follows the configured policy: under `Ignore` a mid-stream
//! read error triggers bounded reconnection with exponential backoff (a
//! clean server close never does); under `Surface` any read error is
//! reported to the callback and the receiver stops.

use crate::domain::protocol::StreamSignal;
use crate::domain::session::TransientErrorPolicy;
use crate::error::{AppError, Result};
use crate::ports::stream::{BriefingStreamCallback, BriefingStreamPort, StreamHandle};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Connection timeout for the initial request and each reconnect
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// One framed server-sent event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    /// Value of the `event:` field, when the event is named
    pub event: Option<String>,

    /// Joined `data:` payload
    pub data: String,
}

/// Line-buffering SSE parser
///
/// Buffers incomplete lines across chunk boundaries and emits a frame only
/// when its terminating blank line has arrived.
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    buffer: String,
    event_name: Option<String>,
    data_lines: Vec<String>,
}

impl SseLineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes from one chunk, returning any completed frames
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<SseFrame> {
        self.buffer.push_str(&String::from_utf8_lossy(bytes));

        let mut frames = Vec::new();
        while let Some(newline_pos) = self.buffer.find('\n') {
            let line = self.buffer[..newline_pos].trim_end_matches('\r').to_owned();
            self.buffer = self.buffer[newline_pos + 1..].to_owned();
            if let Some(frame) = self.take_line(&line) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Flush a trailing unterminated frame when the byte stream ends
    pub fn flush(&mut self) -> Option<SseFrame> {
        let rest = std::mem::take(&mut self.buffer);
        let line = rest.trim_end_matches('\r');
        if !line.is_empty() {
            self.take_line(line);
        }
        self.dispatch()
    }

    fn take_line(&mut self, line: &str) -> Option<SseFrame> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            // Comment line, commonly used as a keep-alive.
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "data" => self.data_lines.push(value.to_owned()),
            "event" => self.event_name = Some(value.to_owned()),
            // id: and retry: carry no meaning for this protocol
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        let event = self.event_name.take();
        if self.data_lines.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data_lines).join("\n");
        Some(SseFrame { event, data })
    }
}

/// Reconnection backoff for the `Ignore` policy
///
/// Retries cover only an already-established stream; the initial connection
/// fails fast. The attempt budget resets once events flow again.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay_ms: 500,
            max_delay_ms: 10_000,
        }
    }
}

impl RetryConfig {
    /// `delay = min(initial_ms * 2^attempt, max_ms) + jitter(0..100ms)`
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.initial_delay_ms.saturating_mul(1_u64 << attempt.min(16));
        let capped = base.min(self.max_delay_ms);
        let jitter = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::from(d.subsec_millis()))
            % 100;
        Duration::from_millis(capped + jitter)
    }
}

/// Briefing stream adapter over a reqwest byte stream
pub struct SseBriefingStream {
    client: Client,
    base_url: String,
    policy: TransientErrorPolicy,
    retry: RetryConfig,
}

impl SseBriefingStream {
    /// Create a new stream adapter for the given backend base URL
    pub fn new(base_url: &str, policy: TransientErrorPolicy) -> Result<Self> {
        // No overall request timeout: the stream stays open for as long as
        // the backend keeps generating.
        let client = Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            policy,
            retry: RetryConfig::default(),
        })
    }
}

#[async_trait]
impl BriefingStreamPort for SseBriefingStream {
    async fn open(
        &self,
        meeting_id: &str,
        callback: Box<dyn BriefingStreamCallback>,
    ) -> Result<Box<dyn StreamHandle>> {
        let url = format!("{}/stream-briefing/{}", self.base_url, meeting_id);
        log::info!("Opening briefing stream: {url}");

        // Fail fast on the initial connection; reconnection only covers a
        // stream that was already up.
        let response = connect(&self.client, &url).await?;

        let client = self.client.clone();
        let policy = self.policy;
        let retry = self.retry.clone();
        let active = Arc::new(AtomicBool::new(true));
        let task_active = Arc::clone(&active);

        let task = tokio::spawn(async move {
            let callback = callback;
            run_receiver(&client, &url, response, policy, &retry, callback.as_ref()).await;
            task_active.store(false, Ordering::SeqCst);
        });

        Ok(Box::new(SseStreamHandle {
            task: Some(task),
            active,
        }))
    }
}

async fn connect(client: &Client, url: &str) -> Result<reqwest::Response> {
    let response = client
        .get(url)
        .header("Accept", "text/event-stream")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(AppError::Stream(format!(
            "stream request failed with status {}",
            response.status()
        )));
    }
    Ok(response)
}

/// Receiver loop: frames bytes, parses protocol signals, drives the callback
async fn run_receiver(
    client: &Client,
    url: &str,
    first: reqwest::Response,
    policy: TransientErrorPolicy,
    retry: &RetryConfig,
    callback: &dyn BriefingStreamCallback,
) {
    let mut response = first;
    let mut attempt: u32 = 0;

    'connection: loop {
        let mut parser = SseLineBuffer::new();
        let mut byte_stream = response.bytes_stream();

        loop {
            match byte_stream.next().await {
                Some(Ok(bytes)) => {
                    for frame in parser.feed(&bytes) {
                        attempt = 0;
                        deliver(callback, frame).await;
                    }
                }
                Some(Err(error)) => {
                    if policy == TransientErrorPolicy::Surface {
                        callback
                            .on_transport_error(format!("stream read error: {error}"))
                            .await;
                        return;
                    }
                    match reconnect(client, url, retry, &mut attempt).await {
                        Some(next) => {
                            response = next;
                            continue 'connection;
                        }
                        None => {
                            callback
                                .on_transport_error(format!(
                                    "stream read error: {error} (reconnect attempts exhausted)"
                                ))
                                .await;
                            return;
                        }
                    }
                }
                None => {
                    // Clean end of stream: flush any unterminated frame, then
                    // report the close. Never a reconnect trigger.
                    if let Some(frame) = parser.flush() {
                        deliver(callback, frame).await;
                    }
                    log::info!("briefing stream closed by server");
                    callback.on_close().await;
                    return;
                }
            }
        }
    }
}

/// Bounded backoff reconnection, consuming attempts from the shared budget
async fn reconnect(
    client: &Client,
    url: &str,
    retry: &RetryConfig,
    attempt: &mut u32,
) -> Option<reqwest::Response> {
    while *attempt < retry.max_attempts {
        let delay = retry.delay_for_attempt(*attempt);
        *attempt += 1;
        log::warn!(
            "stream interrupted, reconnecting in {:?} (attempt {})",
            delay,
            attempt
        );
        tokio::time::sleep(delay).await;

        match connect(client, url).await {
            Ok(response) => {
                log::info!("stream reconnected");
                return Some(response);
            }
            Err(error) => log::warn!("reconnect failed: {error}"),
        }
    }
    None
}

async fn deliver(callback: &dyn BriefingStreamCallback, frame: SseFrame) {
    log::debug!(
        "stream frame: event={:?}, {} bytes",
        frame.event,
        frame.data.len()
    );

    let parsed = match frame.event.as_deref() {
        Some(event) => StreamSignal::from_named_event(event, &frame.data),
        None => StreamSignal::from_default_event(&frame.data),
    };
    match parsed {
        Ok(signal) => {
            if signal.is_terminal() {
                log::info!("terminal signal received on briefing stream");
            }
            callback.on_signal(signal).await;
        }
        Err(error) => callback.on_protocol_error(error).await,
    }
}

/// Handle to the receiver task of one open stream
#[derive(Debug)]
struct SseStreamHandle {
    task: Option<tokio::task::JoinHandle<()>>,
    active: Arc<AtomicBool>,
}

#[async_trait]
impl StreamHandle for SseStreamHandle {
    async fn close(&mut self) -> Result<()> {
        if let Some(task) = self.task.take() {
            log::info!("Closing briefing stream");
            task.abort();
            let _ = task.await;
        }
        self.active.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl Drop for SseStreamHandle {
    fn drop(&mut self) {
        // Attempt to stop the receiver if close was never called
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
