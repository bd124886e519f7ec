/// Adapters layer
///
/// Concrete implementations of the port traits:
/// - api: reqwest client for the backend's JSON and form endpoints
/// - stream: server-sent-event transport for the briefing stream
pub mod api;
pub mod stream;
