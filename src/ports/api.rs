/// Backend API port trait
///
/// Defines the interface to the briefing backend's request/response
/// endpoints. Implementation: HttpBackendClient (reqwest).
use crate::domain::models::{LoginStatus, Meeting};
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Port trait for the backend's JSON and form endpoints
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BackendApiPort: Send + Sync {
    /// Check whether the backend holds an authenticated calendar session
    async fn check_login(&self) -> Result<LoginStatus>;

    /// Fetch the upcoming meeting collection
    ///
    /// An error-flagged body on an otherwise successful response surfaces as
    /// an error, the same as a transport failure.
    async fn list_meetings(&self) -> Result<Vec<Meeting>>;

    /// Upload a meeting recording for transcription and summary delivery
    async fn upload_recording(&self, audio_path: &Path, recipients: &str) -> Result<()>;

    /// End the backend's calendar session
    async fn logout(&self) -> Result<()>;
}
