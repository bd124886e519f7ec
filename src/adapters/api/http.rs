//! HTTP adapter for the briefing backend
//!
//! Implements the BackendApiPort against the backend's endpoints:
//! `/api/check-login`, `/api/get-meetings`, `/process-recording`, `/logout`.

use crate::domain::models::{LoginStatus, Meeting};
use crate::error::{AppError, Result};
use crate::ports::api::BackendApiPort;
use async_trait::async_trait;
use reqwest::multipart;
use reqwest::Client;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Request timeout for the plain request/response endpoints
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the briefing backend's request/response endpoints
pub struct HttpBackendClient {
    client: Client,
    base_url: String,
}

/// The meetings endpoint answers with either the event collection or an
/// error-flagged object, on success and failure statuses alike
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MeetingsPayload {
    Flagged { error: String },
    Meetings(Vec<Meeting>),
}

impl HttpBackendClient {
    /// Create a new client for the given backend base URL
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl BackendApiPort for HttpBackendClient {
    async fn check_login(&self) -> Result<LoginStatus> {
        log::debug!("Checking backend session state");

        let response = self.client.get(self.url("/api/check-login")).send().await?;

        if !response.status().is_success() {
            return Err(AppError::Backend(format!(
                "login check failed with status {}",
                response.status()
            )));
        }

        let status: LoginStatus = response.json().await?;
        log::info!("Backend session logged_in={}", status.logged_in);
        Ok(status)
    }

    async fn list_meetings(&self) -> Result<Vec<Meeting>> {
        log::debug!("Fetching upcoming meetings");

        let response = self.client.get(self.url("/api/get-meetings")).send().await?;
        let status = response.status();

        // The backend reports calendar failures as an error-flagged JSON body
        // with a 5xx status; anything else non-success is a plain failure.
        let payload: MeetingsPayload = if status.is_success() {
            response.json().await?
        } else {
            match response.json::<MeetingsPayload>().await {
                Ok(flagged @ MeetingsPayload::Flagged { .. }) => flagged,
                _ => {
                    return Err(AppError::Backend(format!(
                        "meetings fetch failed with status {status}"
                    )))
                }
            }
        };

        match payload {
            MeetingsPayload::Flagged { error } => Err(AppError::Backend(error)),
            MeetingsPayload::Meetings(meetings) => {
                log::info!("Fetched {} upcoming meetings", meetings.len());
                Ok(meetings)
            }
        }
    }

    async fn upload_recording(&self, audio_path: &Path, recipients: &str) -> Result<()> {
        let file_name = audio_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                AppError::InvalidInput(format!("not a file path: {}", audio_path.display()))
            })?;

        log::info!("Uploading recording {file_name} for {recipients}");

        let bytes = tokio::fs::read(audio_path).await?;
        let form = multipart::Form::new()
            .part("audio_file", multipart::Part::bytes(bytes).file_name(file_name))
            .text("recipients", recipients.to_string());

        let response = self
            .client
            .post(self.url("/process-recording"))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Backend(format!(
                "recording upload failed with status {}",
                response.status()
            )));
        }

        log::info!("Recording upload accepted");
        Ok(())
    }

    async fn logout(&self) -> Result<()> {
        let response = self.client.get(self.url("/logout")).send().await?;

        if !response.status().is_success() {
            return Err(AppError::Backend(format!(
                "logout failed with status {}",
                response.status()
            )));
        }

        log::info!("Backend session ended");
        Ok(())
    }
}
