//! Recording upload command
//!
//! Posts a finished meeting recording to the backend, which transcribes it,
//! summarizes it, and emails the summary to the given recipients.

use crate::error::{AppError, Result};
use crate::ports::api::BackendApiPort;
use crate::utils::term;
use std::path::Path;

pub async fn run(api: &dyn BackendApiPort, file: &Path, recipients: &str) -> Result<()> {
    if recipients.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "at least one recipient email is required".to_string(),
        ));
    }
    if !file.is_file() {
        return Err(AppError::InvalidInput(format!(
            "recording not found: {}",
            file.display()
        )));
    }

    term::info_line(&format!("Uploading {}...", file.display()));
    api.upload_recording(file, recipients).await?;
    term::info_line("Recording uploaded. The summary will be emailed to the recipients.");

    Ok(())
}
