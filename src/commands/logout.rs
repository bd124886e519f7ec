//! Logout command

use crate::error::Result;
use crate::ports::api::BackendApiPort;
use crate::utils::term;

pub async fn run(api: &dyn BackendApiPort) -> Result<()> {
    api.logout().await?;
    term::info_line("Signed out of the calendar session.");
    Ok(())
}
