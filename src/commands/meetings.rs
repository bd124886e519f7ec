//! Meeting list command
//!
//! Checks the backend session, fetches the upcoming meeting collection, and
//! renders it as actionable entries. Failures and the empty collection each
//! render a single message; nothing is retried.

use crate::error::Result;
use crate::ports::api::BackendApiPort;
use crate::utils::term;

pub async fn run(api: &dyn BackendApiPort, base_url: &str, json: bool) -> Result<()> {
    let status = api.check_login().await?;

    if !status.logged_in {
        term::info_line("Not signed in.");
        term::info_line(&format!(
            "Open {base_url}/ in a browser to connect your Google Calendar, then try again."
        ));
        return Ok(());
    }

    let meetings = api.list_meetings().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&meetings)?);
        return Ok(());
    }

    if meetings.is_empty() {
        term::info_line("No upcoming meetings found in your calendar.");
        return Ok(());
    }

    term::banner("Upcoming meetings");
    for meeting in &meetings {
        term::meeting_entry(meeting.display_title(), &meeting.format_start(), &meeting.id);
    }
    term::info_line("");
    term::info_line("Run `meet-brief briefing <id>` to generate a briefing.");

    Ok(())
}
