/// Domain models for meet-brief
///
/// These models represent the backend's wire entities and are rendering-agnostic.
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Fixed display title for meetings with an empty or missing summary
pub const TITLE_PLACEHOLDER: &str = "No Title";

/// Rendered when a meeting carries neither a date-time nor a date start
const NO_START_PLACEHOLDER: &str = "(no start time)";

/// Login state reported by the backend session check
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LoginStatus {
    pub logged_in: bool,
}

/// Start of a calendar event
///
/// The backend serves either a date-time instant (`dateTime`, RFC 3339) or a
/// date-only value (`date`) for all-day events. The two must be told apart
/// when formatting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventStart {
    #[serde(rename = "dateTime", default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// One upcoming calendar meeting, as served by `/api/get-meetings`
///
/// Produced per request, immutable, discarded after render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default)]
    pub start: EventStart,
}

impl Meeting {
    /// Display title, substituting the fixed placeholder for absent or
    /// whitespace-only summaries
    pub fn display_title(&self) -> &str {
        match self.summary.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => TITLE_PLACEHOLDER,
        }
    }

    /// Format the start as a full date plus short time
    ///
    /// Date-time starts render like "Monday, August 10, 2026 at 2:30 PM";
    /// all-day starts render the date alone, with no time component.
    pub fn format_start(&self) -> String {
        if let Some(instant) = self.start.date_time.as_deref() {
            if let Ok(parsed) = DateTime::parse_from_rfc3339(instant) {
                return parsed.format("%A, %B %-d, %Y at %-I:%M %p").to_string();
            }
        }
        if let Some(day) = self.start.date.as_deref() {
            if let Ok(parsed) = NaiveDate::parse_from_str(day, "%Y-%m-%d") {
                return parsed.format("%A, %B %-d, %Y").to_string();
            }
        }
        NO_START_PLACEHOLDER.to_string()
    }
}
