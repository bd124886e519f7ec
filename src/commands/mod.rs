/// Command implementations
///
/// One module per CLI command. Commands talk to the backend through the
/// port traits and render through utils::term, so each one is testable
/// against the port doubles.
pub mod briefing;
pub mod logout;
pub mod meetings;
pub mod upload;
