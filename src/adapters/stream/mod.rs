//! Briefing stream transport adapter

pub mod sse;

pub use sse::SseBriefingStream;
