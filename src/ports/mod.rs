/// Port trait definitions (interfaces)
///
/// These traits define the contracts for adapters to implement.
/// Following the ports-and-adapters (hexagonal) architecture pattern.
pub mod api;
pub mod stream;

#[cfg(test)]
pub mod mocks;

pub use api::BackendApiPort;
pub use stream::{BriefingStreamCallback, BriefingStreamPort, StreamHandle};
