//! Backend API adapter

pub mod http;

pub use http::HttpBackendClient;
