//! Remote API access.
//!
//! - [`host`] - host normalization and public/enterprise classification
//! - [`client`] - GraphQL and REST calls over the decorated [`HttpClient`](crate::http::HttpClient)

pub mod client;
pub mod host;

pub use client::ApiClient;
pub use host::{is_enterprise, normalize_hostname, DEFAULT_HOST};
