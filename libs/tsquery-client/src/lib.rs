//! HTTP client for the time-series query service.
//!
//! [`QueryClient`] implements [`tsquery_api::PageFetcher`], so it plugs
//! straight into `tsquery_engine::Paginator`. Retries and timeouts live
//! here, not in the paginator.

pub mod client;
pub mod config;
pub mod error;

pub use client::QueryClient;
pub use config::ClientConfig;
pub use error::ClientError;
