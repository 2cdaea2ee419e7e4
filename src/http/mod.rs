//! HTTP client module
//!
//! Provides the HTTP client used to reach the feed API.
//!
//! # Features
//!
//! - **Single attempt**: failures surface immediately as crate errors
//! - **Authentication**: Integration with auth module
//! - **JSON helpers**: Typed response decoding

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
