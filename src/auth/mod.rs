//! Authentication module
//!
//! Supports: API Key (header or query parameter)
//!
//! The NeoWs feed expects its key in the `api_key` query parameter; the
//! header form is kept for gateways that proxy the feed.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, Location};

#[cfg(test)]
mod tests;
