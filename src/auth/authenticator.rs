//! Authenticator implementation
//!
//! Applies the configured credentials to outgoing requests.

use super::types::{AuthConfig, Location};
use reqwest::RequestBuilder;

/// Default header used for header-placed API keys
const DEFAULT_HEADER: &str = "X-Api-Key";

/// Default query parameter used for query-placed API keys
const DEFAULT_QUERY_PARAM: &str = "api_key";

/// Authenticator handles applying authentication to HTTP requests
#[derive(Debug, Clone)]
pub struct Authenticator {
    config: AuthConfig,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// The auth configuration in use
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Apply authentication to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.config {
            AuthConfig::None => req,

            AuthConfig::ApiKey {
                location,
                name,
                value,
            } => match location {
                Location::Header => {
                    let header = name.as_deref().unwrap_or(DEFAULT_HEADER);
                    req.header(header, value.as_str())
                }
                Location::Query => {
                    let param = name.as_deref().unwrap_or(DEFAULT_QUERY_PARAM);
                    req.query(&[(param, value.as_str())])
                }
            },
        }
    }
}
