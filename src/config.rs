//! Configuration for the registry upload client

use serde::{Deserialize, Serialize};
use std::env;

/// Settings consumed by [`crate::registry::RegistryHttpClient`].
///
/// The session layer never reads this; endpoint, credentials, and transport
/// tuning all live beneath the upload capability interface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub endpoint: String,
    pub auth_token: Option<String>,
    pub timeout_seconds: u64,
    pub skip_tls: bool,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        ClientConfig {
            endpoint: endpoint.into(),
            auth_token: None,
            timeout_seconds: 3600,
            skip_tls: false,
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn has_auth(&self) -> bool {
        self.auth_token.is_some()
    }

    /// Load configuration from the environment
    pub fn from_env() -> Result<Self, &'static str> {
        let endpoint = env::var("REGISTRY_ENDPOINT").map_err(|_| "REGISTRY_ENDPOINT not set")?;
        let auth_token = env::var("REGISTRY_TOKEN").ok();
        let skip_tls = env::var("SKIP_TLS").map_or(false, |v| v == "true");
        let timeout_seconds = env::var("UPLOAD_TIMEOUT")
            .map(|v| v.parse::<u64>().unwrap_or(3600))
            .unwrap_or(3600);

        Ok(ClientConfig {
            endpoint,
            auth_token,
            timeout_seconds,
            skip_tls,
        })
    }
}
