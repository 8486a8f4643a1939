//! Mojang profile lookup

use crate::error::{NickForgeError, Result};
use crate::types::CheckConfig;
use crate::username::ExistenceChecker;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Profile lookup endpoint; the username is appended verbatim
pub const PROFILE_URL: &str = "https://api.mojang.com/users/profiles/minecraft/";

/// Existence checker backed by the Mojang profile API
pub struct MojangChecker {
    client: Client,
    api_url: String,
    timeout: Duration,
    semaphore: Semaphore,
}

impl MojangChecker {
    /// Create a new checker with default configuration
    pub fn new() -> Self {
        Self::with_config(&CheckConfig::default())
    }

    /// Create a new checker with custom configuration
    pub fn with_config(config: &CheckConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("nick-forge/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to create HTTP client: {}. Using default.", e);
                Client::new()
            });

        Self {
            client,
            api_url: config.api_url.clone(),
            timeout: config.timeout,
            semaphore: Semaphore::new(config.concurrent_checks.max(1)),
        }
    }

    fn profile_url(&self, name: &str) -> Result<Url> {
        let raw = format!("{}{}", self.api_url, name);
        Url::parse(&raw).map_err(|e| {
            NickForgeError::network(format!("Malformed profile URL: {}", e), None, Some(raw))
        })
    }
}

impl Default for MojangChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExistenceChecker for MojangChecker {
    async fn exists(&self, name: &str) -> Result<bool> {
        let _permit = self.semaphore.acquire().await.map_err(|e| {
            NickForgeError::internal(format!("Failed to acquire semaphore: {}", e))
        })?;

        let url = self.profile_url(name)?;
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                NickForgeError::timeout("Profile lookup", self.timeout.as_secs())
            } else {
                NickForgeError::from(e)
            }
        })?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let body = response.text().await.map_err(|e| {
            NickForgeError::network(e.to_string(), Some(status.as_u16()), Some(url.to_string()))
        })?;

        let exists = interpret_response(status, &body, retry_after, url.as_str())?;
        tracing::debug!(username = %name, status = %status.as_u16(), exists, "Profile lookup completed");
        Ok(exists)
    }

    fn name(&self) -> &'static str {
        "mojang"
    }
}

/// Map a profile lookup response onto "registered or not".
///
/// No content, 404 and an empty body all mean the name is free.
fn interpret_response(
    status: StatusCode,
    body: &str,
    retry_after: Option<u64>,
    url: &str,
) -> Result<bool> {
    match status {
        StatusCode::NO_CONTENT | StatusCode::NOT_FOUND => Ok(false),
        StatusCode::TOO_MANY_REQUESTS => Err(NickForgeError::rate_limit(
            "Profile API throttled the lookup",
            retry_after,
        )),
        s if s.is_success() => {
            if body.trim().is_empty() {
                return Ok(false);
            }
            let profile: MojangProfile = serde_json::from_str(body)
                .map_err(|e| NickForgeError::parse(e.to_string(), Some(body.to_string())))?;
            tracing::trace!(id = %profile.id, name = %profile.name, "Registered profile found");
            Ok(true)
        }
        s => Err(NickForgeError::network(
            format!("Profile lookup failed with status {}", s),
            Some(s.as_u16()),
            Some(url.to_string()),
        )),
    }
}

#[derive(Debug, Deserialize)]
struct MojangProfile {
    id: String,
    name: String,
}
