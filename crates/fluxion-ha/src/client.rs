// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::discovery::HubCatalog;
use crate::errors::{HaError, HaResult};
use crate::types::{HaEntityState, HaServiceDomain};

/// Home Assistant REST API client
#[derive(Debug, Clone)]
pub struct HomeAssistantClient {
    base_url: String,
    token: Option<String>,
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
}

impl HomeAssistantClient {
    /// Create a new HA client with the default 10s timeout
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> HaResult<Self> {
        Self::with_timeout(base_url, token, Duration::from_secs(10))
    }

    /// Create a new HA client with a custom request timeout
    pub fn with_timeout(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> HaResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HaError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            token: token.filter(|t| !t.is_empty()),
            client,
            max_retries: 1,
            retry_delay: Duration::from_millis(500),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get all entity states
    pub async fn get_states(&self) -> HaResult<Vec<HaEntityState>> {
        let states: Vec<HaEntityState> = self.get_json("/api/states").await?;
        debug!("✅ [HA RESULT] {} entity states", states.len());
        Ok(states)
    }

    /// Get all callable services grouped by domain
    pub async fn get_services(&self) -> HaResult<Vec<HaServiceDomain>> {
        let services: Vec<HaServiceDomain> = self.get_json("/api/services").await?;
        debug!("✅ [HA RESULT] {} service domains", services.len());
        Ok(services)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> HaResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("🔍 [HA QUERY] GET {}", url);

        let response = self
            .retry_request(|| async { self.authorized(self.client.get(&url)).send().await })
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json::<T>().await?),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                error!("❌ [HA ERROR] Authentication failed for {}", url);
                Err(HaError::AuthenticationFailed)
            }
            status => {
                let error_text = response.text().await.unwrap_or_default();
                error!("❌ [HA ERROR] Status {}: {}", status, error_text);
                Err(HaError::ApiError {
                    status: status.as_u16(),
                    message: error_text,
                })
            }
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Retry a request with exponential backoff. Only transport errors are retried.
    async fn retry_request<F, Fut>(&self, mut request_fn: F) -> HaResult<reqwest::Response>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let mut attempts = 0;
        let mut delay = self.retry_delay;

        loop {
            attempts += 1;
            match request_fn().await {
                Ok(response) => return Ok(response),
                Err(e) if attempts >= self.max_retries => {
                    error!("Request failed after {} attempts: {}", attempts, e);
                    return Err(HaError::HttpError(e));
                }
                Err(e) => {
                    warn!(
                        "Request failed (attempt {}/{}): {}. Retrying in {:?}",
                        attempts, self.max_retries, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }

    /// Set custom retry configuration. `max_retries` counts total attempts.
    #[must_use]
    pub fn with_retry_config(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries.max(1);
        self.retry_delay = retry_delay;
        self
    }
}

#[async_trait]
impl HubCatalog for HomeAssistantClient {
    async fn states(&self) -> HaResult<Vec<HaEntityState>> {
        self.get_states().await
    }

    async fn services(&self) -> HaResult<Vec<HaServiceDomain>> {
        self.get_services().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn client(url: String) -> HomeAssistantClient {
        HomeAssistantClient::new(url, Some("test_token".to_owned()))
            .unwrap()
            .with_retry_config(1, Duration::from_millis(10))
    }

    #[tokio::test]
    async fn test_get_states_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/states")
            .match_header("authorization", "Bearer test_token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!([
                    {
                        "entity_id": "sensor.battery_soc",
                        "state": "42.5",
                        "attributes": {"unit_of_measurement": "%"},
                        "last_changed": "2025-10-02T10:00:00Z",
                        "last_updated": "2025-10-02T10:00:00Z"
                    },
                    {"entity_id": "notify.telegram", "state": "unknown"}
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let states = client(server.url()).get_states().await.unwrap();

        assert_eq!(states.len(), 2);
        assert_eq!(states[0].entity_id, "sensor.battery_soc");
        assert_eq!(states[0].domain(), Some("sensor"));
        assert_eq!(states[1].domain(), Some("notify"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_services_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/services")
            .with_status(200)
            .with_body(
                json!([
                    {"domain": "light", "services": {"turn_on": {"fields": {}}, "turn_off": {}}},
                    {"domain": "notify", "services": {"mobile_app_android": {}}}
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let services = client(server.url()).get_services().await.unwrap();

        assert_eq!(services.len(), 2);
        assert_eq!(services[0].domain, "light");
        assert_eq!(
            services[0].services.keys().collect::<Vec<_>>(),
            vec!["turn_off", "turn_on"]
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_no_token_sends_no_authorization() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/states")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = HomeAssistantClient::new(server.url(), None).unwrap();
        assert!(client.get_states().await.unwrap().is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/services")
            .with_status(401)
            .create_async()
            .await;

        let result = client(server.url()).get_services().await;
        assert!(matches!(result, Err(HaError::AuthenticationFailed)));
    }

    #[tokio::test]
    async fn test_server_error_is_api_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/states")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let result = client(server.url()).get_states().await;
        assert!(matches!(
            result,
            Err(HaError::ApiError { status: 500, ref message }) if message == "boom"
        ));
    }

    #[tokio::test]
    async fn test_trailing_slash_trimmed() {
        let client = HomeAssistantClient::new("http://hass.local:8123/", None).unwrap();
        assert_eq!(client.base_url(), "http://hass.local:8123");
    }

    #[tokio::test]
    async fn test_single_attempt_by_default() {
        let client = HomeAssistantClient::new("http://127.0.0.1:1", None).unwrap();
        assert_eq!(client.max_retries, 1);

        let result = client.get_states().await;
        assert!(matches!(result, Err(HaError::HttpError(_))));
    }

    #[tokio::test]
    async fn test_retry_config_clamped_to_one_attempt() {
        let client = HomeAssistantClient::new("http://hass.local:8123", None)
            .unwrap()
            .with_retry_config(0, Duration::from_millis(10));
        assert_eq!(client.max_retries, 1);
    }
}
