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

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::client::HomeAssistantClient;
use crate::discovery::HubCatalog;
use crate::errors::HaResult;

/// Opens a catalog for a normalized hub URI
pub trait HubConnector: Send + Sync {
    fn connect(&self, uri: &str) -> HaResult<Arc<dyn HubCatalog>>;
}

/// Connector producing [`HomeAssistantClient`]s
///
/// Tokens are looked up per hub URI, falling back to a default token.
#[derive(Debug, Clone)]
pub struct HaConnector {
    tokens: HashMap<String, String>,
    default_token: Option<String>,
    timeout: Duration,
    max_retries: u32,
    retry_delay: Duration,
}

impl HaConnector {
    pub fn new(timeout: Duration) -> Self {
        Self {
            tokens: HashMap::new(),
            default_token: None,
            timeout,
            max_retries: 1,
            retry_delay: Duration::from_millis(500),
        }
    }

    #[must_use]
    pub fn with_token(mut self, uri: impl Into<String>, token: impl Into<String>) -> Self {
        self.tokens.insert(uri.into(), token.into());
        self
    }

    /// Token for hubs without an explicit entry
    #[must_use]
    pub fn with_default_token(mut self, token: Option<String>) -> Self {
        self.default_token = token;
        self
    }

    #[must_use]
    pub fn with_retry_config(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    fn token_for(&self, uri: &str) -> Option<String> {
        self.tokens
            .get(uri)
            .cloned()
            .or_else(|| self.default_token.clone())
    }
}

impl HubConnector for HaConnector {
    fn connect(&self, uri: &str) -> HaResult<Arc<dyn HubCatalog>> {
        let token = self.token_for(uri);
        debug!("Connecting to {} (token: {})", uri, token.is_some());

        let client = HomeAssistantClient::with_timeout(uri, token, self.timeout)?
            .with_retry_config(self.max_retries, self.retry_delay);
        Ok(Arc::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn test_uses_hub_specific_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/services")
            .match_header("authorization", "Bearer hub_token")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let connector = HaConnector::new(Duration::from_secs(5))
            .with_token(server.url(), "hub_token")
            .with_default_token(Some("fallback".to_owned()));

        let catalog = connector.connect(&server.url()).unwrap();
        assert!(catalog.services().await.unwrap().is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_falls_back_to_default_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/states")
            .match_header("authorization", "Bearer fallback")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let connector =
            HaConnector::new(Duration::from_secs(5)).with_default_token(Some("fallback".to_owned()));

        let catalog = connector.connect(&server.url()).unwrap();
        assert!(catalog.states().await.unwrap().is_empty());
        mock.assert_async().await;
    }
}
