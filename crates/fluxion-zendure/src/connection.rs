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
use fluxion_meters::MeterResult;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::errors::{ZendureError, ZendureResult};

/// One point-in-time device reading. Never cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySnapshot {
    #[serde(default)]
    pub solar_input_power: i32,
    #[serde(default)]
    pub pack_input_power: i32,
    #[serde(default)]
    pub output_pack_power: i32,
    /// Charge level in percent
    #[serde(default)]
    pub electric_level: i32,
}

/// Source of device telemetry
///
/// Every call is a fresh remote round-trip; timeouts are enforced by the implementation.
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    async fn fetch(&self) -> MeterResult<TelemetrySnapshot>;
}

/// Cloud region of the account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Eu,
    Global,
}

impl Region {
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Eu => "https://app.zendure.tech/eu",
            Self::Global => "https://app.zendure.tech/v2",
        }
    }
}

impl FromStr for Region {
    type Err = ZendureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "EU" => Ok(Self::Eu),
            "GLOBAL" => Ok(Self::Global),
            _ => Err(ZendureError::ConfigError(format!(
                "unknown region: '{s}'. Supported regions: EU, GLOBAL"
            ))),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eu => f.write_str("EU"),
            Self::Global => f.write_str("GLOBAL"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    msg: String,
    data: Option<TelemetrySnapshot>,
}

/// Zendure developer cloud client for a single device
#[derive(Debug, Clone)]
pub struct ZendureConnection {
    base_url: String,
    account: String,
    serial: String,
    client: Client,
}

impl ZendureConnection {
    /// Create a connection for the given region
    pub fn new(
        region: &str,
        account: impl Into<String>,
        serial: impl Into<String>,
        timeout: Duration,
    ) -> ZendureResult<Self> {
        let region = region.parse::<Region>()?;
        info!("Initializing Zendure connection for region {}", region);
        Self::with_base_url(region.base_url(), account, serial, timeout)
    }

    /// Create a connection against an explicit API base URL
    pub fn with_base_url(
        base_url: impl Into<String>,
        account: impl Into<String>,
        serial: impl Into<String>,
        timeout: Duration,
    ) -> ZendureResult<Self> {
        let serial = serial.into();
        if serial.is_empty() {
            return Err(ZendureError::ConfigError(
                "serial must not be empty".to_owned(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ZendureError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            account: account.into(),
            serial,
            client,
        })
    }

    pub fn serial(&self) -> &str {
        &self.serial
    }

    /// Fetch the current device properties
    pub async fn device_data(&self) -> ZendureResult<TelemetrySnapshot> {
        let url = format!("{}/developer/api/device/data", self.base_url);
        debug!("🔍 [ZENDURE QUERY] Device data for {}", self.serial);
        debug!("   URL: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "account": self.account,
                "serialNumber": self.serial,
            }))
            .send()
            .await?;

        match response.status() {
            status @ StatusCode::OK => {
                let envelope = response.json::<ApiEnvelope>().await?;
                match envelope {
                    ApiEnvelope {
                        success: true,
                        data: Some(snapshot),
                        ..
                    } => {
                        debug!("✅ [ZENDURE RESULT] {} = {:?}", self.serial, snapshot);
                        Ok(snapshot)
                    }
                    ApiEnvelope { code, msg, .. } => {
                        error!("❌ [ZENDURE ERROR] {} rejected: {}", self.serial, msg);
                        Err(ZendureError::ApiError {
                            status: code.unwrap_or(status.as_u16()),
                            message: msg,
                        })
                    }
                }
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                error!("❌ [ZENDURE ERROR] Authentication failed for {}", self.serial);
                Err(ZendureError::AuthenticationFailed)
            }
            status => {
                let error_text = response.text().await.unwrap_or_default();
                error!("❌ [ZENDURE ERROR] Status {}: {}", status, error_text);
                Err(ZendureError::ApiError {
                    status: status.as_u16(),
                    message: error_text,
                })
            }
        }
    }
}

#[async_trait]
impl TelemetrySource for ZendureConnection {
    async fn fetch(&self) -> MeterResult<TelemetrySnapshot> {
        Ok(self.device_data().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluxion_meters::MeterError;
    use mockito::{Matcher, Server};

    fn connection(url: String) -> ZendureConnection {
        ZendureConnection::with_base_url(url, "me@example.com", "HOA1", Duration::from_secs(5))
            .unwrap()
    }

    #[test]
    fn test_region_parsing() {
        assert_eq!("eu".parse::<Region>().unwrap(), Region::Eu);
        assert_eq!("Global".parse::<Region>().unwrap(), Region::Global);
        assert!(matches!(
            "US".parse::<Region>(),
            Err(ZendureError::ConfigError(_))
        ));
    }

    #[test]
    fn test_empty_serial_rejected() {
        let result = ZendureConnection::new("EU", "me@example.com", "", Duration::from_secs(5));
        assert!(matches!(result, Err(ZendureError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_device_data_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/developer/api/device/data")
            .match_body(Matcher::Json(json!({
                "account": "me@example.com",
                "serialNumber": "HOA1"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "code": 200,
                    "success": true,
                    "msg": "ok",
                    "data": {
                        "solarInputPower": 512,
                        "packInputPower": 300,
                        "outputPackPower": 0,
                        "electricLevel": 77
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let snapshot = connection(server.url()).device_data().await.unwrap();

        assert_eq!(snapshot.solar_input_power, 512);
        assert_eq!(snapshot.pack_input_power, 300);
        assert_eq!(snapshot.output_pack_power, 0);
        assert_eq!(snapshot.electric_level, 77);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_properties_default_to_zero() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/developer/api/device/data")
            .with_status(200)
            .with_body(json!({"success": true, "data": {"electricLevel": 5}}).to_string())
            .create_async()
            .await;

        let snapshot = connection(server.url()).device_data().await.unwrap();
        assert_eq!(
            snapshot,
            TelemetrySnapshot {
                electric_level: 5,
                ..TelemetrySnapshot::default()
            }
        );
    }

    #[tokio::test]
    async fn test_unsuccessful_envelope_is_api_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/developer/api/device/data")
            .with_status(200)
            .with_body(json!({"success": false, "code": 404, "msg": "device offline"}).to_string())
            .create_async()
            .await;

        let result = connection(server.url()).device_data().await;
        assert!(matches!(
            result,
            Err(ZendureError::ApiError { status: 404, ref message }) if message == "device offline"
        ));
    }

    #[tokio::test]
    async fn test_unsuccessful_envelope_without_code_keeps_http_status() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/developer/api/device/data")
            .with_status(200)
            .with_body(json!({"success": false, "msg": "unknown device"}).to_string())
            .create_async()
            .await;

        let result = connection(server.url()).device_data().await;
        assert!(matches!(
            result,
            Err(ZendureError::ApiError { status: 200, ref message }) if message == "unknown device"
        ));
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/developer/api/device/data")
            .with_status(401)
            .create_async()
            .await;

        let result = connection(server.url()).fetch().await;
        assert!(matches!(result, Err(MeterError::Connection(_))));
    }
}
