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

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use fluxion_ha::normalize_uri;

use crate::meters::METER_TYPES;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub hub: HubSettings,
    /// Known Home Assistant hubs
    #[serde(default)]
    pub hubs: Vec<HubEntry>,
    #[serde(default)]
    pub meters: Vec<MeterEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Client settings shared by all hub connections
#[derive(Debug, Clone, Deserialize)]
pub struct HubSettings {
    #[serde(default = "default_hub_timeout_secs")]
    pub timeout_secs: u64,
    /// Total attempts per request, transport errors only
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HubEntry {
    pub uri: String,
    #[serde(default)]
    pub token: Option<String>,
}

/// Generic meter block: `name` and `type`, everything else belongs to the meter type
#[derive(Debug, Clone, Deserialize)]
pub struct MeterEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub other: toml::Table,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_owned()
}

fn default_port() -> u16 {
    7071
}

fn default_hub_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    1
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_hub_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl HubSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl BridgeConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(Path::new(path))
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).with_context(|| "Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.hub.timeout_secs == 0 {
            bail!("hub.timeout_secs must be positive");
        }
        for hub in &self.hubs {
            normalize_uri(Some(&hub.uri)).with_context(|| format!("hubs: '{}'", hub.uri))?;
        }

        let mut names = HashSet::new();
        for meter in &self.meters {
            if meter.name.is_empty() {
                bail!("meters: name must not be empty");
            }
            if !names.insert(meter.name.as_str()) {
                bail!("meters: duplicate name '{}'", meter.name);
            }
            if !METER_TYPES.contains(&meter.kind.as_str()) {
                bail!(
                    "meters: unknown type '{}' for '{}'. Supported types: {}",
                    meter.kind,
                    meter.name,
                    METER_TYPES.join(", ")
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = BridgeConfig::parse("").unwrap();

        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.server.port, 7071);
        assert_eq!(config.hub.timeout(), Duration::from_secs(10));
        assert_eq!(config.hub.max_retries, 1);
        assert!(config.hubs.is_empty());
        assert!(config.meters.is_empty());
    }

    #[test]
    fn test_meter_block_keeps_type_specific_keys() {
        let config = BridgeConfig::parse(
            r#"
            [[meters]]
            name = "balcony"
            type = "zendure"
            usage = "battery"
            serial = "HOA1"

            [meters.capacity]
            capacity_kwh = 1.92
            "#,
        )
        .unwrap();

        let meter = &config.meters[0];
        assert_eq!(meter.name, "balcony");
        assert_eq!(meter.kind, "zendure");
        assert_eq!(
            meter.other.get("usage").and_then(toml::Value::as_str),
            Some("battery")
        );
        assert!(meter.other.contains_key("capacity"));
        assert!(!meter.other.contains_key("name"));
    }

    #[test]
    fn test_duplicate_meter_names_rejected() {
        let result = BridgeConfig::parse(
            r#"
            [[meters]]
            name = "a"
            type = "zendure"

            [[meters]]
            name = "a"
            type = "zendure"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_meter_type_rejected() {
        let result = BridgeConfig::parse(
            r#"
            [[meters]]
            name = "a"
            type = "shelly"
            "#,
        );
        let err = format!("{:#}", result.unwrap_err());
        assert!(err.contains("unknown type 'shelly'"));
    }

    #[test]
    fn test_hub_entries() {
        let config = BridgeConfig::parse(
            r#"
            [[hubs]]
            uri = "homeassistant.local:8123"
            token = "abc"
            "#,
        )
        .unwrap();

        assert_eq!(config.hubs[0].token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_empty_hub_uri_rejected() {
        assert!(BridgeConfig::parse("[[hubs]]\nuri = \"\"").is_err());
    }
}
