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

use fluxion_meters::{
    BatteryCapabilities, Capacity, MeterError, MeterResult, PowerLimits, SocLimits, Usage,
};
use serde::Deserialize;
use std::time::Duration;

/// Zendure meter configuration, decoded from a generic key/value table
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ZendureConfig {
    /// "pv", "battery" or anything else (rejected at read time)
    pub usage: Usage,

    #[serde(default)]
    pub account: String,

    #[serde(default)]
    pub serial: String,

    /// Cloud region, case-insensitive
    #[serde(default = "default_region")]
    pub region: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Overrides the region's API base URL
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub capacity: Option<Capacity>,

    #[serde(default)]
    pub soc_limits: Option<SocLimits>,

    #[serde(default)]
    pub power_limits: Option<PowerLimits>,
}

fn default_region() -> String {
    "EU".to_owned()
}

fn default_timeout_secs() -> u64 {
    30
}

impl ZendureConfig {
    /// Decode from the remaining keys of a meter block
    pub fn from_table(other: toml::Table) -> MeterResult<Self> {
        let config: Self = toml::Value::Table(other)
            .try_into()
            .map_err(|e| MeterError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn region(&self) -> String {
        self.region.to_uppercase()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn battery_capabilities(&self) -> BatteryCapabilities {
        BatteryCapabilities {
            capacity: self.capacity,
            soc_limits: self.soc_limits,
            power_limits: self.power_limits,
        }
    }

    fn validate(&self) -> MeterResult<()> {
        if self.timeout_secs == 0 {
            return Err(MeterError::Config("timeout_secs must be positive".to_owned()));
        }
        if let Some(limits) = &self.soc_limits {
            limits.validate()?;
        }
        if let Some(limits) = &self.power_limits {
            limits.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(source: &str) -> toml::Table {
        source.parse::<toml::Table>().unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = ZendureConfig::from_table(table(
            r#"
            usage = "pv"
            account = "me@example.com"
            serial = "HOA1"
            "#,
        ))
        .unwrap();

        assert_eq!(config.usage, Usage::Pv);
        assert_eq!(config.region(), "EU");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.battery_capabilities(), BatteryCapabilities::default());
    }

    #[test]
    fn test_region_is_upper_cased() {
        let config = ZendureConfig::from_table(table(
            r#"
            usage = "pv"
            serial = "HOA1"
            region = "global"
            "#,
        ))
        .unwrap();

        assert_eq!(config.region(), "GLOBAL");
    }

    #[test]
    fn test_usage_is_required() {
        let result = ZendureConfig::from_table(table(r#"serial = "HOA1""#));
        assert!(matches!(result, Err(MeterError::Config(msg)) if msg.contains("usage")));
    }

    #[test]
    fn test_capability_blocks() {
        let config = ZendureConfig::from_table(table(
            r#"
            usage = "battery"
            serial = "HOA1"

            [capacity]
            capacity_kwh = 1.92

            [power_limits]
            max_charge_power = 1200.0
            max_discharge_power = 800.0
            "#,
        ))
        .unwrap();

        let caps = config.battery_capabilities();
        assert_eq!(caps.capacity, Some(Capacity { capacity_kwh: 1.92 }));
        assert!(caps.soc_limits.is_none());
        assert_eq!(
            caps.power_limits,
            Some(PowerLimits {
                max_charge_power: 1200.0,
                max_discharge_power: 800.0,
            })
        );
    }

    #[test]
    fn test_invalid_soc_limits_rejected() {
        let result = ZendureConfig::from_table(table(
            r#"
            usage = "battery"
            serial = "HOA1"

            [soc_limits]
            min_soc = 90.0
            max_soc = 10.0
            "#,
        ));

        assert!(matches!(result, Err(MeterError::Config(_))));
    }
}
