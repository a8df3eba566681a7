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
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::MeterResult;

/// Anything that can report instantaneous power
///
/// Optional capabilities are discovered through the `as_*` accessors. A meter that
/// lacks a capability returns `None`, which is distinct from reporting a zero value.
#[async_trait]
pub trait Meter: Send + Sync {
    /// Current power in W
    async fn current_power(&self) -> MeterResult<f64>;

    fn as_battery(&self) -> Option<&dyn Battery> {
        None
    }

    fn as_battery_capacity(&self) -> Option<&dyn BatteryCapacity> {
        None
    }

    fn as_soc_limiter(&self) -> Option<&dyn BatterySocLimiter> {
        None
    }

    fn as_power_limiter(&self) -> Option<&dyn BatteryPowerLimiter> {
        None
    }
}

/// State-of-charge reporting
#[async_trait]
pub trait Battery: Send + Sync {
    /// Charge level in percent
    async fn soc(&self) -> MeterResult<f64>;
}

pub trait BatteryCapacity: Send + Sync {
    /// Capacity in kWh
    fn capacity(&self) -> f64;
}

pub trait BatterySocLimiter: Send + Sync {
    /// (min, max) state of charge in percent
    fn soc_limits(&self) -> (f64, f64);
}

pub trait BatteryPowerLimiter: Send + Sync {
    /// (max charge, max discharge) power in W
    fn power_limits(&self) -> (f64, f64);
}

/// Capability tags as reported to API consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Power,
    Soc,
    Capacity,
    SocLimits,
    PowerLimits,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Power => "power",
            Self::Soc => "soc",
            Self::Capacity => "capacity",
            Self::SocLimits => "soc_limits",
            Self::PowerLimits => "power_limits",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// List the capabilities a meter exposes, power first
pub fn capabilities_of(meter: &dyn Meter) -> Vec<Capability> {
    let mut caps = vec![Capability::Power];
    if meter.as_battery().is_some() {
        caps.push(Capability::Soc);
    }
    if meter.as_battery_capacity().is_some() {
        caps.push(Capability::Capacity);
    }
    if meter.as_soc_limiter().is_some() {
        caps.push(Capability::SocLimits);
    }
    if meter.as_power_limiter().is_some() {
        caps.push(Capability::PowerLimits);
    }
    caps
}
