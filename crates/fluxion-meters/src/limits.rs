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

//! Optional battery capability blocks
//!
//! Each block is decoded from its own config table and, when present, is exposed
//! as-is by the battery decorator.

use serde::{Deserialize, Serialize};

use crate::capabilities::{BatteryCapacity, BatteryPowerLimiter, BatterySocLimiter};
use crate::errors::{MeterError, MeterResult};

/// Usable battery capacity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capacity {
    /// Capacity in kWh
    pub capacity_kwh: f64,
}

impl BatteryCapacity for Capacity {
    fn capacity(&self) -> f64 {
        self.capacity_kwh
    }
}

/// Operating state-of-charge window in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SocLimits {
    pub min_soc: f64,
    pub max_soc: f64,
}

impl SocLimits {
    pub fn validate(&self) -> MeterResult<()> {
        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        if !in_range(self.min_soc) || !in_range(self.max_soc) {
            return Err(MeterError::Config(format!(
                "soc limits must be within 0..=100, got {}..{}",
                self.min_soc, self.max_soc
            )));
        }
        if self.min_soc > self.max_soc {
            return Err(MeterError::Config(format!(
                "min_soc ({}) must not exceed max_soc ({})",
                self.min_soc, self.max_soc
            )));
        }
        Ok(())
    }
}

impl BatterySocLimiter for SocLimits {
    fn soc_limits(&self) -> (f64, f64) {
        (self.min_soc, self.max_soc)
    }
}

/// Charge and discharge power ceilings in W
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerLimits {
    pub max_charge_power: f64,
    pub max_discharge_power: f64,
}

impl PowerLimits {
    pub fn validate(&self) -> MeterResult<()> {
        if self.max_charge_power < 0.0 || self.max_discharge_power < 0.0 {
            return Err(MeterError::Config(
                "power limits must not be negative".to_owned(),
            ));
        }
        Ok(())
    }
}

impl BatteryPowerLimiter for PowerLimits {
    fn power_limits(&self) -> (f64, f64) {
        (self.max_charge_power, self.max_discharge_power)
    }
}
