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
use std::sync::Arc;
use tracing::debug;

use crate::capabilities::{
    Battery, BatteryCapacity, BatteryPowerLimiter, BatterySocLimiter, Meter,
};
use crate::errors::MeterResult;
use crate::limits::{Capacity, PowerLimits, SocLimits};
use crate::usage::Usage;

/// Optional battery capabilities taken from configuration
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatteryCapabilities {
    pub capacity: Option<Capacity>,
    pub soc_limits: Option<SocLimits>,
    pub power_limits: Option<PowerLimits>,
}

/// Compose a base meter with battery capabilities
///
/// For any usage other than [`Usage::Battery`] the base meter is returned unchanged.
/// Otherwise the result additionally exposes `soc` (always) and each configured
/// capability block. The capability set is fixed here and never changes afterwards.
pub fn decorate_battery_meter(
    base: Arc<dyn Meter>,
    usage: &Usage,
    soc: Arc<dyn Battery>,
    capabilities: BatteryCapabilities,
) -> Arc<dyn Meter> {
    if !usage.is_battery() {
        return base;
    }

    debug!(
        capacity = capabilities.capacity.is_some(),
        soc_limits = capabilities.soc_limits.is_some(),
        power_limits = capabilities.power_limits.is_some(),
        "Decorating battery meter"
    );

    Arc::new(BatteryMeter {
        base,
        soc,
        capacity: capabilities.capacity,
        soc_limits: capabilities.soc_limits,
        power_limits: capabilities.power_limits,
    })
}

struct BatteryMeter {
    base: Arc<dyn Meter>,
    soc: Arc<dyn Battery>,
    capacity: Option<Capacity>,
    soc_limits: Option<SocLimits>,
    power_limits: Option<PowerLimits>,
}

#[async_trait]
impl Meter for BatteryMeter {
    async fn current_power(&self) -> MeterResult<f64> {
        self.base.current_power().await
    }

    fn as_battery(&self) -> Option<&dyn Battery> {
        Some(self.soc.as_ref())
    }

    fn as_battery_capacity(&self) -> Option<&dyn BatteryCapacity> {
        self.capacity.as_ref().map(|c| c as &dyn BatteryCapacity)
    }

    fn as_soc_limiter(&self) -> Option<&dyn BatterySocLimiter> {
        self.soc_limits.as_ref().map(|l| l as &dyn BatterySocLimiter)
    }

    fn as_power_limiter(&self) -> Option<&dyn BatteryPowerLimiter> {
        self.power_limits
            .as_ref()
            .map(|l| l as &dyn BatteryPowerLimiter)
    }
}
