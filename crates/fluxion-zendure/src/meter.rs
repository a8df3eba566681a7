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
use fluxion_meters::{
    Battery, BatteryCapabilities, Meter, MeterError, MeterResult, Usage, decorate_battery_meter,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::ZendureConfig;
use crate::connection::{TelemetrySource, ZendureConnection};

/// Zendure device read as a single usage-specific power value
pub struct ZendureMeter {
    usage: Usage,
    conn: Arc<dyn TelemetrySource>,
}

impl fmt::Debug for ZendureMeter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZendureMeter")
            .field("usage", &self.usage)
            .field("conn", &"<TelemetrySource>")
            .finish()
    }
}

impl ZendureMeter {
    pub fn new(usage: Usage, conn: Arc<dyn TelemetrySource>) -> Self {
        Self { usage, conn }
    }

    /// Build a meter from decoded configuration, decorating it when usage is "battery"
    pub fn from_config(config: &ZendureConfig) -> MeterResult<Arc<dyn Meter>> {
        let conn = match &config.base_url {
            Some(base_url) => ZendureConnection::with_base_url(
                base_url.as_str(),
                config.account.as_str(),
                config.serial.as_str(),
                config.timeout(),
            )?,
            None => ZendureConnection::new(
                &config.region(),
                config.account.as_str(),
                config.serial.as_str(),
                config.timeout(),
            )?,
        };

        info!(
            serial = %conn.serial(),
            usage = %config.usage,
            "Zendure meter configured"
        );

        Ok(Self::with_source(
            config.usage.clone(),
            Arc::new(conn),
            config.battery_capabilities(),
        ))
    }

    /// Build a meter over an existing telemetry source
    pub fn with_source(
        usage: Usage,
        conn: Arc<dyn TelemetrySource>,
        capabilities: BatteryCapabilities,
    ) -> Arc<dyn Meter> {
        let meter = Arc::new(Self::new(usage.clone(), Arc::clone(&conn)));
        decorate_battery_meter(meter, &usage, Arc::new(ZendureSoc { conn }), capabilities)
    }
}

#[async_trait]
impl Meter for ZendureMeter {
    async fn current_power(&self) -> MeterResult<f64> {
        let res = self.conn.fetch().await?;

        let power = match &self.usage {
            Usage::Pv => f64::from(res.solar_input_power),
            Usage::Battery => f64::from(res.pack_input_power) - f64::from(res.output_pack_power),
            Usage::Other(usage) => return Err(MeterError::InvalidUsage(usage.clone())),
        };

        debug!(usage = %self.usage, power, "Zendure power");
        Ok(power)
    }
}

struct ZendureSoc {
    conn: Arc<dyn TelemetrySource>,
}

#[async_trait]
impl Battery for ZendureSoc {
    async fn soc(&self) -> MeterResult<f64> {
        let res = self.conn.fetch().await?;
        Ok(f64::from(res.electric_level))
    }
}
