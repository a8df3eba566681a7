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

use axum::Json;
use axum::extract::{Path, State};
use fluxion_meters::{Capability, Meter, capabilities_of};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::error::ApiError;
use crate::meters::MeterSet;

/// Shared state for meter endpoints
#[derive(Clone)]
pub struct MeterApiState {
    pub meters: Arc<MeterSet>,
}

impl fmt::Debug for MeterApiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeterApiState")
            .field("meters", &self.meters.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl MeterApiState {
    pub fn new(meters: MeterSet) -> Self {
        Self {
            meters: Arc::new(meters),
        }
    }
}

/// Entry of GET /meters
#[derive(Debug, Serialize)]
pub struct MeterSummary {
    pub name: String,
    pub capabilities: Vec<Capability>,
}

#[derive(Debug, Serialize)]
pub struct SocLimitsReading {
    pub min_soc: f64,
    pub max_soc: f64,
}

#[derive(Debug, Serialize)]
pub struct PowerLimitsReading {
    pub max_charge_power: f64,
    pub max_discharge_power: f64,
}

/// Response for GET /meters/{name}. Capabilities the meter lacks are omitted.
#[derive(Debug, Serialize)]
pub struct MeterReading {
    pub name: String,
    pub power: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soc: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soc_limits: Option<SocLimitsReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_limits: Option<PowerLimitsReading>,
}

impl MeterReading {
    /// Read every capability the meter exposes. Each read is a fresh fetch.
    pub async fn read(name: &str, meter: &dyn Meter) -> Result<Self, ApiError> {
        let power = meter.current_power().await?;
        let soc = match meter.as_battery() {
            Some(battery) => Some(battery.soc().await?),
            None => None,
        };

        Ok(Self {
            name: name.to_owned(),
            power,
            soc,
            capacity: meter.as_battery_capacity().map(|c| c.capacity()),
            soc_limits: meter.as_soc_limiter().map(|l| {
                let (min_soc, max_soc) = l.soc_limits();
                SocLimitsReading { min_soc, max_soc }
            }),
            power_limits: meter.as_power_limiter().map(|l| {
                let (max_charge_power, max_discharge_power) = l.power_limits();
                PowerLimitsReading {
                    max_charge_power,
                    max_discharge_power,
                }
            }),
        })
    }
}

/// GET /meters - configured meters and their capabilities
#[expect(clippy::unused_async, reason = "axum handler must be async")]
pub async fn list_meters_handler(State(state): State<MeterApiState>) -> Json<Vec<MeterSummary>> {
    Json(
        state
            .meters
            .iter()
            .map(|(name, meter)| MeterSummary {
                name: name.clone(),
                capabilities: capabilities_of(meter.as_ref()),
            })
            .collect(),
    )
}

/// GET /meters/{name} - current reading of one meter
pub async fn read_meter_handler(
    State(state): State<MeterApiState>,
    Path(name): Path<String>,
) -> Result<Json<MeterReading>, ApiError> {
    let meter = state
        .meters
        .get(&name)
        .ok_or_else(|| ApiError::not_found(format!("unknown meter: {name}")))?;

    Ok(Json(MeterReading::read(&name, meter.as_ref()).await?))
}
