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

pub mod capabilities;
pub mod decorate;
pub mod errors;
pub mod limits;
pub mod usage;

pub use capabilities::{
    Battery, BatteryCapacity, BatteryPowerLimiter, BatterySocLimiter, Capability, Meter,
    capabilities_of,
};
pub use decorate::{BatteryCapabilities, decorate_battery_meter};
pub use errors::{MeterError, MeterResult};
pub use limits::{Capacity, PowerLimits, SocLimits};
pub use usage::Usage;
