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

mod config;
mod connection;
mod errors;
mod meter;

pub use config::ZendureConfig;
pub use connection::{Region, TelemetrySnapshot, TelemetrySource, ZendureConnection};
pub use errors::{ZendureError, ZendureResult};
pub use meter::ZendureMeter;
