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

use axum::Router;
use axum::routing::get;

use crate::discovery_api::{self, DiscoveryState};
use crate::meter_api::{self, MeterApiState};

pub fn router(discovery: DiscoveryState, meters: MeterApiState) -> Router {
    let discovery_routes = Router::new()
        .route("/entities", get(discovery_api::entities_handler))
        .route("/services", get(discovery_api::services_handler))
        .route("/instances", get(discovery_api::instances_handler))
        .with_state(discovery);

    let meter_routes = Router::new()
        .route("/meters", get(meter_api::list_meters_handler))
        .route("/meters/{name}", get(meter_api::read_meter_handler))
        .with_state(meters);

    discovery_routes.merge(meter_routes)
}
