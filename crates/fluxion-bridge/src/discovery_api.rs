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
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use fluxion_ha::{
    DomainFilter, HubCatalog, HubConnector, InstanceRegistry, discover_entities,
    discover_services, normalize_uri,
};

use crate::error::ApiError;

/// Client-side cache hint for discovery results
pub const DISCOVERY_CACHE_CONTROL: &str = "max-age=300";

/// Shared state for discovery endpoints
#[derive(Clone)]
pub struct DiscoveryState {
    pub connector: Arc<dyn HubConnector>,
    pub registry: InstanceRegistry,
}

impl fmt::Debug for DiscoveryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscoveryState")
            .field("connector", &"<HubConnector>")
            .field("registry", &self.registry)
            .finish()
    }
}

impl DiscoveryState {
    pub fn new(connector: Arc<dyn HubConnector>, registry: InstanceRegistry) -> Self {
        Self {
            connector,
            registry,
        }
    }

    /// Open the hub named by the `uri` parameter. Returns the normalized URI
    /// so it can be registered once the hub has answered.
    fn connect(&self, uri: Option<&str>) -> Result<(String, Arc<dyn HubCatalog>), ApiError> {
        let uri = normalize_uri(uri)?;
        let catalog = self.connector.connect(&uri)?;
        Ok((uri, catalog))
    }
}

/// Query parameters of GET /entities and GET /services
#[derive(Debug, Default, Deserialize)]
pub struct DiscoveryQuery {
    pub uri: Option<String>,
    pub domain: Option<String>,
}

fn cached_json<T: Serialize>(data: T) -> impl IntoResponse {
    ([(header::CACHE_CONTROL, DISCOVERY_CACHE_CONTROL)], Json(data))
}

/// GET /entities - entity ids of a hub, optionally filtered by domain
pub async fn entities_handler(
    State(state): State<DiscoveryState>,
    query: Result<Query<DiscoveryQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let (uri, catalog) = state.connect(query.uri.as_deref())?;
    let filter = DomainFilter::parse(query.domain.as_deref());
    debug!("GET /entities domains={:?}", filter.domains());

    let entities = discover_entities(catalog.as_ref(), &filter).await?;
    state.registry.register(uri);
    Ok(cached_json(entities))
}

/// GET /services - callable `domain.service` targets of a hub, sorted
pub async fn services_handler(
    State(state): State<DiscoveryState>,
    query: Result<Query<DiscoveryQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let (uri, catalog) = state.connect(query.uri.as_deref())?;
    let filter = DomainFilter::parse(query.domain.as_deref());
    debug!("GET /services domains={:?}", filter.domains());

    let services = discover_services(catalog.as_ref(), &filter).await?;
    state.registry.register(uri);
    Ok(cached_json(services))
}

/// GET /instances - hubs connected to so far, sorted
#[expect(clippy::unused_async, reason = "axum handler must be async")]
pub async fn instances_handler(State(state): State<DiscoveryState>) -> Json<Vec<String>> {
    Json(state.registry.instances())
}
