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

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

use fluxion_bridge::config::BridgeConfig;
use fluxion_bridge::discovery_api::DiscoveryState;
use fluxion_bridge::meter_api::MeterApiState;
use fluxion_bridge::meters::build_meters;
use fluxion_bridge::routes;
use fluxion_ha::{HaConnector, InstanceRegistry, normalize_uri};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("fluxion_bridge=info,fluxion_ha=info,fluxion_zendure=info")
        }))
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "bridge_config.toml".to_owned());
    info!(path = %config_path, "Loading configuration");
    let config = BridgeConfig::from_file(&config_path)?;

    let registry = InstanceRegistry::new();
    let mut connector = HaConnector::new(config.hub.timeout())
        .with_default_token(std::env::var("HA_TOKEN").ok())
        .with_retry_config(config.hub.max_retries, Duration::from_millis(500));
    for hub in &config.hubs {
        let uri = normalize_uri(Some(&hub.uri))?;
        if let Some(token) = &hub.token {
            connector = connector.with_token(uri.as_str(), token.as_str());
        }
        registry.register(uri);
    }

    let meters = build_meters(&config.meters)?;
    info!(count = meters.len(), "Meters configured");

    let app = routes::router(
        DiscoveryState::new(Arc::new(connector), registry),
        MeterApiState::new(meters),
    );

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("FluxION Bridge listening on {addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
