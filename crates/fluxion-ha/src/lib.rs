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

pub mod client;
pub mod connector;
pub mod discovery;
pub mod errors;
pub mod registry;
pub mod types;
pub mod uri;

pub use client::HomeAssistantClient;
pub use connector::{HaConnector, HubConnector};
pub use discovery::{DomainFilter, HubCatalog, discover_entities, discover_services};
pub use errors::{HaError, HaResult};
pub use registry::InstanceRegistry;
pub use types::{HaEntityState, HaServiceDomain};
pub use uri::normalize_uri;
