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

//! Entity and service discovery against a Home Assistant hub
//!
//! Both queries are stateless: every call fetches fresh catalogs from the hub.

use async_trait::async_trait;
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::errors::HaResult;
use crate::types::{HaEntityState, HaServiceDomain};

/// The two catalogs a hub exposes
#[async_trait]
pub trait HubCatalog: Send + Sync {
    /// Flat list of entity states
    async fn states(&self) -> HaResult<Vec<HaEntityState>>;

    /// Services grouped by domain
    async fn services(&self) -> HaResult<Vec<HaServiceDomain>>;
}

/// Comma-separated domain filter. An absent or empty parameter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainFilter {
    domains: Option<Vec<String>>,
}

impl DomainFilter {
    /// Parse the `domain` query parameter. Segments are kept as given, so `","`
    /// is a filter of two empty domains and matches nothing.
    pub fn parse(param: Option<&str>) -> Self {
        let domains = param
            .filter(|p| !p.is_empty())
            .map(|p| p.split(',').map(str::to_owned).collect());
        Self { domains }
    }

    /// No filter was given
    pub fn matches_all(&self) -> bool {
        self.domains.is_none()
    }

    pub fn domains(&self) -> &[String] {
        self.domains.as_deref().unwrap_or_default()
    }

    pub fn contains_domain(&self, domain: &str) -> bool {
        self.domains
            .as_ref()
            .is_none_or(|domains| domains.iter().any(|d| d == domain))
    }

    /// Whether the part of `entity_id` before its first '.' is one of the domains
    pub fn matches_entity(&self, entity_id: &str) -> bool {
        if self.matches_all() {
            return true;
        }
        entity_id
            .split_once('.')
            .is_some_and(|(domain, _)| self.contains_domain(domain))
    }
}

/// Entity ids matching the filter, in hub order
pub async fn discover_entities(
    catalog: &dyn HubCatalog,
    filter: &DomainFilter,
) -> HaResult<Vec<String>> {
    let states = catalog.states().await?;
    let total = states.len();

    let entities: Vec<String> = states
        .into_iter()
        .filter(|e| filter.matches_entity(&e.entity_id))
        .map(|e| e.entity_id)
        .collect();

    debug!(
        "🔍 [HA DISCOVERY] {}/{} entities match {:?}",
        entities.len(),
        total,
        filter.domains()
    );
    Ok(entities)
}

/// Callable targets: `domain.service` for every matching service, plus matching
/// entity ids when a filter is given. Sorted and duplicate-free.
///
/// Entity-based targets (e.g. notify entities) are a best-effort addition: a failing
/// states fetch contributes nothing. Without a filter the states are not fetched.
pub async fn discover_services(
    catalog: &dyn HubCatalog,
    filter: &DomainFilter,
) -> HaResult<Vec<String>> {
    let mut seen = BTreeSet::new();

    for group in catalog.services().await? {
        if filter.contains_domain(&group.domain) {
            for service in group.services.keys() {
                seen.insert(format!("{}.{}", group.domain, service));
            }
        }
    }

    if !filter.matches_all() {
        match catalog.states().await {
            Ok(states) => seen.extend(
                states
                    .into_iter()
                    .filter(|e| filter.matches_entity(&e.entity_id))
                    .map(|e| e.entity_id),
            ),
            Err(e) => warn!("⚠️ [HA DISCOVERY] Skipping entity-based services: {}", e),
        }
    }

    debug!("🔍 [HA DISCOVERY] {} services found", seen.len());
    Ok(seen.into_iter().collect())
}
