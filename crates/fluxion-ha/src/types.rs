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

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Entry of `/api/states`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HaEntityState {
    pub entity_id: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub attributes: serde_json::Value,
    #[serde(default)]
    pub last_changed: String,
    #[serde(default)]
    pub last_updated: String,
}

impl HaEntityState {
    /// Domain part of the entity id, i.e. everything before the first '.'
    pub fn domain(&self) -> Option<&str> {
        self.entity_id.split_once('.').map(|(domain, _)| domain)
    }
}

/// Entry of `/api/services`: one domain and its callable services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HaServiceDomain {
    pub domain: String,
    /// Service name -> service description. Only the keys are used.
    #[serde(default)]
    pub services: BTreeMap<String, serde_json::Value>,
}
