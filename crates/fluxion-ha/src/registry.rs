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

use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

/// Hub base URLs this process has connected to
///
/// Cheap to clone; clones share the same set.
#[derive(Debug, Clone, Default)]
pub struct InstanceRegistry {
    instances: Arc<RwLock<BTreeSet<String>>>,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a hub, returns true if it was not known yet
    pub fn register(&self, uri: impl Into<String>) -> bool {
        let uri = uri.into();
        let mut instances = self.instances.write();
        if instances.contains(&uri) {
            return false;
        }
        info!("Registered Home Assistant instance: {}", uri);
        instances.insert(uri)
    }

    /// Known hubs, sorted
    pub fn instances(&self) -> Vec<String> {
        self.instances.read().iter().cloned().collect()
    }
}
