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

use anyhow::{Context, Result};
use fluxion_meters::{Meter, MeterError, MeterResult, capabilities_of};
use fluxion_zendure::{ZendureConfig, ZendureMeter};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::config::MeterEntry;

/// Supported values of a meter block's `type`
pub const METER_TYPES: &[&str] = &["zendure"];

/// Configured meters by name
pub type MeterSet = BTreeMap<String, Arc<dyn Meter>>;

/// Create a meter of the given type from its type-specific keys
pub fn create_meter(kind: &str, other: &toml::Table) -> MeterResult<Arc<dyn Meter>> {
    match kind {
        "zendure" => ZendureMeter::from_config(&ZendureConfig::from_table(other.clone())?),
        _ => Err(MeterError::Config(format!("unknown meter type: {kind}"))),
    }
}

pub fn build_meters(entries: &[MeterEntry]) -> Result<MeterSet> {
    let mut meters = MeterSet::new();
    for entry in entries {
        let meter = create_meter(&entry.kind, &entry.other)
            .with_context(|| format!("Failed to create meter '{}'", entry.name))?;
        info!(
            name = %entry.name,
            kind = %entry.kind,
            capabilities = ?capabilities_of(meter.as_ref()),
            "Meter ready"
        );
        meters.insert(entry.name.clone(), meter);
    }
    Ok(meters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluxion_meters::Capability;

    fn table(source: &str) -> toml::Table {
        source.parse::<toml::Table>().unwrap()
    }

    #[test]
    fn test_create_zendure_battery() {
        let meter = create_meter(
            "zendure",
            &table(
                r#"
                usage = "battery"
                serial = "HOA1"
                [capacity]
                capacity_kwh = 2.88
                "#,
            ),
        )
        .unwrap();

        assert_eq!(
            capabilities_of(meter.as_ref()),
            vec![Capability::Power, Capability::Soc, Capability::Capacity]
        );
    }

    #[test]
    fn test_unknown_type() {
        let result = create_meter("shelly", &toml::Table::new());
        assert!(matches!(result, Err(MeterError::Config(_))));
    }

    #[test]
    fn test_build_reports_meter_name() {
        let entries = vec![MeterEntry {
            name: "roof".to_owned(),
            kind: "zendure".to_owned(),
            other: table(r#"serial = "HOA1""#),
        }];

        let Err(err) = build_meters(&entries) else {
            panic!("expected build failure");
        };
        let err = format!("{err:#}");
        assert!(err.contains("'roof'"));
        assert!(err.contains("usage"));
    }
}
