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
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// What physical quantity a meter instance represents
///
/// Parsing never fails: unknown values are kept verbatim in [`Usage::Other`] and
/// only rejected when a reading is requested. Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Usage {
    /// Solar production
    Pv,
    /// Battery net power, positive while charging
    Battery,
    /// Any other configured value
    Other(String),
}

impl Usage {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pv => "pv",
            Self::Battery => "battery",
            Self::Other(value) => value,
        }
    }

    pub fn is_battery(&self) -> bool {
        matches!(self, Self::Battery)
    }
}

impl From<String> for Usage {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pv" => Self::Pv,
            "battery" => Self::Battery,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for Usage {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<Usage> for String {
    fn from(value: Usage) -> Self {
        match value {
            Usage::Other(value) => value,
            Usage::Pv | Usage::Battery => value.as_str().to_owned(),
        }
    }
}

impl FromStr for Usage {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
