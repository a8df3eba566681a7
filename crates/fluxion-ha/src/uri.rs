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

use reqwest::Url;

use crate::errors::{HaError, HaResult};

/// Normalize a hub base URL: trailing slash stripped, `http` scheme when none is given
pub fn normalize_uri(raw: Option<&str>) -> HaResult<String> {
    let trimmed = raw.unwrap_or_default().trim();
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Err(HaError::MissingUri);
    }

    let uri = if trimmed.contains("://") {
        trimmed.to_owned()
    } else {
        format!("http://{trimmed}")
    };

    Url::parse(&uri).map_err(|e| HaError::InvalidUri(format!("{uri}: {e}")))?;
    Ok(uri)
}
