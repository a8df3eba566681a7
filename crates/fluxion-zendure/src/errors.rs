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

use fluxion_meters::MeterError;
use thiserror::Error;

/// Zendure cloud API error types
#[derive(Error, Debug)]
pub enum ZendureError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Zendure API returned error status {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type ZendureResult<T> = Result<T, ZendureError>;

impl From<ZendureError> for MeterError {
    fn from(err: ZendureError) -> Self {
        match err {
            ZendureError::ConfigError(message) => MeterError::Config(message),
            err @ (ZendureError::HttpError(_)
            | ZendureError::ApiError { .. }
            | ZendureError::AuthenticationFailed) => MeterError::connection(err),
        }
    }
}
