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

use thiserror::Error;

/// Boxed gateway error carried through [`MeterError::Connection`]
pub type BoxedSourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Meter error types
#[derive(Error, Debug)]
pub enum MeterError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Gateway failure (network, auth, timeout). Display is the gateway's own message.
    #[error(transparent)]
    Connection(BoxedSourceError),

    #[error("invalid usage: {0}")]
    InvalidUsage(String),
}

impl MeterError {
    /// Wrap a gateway error without altering its message
    pub fn connection(err: impl Into<BoxedSourceError>) -> Self {
        Self::Connection(err.into())
    }
}

pub type MeterResult<T> = Result<T, MeterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_error_keeps_source_message() {
        let err = MeterError::connection("gateway timed out");
        assert_eq!(err.to_string(), "gateway timed out");
    }

    #[test]
    fn test_invalid_usage_message_contains_value() {
        let err = MeterError::InvalidUsage("grid".to_owned());
        assert_eq!(err.to_string(), "invalid usage: grid");
    }
}
