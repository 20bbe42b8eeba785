// SPDX-FileCopyrightText: 2025 Alexandre Gomes Gaigalas <alganet@gmail.com>
//
// SPDX-License-Identifier: ISC

//! Library error types.
//!
//! Only configuration loading surfaces errors to the caller. Failures on
//! the logging path itself (body inflation, charset decoding, JSON parsing)
//! are recovered where they occur and never cross the component boundary;
//! transport errors stay in the caller's own error type and are re-raised
//! unchanged after being logged.

use thiserror::Error;

/// Errors surfaced by `tap-http` itself.
#[derive(Error, Debug)]
pub enum TapError {
    /// Reading a configuration file failed.
    #[error("failed to read config file {path}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Parsing configuration TOML failed.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
