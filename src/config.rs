// SPDX-FileCopyrightText: 2025 Alexandre Gomes Gaigalas <alganet@gmail.com>
//
// SPDX-License-Identifier: ISC

//! Observation settings.

use serde::Deserialize;

use crate::error::TapError;

#[derive(Debug, Clone, Deserialize)]
pub struct TapConfig {
    /// Master switch; when false the interceptor proceeds unobserved.
    #[serde(default = "default_log_request")]
    pub log_request: bool,

    /// Byte cap on rendered request bodies before truncation (default: 512)
    #[serde(default = "default_max_request_length")]
    pub max_request_length: usize,

    /// Byte cap on rendered response bodies before truncation (default: 2048)
    #[serde(default = "default_max_response_length")]
    pub max_response_length: usize,

    /// Line budget for pretty-printed JSON responses; 0 disables
    /// pretty-printing (default: 50)
    #[serde(default = "default_max_pretty_lines")]
    pub max_pretty_lines: usize,
}

fn default_log_request() -> bool {
    true
}

fn default_max_request_length() -> usize {
    512
}

fn default_max_response_length() -> usize {
    2048
}

fn default_max_pretty_lines() -> usize {
    50
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            log_request: default_log_request(),
            max_request_length: default_max_request_length(),
            max_response_length: default_max_response_length(),
            max_pretty_lines: default_max_pretty_lines(),
        }
    }
}

impl TapConfig {
    /// Load configuration from a TOML file. Missing keys take their
    /// defaults, e.g.:
    ///
    /// max_request_length = 1024
    /// max_pretty_lines = 0
    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self, TapError> {
        let path_ref = path.as_ref();
        let s = std::fs::read_to_string(path_ref).map_err(|e| TapError::ConfigRead {
            path: path_ref.display().to_string(),
            source: e,
        })?;
        Ok(toml::from_str(&s)?)
    }
}
