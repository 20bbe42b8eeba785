// SPDX-FileCopyrightText: 2025 Alexandre Gomes Gaigalas <alganet@gmail.com>
//
// SPDX-License-Identifier: ISC

//! Outbound boundary: where rendered records go.

use tracing::info;

/// Receives the final rendered, multi-line log text together with a
/// constant tag identifying the producer.
pub trait Sink: Send + Sync {
    fn emit(&self, tag: &str, text: &str);
}

/// Default sink: forwards rendered records to the `tracing` facility at
/// info level.
#[derive(Debug, Default)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn emit(&self, tag: &str, text: &str) {
        info!(tag, "{}", text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracing_sink_does_not_panic_without_subscriber() {
        TracingSink.emit("tap-http", "\n【HTTP】GET-->http://example/");
    }
}
