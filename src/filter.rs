// SPDX-FileCopyrightText: 2025 Alexandre Gomes Gaigalas <alganet@gmail.com>
//
// SPDX-License-Identifier: ISC

//! Per-record predicates gating log emission.

use crate::exchange::ExchangeRecord;

/// Decides, per exchange record, whether a log should be emitted at all.
///
/// Implementations must be side-effect-free and fast; the predicate runs
/// on every observed exchange.
pub trait RecordFilter: Send + Sync {
    fn should_log(&self, record: &ExchangeRecord) -> bool;
}

/// Default filter: every record is logged.
#[derive(Debug, Default)]
pub struct AllowAll;

impl RecordFilter for AllowAll {
    fn should_log(&self, _record: &ExchangeRecord) -> bool {
        true
    }
}

/// Suppresses records whose URL contains any of the configured fragments.
///
/// Useful for quieting heartbeat or polling endpoints.
#[derive(Debug, Default)]
pub struct UrlDenylist {
    fragments: Vec<String>,
}

impl UrlDenylist {
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fragments: fragments.into_iter().map(Into::into).collect(),
        }
    }
}

impl RecordFilter for UrlDenylist {
    fn should_log(&self, record: &ExchangeRecord) -> bool {
        !self
            .fragments
            .iter()
            .any(|fragment| record.url.contains(fragment.as_str()))
    }
}
