// SPDX-FileCopyrightText: 2025 Alexandre Gomes Gaigalas <alganet@gmail.com>
//
// SPDX-License-Identifier: ISC

//! Canonical exchange types used across the capture pipeline.

use std::collections::BTreeMap;

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};

/// Request side of one observed exchange.
#[derive(Debug, Clone)]
pub struct TapRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<TapBody>,
}

impl TapRequest {
    /// A bodyless request skeleton for construction sites and tests.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

/// Buffered request body with its declared content-type.
#[derive(Debug, Clone)]
pub struct TapBody {
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl TapBody {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Response side of one observed exchange. The body is fully buffered, so
/// handing it back to the caller never exhausts anything.
#[derive(Debug, Clone)]
pub struct TapResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Captured facts about one request/response pair.
///
/// Immutable once built; populated through [`ExchangeRecordBuilder`]
/// during capture. `error` and a populated `response`/`response_code` are
/// mutually exclusive for a given capture pass.
#[derive(Debug, Clone)]
pub struct ExchangeRecord {
    pub method: String,
    pub url: String,
    /// Request headers as captured; `None` when the request carried none.
    pub headers: Option<BTreeMap<String, String>>,
    /// Rendered request body text, or a placeholder naming why it was omitted.
    pub params: String,
    /// Charset label used to decode the request body.
    pub params_charset: String,
    /// `None` means the response was never reached.
    pub response_code: Option<u16>,
    /// Rendered transport error, set when the underlying exchange failed.
    pub error: Option<String>,
    /// Rendered response body text, or an omission placeholder.
    pub response: String,
    /// Charset label used to decode the response body.
    pub response_charset: String,
    /// True only when the response body was treated as decodable text.
    pub is_text: bool,
}

/// Builder for creating exchange records with optional fields.
pub struct ExchangeRecordBuilder {
    method: String,
    url: String,
    headers: Option<BTreeMap<String, String>>,
    params: String,
    params_charset: String,
    response_code: Option<u16>,
    error: Option<String>,
    response: String,
    response_charset: String,
    is_text: bool,
}

impl ExchangeRecordBuilder {
    /// Create a new exchange record builder with required fields.
    pub fn new(method: &Method, url: &str) -> Self {
        Self {
            method: method.to_string(),
            url: url.to_string(),
            headers: None,
            params: String::new(),
            params_charset: "utf8".to_string(),
            response_code: None,
            error: None,
            response: String::new(),
            response_charset: "utf8".to_string(),
            is_text: false,
        }
    }

    /// Attach the captured request headers.
    pub fn headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Set the rendered request body text.
    pub fn params(mut self, params: impl Into<String>) -> Self {
        self.params = params.into();
        self
    }

    pub fn params_charset(mut self, charset: impl Into<String>) -> Self {
        self.params_charset = charset.into();
        self
    }

    pub fn response_code(mut self, code: u16) -> Self {
        self.response_code = Some(code);
        self
    }

    /// Record the rendered transport error.
    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Set the rendered response body text.
    pub fn response(mut self, response: impl Into<String>) -> Self {
        self.response = response.into();
        self
    }

    pub fn response_charset(mut self, charset: impl Into<String>) -> Self {
        self.response_charset = charset.into();
        self
    }

    pub fn is_text(mut self, is_text: bool) -> Self {
        self.is_text = is_text;
        self
    }

    /// Finalize into an immutable record.
    pub fn build(self) -> ExchangeRecord {
        ExchangeRecord {
            method: self.method,
            url: self.url,
            headers: self.headers,
            params: self.params,
            params_charset: self.params_charset,
            response_code: self.response_code,
            error: self.error,
            response: self.response,
            response_charset: self.response_charset,
            is_text: self.is_text,
        }
    }
}

/// Collapse a `HeaderMap` into sorted string pairs, dropping values that
/// are not valid UTF-8.
pub fn headers_to_map(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for (k, v) in headers.iter() {
        if let Ok(s) = v.to_str() {
            map.insert(k.as_str().to_string(), s.to_string());
        }
    }
    map
}
