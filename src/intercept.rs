// SPDX-FileCopyrightText: 2025 Alexandre Gomes Gaigalas <alganet@gmail.com>
//
// SPDX-License-Identifier: ISC

//! Exchange capture: observes one request/response pass without altering it.

use std::fmt::Display;

use bytes::Bytes;
use tracing::debug;

use crate::config::TapConfig;
use crate::exchange::{
    headers_to_map, ExchangeRecord, ExchangeRecordBuilder, TapRequest, TapResponse,
};
use crate::filter::{AllowAll, RecordFilter};
use crate::helpers::body::{gunzip, promises_body};
use crate::helpers::headers::{
    charset_from_content_type, content_length, get_header_str, has_unknown_encoding,
};
use crate::render::{JsonRenderer, Renderer};
use crate::sink::{Sink, TracingSink};
use crate::sniff::is_probably_text;

/// Tag passed to the sink alongside every rendered record.
pub const TAG: &str = "tap-http";

/// Placeholder recorded when a body is absent.
const BODY_NONE: &str = "NONE";

/// Placeholder recorded when a body's content-coding is unsupported.
const BODY_UNKNOWN: &str = "UNKNOWN(encoded body omitted)";

/// Captures HTTP exchanges flowing through a client pipeline and emits one
/// bounded log record per exchange.
///
/// The interceptor is constructed once with its configuration, filter,
/// renderer and sink, and is then shared freely across threads; every
/// capture is local to its call.
pub struct Interceptor {
    config: TapConfig,
    filter: Box<dyn RecordFilter>,
    renderer: Box<dyn Renderer>,
    sink: Box<dyn Sink>,
}

impl Interceptor {
    /// Interceptor with the default JSON-aware renderer, allow-all filter
    /// and tracing sink.
    pub fn new(config: TapConfig) -> Self {
        Self::builder(config).build()
    }

    pub fn builder(config: TapConfig) -> InterceptorBuilder {
        InterceptorBuilder::new(config)
    }

    /// Execute `proceed` for `request` and observe the outcome.
    ///
    /// The result of `proceed` is returned unchanged: a response passes
    /// through with its buffered body intact, and a transport error is
    /// re-raised after being logged. When observation is disabled by
    /// configuration, `proceed` runs without any capture overhead.
    pub fn intercept<E, F>(&self, request: &TapRequest, proceed: F) -> Result<TapResponse, E>
    where
        E: Display,
        F: FnOnce(&TapRequest) -> Result<TapResponse, E>,
    {
        if !self.config.log_request {
            return proceed(request);
        }

        let outcome = proceed(request);

        let mut builder = ExchangeRecordBuilder::new(&request.method, &request.url);
        if !request.headers.is_empty() {
            builder = builder.headers(headers_to_map(&request.headers));
        }

        let (params, params_charset) = self.render_request_body(request);
        builder = builder.params(params);
        if let Some(charset) = params_charset {
            builder = builder.params_charset(charset);
        }

        match outcome {
            Err(error) => {
                builder = builder.error(error.to_string());
                self.emit(builder.build());
                Err(error)
            }
            Ok(response) => {
                builder = builder.response_code(response.status.as_u16());
                let (text, charset, is_text) = self.render_response_body(request, &response);
                builder = builder.response(text).is_text(is_text);
                if let Some(charset) = charset {
                    builder = builder.response_charset(charset);
                }
                self.emit(builder.build());
                Ok(response)
            }
        }
    }

    /// Gate the record through the filter and hand the rendered text to
    /// the sink. Nothing on this path can affect the primary result.
    fn emit(&self, record: ExchangeRecord) {
        if self.filter.should_log(&record) {
            let text = self.renderer.render(&record);
            self.sink.emit(TAG, &text);
        }
    }

    fn render_request_body(&self, request: &TapRequest) -> (String, Option<String>) {
        let Some(body) = &request.body else {
            return (BODY_NONE.to_string(), None);
        };

        if has_unknown_encoding(&request.headers) {
            return (BODY_UNKNOWN.to_string(), None);
        }

        let charset = body
            .content_type
            .as_deref()
            .and_then(charset_from_content_type);

        let bytes = &body.bytes;
        if !is_probably_text(bytes) {
            return (
                format!("IGNORE(binary {}-byte body omitted)", bytes.len()),
                charset,
            );
        }

        let max = self.config.max_request_length;
        let text = if bytes.len() > max {
            truncate_request_text(&String::from_utf8_lossy(&bytes[..max]))
        } else {
            String::from_utf8_lossy(bytes).into_owned()
        };
        (text, charset)
    }

    fn render_response_body(
        &self,
        request: &TapRequest,
        response: &TapResponse,
    ) -> (String, Option<String>, bool) {
        let status = response.status.as_u16();
        if !promises_body(&request.method, status, &response.headers) {
            return (BODY_NONE.to_string(), None, false);
        }

        if has_unknown_encoding(&response.headers) {
            return (BODY_UNKNOWN.to_string(), None, false);
        }

        let charset = get_header_str(&response.headers, "content-type")
            .and_then(charset_from_content_type);

        let mut bytes = response.body.clone();
        if get_header_str(&response.headers, "content-encoding")
            .is_some_and(|v| v.eq_ignore_ascii_case("gzip"))
        {
            match gunzip(&bytes) {
                Ok(inflated) => bytes = Bytes::from(inflated),
                Err(e) => {
                    // Logging-path failure: keep the compressed bytes,
                    // which classify as binary below.
                    debug!(error = %e, "failed to inflate gzip response body");
                }
            }
        }

        if is_probably_text(&bytes) && content_length(&response.headers) != 0 {
            let max = self.config.max_response_length;
            let text = if bytes.len() > max {
                format!("{}...", String::from_utf8_lossy(&bytes[..max]))
            } else {
                String::from_utf8_lossy(&bytes).into_owned()
            };
            (text, charset, true)
        } else {
            (
                format!("IGNORE(binary {}-byte body omitted)", bytes.len()),
                charset,
                false,
            )
        }
    }
}

/// Secondary cut for oversized request previews: stop at a
/// `Content-Length:` marker (or the line break that follows it), collapse
/// CRLF pairs into ` | `, and mark the truncation. Trims multipart
/// previews down to their first part's headers.
fn truncate_request_text(preview: &str) -> String {
    let index = preview.find("Content-Length:").unwrap_or(preview.len());
    let next_index = match preview[index..].find("\r\n") {
        Some(rel) if rel > 0 => index + rel,
        _ => index,
    };
    let text = if next_index > 0 {
        &preview[..next_index]
    } else {
        preview
    };
    format!("{}...", text.replace("\r\n", " | "))
}

/// Builder wiring filter, renderer and sink implementations into an
/// [`Interceptor`].
pub struct InterceptorBuilder {
    config: TapConfig,
    filter: Box<dyn RecordFilter>,
    renderer: Option<Box<dyn Renderer>>,
    sink: Box<dyn Sink>,
}

impl InterceptorBuilder {
    fn new(config: TapConfig) -> Self {
        Self {
            config,
            filter: Box::new(AllowAll),
            renderer: None,
            sink: Box::new(TracingSink),
        }
    }

    pub fn filter(mut self, filter: impl RecordFilter + 'static) -> Self {
        self.filter = Box::new(filter);
        self
    }

    pub fn renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn sink(mut self, sink: impl Sink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn build(self) -> Interceptor {
        let renderer = self
            .renderer
            .unwrap_or_else(|| Box::new(JsonRenderer::new(self.config.max_pretty_lines)));
        Interceptor {
            config: self.config,
            filter: self.filter,
            renderer,
            sink: self.sink,
        }
    }
}
