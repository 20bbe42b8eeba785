// SPDX-FileCopyrightText: 2025 Alexandre Gomes Gaigalas <alganet@gmail.com>
//
// SPDX-License-Identifier: ISC

//! Rendering of exchange records into tagged, multi-line log text.

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::exchange::ExchangeRecord;
use crate::helpers::headers::form_urldecode;
use crate::unicode::decode_escapes;

/// Marker prepended to every physical line of a rendered record, so a
/// multi-line entry can be grepped as a unit.
pub const LINE_TAG: &str = "【HTTP】";

/// Turns a captured exchange record into the final log string.
pub trait Renderer: Send + Sync {
    fn render(&self, record: &ExchangeRecord) -> String;
}

/// Deterministic plain-text rendering:
///
/// ```text
/// <method>--><url>
/// headers--><headers-as-map-string>      (only if headers present)
/// params--><params>                       (only if params non-empty)
/// error--><error>                         (short-circuits the response section)
/// response(<code>)--><response>           (code omitted when unset)
/// ```
#[derive(Debug, Default)]
pub struct PlainRenderer;

impl PlainRenderer {
    /// Assemble the untagged section text with the given params and
    /// response substitutions.
    fn compose(&self, record: &ExchangeRecord, params: &str, response: &str) -> String {
        let mut sb = String::new();
        sb.push_str(&record.method);
        sb.push_str("-->");
        sb.push_str(&record.url);

        if let Some(headers) = &record.headers {
            sb.push_str("\nheaders-->");
            sb.push_str(&format_headers(headers));
        }

        if !params.is_empty() {
            sb.push_str("\nparams-->");
            sb.push_str(params);
        }

        if let Some(error) = &record.error {
            sb.push_str("\nerror-->");
            sb.push_str(error);
            return sb;
        }

        match record.response_code {
            Some(code) => {
                sb.push_str("\nresponse(");
                sb.push_str(&code.to_string());
                sb.push_str(")-->");
            }
            None => sb.push_str("\nresponse-->"),
        }
        if !response.is_empty() {
            sb.push_str(response);
        }

        sb
    }
}

impl Renderer for PlainRenderer {
    fn render(&self, record: &ExchangeRecord) -> String {
        tag_lines(&self.compose(record, &record.params, &record.response))
    }
}

/// JSON-aware rendering: decorates [`PlainRenderer`] with form-decoded
/// params and bounded pretty-printing of JSON response bodies.
#[derive(Debug)]
pub struct JsonRenderer {
    plain: PlainRenderer,
    max_pretty_lines: usize,
}

impl JsonRenderer {
    /// `max_pretty_lines` bounds the pretty-printed form; JSON that would
    /// exceed it stays flat, and 0 disables pretty-printing entirely.
    pub fn new(max_pretty_lines: usize) -> Self {
        Self {
            plain: PlainRenderer,
            max_pretty_lines,
        }
    }

    fn decode_params<'a>(&self, record: &'a ExchangeRecord) -> Cow<'a, str> {
        if record.params.is_empty() {
            return Cow::Borrowed("");
        }
        match form_urldecode(&record.params, &record.params_charset) {
            Some(decoded) => Cow::Owned(decoded),
            None => Cow::Borrowed(record.params.as_str()),
        }
    }

    fn render_response(&self, record: &ExchangeRecord) -> String {
        if record.response.is_empty() {
            return String::new();
        }

        let mut chosen = Cow::Borrowed(record.response.as_str());
        if self.max_pretty_lines > 0 {
            let trimmed = record.response.trim();
            if trimmed.starts_with('{') || trimmed.starts_with('[') {
                if let Some(pretty) = pretty_print(trimmed) {
                    if pretty.lines().count() <= self.max_pretty_lines {
                        // Pretty output starts on the line after the
                        // response marker.
                        chosen = Cow::Owned(format!("\n{pretty}"));
                    }
                }
            }
        }

        decode_escapes(&chosen)
    }
}

impl Renderer for JsonRenderer {
    fn render(&self, record: &ExchangeRecord) -> String {
        let params = self.decode_params(record);
        let response = self.render_response(record);
        tag_lines(&self.plain.compose(record, &params, &response))
    }
}

/// Re-serialize a JSON document with 2-space indentation. `None` when the
/// input is not valid JSON; the failure is the caller's cue to keep the
/// flat original.
fn pretty_print(json: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(json).ok()?;
    serde_json::to_string_pretty(&value).ok()
}

fn format_headers(headers: &BTreeMap<String, String>) -> String {
    let entries: Vec<String> = headers.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{{{}}}", entries.join(", "))
}

/// Prefix every physical line of `text` with the line tag. The result
/// starts with a line break so the whole record sits below the log
/// framework's own prefix.
fn tag_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    for line in text.lines() {
        out.push('\n');
        out.push_str(LINE_TAG);
        out.push_str(line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::ExchangeRecordBuilder;
    use http::Method;
    use rstest::rstest;

    fn base_record() -> ExchangeRecordBuilder {
        ExchangeRecordBuilder::new(&Method::GET, "http://example/api")
    }

    #[test]
    fn plain_renders_minimal_record() {
        let record = base_record().response_code(200).response("ok").build();
        let text = PlainRenderer.render(&record);
        assert_eq!(
            text,
            "\n【HTTP】GET-->http://example/api\n【HTTP】response(200)-->ok"
        );
    }

    #[test]
    fn plain_renders_headers_and_params() {
        let mut headers = std::collections::BTreeMap::new();
        headers.insert("b".to_string(), "2".to_string());
        headers.insert("a".to_string(), "1".to_string());

        let record = base_record()
            .headers(headers)
            .params("x=1")
            .response_code(200)
            .response("ok")
            .build();
        let text = PlainRenderer.render(&record);
        assert!(text.contains("\n【HTTP】headers-->{a=1, b=2}"));
        assert!(text.contains("\n【HTTP】params-->x=1"));
    }

    #[test]
    fn plain_error_short_circuits_response_section() {
        let record = base_record().error("connection timed out").build();
        let text = PlainRenderer.render(&record);
        assert!(text.contains("\n【HTTP】error-->connection timed out"));
        assert!(!text.contains("response"));
    }

    #[test]
    fn plain_unset_code_renders_bare_marker() {
        let record = base_record().response("partial").build();
        let text = PlainRenderer.render(&record);
        assert!(text.contains("\n【HTTP】response-->partial"));
    }

    #[test]
    fn plain_rendering_is_deterministic() {
        let mut headers = std::collections::BTreeMap::new();
        headers.insert("x-b".to_string(), "2".to_string());
        headers.insert("x-a".to_string(), "1".to_string());
        let record = base_record()
            .headers(headers)
            .response_code(200)
            .response("ok")
            .build();
        let first = PlainRenderer.render(&record);
        let second = PlainRenderer.render(&record);
        assert_eq!(first, second);
    }

    #[test]
    fn json_pretty_prints_small_objects() {
        let record = base_record()
            .response_code(200)
            .response("{\"a\":1}")
            .is_text(true)
            .build();
        let text = JsonRenderer::new(50).render(&record);
        assert!(text.contains("\n【HTTP】response(200)-->"));
        assert!(text.contains("\n【HTTP】{"));
        assert!(text.contains("\n【HTTP】  \"a\": 1"));
        assert!(text.contains("\n【HTTP】}"));
    }

    #[test]
    fn json_pretty_prints_arrays() {
        let record = base_record()
            .response_code(200)
            .response("[1,2]")
            .build();
        let text = JsonRenderer::new(50).render(&record);
        assert!(text.contains("\n【HTTP】["));
        assert!(text.contains("\n【HTTP】  1,"));
    }

    #[test]
    fn json_over_line_budget_stays_flat() {
        // Pretty form has 5 lines; a budget of 4 keeps the flat original.
        let record = base_record()
            .response_code(200)
            .response("{\"a\":1,\"b\":2,\"c\":3}")
            .build();
        let text = JsonRenderer::new(4).render(&record);
        assert!(text.contains("response(200)-->{\"a\":1,\"b\":2,\"c\":3}"));
    }

    #[test]
    fn json_invalid_body_stays_flat() {
        let record = base_record()
            .response_code(200)
            .response("{not json")
            .build();
        let text = JsonRenderer::new(50).render(&record);
        assert!(text.contains("response(200)-->{not json"));
    }

    #[test]
    fn json_non_json_body_is_untouched() {
        let record = base_record()
            .response_code(200)
            .response("plain body")
            .build();
        let text = JsonRenderer::new(50).render(&record);
        assert!(text.contains("response(200)-->plain body"));
    }

    #[test]
    fn json_decodes_unicode_escapes_in_responses() {
        let record = base_record()
            .response_code(200)
            .response("{\"msg\":\"\\u6210\\u529f\"}")
            .build();
        let text = JsonRenderer::new(50).render(&record);
        assert!(text.contains("成功"));
    }

    #[test]
    fn json_decodes_form_encoded_params() {
        let record = base_record()
            .params("name=%E5%BC%A0%E4%B8%89&age=30")
            .response_code(200)
            .response("ok")
            .build();
        let text = JsonRenderer::new(50).render(&record);
        assert!(text.contains("params-->name=张三&age=30"));
    }

    #[test]
    fn json_malformed_params_fall_back_to_raw() {
        let record = base_record()
            .params("broken%2")
            .response_code(200)
            .response("ok")
            .build();
        let text = JsonRenderer::new(50).render(&record);
        assert!(text.contains("params-->broken%2"));
    }

    #[rstest]
    #[case("{\"a\":1}")]
    #[case("plain response")]
    #[case("")]
    fn json_with_zero_budget_matches_plain(#[case] response: &str) {
        // With pretty-printing disabled and no params to decode, the two
        // renderers agree byte for byte.
        let record = base_record()
            .response_code(200)
            .response(response)
            .build();
        assert_eq!(
            JsonRenderer::new(0).render(&record),
            PlainRenderer.render(&record)
        );
    }

    #[test]
    fn json_error_record_keeps_decoded_params_only() {
        let record = base_record()
            .params("q=a%20b")
            .error("connection reset")
            .build();
        let text = JsonRenderer::new(50).render(&record);
        assert!(text.contains("params-->q=a b"));
        assert!(text.contains("error-->connection reset"));
        assert!(!text.contains("response"));
    }
}
