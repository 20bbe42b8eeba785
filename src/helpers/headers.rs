// SPDX-FileCopyrightText: 2025 Alexandre Gomes Gaigalas <alganet@gmail.com>
//
// SPDX-License-Identifier: ISC

use http::HeaderMap;

/// Retrieve a header value as a string, if it exists and contains only visible ASCII.
///
/// Returns `None` if the header is missing or contains non-visible ASCII characters
/// (control characters) or non-ASCII bytes.
pub fn get_header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// The Content-Length declared by the headers, or -1 when the header is
/// absent or unparseable.
pub fn content_length(headers: &HeaderMap) -> i64 {
    get_header_str(headers, "content-length")
        .and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(-1)
}

/// True when Content-Encoding names a coding other than `identity` or
/// `gzip`. Bodies carrying such codings are omitted from capture without
/// being read.
pub fn has_unknown_encoding(headers: &HeaderMap) -> bool {
    match get_header_str(headers, "content-encoding") {
        None => false,
        Some(enc) => {
            !enc.eq_ignore_ascii_case("identity") && !enc.eq_ignore_ascii_case("gzip")
        }
    }
}

/// Extract the charset parameter from a content-type value, lowercased,
/// e.g. `utf-8` from `application/json; charset=UTF-8`.
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    for param in content_type.split(';').skip(1) {
        if let Some((key, value)) = param.split_once('=') {
            if key.trim().eq_ignore_ascii_case("charset") {
                let value = value.trim().trim_matches('"');
                if !value.is_empty() {
                    return Some(value.to_ascii_lowercase());
                }
            }
        }
    }
    None
}

/// Decode percent-escapes and `+`-as-space in form-encoded text.
///
/// `charset` selects how decoded bytes become a string: UTF-8 labels decode
/// strictly, any other label falls back to lossy UTF-8. Returns `None` on
/// malformed escapes so the caller can fall back to the raw text.
pub fn form_urldecode(input: &str, charset: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0usize;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' => {
                if i + 2 >= bytes.len() {
                    return None;
                }
                let hi = hex_value(bytes[i + 1])?;
                let lo = hex_value(bytes[i + 2])?;
                out.push((hi << 4) | lo);
                i += 3;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    if charset.eq_ignore_ascii_case("utf8") || charset.eq_ignore_ascii_case("utf-8") {
        String::from_utf8(out).ok()
    } else {
        Some(String::from_utf8_lossy(&out).into_owned())
    }
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
