// SPDX-FileCopyrightText: 2025 Alexandre Gomes Gaigalas <alganet@gmail.com>
//
// SPDX-License-Identifier: ISC

//! Decoding of `\uXXXX` escape sequences embedded in text.

/// Replace each `\u` followed by exactly four hexadecimal digits with the
/// character the digits name.
///
/// Malformed attempts (too few digits, non-hex digits) and escapes naming
/// values that are not Unicode scalars (surrogates) pass through
/// unchanged. Never panics.
pub fn decode_escapes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find("\\u") {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        let decoded = tail
            .get(2..6)
            .filter(|h| h.bytes().all(|b| b.is_ascii_hexdigit()))
            .and_then(|h| u32::from_str_radix(h, 16).ok())
            .and_then(char::from_u32);

        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[pos + 6..];
            }
            None => {
                out.push_str("\\u");
                rest = &rest[pos + 2..];
            }
        }
    }

    out.push_str(rest);
    out
}
