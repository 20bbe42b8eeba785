// SPDX-FileCopyrightText: 2025 Alexandre Gomes Gaigalas <alganet@gmail.com>
//
// SPDX-License-Identifier: ISC

//! Text-vs-binary classification of buffered body bytes.

/// Upper bound on the number of prefix bytes inspected.
const SNIFF_PREFIX: usize = 64;

/// Upper bound on the number of code points decoded from the prefix.
const SNIFF_CODE_POINTS: usize = 16;

/// Heuristically decide whether `data` is printable text suitable for
/// decoding as UTF-8.
///
/// Inspects at most the first 64 bytes and decodes at most 16 code points
/// from them. A non-whitespace control character classifies the buffer as
/// binary, as does a multi-byte sequence cut off by the end of the
/// inspected prefix. Bytes that are invalid UTF-8 outright count as one
/// U+FFFD replacement character and pass. Empty input classifies as text.
///
/// This is a heuristic, not a validator; crafted inputs can defeat it.
pub fn is_probably_text(data: &[u8]) -> bool {
    let prefix = &data[..data.len().min(SNIFF_PREFIX)];
    let mut rest = prefix;
    let mut decoded = 0usize;

    while decoded < SNIFF_CODE_POINTS && !rest.is_empty() {
        match std::str::from_utf8(rest) {
            Ok(s) => {
                for c in s.chars().take(SNIFF_CODE_POINTS - decoded) {
                    if c.is_control() && !c.is_whitespace() {
                        return false;
                    }
                }
                return true;
            }
            Err(e) => {
                let valid = std::str::from_utf8(&rest[..e.valid_up_to()]).unwrap_or("");
                for c in valid.chars() {
                    if decoded == SNIFF_CODE_POINTS {
                        return true;
                    }
                    if c.is_control() && !c.is_whitespace() {
                        return false;
                    }
                    decoded += 1;
                }
                if decoded == SNIFF_CODE_POINTS {
                    return true;
                }
                match e.error_len() {
                    // The prefix ends inside a multi-byte sequence.
                    None => return false,
                    // An invalid sequence decodes as one replacement
                    // character, which is not a control character.
                    Some(n) => {
                        decoded += 1;
                        rest = &rest[e.valid_up_to() + n..];
                    }
                }
            }
        }
    }

    true
}
