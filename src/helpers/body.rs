// SPDX-FileCopyrightText: 2025 Alexandre Gomes Gaigalas <alganet@gmail.com>
//
// SPDX-License-Identifier: ISC

use std::io::Read;

use flate2::read::GzDecoder;
use http::{HeaderMap, Method};

use super::headers::{content_length, get_header_str};

/// Whether a response to `method` with `status` is expected to carry a body.
///
/// HEAD responses never do. Informational responses (100-199), 204 and 304
/// do not either, unless a parseable Content-Length or a chunked
/// Transfer-Encoding disagrees with the status code; such responses are
/// malformed, and the headers are honored for compatibility.
pub fn promises_body(method: &Method, status: u16, headers: &HeaderMap) -> bool {
    if method == Method::HEAD {
        return false;
    }

    if (status < 100 || status >= 200) && status != 204 && status != 304 {
        return true;
    }

    if content_length(headers) != -1
        || get_header_str(headers, "transfer-encoding")
            .is_some_and(|v| v.eq_ignore_ascii_case("chunked"))
    {
        return true;
    }

    false
}

/// Inflate a gzip-compressed buffer.
pub fn gunzip(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(data).read_to_end(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use rstest::rstest;
    use std::io::Write;

    fn headers_from_pairs(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (k, v) in pairs {
            let name = http::header::HeaderName::from_bytes(k.as_bytes()).expect("header name");
            headers.insert(name, v.parse().expect("header value"));
        }
        headers
    }

    #[rstest]
    #[case(Method::GET, 200, &[], true)]
    #[case(Method::POST, 500, &[], true)]
    #[case(Method::GET, 99, &[], true)]
    #[case(Method::HEAD, 200, &[], false)]
    #[case(Method::HEAD, 200, &[("content-length", "128")], false)]
    #[case(Method::HEAD, 204, &[("transfer-encoding", "chunked")], false)]
    #[case(Method::GET, 100, &[], false)]
    #[case(Method::GET, 150, &[], false)]
    #[case(Method::GET, 204, &[], false)]
    #[case(Method::GET, 304, &[], false)]
    #[case(Method::GET, 204, &[("content-length", "10")], true)]
    #[case(Method::GET, 304, &[("transfer-encoding", "chunked")], true)]
    #[case(Method::GET, 101, &[("transfer-encoding", "identity")], false)]
    fn promises_body_cases(
        #[case] method: Method,
        #[case] status: u16,
        #[case] pairs: &[(&str, &str)],
        #[case] expected: bool,
    ) {
        let headers = headers_from_pairs(pairs);
        assert_eq!(promises_body(&method, status, &headers), expected);
    }

    #[test]
    fn gunzip_roundtrip() -> anyhow::Result<()> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"{\"a\":1}")?;
        let compressed = encoder.finish()?;

        let inflated = gunzip(&compressed)?;
        assert_eq!(inflated, b"{\"a\":1}");
        Ok(())
    }

    #[test]
    fn gunzip_rejects_garbage() {
        assert!(gunzip(b"definitely not gzip").is_err());
    }
}
