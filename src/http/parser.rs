use std::collections::HashMap;

use thiserror::Error;

use crate::http::headers::parse_header_block;
use crate::http::request::{Method, Request};

/// Why a buffer could not be turned into a [`Request`].
///
/// `Incomplete` only means more bytes are needed; every other variant is a
/// malformed request and is answered with 400 Bad Request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed request line")]
    InvalidRequest,
    #[error("unknown request method")]
    InvalidMethod,
    #[error("header line without a colon")]
    InvalidHeader,
    #[error("Content-Length is not a number")]
    InvalidContentLength,
    #[error("request head exceeds {0} bytes")]
    HeadersTooLarge(usize),
    #[error("request body exceeds {0} bytes")]
    BodyTooLarge(usize),
    #[error("request is incomplete")]
    Incomplete,
}

/// Body size accepted when nothing else is configured.
pub const DEFAULT_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Parses one request out of `buf` with no bound on the head or body size.
///
/// On success returns the request and the number of bytes it occupied.
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    parse_http_request_limited(buf, usize::MAX, usize::MAX)
}

/// Like [`parse_http_request`], but gives up with
/// [`ParseError::HeadersTooLarge`] once `max_head` bytes have arrived without
/// the blank line that ends the head, and with [`ParseError::BodyTooLarge`]
/// as soon as the head declares more than `max_body` body bytes.
pub fn parse_http_request_limited(
    buf: &[u8],
    max_head: usize,
    max_body: usize,
) -> Result<(Request, usize), ParseError> {
    // Look for header/body separator
    let headers_end = match find_headers_end(buf) {
        Some(end) if end <= max_head => end,
        Some(_) => return Err(ParseError::HeadersTooLarge(max_head)),
        None if buf.len() > max_head => return Err(ParseError::HeadersTooLarge(max_head)),
        None => return Err(ParseError::Incomplete),
    };
    let head_bytes = &buf[..headers_end];
    let body_bytes = &buf[headers_end + 4..];

    let head = std::str::from_utf8(head_bytes)
        .map_err(|_| ParseError::InvalidRequest)?;

    let (request_line, header_block) = head.split_once("\r\n").unwrap_or((head, ""));
    let (method, path, version) = parse_request_line(request_line)?;

    let headers = parse_header_block(header_block)?;

    // Body
    let content_length = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("Content-Length"))
        .map(|(_, v)| v.trim().parse::<usize>().map_err(|_| ParseError::InvalidContentLength))
        .transpose()?
        .unwrap_or(0);

    if content_length > max_body {
        return Err(ParseError::BodyTooLarge(max_body));
    }

    if body_bytes.len() < content_length {
        return Err(ParseError::Incomplete);
    }

    let body = body_bytes[..content_length].to_vec();

    let request = Request {
        method,
        path: path.to_string(),
        version: version.to_string(),
        headers,
        body,
        path_variables: HashMap::new(),
    };

    let total_consumed = headers_end + 4 + content_length;
    Ok((request, total_consumed))
}

/// Splits `METHOD SP PATH SP VERSION` on single spaces.
fn parse_request_line(line: &str) -> Result<(Method, &str, &str), ParseError> {
    let mut parts = line.split(' ');

    let method_str = parts.next().filter(|s| !s.is_empty()).ok_or(ParseError::InvalidRequest)?;
    let path = parts.next().filter(|s| !s.is_empty()).ok_or(ParseError::InvalidRequest)?;
    let version = parts.next().filter(|s| !s.is_empty()).ok_or(ParseError::InvalidRequest)?;

    if parts.next().is_some() || !path.starts_with('/') || !version.starts_with("HTTP/") {
        return Err(ParseError::InvalidRequest);
    }

    let method = Method::from_str(method_str).ok_or(ParseError::InvalidMethod)?;
    Ok((method, path, version))
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4)
        .position(|w| w == b"\r\n\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";

        let (parsed, consumed) = parse_http_request(req).unwrap();

        assert_eq!(parsed.path, "/");
        assert_eq!(parsed.headers.get("Host").unwrap(), "example.com");
        assert_eq!(consumed, req.len());
    }

    #[test]
    fn head_limit_applies_before_terminator() {
        let req = b"GET /aaaaaaaaaaaaaaaaaaaaaaaa HTTP/1.1\r\n";
        assert_eq!(
            parse_http_request_limited(req, 16, usize::MAX).unwrap_err(),
            ParseError::HeadersTooLarge(16)
        );
    }

    #[test]
    fn content_length_name_is_case_insensitive() {
        let req = b"POST /files/a HTTP/1.1\r\ncontent-length: 5\r\n\r\nhello";

        let (parsed, consumed) = parse_http_request(req).unwrap();

        assert_eq!(parsed.body, b"hello");
        assert_eq!(consumed, req.len());
    }

    #[test]
    fn declared_body_over_limit_is_rejected_early() {
        let req = b"POST /files/a HTTP/1.1\r\nContent-Length: 99999999999\r\n\r\n";
        assert_eq!(
            parse_http_request_limited(req, usize::MAX, 1024).unwrap_err(),
            ParseError::BodyTooLarge(1024)
        );
    }
}
