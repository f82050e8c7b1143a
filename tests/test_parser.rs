use burrow::http::headers::{parse_header_block, write_header_block};
use burrow::http::parser::{ParseError, parse_http_request, parse_http_request_limited};
use burrow::http::request::Method;
use burrow::http::response::{ResponseBuilder, StatusCode};
use burrow::http::writer::serialize_response;

#[test]
fn test_parse_simple_get_request() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let (parsed, consumed) = parse_http_request(req).unwrap();

    assert_eq!(parsed.method, Method::GET);
    assert_eq!(parsed.path, "/");
    assert_eq!(parsed.version, "HTTP/1.1");
    assert_eq!(parsed.headers.get("Host").unwrap(), "example.com");
    assert!(parsed.path_variables.is_empty());
    assert_eq!(consumed, req.len());
}

#[test]
fn test_parse_post_request_with_body() {
    let req = b"POST /files/a.txt HTTP/1.1\r\nHost: localhost\r\nContent-Length: 5\r\n\r\nhello";
    let (parsed, consumed) = parse_http_request(req).unwrap();

    assert_eq!(parsed.method, Method::POST);
    assert_eq!(parsed.path, "/files/a.txt");
    assert_eq!(parsed.body, b"hello".to_vec());
    assert_eq!(consumed, req.len());
}

#[test]
fn test_parse_without_content_length_has_empty_body() {
    let req = b"GET / HTTP/1.1\r\n\r\ntrailing";
    let (parsed, consumed) = parse_http_request(req).unwrap();

    assert!(parsed.body.is_empty());
    assert_eq!(consumed, req.len() - b"trailing".len());
}

#[test]
fn test_parse_request_line_without_headers() {
    let req = b"GET /echo/abc HTTP/1.1\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.path, "/echo/abc");
    assert!(parsed.headers.is_empty());
}

#[test]
fn test_parse_multiple_headers() {
    let req = b"GET /path HTTP/1.1\r\nHost: example.com\r\nUser-Agent: test-client\r\nAccept: */*\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.headers.get("Host").unwrap(), "example.com");
    assert_eq!(parsed.headers.get("User-Agent").unwrap(), "test-client");
    assert_eq!(parsed.headers.get("Accept").unwrap(), "*/*");
}

#[test]
fn test_parse_keeps_query_string_in_path() {
    let req = b"GET /search?q=rust HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.path, "/search?q=rust");
}

#[test]
fn test_parse_incomplete_request_missing_blank_line() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n";
    let result = parse_http_request(req);

    assert!(matches!(result, Err(ParseError::Incomplete)));
}

#[test]
fn test_parse_incomplete_request_partial_body() {
    let req = b"POST /api HTTP/1.1\r\nContent-Length: 10\r\n\r\nhello";
    let result = parse_http_request(req);

    assert!(matches!(result, Err(ParseError::Incomplete)));
}

#[test]
fn test_parse_missing_request_line_tokens() {
    for req in [
        &b"GET /\r\n\r\n"[..],
        b"GET\r\n\r\n",
        b"\r\n\r\n",
        b"GET  HTTP/1.1\r\n\r\n",
    ] {
        assert!(
            matches!(parse_http_request(req), Err(ParseError::InvalidRequest)),
            "{:?}",
            String::from_utf8_lossy(req)
        );
    }
}

#[test]
fn test_parse_rejects_target_without_leading_slash() {
    let req = b"GET index.html HTTP/1.1\r\n\r\n";
    assert!(matches!(parse_http_request(req), Err(ParseError::InvalidRequest)));
}

#[test]
fn test_parse_invalid_http_method() {
    let req = b"INVALID / HTTP/1.1\r\n\r\n";
    let result = parse_http_request(req);

    assert!(matches!(result, Err(ParseError::InvalidMethod)));
}

#[test]
fn test_parse_malformed_header() {
    let req = b"GET / HTTP/1.1\r\nBrokenHeader\r\n\r\n";
    let result = parse_http_request(req);

    assert!(matches!(result, Err(ParseError::InvalidHeader)));
}

#[test]
fn test_parse_invalid_content_length() {
    let req = b"POST / HTTP/1.1\r\nContent-Length: lots\r\n\r\n";
    let result = parse_http_request(req);

    assert!(matches!(result, Err(ParseError::InvalidContentLength)));
}

#[test]
fn test_parse_head_over_limit() {
    let req = b"GET / HTTP/1.1\r\nX-Padding: aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\r\n\r\n";
    let result = parse_http_request_limited(req, 24, usize::MAX);

    assert!(matches!(result, Err(ParseError::HeadersTooLarge(24))));
}

#[test]
fn test_parse_lowercase_content_length() {
    let req = b"POST /files/a HTTP/1.1\r\ncontent-length: 5\r\n\r\nhello";
    let (parsed, consumed) = parse_http_request(req).unwrap();

    assert_eq!(parsed.body, b"hello");
    assert_eq!(consumed, req.len());
}

#[test]
fn test_parse_mixed_case_content_length_waits_for_body() {
    let req = b"POST /files/a HTTP/1.1\r\nCONTENT-LENGTH: 5\r\n\r\nhel";
    let result = parse_http_request(req);

    assert!(matches!(result, Err(ParseError::Incomplete)));
}

#[test]
fn test_parse_body_over_limit() {
    let req = b"POST /files/a HTTP/1.1\r\nContent-Length: 99999999999\r\n\r\n";
    let result = parse_http_request_limited(req, usize::MAX, 1024);

    assert!(matches!(result, Err(ParseError::BodyTooLarge(1024))));
}

#[test]
fn test_parse_body_at_limit() {
    let req = b"POST /files/a HTTP/1.1\r\nContent-Length: 4\r\n\r\nabcd";
    let (parsed, _) = parse_http_request_limited(req, usize::MAX, 4).unwrap();

    assert_eq!(parsed.body, b"abcd");
}

#[test]
fn test_parse_various_http_methods() {
    let methods = vec![
        ("GET", Method::GET),
        ("POST", Method::POST),
        ("PUT", Method::PUT),
        ("DELETE", Method::DELETE),
        ("HEAD", Method::HEAD),
        ("OPTIONS", Method::OPTIONS),
        ("PATCH", Method::PATCH),
    ];

    for (method_str, expected_method) in methods {
        let req = format!("{} / HTTP/1.1\r\n\r\n", method_str);
        let (parsed, _) = parse_http_request(req.as_bytes()).unwrap();
        assert_eq!(parsed.method, expected_method);
    }
}

#[test]
fn test_parse_request_with_binary_body() {
    let req = b"POST /upload HTTP/1.1\r\nContent-Length: 4\r\n\r\n\x00\x01\x02\x03";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.body, vec![0, 1, 2, 3]);
}

#[test]
fn test_parse_header_value_trimmed() {
    let req = b"GET / HTTP/1.1\r\nAccept-Encoding:   gzip  \r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.headers.get("Accept-Encoding").unwrap(), "gzip");
}

#[test]
fn test_serialized_response_headers_reparse_identically() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/plain")
        .header("Content-Encoding", "gzip")
        .header("X-Port", "localhost:4221")
        .body(b"abc".to_vec())
        .build();

    let bytes = serialize_response(&response);
    let text = std::str::from_utf8(&bytes).unwrap();
    let head = &text[..text.find("\r\n\r\n").unwrap()];
    let (_status_line, block) = head.split_once("\r\n").unwrap();

    assert_eq!(parse_header_block(block).unwrap(), response.headers);
}

#[test]
fn test_header_block_round_trip() {
    let original = parse_header_block("A: 1\r\nB: two words\r\nC: x:y").unwrap();

    let mut buf = Vec::new();
    write_header_block(&original, &mut buf);

    let again = parse_header_block(std::str::from_utf8(&buf).unwrap()).unwrap();
    assert_eq!(again, original);
}
