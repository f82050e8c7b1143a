//! Header block encoding shared by the parser and the response serializer.

use std::collections::HashMap;

use crate::http::parser::ParseError;

/// Splits a header block into a name/value map.
///
/// Lines are separated by CRLF. Each line is split at its first `:` and both
/// halves are trimmed. Empty lines are skipped; a repeated name keeps the last
/// value.
pub fn parse_header_block(block: &str) -> Result<HashMap<String, String>, ParseError> {
    let mut headers = HashMap::new();

    for line in block.split("\r\n") {
        if line.is_empty() {
            continue;
        }

        let (key, value) = line
            .split_once(':')
            .ok_or(ParseError::InvalidHeader)?;

        headers.insert(
            key.trim().to_string(),
            value.trim().to_string(),
        );
    }

    Ok(headers)
}

/// Appends `Name: Value\r\n` for every header to `buf`.
pub fn write_header_block(headers: &HashMap<String, String>, buf: &mut Vec<u8>) {
    for (k, v) in headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_keeps_inner_colons() {
        let headers = parse_header_block("Host: localhost:4221\r\n").unwrap();
        assert_eq!(headers["Host"], "localhost:4221");
    }

    #[test]
    fn last_duplicate_wins() {
        let headers = parse_header_block("X-A: 1\r\nX-A: 2\r\n").unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers["X-A"], "2");
    }
}
