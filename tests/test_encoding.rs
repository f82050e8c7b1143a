use std::io::Read;

use burrow::http::encoding::{ContentEncoding, Encodings};
use flate2::read::GzDecoder;

fn gunzip(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    GzDecoder::new(data).read_to_end(&mut out).unwrap();
    out
}

#[test]
fn test_negotiate_picks_first_supported_in_client_order() {
    let encodings = Encodings::default();

    assert_eq!(encodings.negotiate("gzip"), Some(ContentEncoding::Gzip));
    assert_eq!(encodings.negotiate("identity, gzip"), Some(ContentEncoding::Gzip));
    assert_eq!(encodings.negotiate("br,  gzip ,deflate"), Some(ContentEncoding::Gzip));
}

#[test]
fn test_negotiate_nonzero_quality_keeps_token() {
    let encodings = Encodings::default();

    assert_eq!(encodings.negotiate("gzip;q=0.8"), Some(ContentEncoding::Gzip));
}

#[test]
fn test_negotiate_skips_zero_quality() {
    let encodings = Encodings::default();

    assert_eq!(encodings.negotiate("gzip;q=0"), None);
    assert_eq!(encodings.negotiate("gzip; q=0.000, identity"), None);
    assert_eq!(encodings.negotiate("gzip;q=0, gzip;q=1"), Some(ContentEncoding::Gzip));
}

#[test]
fn test_negotiate_tokens_are_case_insensitive() {
    let encodings = Encodings::default();

    assert_eq!(encodings.negotiate("GZIP"), Some(ContentEncoding::Gzip));
    assert_eq!(encodings.negotiate("identity, Gzip;q=0.5"), Some(ContentEncoding::Gzip));
}

#[test]
fn test_negotiate_unsupported_falls_back() {
    let encodings = Encodings::default();

    assert_eq!(encodings.negotiate("invalid-encoding"), None);
    assert_eq!(encodings.negotiate(""), None);
    assert_eq!(encodings.negotiate("br, deflate"), None);
}

#[test]
fn test_empty_registry_never_compresses() {
    assert_eq!(Encodings::none().negotiate("gzip"), None);
}

#[test]
fn test_gzip_encode_decodes_back() {
    let body = b"hello hello hello hello hello".repeat(20);
    let compressed = ContentEncoding::Gzip.encode(&body).unwrap();

    assert!(compressed.len() < body.len());
    assert_eq!(gunzip(&compressed), body);
}

#[test]
fn test_gzip_name() {
    assert_eq!(ContentEncoding::Gzip.name(), "gzip");
}
