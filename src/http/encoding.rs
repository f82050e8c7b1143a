//! Response compression and `Accept-Encoding` negotiation.

use std::io::{self, Write};

use flate2::Compression;
use flate2::write::GzEncoder;

/// A content-coding the server knows how to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Gzip,
}

impl ContentEncoding {
    /// Token used in `Accept-Encoding` and `Content-Encoding`.
    pub fn name(&self) -> &'static str {
        match self {
            ContentEncoding::Gzip => "gzip",
        }
    }

    /// Compresses `data` in one shot and returns the finished stream.
    pub fn encode(&self, data: &[u8]) -> io::Result<Vec<u8>> {
        match self {
            ContentEncoding::Gzip => {
                let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2 + 32), Compression::default());
                encoder.write_all(data)?;
                encoder.finish()
            }
        }
    }
}

/// The set of schemes offered to clients.
///
/// Built once at start-up and shared read-only between connections.
#[derive(Debug, Clone)]
pub struct Encodings {
    supported: Vec<ContentEncoding>,
}

impl Default for Encodings {
    fn default() -> Self {
        Self::new(vec![ContentEncoding::Gzip])
    }
}

impl Encodings {
    pub fn new(supported: Vec<ContentEncoding>) -> Self {
        Self { supported }
    }

    /// An empty registry; every negotiation falls back to identity.
    pub fn none() -> Self {
        Self::new(Vec::new())
    }

    /// Picks the first scheme, in the client's order, that is also supported.
    ///
    /// Tokens compare case-insensitively. A token carrying `q=0` is refused
    /// by the client and skipped; other weights do not change the order.
    /// `None` means the response is sent uncompressed.
    ///
    /// ```
    /// # use burrow::http::encoding::{ContentEncoding, Encodings};
    /// let encodings = Encodings::default();
    /// assert_eq!(encodings.negotiate("identity, gzip"), Some(ContentEncoding::Gzip));
    /// assert_eq!(encodings.negotiate("gzip;q=0"), None);
    /// assert_eq!(encodings.negotiate("br"), None);
    /// ```
    pub fn negotiate(&self, accept_encoding: &str) -> Option<ContentEncoding> {
        accept_encoding
            .split(',')
            .filter_map(|entry| {
                let mut parts = entry.split(';');
                let token = parts.next().unwrap_or_default().trim();
                let refused = parts.any(is_zero_weight);
                (!token.is_empty() && !refused).then_some(token)
            })
            .find_map(|token| {
                self.supported
                    .iter()
                    .copied()
                    .find(|enc| enc.name().eq_ignore_ascii_case(token))
            })
    }
}

/// True when `param` is a zero weight such as `q=0.0`.
fn is_zero_weight(param: &str) -> bool {
    let Some((key, value)) = param.split_once('=') else {
        return false;
    };
    key.trim().eq_ignore_ascii_case("q")
        && value
            .trim()
            .parse::<f32>()
            .is_ok_and(|weight| weight == 0.0)
}
