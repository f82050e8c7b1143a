use std::collections::HashMap;
use std::io;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::encoding::ContentEncoding;
use crate::http::headers::write_header_block;
use crate::http::response::{Response, StatusCode};

const HTTP_VERSION: &str = "HTTP/1.1";

/// Renders the status line, headers, blank line and body into one buffer.
pub fn serialize_response(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::with_capacity(128 + resp.body.len());

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    write_header_block(&resp.headers, &mut buf);

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf.extend_from_slice(&resp.body);

    buf
}

/// Serializes `resp` and sends it with a single `write_all`.
pub async fn write_response<W>(resp: &Response, stream: &mut W) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    stream.write_all(&serialize_response(resp)).await?;
    stream.flush().await
}

/// What a handler fills in.
///
/// A plain writer stores bodies as given. One created with
/// [`ResponseWriter::encoded`] runs every body through the negotiated encoder
/// first, so `Content-Length` always describes the bytes on the wire.
#[derive(Debug)]
pub struct ResponseWriter {
    status: StatusCode,
    headers: HashMap<String, String>,
    body: Vec<u8>,
    encoding: Option<ContentEncoding>,
}

impl Default for ResponseWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseWriter {
    pub fn new() -> Self {
        Self {
            status: StatusCode::Ok,
            headers: HashMap::new(),
            body: Vec::new(),
            encoding: None,
        }
    }

    /// Writer that compresses bodies with `encoding`.
    pub fn encoded(encoding: ContentEncoding) -> Self {
        Self {
            encoding: Some(encoding),
            ..Self::new()
        }
    }

    /// Plain or encoded writer depending on the negotiation result.
    pub fn negotiated(encoding: Option<ContentEncoding>) -> Self {
        encoding.map_or_else(Self::new, Self::encoded)
    }

    pub fn encoding(&self) -> Option<ContentEncoding> {
        self.encoding
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Adds or replaces a header.
    pub fn set_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(key.into(), value.into());
    }

    /// Stores `body` and sets `Content-Length`; returns the number of input
    /// bytes consumed.
    pub fn write_body(&mut self, body: &[u8]) -> io::Result<usize> {
        self.body = match self.encoding {
            Some(encoding) => {
                let compressed = encoding.encode(body)?;
                self.set_header("Content-Encoding", encoding.name());
                compressed
            }
            None => body.to_vec(),
        };
        self.set_header("Content-Length", self.body.len().to_string());
        Ok(body.len())
    }

    /// [`write_body`](Self::write_body), defaulting `Content-Type` to `text/plain`.
    pub fn write_text_body(&mut self, body: &[u8]) -> io::Result<usize> {
        self.default_content_type("text/plain");
        self.write_body(body)
    }

    /// [`write_body`](Self::write_body), defaulting `Content-Type` to
    /// `application/octet-stream`.
    pub fn write_binary_body(&mut self, body: &[u8]) -> io::Result<usize> {
        self.default_content_type("application/octet-stream");
        self.write_body(body)
    }

    fn default_content_type(&mut self, value: &str) {
        self.headers
            .entry("Content-Type".to_string())
            .or_insert_with(|| value.to_string());
    }

    /// Finishes the response. A writer that never received a body still
    /// advertises `Content-Length: 0`.
    pub fn into_response(mut self) -> Response {
        self.headers
            .entry("Content-Length".to_string())
            .or_insert_with(|| self.body.len().to_string());

        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}
