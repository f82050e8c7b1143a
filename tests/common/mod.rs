//! Helpers shared by the connection-level tests.

#![allow(dead_code)]

use std::collections::HashMap;

use burrow::http::connection::{Connection, ConnectionContext};
use burrow::http::encoding::Encodings;
use burrow::http::headers::parse_header_block;
use burrow::routing::Router;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// A response as seen by the client.
#[derive(Debug)]
pub struct RawResponse {
    pub status_line: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn parse(bytes: &[u8]) -> Self {
        let split = bytes
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("response has no blank line");
        let head = std::str::from_utf8(&bytes[..split]).unwrap();
        let (status_line, block) = head.split_once("\r\n").unwrap_or((head, ""));

        Self {
            status_line: status_line.to_string(),
            headers: parse_header_block(block).unwrap(),
            body: bytes[split + 4..].to_vec(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status_line
            .split(' ')
            .nth(1)
            .and_then(|code| code.parse().ok())
            .expect("status line without a code")
    }
}

pub fn context(router: Router) -> ConnectionContext {
    ConnectionContext::new(router, Encodings::default(), 8 * 1024)
}

/// Runs one connection over an in-memory pipe. Every chunk is written
/// separately; when `close_write` is set the client half-closes afterwards.
pub async fn exchange_chunks(
    ctx: ConnectionContext,
    chunks: &[&[u8]],
    close_write: bool,
) -> Vec<u8> {
    let (mut client, server) = tokio::io::duplex(64 * 1024);

    let task = tokio::spawn(async move {
        let mut conn = Connection::new(server, ctx);
        conn.run().await
    });

    for chunk in chunks {
        client.write_all(chunk).await.unwrap();
        tokio::task::yield_now().await;
    }
    if close_write {
        client.shutdown().await.unwrap();
    }

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    task.await.unwrap().unwrap();
    out
}

pub async fn exchange(ctx: ConnectionContext, raw: &[u8]) -> RawResponse {
    RawResponse::parse(&exchange_chunks(ctx, &[raw], false).await)
}
