//! HTTP protocol implementation.
//!
//! This module implements a small HTTP/1.1 server that answers exactly one
//! request per connection.
//!
//! # Architecture
//!
//! The HTTP layer is organized into several submodules:
//!
//! - **`connection`**: Per-connection state machine: read, route, write, close
//! - **`parser`**: Parses incoming HTTP requests from byte buffers
//! - **`headers`**: Header block parsing and serialization shared by both directions
//! - **`request`**: HTTP request representation and parsing utilities
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: The handler-facing response writer and response serialization
//! - **`encoding`**: `Accept-Encoding` negotiation and body compression
//!
//! # Connection State Machine
//!
//! Each client connection goes through a state machine:
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Buffer until head + Content-Length body are in
//!        └──────┬──────┘
//!               │ Request received (malformed → 400 straight to Writing)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Route, run handler (miss → 404)
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ▼
//!        ┌──────────────────┐
//!        │     Closed       │ ← Shut down the write side
//!        └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use burrow::http::connection::{Connection, ConnectionContext};
//! use burrow::http::encoding::Encodings;
//! use burrow::routing::RouterBuilder;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let ctx = ConnectionContext::new(RouterBuilder::new().build(), Encodings::default(), 8192);
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let ctx = ctx.clone();
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, ctx);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod request;
pub mod response;
pub mod headers;
pub mod parser;
pub mod connection;
pub mod writer;
pub mod encoding;
