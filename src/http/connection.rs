use std::sync::Arc;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn};

use crate::http::encoding::Encodings;
use crate::http::parser::{DEFAULT_MAX_BODY_BYTES, ParseError, parse_http_request_limited};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::{ResponseWriter, write_response};
use crate::routing::Router;

/// Read-only state every connection needs. Cloning only bumps refcounts.
#[derive(Clone)]
pub struct ConnectionContext {
    pub router: Arc<Router>,
    pub encodings: Arc<Encodings>,
    pub max_header_bytes: usize,
    pub max_body_bytes: usize,
}

impl ConnectionContext {
    pub fn new(router: Router, encodings: Encodings, max_header_bytes: usize) -> Self {
        Self {
            router: Arc::new(router),
            encodings: Arc::new(encodings),
            max_header_bytes,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Largest `Content-Length` accepted before answering 400.
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

/// One request/response exchange over `S`.
///
/// The connection is always closed after the response; there is no
/// keep-alive.
pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    state: ConnectionState,
    ctx: ConnectionContext,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(Response),
    Closed,
}

/// Result of reading from the peer.
enum Incoming {
    Request(Request),
    Malformed(ParseError),
    /// Peer went away before sending anything.
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, ctx: ConnectionContext) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(4096),
            state: ConnectionState::Reading,
            ctx,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        Incoming::Request(req) => ConnectionState::Processing(req),
                        Incoming::Malformed(e) => {
                            warn!(error = %e, "rejecting malformed request");
                            ConnectionState::Writing(Response::bad_request())
                        }
                        Incoming::Closed => ConnectionState::Closed,
                    };
                }

                ConnectionState::Processing(req) => {
                    let method = req.method;
                    let path = req.path.clone();
                    let response = Self::handle_request(&self.ctx, req).await;

                    info!(
                        %method,
                        %path,
                        status = response.status.as_u16(),
                        "served request"
                    );
                    self.state = ConnectionState::Writing(response);
                }

                ConnectionState::Writing(response) => {
                    write_response(&response, &mut self.stream).await?;
                }

                ConnectionState::Closed => {
                    if let Err(e) = self.stream.shutdown().await {
                        debug!(error = %e, "shutdown after response failed");
                    }
                    break;
                }
            }
        }

        Ok(())
    }

    /// Reads until one full request (head plus `Content-Length` body bytes)
    /// is buffered.
    async fn read_request(&mut self) -> anyhow::Result<Incoming> {
        loop {
            // Try parsing whatever we already have
            match parse_http_request_limited(
                &self.buffer,
                self.ctx.max_header_bytes,
                self.ctx.max_body_bytes,
            ) {
                Ok((request, consumed)) => {
                    self.buffer.advance(consumed);
                    return Ok(Incoming::Request(request));
                }

                Err(ParseError::Incomplete) => {
                    // Need more data → fall through to read
                }

                Err(e) => return Ok(Incoming::Malformed(e)),
            }

            let n = self.stream.read_buf(&mut self.buffer).await?;

            if n == 0 {
                if self.buffer.is_empty() {
                    return Ok(Incoming::Closed);
                }
                // peer half-closed in the middle of a request
                return Ok(Incoming::Malformed(ParseError::Incomplete));
            }
        }
    }

    /// Routes `req` and runs its handler. Never fails: misses become 404 and
    /// handler errors become 500.
    async fn handle_request(ctx: &ConnectionContext, mut req: Request) -> Response {
        let encoding = req
            .header("Accept-Encoding")
            .and_then(|accept| ctx.encodings.negotiate(accept));

        let Some(matched) = ctx.router.find(req.method, &req.path) else {
            return Response::not_found();
        };

        req.path_variables = matched.path_variables;
        let writer = ResponseWriter::negotiated(encoding);

        match matched.handler.call(req, writer).await {
            Ok(writer) => writer.into_response(),
            Err(e) => {
                error!(error = %e, "handler failed");
                Response::internal_error()
            }
        }
    }
}
