//! The handler contract and its type erasure.
//!
//! The trie stores handlers of many concrete types, so each one is boxed as
//! `dyn Handler`. Calling it costs one virtual call and one boxed future.

use std::future::Future;
use std::pin::Pin;

use crate::http::request::Request;
use crate::http::writer::ResponseWriter;

/// Future returned by a handler: the populated writer, or the error that
/// turns into a 500 response.
pub type HandlerFuture = Pin<Box<dyn Future<Output = anyhow::Result<ResponseWriter>> + Send + 'static>>;

/// Implemented for every valid route handler.
///
/// Any `Fn(Request, ResponseWriter) -> impl Future<Output = anyhow::Result<ResponseWriter>>`
/// that is `Send + Sync + 'static` qualifies:
///
/// ```
/// use burrow::http::request::Request;
/// use burrow::http::writer::ResponseWriter;
///
/// async fn hello(_req: Request, mut res: ResponseWriter) -> anyhow::Result<ResponseWriter> {
///     res.write_text_body(b"hello")?;
///     Ok(res)
/// }
/// ```
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: Request, res: ResponseWriter) -> HandlerFuture;
}

impl<F, Fut> Handler for F
where
    F: Fn(Request, ResponseWriter) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<ResponseWriter>> + Send + 'static,
{
    fn call(&self, req: Request, res: ResponseWriter) -> HandlerFuture {
        Box::pin(self(req, res))
    }
}

pub type BoxedHandler = Box<dyn Handler>;
