//! Path routing.
//!
//! Routes are registered on a [`RouterBuilder`], which is consumed by
//! [`RouterBuilder::build`] into an immutable [`Router`] before the server
//! starts. Every inconsistency is reported as a [`RouteError`] at
//! registration, so a lookup can only hit or miss.
//!
//! ```
//! use burrow::http::request::{Method, Request};
//! use burrow::http::writer::ResponseWriter;
//! use burrow::routing::RouterBuilder;
//!
//! async fn show(_req: Request, res: ResponseWriter) -> anyhow::Result<ResponseWriter> {
//!     Ok(res)
//! }
//!
//! let mut builder = RouterBuilder::new();
//! builder.register("GET /files/{file}", show).unwrap();
//! let router = builder.build();
//!
//! let hit = router.find(Method::GET, "/files/a.txt").unwrap();
//! assert_eq!(hit.path_variables["file"], "a.txt");
//! assert!(router.find(Method::POST, "/files/a.txt").is_none());
//! ```

pub mod handler;
pub mod pattern;
pub mod router;

use thiserror::Error;

use crate::http::request::Method;

pub use handler::{BoxedHandler, Handler, HandlerFuture};
pub use router::{Match, Router, RouterBuilder};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern {
        pattern: String,
        reason: &'static str,
    },
    #[error("unknown method `{method}` in route pattern `{pattern}`")]
    InvalidMethod { pattern: String, method: String },
    #[error("route `{pattern}` names parameter `{{{requested}}}` where `{{{existing}}}` is already registered")]
    ParamConflict {
        pattern: String,
        existing: String,
        requested: String,
    },
    #[error("route `{pattern}` already has a {} handler", .method.map_or("catch-all", |m| m.as_str()))]
    Duplicate {
        pattern: String,
        method: Option<Method>,
    },
}
