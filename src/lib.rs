//! Burrow - a small HTTP/1.1 server over raw TCP
//!
//! Request parsing, trie routing with path parameters, response writing with
//! gzip negotiation, and the per-connection life-cycle that ties them together.

pub mod app;
pub mod config;
pub mod http;
pub mod routing;
pub mod server;
