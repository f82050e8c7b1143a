//! The route table served by the `burrow` binary.

pub mod files;

use std::sync::Arc;

use crate::config::Config;
use crate::http::request::Request;
use crate::http::writer::ResponseWriter;
use crate::routing::{RouteError, Router, RouterBuilder};

/// Registers the built-in routes. `/files/{file}` is only served when a
/// directory is configured.
pub fn build_router(cfg: &Config) -> Result<Router, RouteError> {
    let mut builder = RouterBuilder::new();

    builder
        .register("/", index)?
        .register("/echo/{str}", echo)?
        .register("/user-agent", user_agent)?;

    if let Some(dir) = &cfg.directory {
        let dir = Arc::new(dir.clone());
        let read_dir = Arc::clone(&dir);

        builder
            .register("GET /files/{file}", move |req, res| {
                files::download(Arc::clone(&read_dir), req, res)
            })?
            .register("POST /files/{file}", move |req, res| {
                files::upload(Arc::clone(&dir), req, res)
            })?;
    }

    Ok(builder.build())
}

async fn index(_req: Request, res: ResponseWriter) -> anyhow::Result<ResponseWriter> {
    Ok(res)
}

async fn echo(req: Request, mut res: ResponseWriter) -> anyhow::Result<ResponseWriter> {
    let text = req.path_variable("str").unwrap_or_default();
    res.write_text_body(text.as_bytes())?;
    Ok(res)
}

async fn user_agent(req: Request, mut res: ResponseWriter) -> anyhow::Result<ResponseWriter> {
    let agent = req.header("User-Agent").unwrap_or_default();
    res.write_text_body(agent.as_bytes())?;
    Ok(res)
}
