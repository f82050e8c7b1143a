//! Serving and storing files under one base directory.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use thiserror::Error;
use tracing::warn;

use crate::http::request::Request;
use crate::http::response::StatusCode;
use crate::http::writer::ResponseWriter;

/// Name of the path parameter carrying the file name.
pub const FILE_PARAM: &str = "file";

#[derive(Debug, Error)]
pub enum FileError {
    #[error("file name `{0}` is not a plain name inside the served directory")]
    Forbidden(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Joins `name` onto `base`, accepting only a relative path made of plain
/// components.
///
/// ```
/// # use std::path::Path;
/// # use burrow::app::files::safe_join;
/// assert!(safe_join(Path::new("/srv"), "a.txt").is_ok());
/// assert!(safe_join(Path::new("/srv"), "..").is_err());
/// assert!(safe_join(Path::new("/srv"), "").is_err());
/// ```
pub fn safe_join(base: &Path, name: &str) -> Result<PathBuf, FileError> {
    let relative = Path::new(name);
    let plain = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)));

    if name.is_empty() || !plain {
        return Err(FileError::Forbidden(name.to_string()));
    }
    Ok(base.join(relative))
}

/// Contents of `base/name`, or `None` when no such file exists.
pub async fn read_file(base: &Path, name: &str) -> Result<Option<Vec<u8>>, FileError> {
    let path = safe_join(base, name)?;
    match tokio::fs::read(&path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Creates or replaces `base/name` with `content`.
pub async fn write_file(base: &Path, name: &str, content: &[u8]) -> Result<(), FileError> {
    let path = safe_join(base, name)?;
    tokio::fs::write(&path, content).await?;
    Ok(())
}

/// `GET /files/{file}`: 200 with the raw bytes, 404 when missing.
pub async fn download(
    dir: Arc<PathBuf>,
    req: Request,
    mut res: ResponseWriter,
) -> anyhow::Result<ResponseWriter> {
    let name = req.path_variable(FILE_PARAM).unwrap_or_default();

    match read_file(&dir, name).await {
        Ok(Some(content)) => {
            res.set_status(StatusCode::Ok);
            res.write_binary_body(&content)?;
        }
        Ok(None) => res.set_status(StatusCode::NotFound),
        Err(FileError::Forbidden(name)) => {
            warn!(%name, "refusing to read outside the served directory");
            res.set_status(StatusCode::Forbidden);
        }
        Err(FileError::Io(e)) => {
            return Err(e).with_context(|| format!("reading {name} from {}", dir.display()));
        }
    }

    Ok(res)
}

/// `POST /files/{file}`: stores the request body, answers 201.
pub async fn upload(
    dir: Arc<PathBuf>,
    req: Request,
    mut res: ResponseWriter,
) -> anyhow::Result<ResponseWriter> {
    let name = req.path_variable(FILE_PARAM).unwrap_or_default();

    match write_file(&dir, name, &req.body).await {
        Ok(()) => res.set_status(StatusCode::Created),
        Err(FileError::Forbidden(name)) => {
            warn!(%name, "refusing to write outside the served directory");
            res.set_status(StatusCode::Forbidden);
        }
        Err(FileError::Io(e)) => {
            return Err(e).with_context(|| format!("writing {name} into {}", dir.display()));
        }
    }

    Ok(res)
}
