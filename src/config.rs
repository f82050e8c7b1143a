use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use serde::Deserialize;
use tokio::sync::Semaphore;

use crate::http::parser::DEFAULT_MAX_BODY_BYTES;

/// Names the YAML file read by [`Config::load`].
pub const CONFIG_PATH_VAR: &str = "BURROW_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the acceptor binds to (`LISTEN`)
    pub listen_addr: String,
    /// Directory served under `/files/{file}`; file routes are off when unset (`DIRECTORY`)
    pub directory: Option<PathBuf>,
    /// Upper bound on connections served at once (`MAX_CONNECTIONS`)
    pub max_connections: usize,
    /// Largest request head accepted before answering 400 (`MAX_HEADER_BYTES`)
    pub max_header_bytes: usize,
    /// Largest declared request body accepted before answering 400 (`MAX_BODY_BYTES`)
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:4221".to_string(),
            directory: None,
            max_connections: 1024,
            max_header_bytes: 64 * 1024,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl Config {
    /// Defaults, then the YAML file named by `BURROW_CONFIG` if set, then
    /// individual environment variables.
    pub fn load() -> anyhow::Result<Self> {
        let base = match std::env::var_os(CONFIG_PATH_VAR) {
            Some(path) => Self::from_yaml_file(Path::new(&path))?,
            None => Self::default(),
        };

        base.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_yaml_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_yaml_str(text: &str) -> anyhow::Result<Self> {
        let cfg: Self = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Applies `LISTEN`, `DIRECTORY`, `MAX_CONNECTIONS`, `MAX_HEADER_BYTES` and
    /// `MAX_BODY_BYTES` as returned by `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("LISTEN") {
            self.listen_addr = addr;
        }
        if let Some(dir) = lookup("DIRECTORY") {
            self.directory = Some(PathBuf::from(dir));
        }
        if let Some(n) = lookup("MAX_CONNECTIONS") {
            self.max_connections = n
                .parse()
                .with_context(|| format!("MAX_CONNECTIONS={n} is not a number"))?;
        }
        if let Some(n) = lookup("MAX_HEADER_BYTES") {
            self.max_header_bytes = n
                .parse()
                .with_context(|| format!("MAX_HEADER_BYTES={n} is not a number"))?;
        }
        if let Some(n) = lookup("MAX_BODY_BYTES") {
            self.max_body_bytes = n
                .parse()
                .with_context(|| format!("MAX_BODY_BYTES={n} is not a number"))?;
        }

        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.max_connections == 0 {
            bail!("max_connections must be at least 1");
        }
        if self.max_connections > Semaphore::MAX_PERMITS {
            bail!(
                "max_connections must be at most {}",
                Semaphore::MAX_PERMITS
            );
        }
        if self.max_header_bytes == 0 {
            bail!("max_header_bytes must be at least 1");
        }
        Ok(())
    }
}
