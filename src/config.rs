//! Server configuration.
//!
//! Loaded from the command line, either positionally:
//!
//! ```text
//! warden <root-dir> <redirects-file> [port]
//! ```
//!
//! or from a YAML file with `warden --config <file>`:
//!
//! ```yaml
//! listen_addr: "0.0.0.0:8080"
//! root_dir: /srv/files
//! redirects_file: /etc/warden/redirects
//! buffer_capacity: 4096
//! read_timeout_secs: 30
//! write_timeout_secs: 30
//! log_level: info
//! ```
//!
//! The `LISTEN` environment variable, when set, overrides the listen address.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use serde::Deserialize;

use crate::http::stream::DEFAULT_CAPACITY;

const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    pub root_dir: PathBuf,
    pub redirects_file: PathBuf,
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,
    #[serde(default)]
    pub read_timeout_secs: Option<u64>,
    #[serde(default)]
    pub write_timeout_secs: Option<u64>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listen_addr() -> String {
    format!("0.0.0.0:{}", DEFAULT_PORT)
}

fn default_buffer_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Reads the process arguments and environment, then validates.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = Self::from_args(std::env::args().skip(1))?;
        cfg.apply_env();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parses arguments (without the program name). Does not validate.
    pub fn from_args<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let args: Vec<String> = args.into_iter().collect();

        match args.as_slice() {
            [flag, file] if flag == "--config" => Self::from_file(Path::new(file)),
            [root, redirects] => Ok(Self::new(root, redirects, DEFAULT_PORT)),
            [root, redirects, port] => Ok(Self::new(root, redirects, parse_port(port)?)),
            _ => bail!("usage: warden <root-dir> <redirects-file> [port] | warden --config <file>"),
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(text).context("invalid config file")
    }

    fn new(root: &str, redirects: &str, port: u16) -> Self {
        Self {
            listen_addr: format!("0.0.0.0:{}", port),
            root_dir: PathBuf::from(root),
            redirects_file: PathBuf::from(redirects),
            buffer_capacity: DEFAULT_CAPACITY,
            read_timeout_secs: None,
            write_timeout_secs: None,
            log_level: default_log_level(),
        }
    }

    pub fn apply_env(&mut self) {
        if let Ok(addr) = std::env::var("LISTEN") {
            self.listen_addr = addr;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.root_dir.is_dir() {
            bail!("root directory {} does not exist", self.root_dir.display());
        }
        if !self.redirects_file.exists() || self.redirects_file.is_dir() {
            bail!("redirects file {} does not exist", self.redirects_file.display());
        }
        if self.buffer_capacity == 0 {
            bail!("buffer_capacity must be positive");
        }
        self.log_level()?;
        Ok(())
    }

    pub fn log_level(&self) -> anyhow::Result<tracing::Level> {
        self.log_level
            .parse()
            .map_err(|_| anyhow::anyhow!("unknown log level {:?}", self.log_level))
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_secs.map(Duration::from_secs)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        self.write_timeout_secs.map(Duration::from_secs)
    }
}

/// Digits only, at most 65535.
fn parse_port(s: &str) -> anyhow::Result<u16> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        bail!("port must be a number: {:?}", s);
    }
    s.parse().with_context(|| format!("port number too large: {}", s))
}
