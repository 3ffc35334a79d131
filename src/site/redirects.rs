//! Table of paths served by other hosts.
//!
//! The file is a stream of whitespace-separated triples:
//!
//! ```text
//! /docs/manual.pdf  mirror.example.org  8080
//! /big.iso          10.0.0.7            80
//! ```
//!
//! Line breaks carry no meaning. Each triple maps the path to the literal
//! location `http://<server>:<port><path>`. The location is sent exactly as
//! built: a default port is kept and dot segments are not resolved.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::Context;
use url::Url;

/// Where a redirected path now lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    location: String,
    url: Url,
}

impl RedirectTarget {
    /// Builds and validates `http://<server>:<port><path>`.
    pub fn new(path: &str, server: &str, port: &str) -> anyhow::Result<Self> {
        let port: u16 = port.parse().context("invalid port")?;
        let location = format!("http://{}:{}{}", server, port, path);
        let url = Url::parse(&location).context("invalid target URL")?;
        Ok(Self { location, url })
    }

    /// Value for the `Location` header.
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[derive(Debug, Default, Clone)]
pub struct RedirectTable {
    targets: HashMap<String, RedirectTarget>,
}

impl RedirectTable {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read redirects file {}", path.display()))?;
        Ok(Self::parse(&text))
    }

    /// Builds the table from file contents.
    ///
    /// The first triple naming a path claims it, even when that triple is
    /// malformed and skipped. An incomplete trailing triple is ignored.
    pub fn parse(text: &str) -> Self {
        let mut targets = HashMap::new();
        let mut claimed = HashSet::new();
        let mut tokens = text.split_whitespace();

        while let (Some(path), Some(server), Some(port)) = (tokens.next(), tokens.next(), tokens.next()) {
            if !claimed.insert(path) {
                tracing::debug!(path, "Ignoring duplicate redirect entry");
                continue;
            }

            match RedirectTarget::new(path, server, port) {
                Ok(target) => {
                    targets.insert(path.to_string(), target);
                }
                Err(e) => {
                    tracing::warn!(path, server, port, error = %e, "Skipping malformed redirect entry");
                }
            }
        }

        Self { targets }
    }

    /// Exact-match lookup; no prefix or normalization.
    pub fn get(&self, path: &str) -> Option<&RedirectTarget> {
        self.targets.get(path)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
