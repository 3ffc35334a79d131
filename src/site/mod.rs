//! The content a server instance answers for.
//!
//! A [`Site`] combines the root directory, the startup [`FileIndex`] and the
//! [`RedirectTable`]. Resolution tries, in order: a file openable under the
//! root right now, a file present in the startup index, and a redirect.

pub mod guard;
pub mod index;
pub mod redirects;

use std::path::PathBuf;

use anyhow::Context;
use tokio::fs::File;

use crate::config::Config;

pub use guard::PathRejection;
pub use index::FileIndex;
pub use redirects::{RedirectTable, RedirectTarget};

/// Outcome of looking a request path up.
#[derive(Debug)]
pub enum Resolution {
    /// Openable now under the root.
    File(File),
    /// Not openable, but listed in the startup index.
    Indexed,
    /// Served elsewhere.
    Redirect(RedirectTarget),
    NotFound,
}

#[derive(Debug)]
pub struct Site {
    root: PathBuf,
    index: FileIndex,
    redirects: RedirectTable,
}

impl Site {
    pub fn new(root: impl Into<PathBuf>, index: FileIndex, redirects: RedirectTable) -> Self {
        Self {
            root: root.into(),
            index,
            redirects,
        }
    }

    /// Snapshots the root directory and reads the redirects file.
    pub fn load(cfg: &Config) -> anyhow::Result<Self> {
        let index = FileIndex::scan(&cfg.root_dir)
            .with_context(|| format!("failed to scan {}", cfg.root_dir.display()))?;
        let redirects = RedirectTable::load(&cfg.redirects_file)?;

        tracing::info!(
            root = %cfg.root_dir.display(),
            files = index.len(),
            redirects = redirects.len(),
            "Site loaded"
        );

        Ok(Self::new(cfg.root_dir.clone(), index, redirects))
    }

    /// Looks `path` up. The caller must have run [`guard::check`] first.
    pub async fn resolve(&self, path: &str) -> Resolution {
        if let Some(file) = self.open(path).await {
            return Resolution::File(file);
        }

        if self.index.contains(path) {
            return Resolution::Indexed;
        }

        match self.redirects.get(path) {
            Some(target) => Resolution::Redirect(target.clone()),
            None => Resolution::NotFound,
        }
    }

    // Any failure to stat or open counts as absence.
    async fn open(&self, path: &str) -> Option<File> {
        let full = index::join_request_path(&self.root, path);

        let meta = tokio::fs::metadata(&full).await.ok()?;
        if meta.is_dir() {
            return None;
        }

        match File::open(&full).await {
            Ok(file) => Some(file),
            Err(e) => {
                tracing::debug!(path = %full.display(), error = %e, "File exists but could not be opened");
                None
            }
        }
    }
}
