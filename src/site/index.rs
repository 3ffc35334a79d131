//! Startup snapshot of every file under the root directory.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Immutable set of file paths found under the root when the server started.
///
/// Entries are kept in request form (`/sub/file.txt`, relative to the root)
/// and compared byte for byte, so `/file.txt/` or `/sub//file.txt` never
/// match `/file.txt` or `/sub/file.txt`.
#[derive(Debug, Default, Clone)]
pub struct FileIndex {
    files: HashSet<String>,
}

impl FileIndex {
    /// Walks `root` recursively. The root itself must be readable; unreadable
    /// subdirectories are logged and skipped.
    pub fn scan(root: &Path) -> io::Result<Self> {
        let mut files = HashSet::new();
        let mut pending = vec![root.to_path_buf()];
        let mut first = true;

        while let Some(dir) = pending.pop() {
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) if !first => {
                    tracing::warn!(dir = %dir.display(), error = %e, "Skipping unreadable directory");
                    continue;
                }
                Err(e) => return Err(e),
            };
            first = false;

            for entry in entries {
                let path = entry?.path();
                // Follows symlinks, like a stat() would.
                if path.is_dir() {
                    pending.push(path);
                    continue;
                }

                match request_form(root, &path) {
                    Some(key) => {
                        files.insert(key);
                    }
                    None => {
                        tracing::debug!(path = %path.display(), "Skipping file with a non-UTF-8 name");
                    }
                }
            }
        }

        tracing::debug!(root = %root.display(), files = files.len(), "File index built");
        Ok(Self { files })
    }

    /// Whether `request_path` named a file at startup.
    pub fn contains(&self, request_path: &str) -> bool {
        self.files.contains(request_path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FileIndex {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// `root` + `request_path`, treating the leading `/` as relative to `root`.
pub fn join_request_path(root: &Path, request_path: &str) -> PathBuf {
    root.join(request_path.trim_start_matches('/'))
}

// `root/sub/file.txt` -> `/sub/file.txt`. None for names a request could
// never spell.
fn request_form(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut key = String::new();

    for component in relative.components() {
        match component {
            Component::Normal(name) => {
                key.push('/');
                key.push_str(name.to_str()?);
            }
            _ => return None,
        }
    }

    (!key.is_empty()).then_some(key)
}
