use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{trace, warn};

/// Filesystem accessor confined beneath a single root directory.
///
/// Every operation fully resolves its argument (symlinks included) and
/// refuses paths that land outside the root. Listing is opportunistic and
/// fails inertly; opening a file fails loudly, because silently returning
/// empty content would misrepresent history.
///
/// The jail holds no mutable state beyond the immutable root, so one
/// instance can be shared freely between concurrent readers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jail {
    root: PathBuf,
}

impl Jail {
    /// Creates a jail rooted at `root`. The root must exist; it is
    /// canonicalized once so later containment checks compare fully
    /// resolved absolute forms.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().canonicalize()?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fully resolve `path` and return it only if it stays under the root.
    ///
    /// Canonicalization resolves every segment, so a symlink anywhere in
    /// the path that leads outside the jail fails the check, not just a
    /// symlink at the leaf.
    fn confine(&self, path: &Path) -> Option<PathBuf> {
        let resolved = path.canonicalize().ok()?;
        resolved.starts_with(&self.root).then_some(resolved)
    }

    /// Lists the entries of a directory as basenames, in no particular
    /// order.
    ///
    /// Returns `None` for paths outside the jail and for unreadable
    /// directories; structure discovery treats both as "nothing here".
    pub fn list_dir(&self, path: &Path) -> Option<Vec<String>> {
        let resolved = self.confine(path)?;

        let entries = match fs::read_dir(&resolved) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot list directory {:?}: {}", resolved, e);
                return None;
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Cannot read entry in {:?}: {}", resolved, e);
                    return None;
                }
            };
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(name) => trace!("Skipping non-UTF-8 entry {:?}", name),
            }
        }

        Some(names)
    }

    /// True if `path` names a regular file inside the jail, reached without
    /// a symbolic link at the final segment.
    pub fn is_real_file(&self, path: &Path) -> bool {
        self.confine(path).is_some()
            && fs::symlink_metadata(path)
                .map(|m| m.file_type().is_file())
                .unwrap_or(false)
    }

    /// True if `path` names a directory inside the jail, reached without a
    /// symbolic link at the final segment.
    pub fn is_real_dir(&self, path: &Path) -> bool {
        self.confine(path).is_some()
            && fs::symlink_metadata(path)
                .map(|m| m.file_type().is_dir())
                .unwrap_or(false)
    }

    /// Opens a file for reading.
    pub fn open(&self, path: &Path) -> Result<fs::File> {
        let resolved = path.canonicalize().map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;

        if !resolved.starts_with(&self.root) {
            return Err(Error::OutsideRoot {
                path: path.to_path_buf(),
            });
        }

        fs::File::open(&resolved).map_err(|source| Error::Open {
            path: resolved,
            source,
        })
    }
}
