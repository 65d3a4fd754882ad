use crate::error::{Error, Result};
use crate::jail::Jail;
use crate::tree::channel::Channel;
use crate::tree::logfile::LogName;
use crate::tree::Node;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A filesystem folder in the log tree.
///
/// Stateless beyond its path: every resolution re-lists the filesystem, and
/// children are rebuilt per access. `name` and `parent` are `None` only for
/// the tree root.
#[derive(Debug, Clone, PartialEq)]
pub struct Directory {
    fs: Arc<Jail>,
    path: PathBuf,
    name: Option<String>,
    parent: Option<Box<Directory>>,
}

impl Directory {
    /// The root of the tree, at the jail's root path.
    pub fn root(fs: Arc<Jail>) -> Self {
        let path = fs.root().to_path_buf();
        Self {
            fs,
            path,
            name: None,
            parent: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parent(&self) -> Option<&Directory> {
        self.parent.as_deref()
    }

    /// Resolves a child name to a subdirectory or a channel.
    ///
    /// A real subdirectory wins; otherwise the name must match one of the
    /// channel names discovered from this directory's log filenames.
    pub fn resolve(&self, name: &str) -> Result<Node> {
        if self.fs.is_real_dir(&self.path.join(name)) {
            return Ok(Node::Directory(self.subdir(name)));
        }

        if self.channel_names().iter().any(|chan| chan == name) {
            return Ok(Node::Channel(self.channel(name)));
        }

        Err(Error::NotFound {
            name: name.to_string(),
        })
    }

    /// One directory per real subdirectory entry.
    pub fn dirs(&self) -> impl Iterator<Item = Directory> {
        self.fs
            .list_dir(&self.path)
            .unwrap_or_default()
            .into_iter()
            .filter(|name| self.fs.is_real_dir(&self.path.join(name)))
            .map(|name| self.subdir(&name))
    }

    /// One channel per distinct channel name found in this directory.
    pub fn chans(&self) -> impl Iterator<Item = Channel> {
        self.channel_names()
            .into_iter()
            .map(|name| self.channel(&name))
    }

    /// All children: subdirectories first, then channels.
    pub fn children(&self) -> impl Iterator<Item = Node> {
        self.dirs()
            .map(Node::Directory)
            .chain(self.chans().map(Node::Channel))
    }

    /// Distinct channel names derived from real log files in this
    /// directory, in first-seen listing order.
    fn channel_names(&self) -> Vec<String> {
        let Some(listing) = self.fs.list_dir(&self.path) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for file_name in &listing {
            let Some(log_name) = LogName::parse(file_name) else {
                continue;
            };
            if !self.fs.is_real_file(&self.path.join(file_name)) {
                continue;
            }
            if seen.insert(log_name.channel.to_string()) {
                names.push(log_name.channel.to_string());
            }
        }
        names
    }

    fn subdir(&self, name: &str) -> Directory {
        Directory {
            fs: self.fs.clone(),
            path: self.path.join(name),
            name: Some(name.to_string()),
            parent: Some(Box::new(self.clone())),
        }
    }

    fn channel(&self, name: &str) -> Channel {
        Channel::new(
            self.fs.clone(),
            self.path.clone(),
            name.to_string(),
            Some(Box::new(self.clone())),
        )
    }
}

impl IntoIterator for &Directory {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.children().collect::<Vec<_>>().into_iter()
    }
}
