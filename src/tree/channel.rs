use crate::error::{Error, Result};
use crate::jail::Jail;
use crate::tree::directory::Directory;
use crate::tree::logfile::{LogFile, LogName};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// One dated log file discovered in a channel's directory.
#[derive(Debug, Clone, PartialEq)]
struct LogEntry {
    date: String,
    file_name: String,
}

/// A channel's entire log history within one directory.
///
/// The date index is derived from a fresh directory listing at construction
/// time; channels are rebuilt on every lookup, so there is no cache to
/// invalidate. Iteration follows listing order, while `resolve`,
/// `previous`/`next` and [`last`](Channel::last) use the chronological
/// (lexicographic) order of the fixed-width date keys.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    fs: Arc<Jail>,
    path: PathBuf,
    name: String,
    parent: Option<Box<Directory>>,
    entries: Vec<LogEntry>,
}

impl Channel {
    pub(crate) fn new(
        fs: Arc<Jail>,
        path: PathBuf,
        name: String,
        parent: Option<Box<Directory>>,
    ) -> Self {
        let entries = discover(&fs, &path, &name);
        Self {
            fs,
            path,
            name,
            parent,
            entries,
        }
    }

    /// The channel identifier, sigil included (e.g. `#ops`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The directory the channel's log files live in.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn parent(&self) -> Option<&Directory> {
        self.parent.as_deref()
    }

    /// Known date keys, in listing order.
    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.date.as_str())
    }

    /// Resolves a date key to its log file, bound to this channel as parent.
    pub fn resolve(&self, date: &str) -> Result<LogFile> {
        self.entries
            .iter()
            .find(|entry| entry.date == date)
            .map(|entry| self.logfile(entry))
            .ok_or_else(|| Error::NotFound {
                name: date.to_string(),
            })
    }

    /// One log file per known date, in listing order.
    pub fn logfiles(&self) -> impl Iterator<Item = LogFile> {
        self.entries.iter().map(|entry| self.logfile(entry))
    }

    /// The `n` most recent log files, most recent first.
    pub fn last(&self, n: usize) -> Vec<LogFile> {
        let mut entries: Vec<&LogEntry> = self.entries.iter().collect();
        entries.sort_unstable_by(|a, b| b.date.cmp(&a.date));
        entries
            .into_iter()
            .take(n)
            .map(|entry| self.logfile(entry))
            .collect()
    }

    /// Largest known date key strictly before `date`.
    pub(crate) fn date_before(&self, date: &str) -> Option<&str> {
        self.dates().filter(|d| *d < date).max()
    }

    /// Smallest known date key strictly after `date`.
    pub(crate) fn date_after(&self, date: &str) -> Option<&str> {
        self.dates().filter(|d| *d > date).min()
    }

    fn logfile(&self, entry: &LogEntry) -> LogFile {
        LogFile::new(
            self.fs.clone(),
            self.path.join(&entry.file_name),
            entry.date.clone(),
            Some(Box::new(self.clone())),
        )
    }
}

impl IntoIterator for &Channel {
    type Item = LogFile;
    type IntoIter = std::vec::IntoIter<LogFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.logfiles().collect::<Vec<_>>().into_iter()
    }
}

/// List the channel's directory and keep the entries that belong to it.
///
/// Only real files count; a symbolic link named like a log file is not
/// surfaced. Date keys are unique, first occurrence wins.
fn discover(fs: &Jail, path: &Path, name: &str) -> Vec<LogEntry> {
    let Some(listing) = fs.list_dir(path) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for file_name in listing {
        let Some(log_name) = LogName::parse(&file_name) else {
            continue;
        };
        if log_name.channel != name {
            continue;
        }
        if !fs.is_real_file(&path.join(&file_name)) {
            continue;
        }

        let date = log_name.date.to_string();
        if seen.insert(date.clone()) {
            entries.push(LogEntry { date, file_name });
        }
    }

    debug!(
        "channel {} has {} dated logs under {:?}",
        name,
        entries.len(),
        path
    );
    entries
}
