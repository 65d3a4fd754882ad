use crate::error::{Error, Result};
use crate::jail::Jail;
use crate::line::{Classifier, LogLine};
use crate::tree::channel::Channel;
use chrono::NaiveDate;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Parsed `<channel>.<date>.<extension>` log filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogName<'a> {
    pub channel: &'a str,
    pub date: &'a str,
    pub extension: &'a str,
}

impl<'a> LogName<'a> {
    /// Parse a log filename from the right: extension first, then the date
    /// key, leaving everything else as the channel name (which may itself
    /// contain dots).
    pub fn parse(file_name: &'a str) -> Option<Self> {
        let (rest, extension) = file_name.rsplit_once('.')?;
        let (channel, date) = rest.rsplit_once('.')?;

        if channel.is_empty() || extension.is_empty() {
            return None;
        }

        // Fixed-width numeric date keys keep lexicographic order chronological.
        if date.is_empty() || !date.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        Some(Self {
            channel,
            date,
            extension,
        })
    }
}

/// One day's log for one channel.
///
/// Holds only addressing state; the underlying file is opened anew on each
/// call to [`lines`](LogFile::lines), so iteration is restartable and no
/// cursor is shared between readers.
#[derive(Debug, Clone, PartialEq)]
pub struct LogFile {
    fs: Arc<Jail>,
    path: PathBuf,
    name: String,
    parent: Option<Box<Channel>>,
}

impl LogFile {
    pub(crate) fn new(
        fs: Arc<Jail>,
        path: PathBuf,
        name: String,
        parent: Option<Box<Channel>>,
    ) -> Self {
        Self {
            fs,
            path,
            name,
            parent,
        }
    }

    /// The date key identifying this log within its channel.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn parent(&self) -> Option<&Channel> {
        self.parent.as_deref()
    }

    /// The date key interpreted as a calendar date, for `YYYYMMDD` keys.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.name, "%Y%m%d").ok()
    }

    /// The log for the chronologically preceding date in the same channel,
    /// absent at the oldest end of history.
    pub fn previous(&self) -> Option<LogFile> {
        let parent = self.parent.as_deref()?;
        let date = parent.date_before(&self.name)?;
        parent.resolve(date).ok()
    }

    /// The log for the chronologically following date in the same channel,
    /// absent at the newest end of history.
    pub fn next(&self) -> Option<LogFile> {
        let parent = self.parent.as_deref()?;
        let date = parent.date_after(&self.name)?;
        parent.resolve(date).ok()
    }

    /// Opens the underlying file and returns an iterator of classified
    /// lines in file order. Open failures surface here; read failures
    /// surface as `Err` items during iteration.
    pub fn lines(&self) -> Result<Lines> {
        let file = self.fs.open(&self.path)?;
        Ok(Lines {
            classifier: Classifier::shared(),
            inner: BufReader::new(file).lines(),
        })
    }
}

/// Iterator over the classified lines of one log file.
///
/// The file handle is owned by the iterator and released when it is dropped,
/// whether iteration completed or was abandoned early.
pub struct Lines {
    classifier: &'static Classifier,
    inner: std::io::Lines<BufReader<fs::File>>,
}

impl Iterator for Lines {
    type Item = Result<LogLine>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.next()? {
            Ok(raw) => Some(Ok(self.classifier.classify(&raw))),
            Err(e) => Some(Err(Error::Io(e))),
        }
    }
}
