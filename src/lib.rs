//! Read-only browsing of a directory tree of chat logs.
//!
//! A [`Jail`] confines every filesystem access beneath one root path and
//! refuses symlink escapes. On top of it, the [`tree`] module exposes the
//! log history as navigable resources: a [`Directory`] resolves child names
//! into subdirectories or [`Channel`]s, a channel resolves date keys into
//! [`LogFile`]s, and a log file iterates [`LogLine`] records classified by
//! shape. Nodes are rebuilt from fresh listings on every lookup; nothing is
//! cached and nothing is ever written.
//!
//! # Examples
//!
//! ```no_run
//! use irclogs::{Directory, Jail, Node};
//! use std::sync::Arc;
//! # fn main() -> irclogs::Result<()> {
//! let fs = Arc::new(Jail::new("/var/log/irc")?);
//! let root = Directory::root(fs);
//!
//! if let Node::Channel(chan) = root.resolve("#ops")? {
//!     for logfile in chan.last(7) {
//!         for line in logfile.lines()? {
//!             println!("{}", line?.raw());
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod jail;
pub mod line;
pub mod tree;

pub use error::{Error, Result};
pub use jail::Jail;
pub use line::{Classifier, LineKind, LogLine};
pub use tree::{Channel, Directory, Lines, LogFile, LogName, Node, Resource, scan_channels, traverse};
