//! The navigable resource tree: directories, channels and dated log files.

mod channel;
mod directory;
mod logfile;

pub use channel::Channel;
pub use directory::Directory;
pub use logfile::{Lines, LogFile, LogName};

use crate::error::{Error, Result};
use crate::jail::Jail;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;
use walkdir::WalkDir;

/// Child of a directory: either a nested directory or a channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Directory(Directory),
    Channel(Channel),
}

/// Any node in the log tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Directory(Directory),
    Channel(Channel),
    LogFile(LogFile),
}

/// Resolves a path of name segments starting from `root`.
///
/// Directories resolve child names, channels resolve date keys; log files
/// have no children, so any trailing segment fails with `NotFound`. An
/// empty segment list yields the root itself.
pub fn traverse(root: &Directory, segments: &[&str]) -> Result<Resource> {
    let mut current = Resource::Directory(root.clone());

    for segment in segments {
        current = match current {
            Resource::Directory(dir) => match dir.resolve(segment)? {
                Node::Directory(sub) => Resource::Directory(sub),
                Node::Channel(chan) => Resource::Channel(chan),
            },
            Resource::Channel(chan) => Resource::LogFile(chan.resolve(segment)?),
            Resource::LogFile(_) => {
                return Err(Error::NotFound {
                    name: segment.to_string(),
                });
            }
        };
    }

    Ok(current)
}

/// Scans the whole jail for channels, never following symbolic links.
///
/// Every channel found anywhere beneath the root is returned with its full
/// parent directory chain. Channels whose containing directory can no
/// longer be resolved (e.g. it vanished mid-scan) are skipped.
pub fn scan_channels(fs: &Arc<Jail>) -> Result<Vec<Channel>> {
    let mut seen: HashSet<(PathBuf, String)> = HashSet::new();
    let mut found: Vec<(PathBuf, String)> = Vec::new();

    for entry in WalkDir::new(fs.root()).follow_links(false) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str() else {
            continue;
        };
        let Some(log_name) = LogName::parse(file_name) else {
            continue;
        };

        let dir = entry
            .path()
            .parent()
            .unwrap_or(fs.root())
            .to_path_buf();
        let key = (dir, log_name.channel.to_string());
        if seen.insert(key.clone()) {
            found.push(key);
        }
    }

    let mut channels = Vec::new();
    'channels: for (dir, name) in found {
        let mut node = Directory::root(fs.clone());

        if let Ok(relative) = dir.strip_prefix(fs.root()) {
            for component in relative.components() {
                let Some(segment) = component.as_os_str().to_str() else {
                    return Err(Error::InvalidUtf8 { path: dir });
                };
                match node.resolve(segment) {
                    Ok(Node::Directory(sub)) => node = sub,
                    _ => {
                        warn!("Skipping unresolvable directory {:?}", dir);
                        continue 'channels;
                    }
                }
            }
        }

        if let Ok(Node::Channel(chan)) = node.resolve(&name) {
            channels.push(chan);
        }
    }

    Ok(channels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_tree(tmp: &TempDir) -> Arc<Jail> {
        fs::write(tmp.path().join("#tagada.20100203.log"), "").unwrap();
        fs::write(tmp.path().join("#tagada.20100204.log"), "").unwrap();
        fs::create_dir(tmp.path().join("bar")).unwrap();
        fs::write(tmp.path().join("bar/#nested.20110101.log"), "").unwrap();

        Arc::new(Jail::new(tmp.path()).unwrap())
    }

    #[test]
    fn traverses_to_each_resource_kind() {
        let tmp = TempDir::new().unwrap();
        let root = Directory::root(make_tree(&tmp));

        assert_eq!(traverse(&root, &[]).unwrap(), Resource::Directory(root.clone()));

        match traverse(&root, &["bar"]).unwrap() {
            Resource::Directory(dir) => assert_eq!(dir.name(), Some("bar")),
            other => panic!("expected directory, got {other:?}"),
        }

        match traverse(&root, &["#tagada"]).unwrap() {
            Resource::Channel(chan) => assert_eq!(chan.name(), "#tagada"),
            other => panic!("expected channel, got {other:?}"),
        }

        match traverse(&root, &["#tagada", "20100203"]).unwrap() {
            Resource::LogFile(logfile) => assert_eq!(logfile.name(), "20100203"),
            other => panic!("expected logfile, got {other:?}"),
        }

        match traverse(&root, &["bar", "#nested", "20110101"]).unwrap() {
            Resource::LogFile(logfile) => {
                assert_eq!(logfile.name(), "20110101");
                assert_eq!(logfile.parent().unwrap().name(), "#nested");
            }
            other => panic!("expected logfile, got {other:?}"),
        }
    }

    #[test]
    fn traversal_past_a_logfile_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let root = Directory::root(make_tree(&tmp));

        assert!(matches!(
            traverse(&root, &["#tagada", "20100203", "deeper"]),
            Err(Error::NotFound { .. })
        ));
        assert!(matches!(
            traverse(&root, &["nope"]),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn scan_finds_channels_in_nested_directories() {
        let tmp = TempDir::new().unwrap();
        let fs_handle = make_tree(&tmp);

        let mut channels = scan_channels(&fs_handle).unwrap();
        channels.sort_by(|a, b| a.name().cmp(b.name()));

        let names: Vec<_> = channels.iter().map(Channel::name).collect();
        assert_eq!(names, vec!["#nested", "#tagada"]);

        let nested = &channels[0];
        assert_eq!(nested.parent().unwrap().name(), Some("bar"));
        assert_eq!(
            nested.parent().unwrap().parent().unwrap().name(),
            None
        );
    }

    #[cfg(unix)]
    #[test]
    fn scan_does_not_follow_symlinks() {
        use std::os::unix::fs::symlink;

        let outer = TempDir::new().unwrap();
        let elsewhere = outer.path().join("elsewhere");
        fs::create_dir(&elsewhere).unwrap();
        fs::write(elsewhere.join("#evil.20100101.log"), "").unwrap();

        let root = outer.path().join("root");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("#ok.20100101.log"), "").unwrap();
        symlink(&elsewhere, root.join("linked")).unwrap();

        let fs_handle = Arc::new(Jail::new(&root).unwrap());
        let channels = scan_channels(&fs_handle).unwrap();
        let names: Vec<_> = channels.iter().map(Channel::name).collect();
        assert_eq!(names, vec!["#ok"]);
    }
}
