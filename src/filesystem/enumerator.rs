use std::fs::{self, DirEntry, ReadDir};
use std::io;
use std::path::{Path, PathBuf};

use snafu::Snafu;
use tracing::{debug, info, warn};

use crate::filesystem::{Entry, EntryKind};
use crate::inventory::Inventory;

/// What to do with a directory whose children cannot be listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnreadablePolicy {
    /// Treat the directory as empty and keep walking.
    #[default]
    Tolerate,
    /// Abort the walk.
    Fail,
}

/// Entries in depth-first pre-order plus the directories that could not be listed.
#[derive(Debug, Default)]
pub struct Walk {
    pub entries: Vec<Entry>,
    pub unreadable: Vec<PathBuf>,
}

/// A directory on the walk stack whose children are still being listed.
struct OpenDirectory {
    path: PathBuf,
    canonical: Option<PathBuf>,
    children: ReadDir,
}

/// Follows symbolic links, so a dangling link is an error.
fn points_to_directory(child: &DirEntry) -> io::Result<bool> {
    let file_type = child.file_type()?;
    if file_type.is_symlink() {
        return Ok(fs::metadata(child.path())?.is_dir());
    }
    Ok(file_type.is_dir())
}

#[derive(Debug, Clone, Default)]
pub struct TreeEnumerator {
    policy: UnreadablePolicy,
}

impl TreeEnumerator {
    pub fn new(policy: UnreadablePolicy) -> Self {
        Self { policy }
    }

    /// Walks `base_dir` and returns its entries sorted by relative path.
    pub fn enumerate(&self, base_dir: &Path) -> Result<Inventory, EnumerationError> {
        info!(
            "Finding all files and directories in directory: {}...",
            base_dir.display()
        );
        let walk = self.walk(base_dir)?;
        info!("Find done! Total: {}", walk.entries.len());

        info!("Sorting all files in {} file list...", base_dir.display());
        let inventory = Inventory::new(base_dir, walk.entries, walk.unreadable);
        info!("Sort done!");
        Ok(inventory)
    }

    /// Walks `base_dir` with an explicit stack of open directories. A
    /// directory's entry is emitted before any of its descendants, and every
    /// relative path is taken against `base_dir`.
    ///
    /// Symbolic links are followed: a link to a directory is emitted as a
    /// directory and walked, unless it resolves to a directory that is still
    /// open further up the stack.
    pub fn walk(&self, base_dir: &Path) -> Result<Walk, EnumerationError> {
        let mut walk = Walk::default();
        let mut pending: Vec<OpenDirectory> = Vec::new();

        if let Some(children) = self.open_directory(base_dir, &mut walk.unreadable)? {
            pending.push(OpenDirectory {
                path: base_dir.to_path_buf(),
                canonical: fs::canonicalize(base_dir).ok(),
                children,
            });
        }

        while let Some(current) = pending.last_mut() {
            // read_dir never yields the `.` and `..` pseudo-entries.
            let child = match current.children.next() {
                Some(Ok(child)) => child,
                Some(Err(error)) => {
                    let directory = current.path.clone();
                    pending.pop();
                    self.handle_unreadable(directory, error, &mut walk.unreadable)?;
                    continue;
                }
                None => {
                    pending.pop();
                    continue;
                }
            };

            let path = child.path();
            let is_directory = match points_to_directory(&child) {
                Ok(is_directory) => is_directory,
                Err(error) => {
                    self.handle_unreadable(path, error, &mut walk.unreadable)?;
                    continue;
                }
            };

            if !is_directory {
                walk.entries.push(Entry::new(base_dir, path, EntryKind::File));
                continue;
            }

            walk.entries
                .push(Entry::new(base_dir, path.clone(), EntryKind::Directory));
            let canonical = fs::canonicalize(&path).ok();
            if canonical.is_some() && pending.iter().any(|open| open.canonical == canonical) {
                warn!(
                    "{} leads back into a directory being walked, not descending into it",
                    path.display()
                );
                continue;
            }
            if let Some(children) = self.open_directory(&path, &mut walk.unreadable)? {
                pending.push(OpenDirectory {
                    path,
                    canonical,
                    children,
                });
            }
        }

        debug!(
            "Walked {}: {} entries, {} unreadable",
            base_dir.display(),
            walk.entries.len(),
            walk.unreadable.len()
        );
        Ok(walk)
    }

    fn open_directory(
        &self,
        directory: &Path,
        unreadable: &mut Vec<PathBuf>,
    ) -> Result<Option<ReadDir>, EnumerationError> {
        match fs::read_dir(directory) {
            Ok(children) => Ok(Some(children)),
            Err(error) => {
                self.handle_unreadable(directory.to_path_buf(), error, unreadable)?;
                Ok(None)
            }
        }
    }

    fn handle_unreadable(
        &self,
        path: PathBuf,
        error: io::Error,
        unreadable: &mut Vec<PathBuf>,
    ) -> Result<(), EnumerationError> {
        match self.policy {
            UnreadablePolicy::Fail => Err(EnumerationError::UnreadableDirectoryError {
                path,
                source: error,
            }),
            UnreadablePolicy::Tolerate => {
                warn!("{} can't be read, treating it as empty: {}", path.display(), error);
                unreadable.push(path);
                Ok(())
            }
        }
    }
}

#[derive(Debug, Snafu)]
pub enum EnumerationError {
    #[snafu(display("{} can't be read", path.display()))]
    UnreadableDirectoryError {
        path: PathBuf,
        source: io::Error,
    },
}
