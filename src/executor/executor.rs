use std::fs;
use std::io::ErrorKind;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::available_parallelism;

use compio::dispatcher::{Dispatcher, DispatcherBuilder};
use snafu::{ResultExt, Snafu};
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::executor::{DeletionManifest, ManifestError};
use crate::ext::{AsyncTryFrom, RelativeKeyExt};
use crate::filesystem::Entry;
use crate::hashing::{Digest, HashError};
use crate::inventory::Comparison;

/// Hash jobs kept in flight per worker thread during the modification phase.
const JOBS_PER_WORKER: usize = 4;

/// Counts of what a sync run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub modified: usize,
    pub added: usize,
    pub copied: usize,
    pub deleted: usize,
    pub manifest: PathBuf,
}

/// Drives the modification, copy and manifest phases, in that order.
///
/// Every phase stops at its first error, and nothing already written to the
/// output tree is rolled back.
pub struct SyncExecutor {
    dispatcher: Dispatcher,
    batch_size: usize,
    config: Arc<RuntimeConfig>,
}

impl SyncExecutor {
    pub fn new(config: Arc<RuntimeConfig>) -> Result<Self, ExecutorCreationError> {
        let workers_num = config.jobs.unwrap_or_else(Self::determine_worker_count);
        debug!("Using {} worker threads for hashing", workers_num);

        let dispatcher = DispatcherBuilder::new()
            .worker_threads(workers_num)
            .build()
            .context(DispatcherSnafu)?;

        Ok(Self {
            dispatcher,
            batch_size: workers_num.get() * JOBS_PER_WORKER,
            config,
        })
    }

    fn determine_worker_count() -> NonZeroUsize {
        available_parallelism().unwrap_or(NonZeroUsize::MIN)
    }

    pub async fn execute(&self, comparison: &Comparison<'_>) -> Result<SyncReport, SyncError> {
        info!("Finding modified files...");
        let modified = self.find_modified(&comparison.common).await?;
        info!("Find done! Total: {}", modified.len());

        self.prepare_output()?;

        info!("Copying modified files...");
        let mut copied = self.copy_entries(&modified)?;
        info!("Copy done!");

        info!("Copying added files... Total: {}", comparison.added.len());
        copied += self.copy_entries(&comparison.added)?;
        info!("Copy done!");

        info!(
            "Writing deleted file paths to file... Total: {}",
            comparison.removed.len()
        );
        let manifest = DeletionManifest::in_output(&self.config.output);
        manifest
            .write(&comparison.removed)
            .context(ManifestSnafu)?;
        info!("Write done!");

        Ok(SyncReport {
            modified: modified.len(),
            added: comparison.added.len(),
            copied,
            deleted: comparison.removed.len(),
            manifest: manifest.path().to_path_buf(),
        })
    }

    /// Hashes both sides of every common file and keeps the ones whose
    /// digests differ, in the order they were given.
    async fn find_modified<'a>(&self, common: &[&'a Entry]) -> Result<Vec<&'a Entry>, SyncError> {
        let files = common
            .iter()
            .copied()
            .filter(|entry| !entry.is_directory())
            .collect::<Vec<_>>();
        debug!("Comparing digests of {} common files", files.len());

        let mut modified = Vec::new();
        for batch in files.chunks(self.batch_size) {
            let mut pending = Vec::with_capacity(batch.len());
            for &entry in batch {
                let target_path = entry.located_under(&self.config.target);
                let source_path = entry.located_under(&self.config.source);

                let receiver = self
                    .dispatcher
                    .dispatch(move || async move {
                        let target = Digest::async_try_from(target_path.as_path()).await?;
                        let source = Digest::async_try_from(source_path.as_path()).await?;
                        Ok::<bool, HashError>(target != source)
                    })
                    .map_err(|e| SyncError::HashDispatchError {
                        relative_path: entry.relative_path().to_string(),
                        error: e.to_string(),
                    })?;
                pending.push((entry, receiver));
            }

            for (entry, receiver) in pending {
                let changed = receiver
                    .await
                    .context(HashCanceledSnafu {
                        relative_path: entry.relative_path(),
                    })?
                    .context(ModificationCheckSnafu)?;
                if changed {
                    debug!("Modified: {}", entry.relative_path());
                    modified.push(entry);
                }
            }
        }

        Ok(modified)
    }

    fn prepare_output(&self) -> Result<(), SyncError> {
        fs::create_dir_all(&self.config.output).context(DirectoryCreateSnafu {
            path: &self.config.output,
        })
    }

    /// Copies every file entry into the output root. Entries always come from
    /// the target inventory, so their absolute path is the copy source.
    /// Directory entries are skipped; they appear in the output only as
    /// ancestors of copied files.
    fn copy_entries(&self, entries: &[&Entry]) -> Result<usize, SyncError> {
        let mut copied = 0;
        for entry in entries {
            if entry.is_directory() {
                debug!("Skipping directory {}", entry.relative_path());
                continue;
            }

            self.create_ancestors(entry)?;

            let from = entry.absolute_path();
            let to = entry.located_under(&self.config.output);
            fs::copy(from, &to).context(CopySnafu { from, to: &to })?;
            debug!(
                "Copied {} from {}",
                entry.relative_path(),
                entry.base_path().display()
            );
            copied += 1;
        }
        Ok(copied)
    }

    fn create_ancestors(&self, entry: &Entry) -> Result<(), SyncError> {
        for ancestor in entry.ancestors() {
            create_directory(&ancestor.rebase_onto(&self.config.output))?;
        }
        Ok(())
    }
}

/// Creates `directory` unless it already exists as a directory.
fn create_directory(directory: &Path) -> Result<(), SyncError> {
    if directory.is_dir() {
        return Ok(());
    }

    match fs::create_dir(directory) {
        Ok(()) => {
            debug!("Created directory {}", directory.display());
            Ok(())
        }
        // lost a race against another creator
        Err(error) if error.kind() == ErrorKind::AlreadyExists && directory.is_dir() => Ok(()),
        Err(error) => Err(error).context(DirectoryCreateSnafu { path: directory }),
    }
}

#[derive(Debug, Snafu)]
pub enum ExecutorCreationError {
    #[snafu(display("Failed to create hashing dispatcher"))]
    DispatcherError { source: std::io::Error },
}

#[derive(Debug, Snafu)]
pub enum SyncError {
    #[snafu(display("Failed to dispatch hashing of {relative_path}: {error}"))]
    HashDispatchError { relative_path: String, error: String },
    #[snafu(display("Hashing of {relative_path} was cancelled"))]
    HashCanceledError {
        relative_path: String,
        source: futures_channel::oneshot::Canceled,
    },
    #[snafu(display("Failed to compare file contents"))]
    ModificationCheckError { source: HashError },
    #[snafu(display("{} can't be created", path.display()))]
    DirectoryCreateError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Copy {} to {} failed!", from.display(), to.display()))]
    CopyError {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to write the deletion manifest"))]
    ManifestError { source: ManifestError },
}
