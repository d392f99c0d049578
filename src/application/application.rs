use std::path::{Path, PathBuf};
use std::sync::Arc;

use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info, warn};

use crate::application::RuntimeConfig;
use crate::executor::{ExecutorCreationError, SyncError, SyncExecutor, SyncReport};
use crate::filesystem::{EnumerationError, TreeEnumerator};
use crate::inventory::{Comparison, Inventory};
use crate::logging::LoggingError;

pub struct Application;

impl Application {
    pub async fn run(
        runtime_config: impl Into<RuntimeConfig>,
    ) -> Result<SyncReport, ApplicationError> {
        let config: RuntimeConfig = runtime_config.into();
        info!("source directory: {}", config.source.display());
        info!("target directory: {}", config.target.display());
        info!("output directory: {}", config.output.display());

        let enumerator = TreeEnumerator::new(config.unreadable_policy);
        let source = Self::take_inventory(&enumerator, &config.source)?;
        let target = Self::take_inventory(&enumerator, &config.target)?;

        let comparison = Comparison::of(&target, &source);
        debug!(
            "Classified entries: {} common, {} added, {} removed",
            comparison.common.len(),
            comparison.added.len(),
            comparison.removed.len()
        );

        let report = SyncExecutor::new(Arc::new(config))
            .context(ExecutorCreationSnafu)?
            .execute(&comparison)
            .await
            .context(SyncSnafu)?;

        info!(
            "All done! Modified: {}, added: {}, copied: {}, deleted: {} (see {})",
            report.modified,
            report.added,
            report.copied,
            report.deleted,
            report.manifest.display()
        );
        Ok(report)
    }

    fn take_inventory(
        enumerator: &TreeEnumerator,
        root: &Path,
    ) -> Result<Inventory, ApplicationError> {
        let inventory = enumerator
            .enumerate(root)
            .context(EnumerationSnafu { root })?;
        if inventory.is_empty() {
            debug!("{} holds no files or directories", inventory.root().display());
        }

        for directory in inventory.unreadable() {
            warn!(
                "{} was treated as empty because it can't be read",
                directory.display()
            );
        }
        Ok(inventory)
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Invalid parameters: {message}"))]
    ParameterError { message: String },
    #[snafu(display("Failed to set up the run log"))]
    LoggingError { source: LoggingError },
    #[snafu(display("Critical failure encountered while enumerating {}", root.display()))]
    EnumerationError {
        root: PathBuf,
        source: EnumerationError,
    },
    #[snafu(display("Critical failure encountered during executor creation"))]
    ExecutorCreationError { source: ExecutorCreationError },
    #[snafu(display("Critical failure encountered during synchronization"))]
    SyncError { source: SyncError },
}
