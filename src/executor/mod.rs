mod executor;
mod manifest;

pub use executor::{ExecutorCreationError, SyncError, SyncExecutor, SyncReport};
pub use manifest::{DeletionManifest, MANIFEST_FILE_NAME, ManifestError};
