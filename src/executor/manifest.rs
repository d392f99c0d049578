use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::filesystem::Entry;

pub const MANIFEST_FILE_NAME: &str = "deletedfile.txt";

/// Record of entries that exist in the source but are gone from the target.
///
/// One line per entry, `Directory: <relpath>` or `File: <relpath>`. The file
/// is rewritten from scratch on every run.
#[derive(Debug, Clone)]
pub struct DeletionManifest {
    path: PathBuf,
}

impl DeletionManifest {
    pub fn in_output(output_root: &Path) -> Self {
        Self {
            path: output_root.join(MANIFEST_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, removed: &[&Entry]) -> Result<(), ManifestError> {
        let file = File::create(&self.path).context(OpenSnafu { path: &self.path })?;
        let mut writer = BufWriter::new(file);

        for entry in removed {
            writeln!(writer, "{entry}").context(WriteSnafu { path: &self.path })?;
        }
        writer.flush().context(WriteSnafu { path: &self.path })?;

        debug!(
            "Wrote {} deleted entries to {}",
            removed.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ManifestError {
    #[snafu(display("{} can't be opened", path.display()))]
    OpenError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("{} can't be written", path.display()))]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}
