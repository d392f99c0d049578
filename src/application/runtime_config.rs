use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::cli::Cli;
use crate::filesystem::UnreadablePolicy;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub source: PathBuf,
    pub target: PathBuf,
    pub output: PathBuf,
    /// Hashing worker threads; `None` means one per available core.
    pub jobs: Option<NonZeroUsize>,
    pub unreadable_policy: UnreadablePolicy,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        let unreadable_policy = if cli.strict {
            UnreadablePolicy::Fail
        } else {
            UnreadablePolicy::Tolerate
        };

        Self {
            source: cli.source,
            target: cli.target,
            output: cli.output,
            jobs: cli.jobs,
            unreadable_policy,
        }
    }
}
