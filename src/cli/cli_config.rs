use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

/// Copies what changed between two directory trees into an output directory
/// and lists what was deleted.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Cli {
    /// The previous state of the tree
    #[arg(short, long, value_name = "DIR")]
    pub source: PathBuf,

    /// The new state of the tree
    #[arg(short, long, value_name = "DIR")]
    pub target: PathBuf,

    /// Where changed files and the deletion manifest are written
    #[arg(short, long, value_name = "DIR")]
    pub output: PathBuf,

    #[arg(long, short, default_value = "info", value_enum)]
    pub log_level: LogLevel,

    /// Directory that receives the run log
    #[arg(long, value_name = "DIR", default_value = ".", env = "DIRDIFF_LOG_DIR")]
    pub log_dir: PathBuf,

    /// Number of hashing threads [default: available cores]
    #[arg(long, short, env = "DIRDIFF_JOBS")]
    pub jobs: Option<NonZeroUsize>,

    /// Fail instead of treating unreadable directories as empty
    #[arg(long)]
    pub strict: bool,
}
