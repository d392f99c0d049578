//! Run log: timestamped events written to a per-run file and mirrored to stdout.

mod log_context;

pub use log_context::{LoggingContext, LoggingError, LoggingOptions, log_file_name};
