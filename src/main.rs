#![allow(clippy::enum_variant_names)]

use clap::Parser as _;
use clap::error::ErrorKind;
use snafu::Report;
use tracing::{debug, error};

use crate::{
    application::{Application, ApplicationError},
    cli::Cli,
    logging::{LoggingContext, LoggingOptions},
};

mod application;
mod cli;
mod executor;
mod ext;
mod filesystem;
mod hashing;
mod inventory;
mod logging;

#[compio::main]
#[snafu::report]
async fn main() -> Result<(), ApplicationError> {
    let cli_args = match Cli::try_parse() {
        Ok(cli_args) => cli_args,
        Err(error) => return reject_parameters(error),
    };

    let logging = LoggingContext::init(&LoggingOptions::from(&cli_args))
        .map_err(|source| ApplicationError::LoggingError { source })?;
    debug!("Parsed CLI arguments: {cli_args:?}");
    if let Some(log_file) = logging.log_file() {
        debug!("Writing run log to {}", log_file.display());
    }

    if let Err(error) = Application::run(cli_args).await {
        error!("FATAL ERROR: {}", Report::from_error(&error));
        return Err(error);
    }

    Ok(())
}

/// Logs a command line that could not be parsed. Help and version requests
/// are not failures and exit straight away.
fn reject_parameters(error: clap::Error) -> Result<(), ApplicationError> {
    if matches!(
        error.kind(),
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    ) {
        error.exit();
    }

    LoggingContext::init(&LoggingOptions::default())
        .map_err(|source| ApplicationError::LoggingError { source })?;
    error!(
        "Error: Invalid parameters. {}",
        error.render().to_string().trim_end()
    );

    Err(ApplicationError::ParameterError {
        message: error.kind().to_string(),
    })
}
