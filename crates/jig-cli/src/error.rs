//! Shell errors

use std::path::PathBuf;

use jig_core::{ConfigError, ParamsError};

/// Errors that end a shell session
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("No parameter file given and {} does not exist", .0.display())]
    NoParams(PathBuf),
    #[error("Failed to load parameters: {0}")]
    Params(#[from] ParamsError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Nothing was built: {0}")]
    NothingBuilt(String),
}
