use thiserror::Error;

use crate::commands::error::{DeployError, InitError, NetworkError, ProjectLocationError};

/// Top-level CLI error that composes all module-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Project(#[from] ProjectLocationError),

    #[error("Initialization error: {0}")]
    Init(#[from] InitError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Deployment error: {0}")]
    Deploy(#[from] DeployError),

    #[error("{0}")]
    Path(String),
}
