use thiserror::Error;

/// Errors locating or loading the project
#[derive(Error, Debug)]
pub enum ProjectLocationError {
    #[error("No rdeploy.yaml found in {0}, run `rdeploy init` or pass --path")]
    NotAProject(String),

    #[error("{0}")]
    Config(#[from] rdeploy_core::ReadYamlError),

    #[error("{0}")]
    UnknownNetwork(#[from] rdeploy_core::UnknownNetworkError),
}

/// Errors that can occur while scaffolding a project
#[derive(Error, Debug)]
pub enum InitError {
    #[error("Could not write {0}: {1}")]
    Write(String, rdeploy_core::WriteFileError),

    #[error("Terminal interaction failed: {0}")]
    Terminal(#[from] dialoguer::Error),
}

/// Errors talking to a network
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("{0}")]
    Project(#[from] ProjectLocationError),

    #[error("{0}")]
    Connect(#[from] rdeploy_core::ConnectError),

    #[error("RPC request failed: {0}")]
    Rpc(#[from] alloy::transports::TransportError),
}

/// Errors running a deployment or contract call
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("{0}")]
    Network(#[from] NetworkError),

    #[error("{0}")]
    Script(#[from] rdeploy_core::script::ScriptError),

    #[error("{0}")]
    Contract(#[from] rdeploy_core::deploy::ContractError),

    #[error("{0}")]
    Artifact(#[from] rdeploy_core::artifact::ArtifactError),

    #[error("{0}")]
    Record(#[from] rdeploy_core::deployments::DeploymentRecordError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<ProjectLocationError> for DeployError {
    fn from(err: ProjectLocationError) -> Self {
        Self::Network(NetworkError::Project(err))
    }
}

impl From<rdeploy_core::ConnectError> for DeployError {
    fn from(err: rdeploy_core::ConnectError) -> Self {
        Self::Network(NetworkError::Connect(err))
    }
}
