pub mod abi;
pub mod artifact;
pub mod compiler;
pub mod deploy;
pub mod deployments;
mod environment;
mod file;
mod logger;
pub mod network;
pub mod provider;
pub mod script;
pub mod signing;
mod yaml;

pub use environment::load_env_from_project_path;
pub use file::{write_file, WriteFileError};
pub use logger::{setup_info_logger, setup_logger};
pub use provider::{connect, ConnectError, NetworkConnection};
pub use tracing::{error as rdeploy_error, info as rdeploy_info};
pub use yaml::{
    read, substitute_env_variables, unsubstituted_endpoints, ProjectConfig, ReadYamlError, UnknownNetworkError,
    CONFIG_FILE_NAME,
};
