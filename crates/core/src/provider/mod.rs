mod connection;
pub use connection::{connect, ConnectError, DeployProvider, NetworkConnection, SignerSource};

mod layer_extensions;

mod retry_client;
pub use retry_client::{create_retry_client, RetryClientError};
