use alloy::{
    rpc::client::{ClientBuilder, RpcClient},
    transports::{http::reqwest::Url, layers::RetryBackoffLayer},
};
use thiserror::Error;

use super::layer_extensions::RpcLoggingLayer;

/// Rate-limit retries before a call is given up.
const MAX_RATE_LIMIT_RETRIES: u32 = 10;
const INITIAL_BACKOFF_MS: u64 = 500;
const COMPUTE_UNITS_PER_SECOND: u64 = 660;

#[derive(Error, Debug)]
pub enum RetryClientError {
    #[error("http provider cant be created for {0}: {1}")]
    HttpProviderCantBeCreated(String, String),
}

/// JSON-RPC client over http with backoff on rate limiting and call logging.
pub fn create_retry_client(rpc_url: &str) -> Result<RpcClient, RetryClientError> {
    let url = Url::parse(rpc_url).map_err(|e| {
        RetryClientError::HttpProviderCantBeCreated(rpc_url.to_string(), e.to_string())
    })?;

    let retry_layer =
        RetryBackoffLayer::new(MAX_RATE_LIMIT_RETRIES, INITIAL_BACKOFF_MS, COMPUTE_UNITS_PER_SECOND);
    let client = ClientBuilder::default()
        .layer(RpcLoggingLayer::new(rpc_url.to_string()))
        .layer(retry_layer)
        .http(url);

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_url() {
        assert!(matches!(
            create_retry_client("not a url"),
            Err(RetryClientError::HttpProviderCantBeCreated(_, _))
        ));
    }
}
