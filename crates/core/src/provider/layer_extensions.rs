use alloy::{
    rpc::json_rpc::{RequestPacket, ResponsePacket},
    transports::TransportError,
};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::{Duration, Instant},
};
use tower::{Layer, Service};
use tracing::{debug, error, warn};

const SLOW_CALL_THRESHOLD: Duration = Duration::from_secs(10);

/// Logs every JSON-RPC call at debug level, slow calls at warn and failures
/// at error, classified by the kind of failure.
#[derive(Clone)]
pub struct RpcLoggingLayer {
    rpc_url: String,
}

impl RpcLoggingLayer {
    pub fn new(rpc_url: String) -> Self {
        Self { rpc_url }
    }
}

impl<S> Layer<S> for RpcLoggingLayer {
    type Service = RpcLoggingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RpcLoggingService { inner, rpc_url: self.rpc_url.clone() }
    }
}

#[derive(Debug, Clone)]
pub struct RpcLoggingService<S> {
    inner: S,
    rpc_url: String,
}

fn method_name(req: &RequestPacket) -> String {
    match req {
        RequestPacket::Single(r) => r.method().to_string(),
        RequestPacket::Batch(reqs) => match reqs.len() {
            0 => "empty_batch".to_string(),
            1 => reqs[0].method().to_string(),
            n => format!("batch_{}_requests", n),
        },
    }
}

fn classify_error(error: &str) -> &'static str {
    if error.contains("timeout") || error.contains("timed out") {
        "RPC TIMEOUT"
    } else if error.contains("429") || error.contains("rate limit") {
        "RPC RATE LIMITED"
    } else if error.contains("connection") || error.contains("network") {
        "RPC CONNECTION ERROR"
    } else {
        "RPC ERROR"
    }
}

impl<S> Service<RequestPacket> for RpcLoggingService<S>
where
    S: Service<RequestPacket, Response = ResponsePacket, Error = TransportError>,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: RequestPacket) -> Self::Future {
        let start_time = Instant::now();
        let rpc_url = self.rpc_url.clone();
        let method_name = method_name(&req);

        let fut = self.inner.call(req);

        Box::pin(async move {
            let result = fut.await;
            let duration = start_time.elapsed();

            match &result {
                Ok(_) if duration >= SLOW_CALL_THRESHOLD => {
                    warn!(
                        "SLOW RPC call - method: {}, duration: {:?}, url: {}",
                        method_name, duration, rpc_url
                    );
                }
                Ok(_) => {
                    debug!("RPC call - method: {}, duration: {:?}", method_name, duration);
                }
                Err(err) => {
                    error!(
                        "{} - method: {}, duration: {:?}, url: {}, error: {}",
                        classify_error(&err.to_string()),
                        method_name,
                        duration,
                        rpc_url,
                        err
                    );
                }
            }

            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_error() {
        assert_eq!(classify_error("request timed out"), "RPC TIMEOUT");
        assert_eq!(classify_error("HTTP error 429"), "RPC RATE LIMITED");
        assert_eq!(classify_error("connection refused"), "RPC CONNECTION ERROR");
        assert_eq!(classify_error("execution reverted"), "RPC ERROR");
    }
}
