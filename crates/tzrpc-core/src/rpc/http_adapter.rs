use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::header;

use crate::config::ClientConfig;
use crate::error::TransportError;

use super::{RpcRequest, Transport, TransportResponse};

// ==============================================================================
// HttpTransport — reqwest-backed transport for a Tezos node
// ==============================================================================

/// Production [`Transport`] over `reqwest`.
///
/// The connection pool keeps no idle connections: a connection goes back to
/// the pool only to be closed, so there is never anything left for
/// [`close_idle_connections`](Transport::close_idle_connections) to release.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Fails when the configuration cannot be applied, e.g. a user agent that
    /// is not a valid header value.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .pool_max_idle_per_host(0)
            .tcp_nodelay(true);
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: RpcRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = self.client.request(request.method, request.url);
        if let Some(body) = request.body {
            builder = builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = builder.send().await?;
        let status = response.status();

        // Yield chunks until the body ends or fails; after a failure the
        // stream ends.
        let body = stream::unfold(Some(response), |state| async move {
            let Some(mut response) = state else {
                return None;
            };
            match response.chunk().await {
                Ok(Some(chunk)) => Some((Ok(chunk), Some(response))),
                Ok(None) => None,
                Err(err) => Some((Err(TransportError::from(err)), None)),
            }
        })
        .boxed();

        Ok(TransportResponse { status, body })
    }

    fn close_idle_connections(&self) {}
}

// ==============================================================================
// UnavailableTransport — stand-in when the HTTP client cannot be built
// ==============================================================================

/// Fails every call with the reason the real transport could not be built.
/// Lets construction hand back a client that can be repaired with
/// [`Client::set_transport`](crate::Client::set_transport).
pub(crate) struct UnavailableTransport {
    reason: String,
}

impl UnavailableTransport {
    pub(crate) fn new(err: &TransportError) -> Self {
        Self {
            reason: err.to_string(),
        }
    }
}

#[async_trait]
impl Transport for UnavailableTransport {
    async fn execute(&self, _request: RpcRequest) -> Result<TransportResponse, TransportError> {
        Err(TransportError::new(format!(
            "http transport unavailable: {}",
            self.reason
        )))
    }

    fn close_idle_connections(&self) {}
}
