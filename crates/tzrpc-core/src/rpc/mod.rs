//! Tezos node RPC request pipeline.
//!
//! Defines the [`Transport`] capability the client sends requests through,
//! a reqwest implementation ([`HttpTransport`]), the executor that turns a
//! response into bytes or a typed [`RpcError`](crate::RpcError), and a test
//! double (`mock::MockTransport`).

mod classify;
mod executor;
mod http_adapter;
#[cfg(test)]
pub mod mock;
mod query;

pub use classify::{classify, NodeError};
pub use http_adapter::HttpTransport;
pub(crate) use http_adapter::UnavailableTransport;
pub use query::{attach_options, RpcOption};

pub(crate) use executor::execute;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use reqwest::{Method, StatusCode, Url};

use crate::error::TransportError;

/// Streamed response body. A transport yields chunks as they arrive so a
/// failure mid-body still leaves the earlier chunks readable.
pub type BodyStream = BoxStream<'static, Result<Bytes, TransportError>>;

/// A fully constructed outbound request.
#[derive(Debug, Clone)]
pub struct RpcRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<Bytes>,
}

impl RpcRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            body: None,
        }
    }

    pub fn with_body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }
}

/// Status line and body stream of a response, before the body is read.
pub struct TransportResponse {
    pub status: StatusCode,
    pub body: BodyStream,
}

/// HTTP capability the client is built on.
///
/// Implementations must be safe to share between concurrent callers; the
/// client hands the same instance to every in-flight request.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and return the response headers with its body stream.
    /// Errors here mean no response was received at all.
    async fn execute(&self, request: RpcRequest) -> Result<TransportResponse, TransportError>;

    /// Drop connections that are pooled but not serving a request.
    fn close_idle_connections(&self);
}
