use bytes::Bytes;
use reqwest::StatusCode;

use crate::rpc::NodeError;

/// Failure reported by a [`Transport`](crate::rpc::Transport), either while
/// sending a request or while streaming its body back.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct TransportError(Box<dyn std::error::Error + Send + Sync>);

impl TransportError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(source.into())
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err)
    }
}

/// Errors returned by a single RPC call.
///
/// Every variant produced after the connection stage keeps the raw response
/// bytes, reachable through [`RpcError::body`], so callers can still inspect
/// what the node sent.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("failed to construct request: {0}")]
    Request(#[source] url::ParseError),

    #[error("failed to complete request: {0}")]
    Transport(#[source] TransportError),

    #[error("could not read response body: {source}")]
    BodyRead {
        #[source]
        source: TransportError,
        partial: Bytes,
    },

    #[error("response returned code {} with body {}", .status.as_u16(), String::from_utf8_lossy(.body))]
    Status { status: StatusCode, body: Bytes },

    #[error("could not unmarshal rpc error: {source}")]
    MalformedErrorPayload {
        #[source]
        source: serde_json::Error,
        body: Bytes,
    },

    #[error("rpc error ({kind}): {message}")]
    Node {
        kind: String,
        message: String,
        errors: Vec<NodeError>,
        body: Bytes,
    },

    #[error("could not decode response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: Bytes,
    },
}

impl RpcError {
    /// Raw bytes received from the node, if the call got that far.
    /// For [`RpcError::BodyRead`] this is whatever arrived before the stream
    /// failed.
    pub fn body(&self) -> Option<&Bytes> {
        match self {
            Self::Request(_) | Self::Transport(_) => None,
            Self::BodyRead { partial, .. } => Some(partial),
            Self::Status { body, .. }
            | Self::MalformedErrorPayload { body, .. }
            | Self::Node { body, .. }
            | Self::Decode { body, .. } => Some(body),
        }
    }

    /// HTTP status of the response, when the failure was a non-200 reply.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failure while constructing a client: building the HTTP transport, or one
/// of the two bootstrap steps.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("could not initialize client: building http transport failed")]
    Transport(#[source] TransportError),

    #[error("could not initialize client with network constants: fetching chain head failed")]
    Head(#[source] RpcError),

    #[error("could not initialize client with network constants: fetching constants for block {hash} failed")]
    Constants {
        hash: String,
        #[source]
        source: RpcError,
    },
}

impl BootstrapError {
    /// The RPC failure underneath, when a bootstrap call was made at all.
    pub fn rpc_error(&self) -> Option<&RpcError> {
        match self {
            Self::Transport(_) => None,
            Self::Head(err) => Some(err),
            Self::Constants { source, .. } => Some(source),
        }
    }
}
