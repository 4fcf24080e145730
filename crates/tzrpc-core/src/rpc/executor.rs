use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use reqwest::StatusCode;
use tracing::{debug, trace};

use crate::config::ErrorDetection;
use crate::error::RpcError;

use super::classify::classify;
use super::{RpcRequest, Transport};

/// Send `request` and turn the reply into the body bytes or an [`RpcError`].
///
/// The whole body is read before the status is looked at, so every failure
/// after the send still carries what the node returned. Idle connections are
/// released only after a fully successful call.
pub(crate) async fn execute(
    transport: &dyn Transport,
    request: RpcRequest,
    detection: ErrorDetection,
) -> Result<Bytes, RpcError> {
    let method = request.method.clone();
    let url = request.url.to_string();
    debug!(rpc.method = %method, rpc.url = %url, "rpc call");

    let response = transport
        .execute(request)
        .await
        .map_err(RpcError::Transport)?;
    let status = response.status;

    let mut stream = response.body;
    let mut buf = BytesMut::new();
    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(chunk) => buf.extend_from_slice(&chunk),
            Err(source) => {
                return Err(RpcError::BodyRead {
                    source,
                    partial: buf.freeze(),
                });
            }
        }
    }
    let body = buf.freeze();
    debug!(rpc.method = %method, rpc.url = %url, %status, body_len = body.len(), "rpc response");
    trace!(rpc.url = %url, body = %String::from_utf8_lossy(&body), "rpc response body");

    if status != StatusCode::OK {
        return Err(RpcError::Status { status, body });
    }

    match classify(&body, detection) {
        Ok(None) => {}
        Ok(Some(errors)) => {
            let first = &errors[0];
            let kind = first.kind.clone();
            let message = first.description().to_owned();
            debug!(rpc.url = %url, error.kind = %kind, error.count = errors.len(), "node reported error");
            return Err(RpcError::Node {
                kind,
                message,
                errors,
                body,
            });
        }
        Err(source) => return Err(RpcError::MalformedErrorPayload { source, body }),
    }

    transport.close_idle_connections();

    Ok(body)
}
