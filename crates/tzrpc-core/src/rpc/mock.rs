use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use reqwest::{Method, StatusCode};

use crate::error::TransportError;

use super::{RpcRequest, Transport, TransportResponse};

/// Canned reply served by [`MockTransport`].
#[derive(Debug, Clone)]
pub struct MockResponse {
    status: StatusCode,
    chunks: Vec<Bytes>,
    truncated: bool,
}

impl MockResponse {
    pub fn ok(body: &str) -> Self {
        Self::with_status(StatusCode::OK, body)
    }

    pub fn with_status(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            chunks: vec![Bytes::copy_from_slice(body.as_bytes())],
            truncated: false,
        }
    }

    /// A reply whose body stream fails after delivering `partial`.
    pub fn truncated(status: StatusCode, partial: &str) -> Self {
        Self {
            status,
            chunks: vec![Bytes::copy_from_slice(partial.as_bytes())],
            truncated: true,
        }
    }
}

/// A mock transport for testing. Serves canned replies keyed by method and
/// URL path, records every request, and counts idle-connection releases.
pub struct MockTransport {
    routes: HashMap<(Method, String), MockResponse>,
    unreachable: bool,
    requests: Mutex<Vec<RpcRequest>>,
    idle_closes: AtomicUsize,
}

impl MockTransport {
    pub fn builder() -> MockTransportBuilder {
        MockTransportBuilder {
            routes: HashMap::new(),
            unreachable: false,
        }
    }

    pub fn requests(&self) -> Vec<RpcRequest> {
        self.requests.lock().expect("mock requests poisoned").clone()
    }

    pub fn idle_closes(&self) -> usize {
        self.idle_closes.load(Ordering::SeqCst)
    }
}

pub struct MockTransportBuilder {
    routes: HashMap<(Method, String), MockResponse>,
    unreachable: bool,
}

impl MockTransportBuilder {
    pub fn route(mut self, method: Method, path: &str, response: MockResponse) -> Self {
        self.routes.insert((method, path.to_owned()), response);
        self
    }

    /// Fail every send as if the node could not be reached.
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    pub fn build(self) -> MockTransport {
        MockTransport {
            routes: self.routes,
            unreachable: self.unreachable,
            requests: Mutex::new(Vec::new()),
            idle_closes: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: RpcRequest) -> Result<TransportResponse, TransportError> {
        let key = (request.method.clone(), request.url.path().to_owned());
        self.requests
            .lock()
            .expect("mock requests poisoned")
            .push(request);

        if self.unreachable {
            return Err(TransportError::new("connection refused"));
        }

        let response = self
            .routes
            .get(&key)
            .cloned()
            .unwrap_or_else(|| MockResponse::with_status(StatusCode::NOT_FOUND, "not found"));

        let mut items: Vec<Result<Bytes, TransportError>> =
            response.chunks.into_iter().map(Ok).collect();
        if response.truncated {
            items.push(Err(TransportError::new("unexpected end of body")));
        }

        Ok(TransportResponse {
            status: response.status,
            body: stream::iter(items).boxed(),
        })
    }

    fn close_idle_connections(&self) {
        self.idle_closes.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use futures::TryStreamExt;
    use reqwest::Url;

    use super::*;

    fn request(method: Method, path: &str) -> RpcRequest {
        let url = Url::parse(&format!("http://node{path}")).expect("test url must parse");
        RpcRequest::new(method, url)
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let mock = MockTransport::builder().build();
        let response = mock
            .execute(request(Method::GET, "/missing"))
            .await
            .expect("mock send must succeed");
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn truncated_reply_fails_after_partial_body() {
        let mock = MockTransport::builder()
            .route(
                Method::GET,
                "/chains/main/blocks/head",
                MockResponse::truncated(StatusCode::OK, "{\"hash\":"),
            )
            .build();
        let response = mock
            .execute(request(Method::GET, "/chains/main/blocks/head"))
            .await
            .expect("mock send must succeed");
        let collected: Result<Vec<Bytes>, TransportError> = response.body.try_collect().await;
        assert!(collected.is_err());
    }
}
