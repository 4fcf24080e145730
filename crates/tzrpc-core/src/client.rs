use std::sync::{Arc, PoisonError, RwLock};

use bytes::Bytes;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::config::{ClientConfig, ErrorDetection};
use crate::error::{BootstrapError, RpcError};
use crate::host::normalize_host;
use crate::rpc::{
    attach_options, execute, HttpTransport, RpcOption, RpcRequest, Transport, UnavailableTransport,
};
use crate::types::{Block, Constants};

const HEAD_PATH: &str = "/chains/main/blocks/head";

// ==============================================================================
// Client
// ==============================================================================

/// Client for one Tezos node.
///
/// All calls go to the host given at construction. The transport and the
/// cached network constants can be replaced at any time, including while
/// other tasks have calls in flight; those calls finish on whatever they
/// already picked up.
pub struct Client {
    transport: RwLock<Arc<dyn Transport>>,
    host: String,
    detection: ErrorDetection,
    constants: RwLock<Option<Arc<Constants>>>,
}

impl Client {
    /// Connect to `host` with the default configuration and fetch the
    /// network constants of the current head.
    ///
    /// A client is returned even if bootstrapping fails; check
    /// [`Bootstrap::error`] and repair with [`Client::set_constants`] if
    /// needed.
    pub async fn new(host: &str) -> Bootstrap {
        Self::with_config(host, ClientConfig::default()).await
    }

    /// Like [`Client::new`], with explicit transport settings.
    ///
    /// If the HTTP transport cannot be built from `config`, no request is
    /// made: the client comes back with a transport that fails every call and
    /// [`BootstrapError::Transport`] as the error.
    pub async fn with_config(host: &str, config: ClientConfig) -> Bootstrap {
        match HttpTransport::new(&config) {
            Ok(transport) => {
                Bootstrap::run(Self::with_transport(host, Arc::new(transport), &config)).await
            }
            Err(err) => {
                warn!(error = %err, "could not build http transport; client has no working transport");
                let transport = Arc::new(UnavailableTransport::new(&err));
                Bootstrap {
                    client: Self::with_transport(host, transport, &config),
                    error: Some(BootstrapError::Transport(err)),
                }
            }
        }
    }

    /// Build a client without any network I/O. Constants stay unset until
    /// [`Client::bootstrap`] or [`Client::set_constants`] is called.
    pub fn with_transport(host: &str, transport: Arc<dyn Transport>, config: &ClientConfig) -> Self {
        Self {
            transport: RwLock::new(transport),
            host: normalize_host(host),
            detection: config.error_detection,
            constants: RwLock::new(None),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Constants cached by bootstrap or the last [`Client::set_constants`].
    pub fn constants(&self) -> Option<Arc<Constants>> {
        self.constants
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the cached constants. Not checked against the node.
    pub fn set_constants(&self, constants: Constants) {
        *self
            .constants
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(constants));
    }

    /// Replace the transport used by every subsequent call.
    pub fn set_transport(&self, transport: Arc<dyn Transport>) {
        *self
            .transport
            .write()
            .unwrap_or_else(PoisonError::into_inner) = transport;
    }

    fn transport(&self) -> Arc<dyn Transport> {
        self.transport
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // --------------------------------------------------------------------------
    // Raw calls
    // --------------------------------------------------------------------------

    pub async fn get(&self, path: &str, options: &[RpcOption]) -> Result<Bytes, RpcError> {
        self.call(Method::GET, path, None, options).await
    }

    pub async fn post(
        &self,
        path: &str,
        body: impl Into<Bytes>,
        options: &[RpcOption],
    ) -> Result<Bytes, RpcError> {
        self.call(Method::POST, path, Some(body.into()), options)
            .await
    }

    pub async fn delete(&self, path: &str, options: &[RpcOption]) -> Result<Bytes, RpcError> {
        self.call(Method::DELETE, path, None, options).await
    }

    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
        options: &[RpcOption],
    ) -> Result<Bytes, RpcError> {
        // Paths are appended verbatim; callers supply the leading `/`.
        let mut url = Url::parse(&format!("{}{}", self.host, path)).map_err(RpcError::Request)?;
        attach_options(&mut url, options);

        let mut request = RpcRequest::new(method, url);
        if let Some(body) = body {
            request = request.with_body(body);
        }

        let transport = self.transport();
        execute(transport.as_ref(), request, self.detection).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &[RpcOption],
    ) -> Result<T, RpcError> {
        let body = self.get(path, options).await?;
        serde_json::from_slice(&body).map_err(|source| RpcError::Decode { source, body })
    }

    // --------------------------------------------------------------------------
    // Bootstrap endpoints
    // --------------------------------------------------------------------------

    /// Current head of the main chain.
    pub async fn head(&self) -> Result<Block, RpcError> {
        self.get_json(HEAD_PATH, &[]).await
    }

    /// Network constants in effect at block `hash`.
    pub async fn constants_at(&self, hash: &str) -> Result<Constants, RpcError> {
        self.get_json(&format!("/chains/main/blocks/{hash}/context/constants"), &[])
            .await
    }

    /// Fetch the head, then the constants for its hash, and cache them.
    ///
    /// No retry. On failure the cached constants are left as they were and
    /// the error names the step that failed.
    pub async fn bootstrap(&self) -> Result<Arc<Constants>, BootstrapError> {
        let head = self.head().await.map_err(BootstrapError::Head)?;
        let constants = self
            .constants_at(&head.hash)
            .await
            .map_err(|source| BootstrapError::Constants {
                hash: head.hash.clone(),
                source,
            })?;

        let constants = Arc::new(constants);
        *self
            .constants
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&constants));
        info!(
            host = %self.host,
            head.hash = %head.hash,
            head.level = head.header.level,
            protocol = %head.protocol,
            "loaded network constants"
        );
        Ok(constants)
    }
}

// ==============================================================================
// Bootstrap Result
// ==============================================================================

/// Outcome of constructing a [`Client`]: the client, always, plus the
/// bootstrap failure if there was one.
pub struct Bootstrap {
    pub client: Client,
    pub error: Option<BootstrapError>,
}

impl Bootstrap {
    /// Run the bootstrap sequence on a freshly built client.
    pub async fn run(client: Client) -> Self {
        let error = client.bootstrap().await.err();
        if let Some(err) = &error {
            warn!(host = %client.host, error = %err, "client bootstrap failed; network constants unset");
        }
        Self { client, error }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_parts(self) -> (Client, Option<BootstrapError>) {
        (self.client, self.error)
    }

    /// Discard the client if bootstrapping failed.
    pub fn into_result(self) -> Result<Client, BootstrapError> {
        match self.error {
            None => Ok(self.client),
            Some(err) => Err(err),
        }
    }
}
