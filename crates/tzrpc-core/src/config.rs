//! Client knobs: transport timeouts and how embedded node errors are detected.

use std::time::Duration;

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// How a `200 OK` body is checked for an embedded node error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorDetection {
    /// Any body containing the text `error` must decode as an error array;
    /// if it does not, the call fails with a malformed-payload error. This
    /// is what existing Tezos tooling does.
    #[default]
    Substring,
    /// Only a body that decodes as a non-empty array of `{kind, error|id}`
    /// records is an error. Anything else is returned as a normal payload.
    Strict,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Bound on TCP connect plus TLS handshake.
    pub connect_timeout: Duration,
    /// Bound on a whole request, body included.
    pub request_timeout: Duration,
    pub error_detection: ErrorDetection,
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            error_detection: ErrorDetection::default(),
            user_agent: None,
        }
    }
}

impl ClientConfig {
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_error_detection(mut self, detection: ErrorDetection) -> Self {
        self.error_detection = detection;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}
