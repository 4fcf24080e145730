use reqwest::Url;

/// One query-string parameter attached to an RPC call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcOption {
    key: String,
    value: String,
}

impl RpcOption {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for RpcOption {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

/// Append `options` to the query string of `url`, URL-encoded, in order.
///
/// Existing pairs are kept and repeated keys are appended rather than
/// replaced. An empty slice leaves the URL untouched.
pub fn attach_options(url: &mut Url, options: &[RpcOption]) {
    if options.is_empty() {
        return;
    }
    let mut pairs = url.query_pairs_mut();
    for option in options {
        pairs.append_pair(&option.key, &option.value);
    }
}
