/// Canonicalize a node address into the base every request path is appended
/// to: one trailing `/` removed, `http://` added when no scheme is given.
///
/// Nothing else is validated; a bad host shows up later as a request
/// construction error.
pub fn normalize_host(host: &str) -> String {
    let host = host.strip_suffix('/').unwrap_or(host);
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_owned()
    } else {
        format!("http://{host}")
    }
}
