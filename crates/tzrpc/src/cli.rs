use std::time::Duration;

use clap::{Parser, Subcommand};

use tzrpc_core::{ClientConfig, ErrorDetection, RpcOption};

/// tzrpc: query a Tezos node over its RPC interface.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Tezos node RPC address. The scheme defaults to http.
    #[arg(long, default_value = "http://127.0.0.1:8732", env = "TZRPC_NODE")]
    pub node: String,

    /// Connect and TLS handshake timeout in seconds.
    #[arg(long, default_value = "10")]
    pub connect_timeout_secs: u64,

    /// Whole-request timeout in seconds.
    #[arg(long, default_value = "10")]
    pub timeout_secs: u64,

    /// Only treat a body as a node error when it decodes as an error array.
    #[arg(long)]
    pub strict_errors: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the current head block.
    Head,
    /// Print the network constants loaded at startup.
    Constants,
    /// GET an RPC path, e.g. `/chains/main/blocks/head/header`.
    Get {
        path: String,
        /// Query parameter as `key=value` (repeatable).
        #[arg(short = 'q', long = "query", value_parser = parse_rpc_option)]
        query: Vec<RpcOption>,
    },
    /// POST a JSON body to an RPC path.
    Post {
        path: String,
        /// Request body; sent as-is.
        #[arg(long, default_value = "{}")]
        data: String,
        /// Query parameter as `key=value` (repeatable).
        #[arg(short = 'q', long = "query", value_parser = parse_rpc_option)]
        query: Vec<RpcOption>,
    },
    /// DELETE an RPC path.
    Delete {
        path: String,
        /// Query parameter as `key=value` (repeatable).
        #[arg(short = 'q', long = "query", value_parser = parse_rpc_option)]
        query: Vec<RpcOption>,
    },
}

impl Cli {
    pub fn client_config(&self) -> ClientConfig {
        let detection = if self.strict_errors {
            ErrorDetection::Strict
        } else {
            ErrorDetection::Substring
        };
        ClientConfig::default()
            .with_connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .with_request_timeout(Duration::from_secs(self.timeout_secs))
            .with_error_detection(detection)
            .with_user_agent(concat!("tzrpc/", env!("CARGO_PKG_VERSION")))
    }
}

fn parse_rpc_option(raw: &str) -> Result<RpcOption, String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected `key=value`, got `{raw}`"))?;
    if key.is_empty() {
        return Err(format!("query key must not be empty in `{raw}`"));
    }
    Ok(RpcOption::new(key, value))
}
