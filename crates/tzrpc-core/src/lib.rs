pub mod client;
pub mod config;
pub mod error;
pub mod host;
pub mod rpc;
#[cfg(test)]
mod test_util;
pub mod types;

pub use client::{Bootstrap, Client};
pub use config::{ClientConfig, ErrorDetection};
pub use error::{BootstrapError, RpcError, TransportError};
pub use rpc::{NodeError, RpcOption};
pub use types::{Block, Constants, MUTEZ};
