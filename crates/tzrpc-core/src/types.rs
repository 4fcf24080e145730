//! Tezos domain types used by the client itself.
//!
//! Only the records the bootstrap sequence needs are modelled here: the head
//! block (for its hash) and the network constants cached on the client. Other
//! endpoint schemas belong to callers, who decode the raw bytes themselves.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Number of mutez in one tez.
pub const MUTEZ: u64 = 1_000_000;

// ==============================================================================
// Blocks
// ==============================================================================

/// A block as returned by `/chains/main/blocks/{id}`, reduced to the fields
/// the client reads. Operations and metadata are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub hash: String,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub chain_id: String,
    #[serde(default)]
    pub header: BlockHeader,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockHeader {
    pub level: i64,
    pub proto: u32,
    pub predecessor: String,
    pub timestamp: String,
    pub validation_pass: u32,
    pub operations_hash: String,
    pub fitness: Vec<String>,
    pub context: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    pub signature: String,
}

// ==============================================================================
// Network Constants
// ==============================================================================

/// Protocol parameters from `/chains/main/blocks/{hash}/context/constants`.
///
/// The node encodes 64-bit quantities (mutez amounts, gas, durations) as JSON
/// strings; those fields accept either form. Missing fields default to zero
/// and fields this struct does not know about are kept in `extra`, so the
/// record survives protocol upgrades.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constants {
    pub proof_of_work_nonce_size: u32,
    pub nonce_length: u32,
    pub max_anon_ops_per_block: u32,
    pub max_operation_data_length: u32,
    pub max_proposals_per_delegate: u32,
    pub preserved_cycles: u32,
    pub blocks_per_cycle: u32,
    pub blocks_per_commitment: u32,
    pub blocks_per_roll_snapshot: u32,
    pub blocks_per_voting_period: u32,
    #[serde(deserialize_with = "stringified::vec")]
    pub time_between_blocks: Vec<u64>,
    pub endorsers_per_block: u32,
    #[serde(deserialize_with = "stringified::value")]
    pub hard_gas_limit_per_operation: i64,
    #[serde(deserialize_with = "stringified::value")]
    pub hard_gas_limit_per_block: i64,
    #[serde(deserialize_with = "stringified::value")]
    pub proof_of_work_threshold: i64,
    #[serde(deserialize_with = "stringified::value")]
    pub tokens_per_roll: u64,
    pub michelson_maximum_type_size: u32,
    #[serde(deserialize_with = "stringified::value")]
    pub seed_nonce_revelation_tip: u64,
    pub origination_size: u32,
    #[serde(deserialize_with = "stringified::value")]
    pub block_security_deposit: u64,
    #[serde(deserialize_with = "stringified::value")]
    pub endorsement_security_deposit: u64,
    #[serde(deserialize_with = "stringified::vec")]
    pub baking_reward_per_endorsement: Vec<u64>,
    #[serde(deserialize_with = "stringified::vec")]
    pub endorsement_reward: Vec<u64>,
    #[serde(deserialize_with = "stringified::value")]
    pub cost_per_byte: u64,
    #[serde(deserialize_with = "stringified::value")]
    pub hard_storage_limit_per_operation: i64,
    #[serde(deserialize_with = "stringified::value")]
    pub test_chain_duration: u64,
    pub quorum_min: i32,
    pub quorum_max: i32,
    pub min_proposal_quorum: i32,
    pub initial_endorsers: u32,
    #[serde(deserialize_with = "stringified::value")]
    pub delay_per_missing_endorsement: u64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Constants {
    /// Minimal delay between blocks at priority zero.
    pub fn block_time(&self) -> Option<Duration> {
        self.time_between_blocks
            .first()
            .map(|secs| Duration::from_secs(*secs))
    }

    /// Tokens per roll in tez.
    pub fn tokens_per_roll_tez(&self) -> u64 {
        self.tokens_per_roll / MUTEZ
    }
}

/// Deserializers for integers the node may send as JSON strings.
mod stringified {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::de::{self, Deserializer};
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr<T> {
        Text(String),
        Number(T),
    }

    impl<T> Repr<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        fn into_value<E: de::Error>(self) -> Result<T, E> {
            match self {
                Self::Text(text) => text.parse().map_err(E::custom),
                Self::Number(n) => Ok(n),
            }
        }
    }

    pub fn value<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr + Deserialize<'de>,
        T::Err: Display,
    {
        Repr::<T>::deserialize(deserializer)?.into_value()
    }

    pub fn vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr + Deserialize<'de>,
        T::Err: Display,
    {
        Vec::<Repr<T>>::deserialize(deserializer)?
            .into_iter()
            .map(Repr::into_value)
            .collect()
    }
}
