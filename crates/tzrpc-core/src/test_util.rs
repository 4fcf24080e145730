//! Shared test fixtures for `tzrpc-core` unit tests.
//!
//! Canned node payloads used by the type decoders, the executor and the
//! bootstrap tests, so every module decodes the same shapes.

use reqwest::Method;

use crate::rpc::mock::{MockResponse, MockTransportBuilder};

pub const HEAD_PATH: &str = "/chains/main/blocks/head";

pub fn constants_path(hash: &str) -> String {
    format!("/chains/main/blocks/{hash}/context/constants")
}

// ==============================================================================
// Payloads
// ==============================================================================

/// A head block at level 1000 with the given hash.
pub fn head_json(hash: &str) -> String {
    serde_json::json!({
        "protocol": "PsBabyM1eUXZseaJdmXFApDSBqj8YBfwELoxZHHW77EMcAbbwAS",
        "chain_id": "NetXdQprcVkpaWU",
        "hash": hash,
        "header": {
            "level": 1000,
            "proto": 5,
            "predecessor": "BLbPredecessorHash",
            "timestamp": "2019-10-18T21:33:00Z",
            "validation_pass": 4,
            "operations_hash": "LLoaOperationsHash",
            "fitness": ["01", "00000000000003e8"],
            "context": "CoContextHash",
            "priority": 0,
            "signature": "sigSignature"
        },
        "metadata": {},
        "operations": [[], [], [], []]
    })
    .to_string()
}

/// Babylon-era constants, with 64-bit quantities as strings the way the
/// node sends them.
pub fn constants_json() -> String {
    serde_json::json!({
        "proof_of_work_nonce_size": 8,
        "nonce_length": 32,
        "max_anon_ops_per_block": 132,
        "max_operation_data_length": 16384,
        "max_proposals_per_delegate": 20,
        "preserved_cycles": 5,
        "blocks_per_cycle": 4096,
        "blocks_per_commitment": 32,
        "blocks_per_roll_snapshot": 256,
        "blocks_per_voting_period": 32768,
        "time_between_blocks": ["60", "40"],
        "endorsers_per_block": 32,
        "hard_gas_limit_per_operation": "800000",
        "hard_gas_limit_per_block": "8000000",
        "proof_of_work_threshold": "70368744177663",
        "tokens_per_roll": "8000000000",
        "michelson_maximum_type_size": 1000,
        "seed_nonce_revelation_tip": "125000",
        "origination_size": 257,
        "block_security_deposit": "512000000",
        "endorsement_security_deposit": "64000000",
        "baking_reward_per_endorsement": ["1250000", "187500"],
        "endorsement_reward": ["1250000", "833333"],
        "cost_per_byte": "1000",
        "hard_storage_limit_per_operation": "60000",
        "test_chain_duration": "1966080",
        "quorum_min": 2000,
        "quorum_max": 7000,
        "min_proposal_quorum": 500,
        "initial_endorsers": 24,
        "delay_per_missing_endorsement": "8"
    })
    .to_string()
}

// ==============================================================================
// Mock Node Routes
// ==============================================================================

/// Register a healthy head and its constants on a mock transport builder.
pub fn healthy_node(builder: MockTransportBuilder, hash: &str) -> MockTransportBuilder {
    builder
        .route(Method::GET, HEAD_PATH, MockResponse::ok(&head_json(hash)))
        .route(
            Method::GET,
            &constants_path(hash),
            MockResponse::ok(&constants_json()),
        )
}
