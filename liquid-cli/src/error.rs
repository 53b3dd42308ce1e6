//! Structured error types for the liquid democracy CLI
//!
//! Remote failures, decoding failures and configuration failures each get
//! their own variants so callers can tell which side of the wire broke.

use lib_abi::{AbiError, H256};
use lib_governance::GovernanceError;
use thiserror::Error;

/// CLI error types with context
#[derive(Error, Debug)]
pub enum CliError {
    // Remote node
    #[error("RPC error {code}: {message}")]
    RpcError { code: i64, message: String },

    #[error("Unexpected RPC response for {method}: {reason}")]
    InvalidRpcResponse { method: String, reason: String },

    #[error("Transaction {tx_hash} reverted")]
    TransactionReverted { tx_hash: H256 },

    #[error("No receipt for transaction {tx_hash} after {waited_secs}s")]
    ReceiptTimeout { tx_hash: H256, waited_secs: u64 },

    #[error("Node has no unlocked accounts; pass --from")]
    NoAccounts,

    // Deployment
    #[error("Deployment aborted at {step} after {completed} completed step(s): {reason}")]
    DeploymentAborted {
        step: String,
        completed: usize,
        reason: String,
    },

    #[error("No DeployDAO event in the receipt of {tx_hash}")]
    DaoAddressMissing { tx_hash: H256 },

    #[error("Creation receipt of {tx_hash} carries no contract address")]
    ContractAddressMissing { tx_hash: H256 },

    // Decoding and plans
    #[error(transparent)]
    Abi(#[from] AbiError),

    #[error(transparent)]
    Governance(#[from] GovernanceError),

    // Configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to load config from {path}: {reason}")]
    ConfigLoadFailed { path: String, reason: String },

    #[error("Unknown network '{0}'")]
    UnknownNetwork(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // I/O operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    // Serialization
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    // HTTP/Network
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

impl From<String> for CliError {
    fn from(s: String) -> Self {
        CliError::Other(s)
    }
}

impl From<&str> for CliError {
    fn from(s: &str) -> Self {
        CliError::Other(s.to_string())
    }
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::Other(err.to_string())
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
