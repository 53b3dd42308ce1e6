//! Governance Errors

use lib_abi::AbiError;
use thiserror::Error;

/// Error while building or loading a deployment plan
#[derive(Error, Debug, Clone)]
pub enum GovernanceError {
    #[error("Invalid deployment id '{id}': {reason}")]
    InvalidDeploymentId { id: String, reason: String },

    #[error("Unknown preset '{0}'")]
    UnknownPreset(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Failed to read plan {path}: {reason}")]
    PlanRead { path: String, reason: String },

    #[error("Invalid plan: {0}")]
    PlanParse(String),

    #[error("Failed to serialize plan: {0}")]
    PlanSerialize(String),

    #[error(transparent)]
    Abi(#[from] AbiError),
}

/// Result type for governance operations
pub type GovernanceResult<T> = Result<T, GovernanceError>;
