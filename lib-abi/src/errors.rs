//! ABI Errors

use thiserror::Error;

/// Error while reading interface documents or encoding/decoding ABI data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbiError {
    #[error("Event '{0}' not found in interface")]
    EventNotFound(String),

    #[error("Event '{name}' is declared {count} times in interface")]
    AmbiguousEvent { name: String, count: usize },

    #[error("Event '{0}' is anonymous and has no signature topic")]
    AnonymousEvent(String),

    #[error("Function '{0}' not found in interface")]
    FunctionNotFound(String),

    #[error("Function '{name}' is declared {count} times in interface")]
    AmbiguousFunction { name: String, count: usize },

    #[error("No function with selector 0x{0} in interface")]
    UnknownSelector(String),

    #[error("Interface has no constructor")]
    MissingConstructor,

    #[error("Invalid parameter type '{0}'")]
    InvalidType(String),

    #[error("'{name}' expects {expected} arguments, got {actual}")]
    ArgumentCount {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Argument {index} of '{name}' does not match type {expected}")]
    ArgumentType {
        name: String,
        index: usize,
        expected: String,
    },

    #[error("Log carries {actual} topics, event '{name}' expects {expected}")]
    TopicCountMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid ABI data: {0}")]
    InvalidData(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    #[error("Invalid interface document: {0}")]
    InvalidInterface(String),
}

/// Result type for ABI operations
pub type AbiResult<T> = Result<T, AbiError>;
