//! Contract interface and event log decoding
//!
//! This crate provides the pure, transport-independent pieces of the
//! deployment toolkit: the contract interface document model, the ABI
//! head/tail codec, signature hashing and the receipt log decoder.
//!
//! # Usage
//!
//! ```ignore
//! use lib_abi::{decode_events, Interface, Receipt};
//!
//! let factory = Interface::from_json(DAO_FACTORY_ABI)?;
//! let events = decode_events(&receipt, &factory, "DeployDAO")?;
//! let dao = events[0].arg("dao").and_then(|t| t.as_address());
//! ```

pub mod codec;
pub mod errors;
pub mod hash;
pub mod interface;
pub mod log;
pub mod param;
pub mod token;
pub mod types;

pub use errors::{AbiError, AbiResult};
pub use hash::{app_id, keccak256, namehash, selector};
pub use interface::{Artifact, Event, Function, Interface, Param};
pub use log::{decode_events, decode_log, DecodedEvent, EventArg, Log, Receipt};
pub use param::ParamType;
pub use token::Token;
pub use types::{decode_hex, encode_hex, Address, HexBytes, Quantity, Uint256, H256};
