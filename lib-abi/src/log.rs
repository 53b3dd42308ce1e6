//! Receipts, raw logs and event decoding
//!
//! `decode_events` is the filter-and-match step used after every
//! deployment transaction: hash the event signature, keep the logs whose
//! first topic carries that hash, and decode each match against the
//! declared argument list. It is pure and never touches the network.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::codec;
use crate::errors::{AbiError, AbiResult};
use crate::interface::{Event, Interface};
use crate::param::ParamType;
use crate::token::Token;
use crate::types::{Address, HexBytes, Quantity, H256};

/// Raw log entry as found in a transaction receipt
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    pub address: Address,
    pub topics: Vec<H256>,
    #[serde(default)]
    pub data: HexBytes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_index: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<H256>,
}

/// Transaction receipt
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub transaction_hash: H256,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<Quantity>,
    /// `0x1` success, `0x0` reverted. Absent on pre-Byzantium chains.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Quantity>,
    #[serde(default)]
    pub logs: Vec<Log>,
}

impl Receipt {
    pub fn succeeded(&self) -> bool {
        self.status.map(|s| s.as_u64() == 1).unwrap_or(true)
    }

    /// Accept either a bare receipt or a call result wrapping it (`{"receipt": {..}}`)
    pub fn from_json_value(value: Value) -> AbiResult<Self> {
        let inner = match value {
            Value::Object(mut map) if map.contains_key("receipt") => {
                map.remove("receipt").unwrap_or(Value::Null)
            }
            other => other,
        };
        serde_json::from_value(inner).map_err(|e| AbiError::InvalidData(format!("receipt: {}", e)))
    }
}

/// One named argument of a decoded event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventArg {
    pub name: String,
    pub indexed: bool,
    pub value: Token,
}

/// A log matched and decoded against an event declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEvent {
    pub event: String,
    pub address: Address,
    pub transaction_hash: Option<H256>,
    pub log_index: Option<u64>,
    /// Arguments in declaration order
    pub args: Vec<EventArg>,
}

impl DecodedEvent {
    pub fn arg(&self, name: &str) -> Option<&Token> {
        self.args.iter().find(|a| a.name == name).map(|a| &a.value)
    }

    pub fn to_json(&self) -> Value {
        let mut args = Map::new();
        for arg in &self.args {
            args.insert(arg.name.clone(), arg.value.to_json());
        }
        json!({
            "event": self.event,
            "address": self.address.to_checksum(),
            "transactionHash": self.transaction_hash.map(|h| h.to_string()),
            "logIndex": self.log_index,
            "args": Value::Object(args),
        })
    }
}

/// Reference types are stored in topics as the hash of their encoding
fn hashed_in_topic(kind: &ParamType) -> bool {
    matches!(
        kind,
        ParamType::Bytes
            | ParamType::String
            | ParamType::Array(_)
            | ParamType::FixedArray(..)
            | ParamType::Tuple(_)
    )
}

/// Decode one log against an event declaration.
///
/// Indexed arguments come from `topics[1..]`; reference-typed indexed values are
/// only present as their hash and are returned as `bytes32`. The remaining
/// arguments come from the data payload. The result interleaves both back
/// into declaration order.
pub fn decode_log(event: &Event, log: &Log) -> AbiResult<DecodedEvent> {
    let expected_topics = event.indexed_count() + usize::from(!event.anonymous);
    if log.topics.len() != expected_topics {
        return Err(AbiError::TopicCountMismatch {
            name: event.name.clone(),
            expected: expected_topics,
            actual: log.topics.len(),
        });
    }

    let mut topics = log.topics.iter().skip(usize::from(!event.anonymous));
    let mut indexed_values = Vec::new();
    let mut data_types = Vec::new();
    for param in &event.inputs {
        let kind = param.param_type()?;
        if param.indexed {
            let topic = topics.next().ok_or_else(|| {
                AbiError::InvalidData(format!("missing topic for '{}'", param.name))
            })?;
            let value = if hashed_in_topic(&kind) {
                Token::FixedBytes(topic.0.to_vec())
            } else {
                codec::decode_word(&kind, &topic.0)?
            };
            indexed_values.push(value);
        } else {
            data_types.push(kind);
        }
    }

    let data_values = codec::decode(&data_types, log.data.as_slice())?;

    let mut indexed_iter = indexed_values.into_iter();
    let mut data_iter = data_values.into_iter();
    let mut args = Vec::with_capacity(event.inputs.len());
    for param in &event.inputs {
        let value = if param.indexed {
            indexed_iter.next()
        } else {
            data_iter.next()
        }
        .ok_or_else(|| AbiError::InvalidData(format!("no value for '{}'", param.name)))?;
        args.push(EventArg {
            name: param.name.clone(),
            indexed: param.indexed,
            value,
        });
    }

    Ok(DecodedEvent {
        event: event.name.clone(),
        address: log.address,
        transaction_hash: log.transaction_hash,
        log_index: log.log_index.map(|q| q.as_u64()),
        args,
    })
}

/// Decode every log of `receipt` emitted as `event_name`.
///
/// Fails fast when the interface declares the event zero or several times,
/// or declares it anonymous. Matching logs keep their receipt order; a
/// receipt with no matching log yields an empty vector.
pub fn decode_events(
    receipt: &Receipt,
    interface: &Interface,
    event_name: &str,
) -> AbiResult<Vec<DecodedEvent>> {
    let event = interface.event(event_name)?;
    if event.anonymous {
        return Err(AbiError::AnonymousEvent(event_name.to_string()));
    }
    let topic = event.topic()?;

    let decoded = receipt
        .logs
        .iter()
        .filter(|log| log.topics.first() == Some(&topic))
        .map(|log| decode_log(event, log))
        .collect::<AbiResult<Vec<_>>>()?;

    debug!(
        "Decoded {} '{}' event(s) from {} log(s) of {}",
        decoded.len(),
        event_name,
        receipt.logs.len(),
        receipt.transaction_hash
    );
    Ok(decoded)
}
