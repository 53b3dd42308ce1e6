//! Contract interface documents
//!
//! Reads the JSON interface description emitted by contract compilers,
//! either as a bare array of entries or wrapped in a build artifact
//! (`{"contractName": .., "abi": [..], "bytecode": ".."}`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec;
use crate::errors::{AbiError, AbiResult};
use crate::hash::{keccak256, selector};
use crate::param::ParamType;
use crate::token::Token;
use crate::types::{decode_hex, H256};

/// One input or output parameter
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Param {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub indexed: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Param>,
}

impl Param {
    /// Resolve the parameter type, expanding `tuple` entries from `components`
    pub fn param_type(&self) -> AbiResult<ParamType> {
        match self.kind.strip_prefix("tuple") {
            Some(suffix) => {
                let members = self
                    .components
                    .iter()
                    .map(Param::param_type)
                    .collect::<AbiResult<Vec<_>>>()?;
                let tuple = ParamType::Tuple(members);
                if suffix.is_empty() {
                    Ok(tuple)
                } else {
                    ParamType::parse(&format!("{}{}", tuple, suffix))
                }
            }
            None => ParamType::parse(&self.kind),
        }
    }
}

fn param_types(params: &[Param]) -> AbiResult<Vec<ParamType>> {
    params.iter().map(Param::param_type).collect()
}

fn signature_of(name: &str, params: &[Param]) -> AbiResult<String> {
    let types = param_types(params)?
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    Ok(format!("{}({})", name, types))
}

fn check_arguments(name: &str, params: &[Param], args: &[Token]) -> AbiResult<()> {
    if params.len() != args.len() {
        return Err(AbiError::ArgumentCount {
            name: name.to_string(),
            expected: params.len(),
            actual: args.len(),
        });
    }
    for (index, (param, arg)) in params.iter().zip(args).enumerate() {
        let kind = param.param_type()?;
        if !arg.matches(&kind) {
            return Err(AbiError::ArgumentType {
                name: name.to_string(),
                index,
                expected: kind.to_string(),
            });
        }
    }
    Ok(())
}

/// Event declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub name: String,
    pub inputs: Vec<Param>,
    pub anonymous: bool,
}

impl Event {
    /// Canonical signature, e.g. `DeployDAO(address)`
    pub fn signature(&self) -> AbiResult<String> {
        signature_of(&self.name, &self.inputs)
    }

    /// Signature hash carried as the first topic of matching logs
    pub fn topic(&self) -> AbiResult<H256> {
        Ok(H256(keccak256(self.signature()?.as_bytes())))
    }

    pub fn indexed_count(&self) -> usize {
        self.inputs.iter().filter(|p| p.indexed).count()
    }
}

/// Function declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub inputs: Vec<Param>,
    pub outputs: Vec<Param>,
    pub state_mutability: Option<String>,
}

impl Function {
    pub fn signature(&self) -> AbiResult<String> {
        signature_of(&self.name, &self.inputs)
    }

    pub fn selector(&self) -> AbiResult<[u8; 4]> {
        Ok(selector(&self.signature()?))
    }

    /// Selector followed by the encoded arguments
    pub fn encode_input(&self, args: &[Token]) -> AbiResult<Vec<u8>> {
        check_arguments(&self.name, &self.inputs, args)?;
        let mut data = self.selector()?.to_vec();
        data.extend(codec::encode(args));
        Ok(data)
    }

    /// Decode arguments that follow the 4-byte selector
    pub fn decode_input(&self, args: &[u8]) -> AbiResult<Vec<Token>> {
        codec::decode(&param_types(&self.inputs)?, args)
    }
}

/// Constructor declaration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Constructor {
    pub inputs: Vec<Param>,
}

impl Constructor {
    /// Creation code followed by the encoded constructor arguments
    pub fn encode_input(&self, bytecode: &[u8], args: &[Token]) -> AbiResult<Vec<u8>> {
        check_arguments("constructor", &self.inputs, args)?;
        let mut data = bytecode.to_vec();
        data.extend(codec::encode(args));
        Ok(data)
    }
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(rename = "type", default = "default_entry_type")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    inputs: Vec<Param>,
    #[serde(default)]
    outputs: Vec<Param>,
    #[serde(default)]
    anonymous: bool,
    #[serde(rename = "stateMutability", default)]
    state_mutability: Option<String>,
}

fn default_entry_type() -> String {
    "function".to_string()
}

/// Parsed contract interface
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interface {
    pub functions: Vec<Function>,
    pub events: Vec<Event>,
    pub constructor: Option<Constructor>,
}

impl Interface {
    /// Parse a bare interface array or an artifact carrying an `abi` field
    pub fn from_json(raw: &str) -> AbiResult<Self> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| AbiError::InvalidInterface(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> AbiResult<Self> {
        let entries = match value {
            Value::Array(_) => value,
            Value::Object(mut map) => map.remove("abi").ok_or_else(|| {
                AbiError::InvalidInterface("object has no 'abi' field".to_string())
            })?,
            _ => {
                return Err(AbiError::InvalidInterface(
                    "expected an array or an artifact object".to_string(),
                ))
            }
        };
        let entries: Vec<RawEntry> = serde_json::from_value(entries)
            .map_err(|e| AbiError::InvalidInterface(e.to_string()))?;

        let mut interface = Interface::default();
        for entry in entries {
            match entry.kind.as_str() {
                "function" => interface.functions.push(Function {
                    name: entry.name,
                    inputs: entry.inputs,
                    outputs: entry.outputs,
                    state_mutability: entry.state_mutability,
                }),
                "event" => interface.events.push(Event {
                    name: entry.name,
                    inputs: entry.inputs,
                    anonymous: entry.anonymous,
                }),
                "constructor" => {
                    interface.constructor = Some(Constructor {
                        inputs: entry.inputs,
                    })
                }
                // fallback, receive and error entries carry nothing we encode
                _ => {}
            }
        }
        Ok(interface)
    }

    /// The single event with this name
    pub fn event(&self, name: &str) -> AbiResult<&Event> {
        let matches: Vec<&Event> = self.events.iter().filter(|e| e.name == name).collect();
        match matches.as_slice() {
            [] => Err(AbiError::EventNotFound(name.to_string())),
            [event] => Ok(event),
            _ => Err(AbiError::AmbiguousEvent {
                name: name.to_string(),
                count: matches.len(),
            }),
        }
    }

    /// The single function with this name
    pub fn function(&self, name: &str) -> AbiResult<&Function> {
        let matches: Vec<&Function> = self.functions.iter().filter(|f| f.name == name).collect();
        match matches.as_slice() {
            [] => Err(AbiError::FunctionNotFound(name.to_string())),
            [function] => Ok(function),
            _ => Err(AbiError::AmbiguousFunction {
                name: name.to_string(),
                count: matches.len(),
            }),
        }
    }

    /// Encode call data for `name(args..)`
    pub fn encode_call(&self, name: &str, args: &[Token]) -> AbiResult<Vec<u8>> {
        self.function(name)?.encode_input(args)
    }

    /// Find the function addressed by the call data's selector and decode its arguments
    pub fn decode_call(&self, data: &[u8]) -> AbiResult<(&Function, Vec<Token>)> {
        if data.len() < 4 {
            return Err(AbiError::InvalidData(format!(
                "call data of {} bytes has no selector",
                data.len()
            )));
        }
        let wanted = &data[..4];
        for function in &self.functions {
            if function.selector()? == wanted {
                let args = function.decode_input(&data[4..])?;
                return Ok((function, args));
            }
        }
        Err(AbiError::UnknownSelector(hex::encode(wanted)))
    }

    /// Creation code plus constructor arguments
    pub fn encode_deploy(&self, bytecode: &[u8], args: &[Token]) -> AbiResult<Vec<u8>> {
        match &self.constructor {
            Some(constructor) => constructor.encode_input(bytecode, args),
            None if args.is_empty() => Ok(bytecode.to_vec()),
            None => Err(AbiError::MissingConstructor),
        }
    }
}

/// Build artifact: contract name, interface and creation code
#[derive(Debug, Clone)]
pub struct Artifact {
    pub contract_name: String,
    pub interface: Interface,
    pub bytecode: Vec<u8>,
}

impl Artifact {
    pub fn from_json(raw: &str) -> AbiResult<Self> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| AbiError::InvalidInterface(e.to_string()))?;
        let contract_name = value
            .get("contractName")
            .and_then(Value::as_str)
            .unwrap_or("contract")
            .to_string();
        let bytecode = value
            .get("bytecode")
            .and_then(Value::as_str)
            .ok_or_else(|| AbiError::InvalidInterface("artifact has no 'bytecode'".to_string()))?;
        let bytecode = decode_hex(bytecode)?;
        if bytecode.is_empty() {
            return Err(AbiError::InvalidInterface(format!(
                "artifact '{}' has empty bytecode (abstract contract or unlinked library?)",
                contract_name
            )));
        }
        let interface = Interface::from_value(value)?;
        Ok(Artifact {
            contract_name,
            interface,
            bytecode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Address;

    const ERC20_FRAGMENT: &str = r#"[
        {"type":"function","name":"transfer","inputs":[{"name":"to","type":"address"},{"name":"value","type":"uint256"}],"outputs":[{"name":"","type":"bool"}],"stateMutability":"nonpayable"},
        {"type":"event","name":"Transfer","anonymous":false,"inputs":[{"name":"from","type":"address","indexed":true},{"name":"to","type":"address","indexed":true},{"name":"value","type":"uint256","indexed":false}]},
        {"type":"fallback","stateMutability":"payable"}
    ]"#;

    #[test]
    fn test_parse_bare_array() {
        let interface = Interface::from_json(ERC20_FRAGMENT).unwrap();
        assert_eq!(interface.functions.len(), 1);
        assert_eq!(interface.events.len(), 1);
        assert!(interface.constructor.is_none());
    }

    #[test]
    fn test_event_topic_matches_known_hash() {
        let interface = Interface::from_json(ERC20_FRAGMENT).unwrap();
        let event = interface.event("Transfer").unwrap();
        assert_eq!(event.signature().unwrap(), "Transfer(address,address,uint256)");
        assert_eq!(
            event.topic().unwrap().to_string(),
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
        assert_eq!(event.indexed_count(), 2);
    }

    #[test]
    fn test_encode_and_decode_call() {
        let interface = Interface::from_json(ERC20_FRAGMENT).unwrap();
        let to: Address = "0xa52422bb8c29e4d55243d310fb6bae793162452e".parse().unwrap();
        let data = interface
            .encode_call("transfer", &[Token::from(to), Token::from(5u64)])
            .unwrap();
        assert_eq!(hex::encode(&data[..4]), "a9059cbb");
        assert_eq!(data.len(), 4 + 64);

        let (function, args) = interface.decode_call(&data).unwrap();
        assert_eq!(function.name, "transfer");
        assert_eq!(args, vec![Token::from(to), Token::from(5u64)]);
    }

    #[test]
    fn test_encode_call_checks_arguments() {
        let interface = Interface::from_json(ERC20_FRAGMENT).unwrap();
        assert!(matches!(
            interface.encode_call("transfer", &[Token::from(5u64)]),
            Err(AbiError::ArgumentCount { expected: 2, actual: 1, .. })
        ));
        assert!(matches!(
            interface.encode_call("transfer", &[Token::from(5u64), Token::from(5u64)]),
            Err(AbiError::ArgumentType { index: 0, .. })
        ));
        assert!(matches!(
            interface.encode_call("approve", &[]),
            Err(AbiError::FunctionNotFound(_))
        ));
    }

    #[test]
    fn test_tuple_components() {
        let raw = r#"[{"type":"event","name":"Batch","inputs":[{"name":"items","type":"tuple[]","components":[{"name":"who","type":"address"},{"name":"amount","type":"uint256"}]}]}]"#;
        let interface = Interface::from_json(raw).unwrap();
        assert_eq!(
            interface.event("Batch").unwrap().signature().unwrap(),
            "Batch((address,uint256)[])"
        );
    }

    #[test]
    fn test_artifact_requires_bytecode() {
        let raw = r#"{"contractName":"Empty","abi":[],"bytecode":"0x"}"#;
        assert!(Artifact::from_json(raw).is_err());

        let raw = r#"{"contractName":"Tiny","abi":[{"type":"constructor","inputs":[{"name":"owner","type":"address"}]}],"bytecode":"0x6080"}"#;
        let artifact = Artifact::from_json(raw).unwrap();
        let owner: Address = "0x27644a3f5d51dea8705dc7fb1cd67100d73273b1".parse().unwrap();
        let data = artifact
            .interface
            .encode_deploy(&artifact.bytecode, &[Token::from(owner)])
            .unwrap();
        assert_eq!(&data[..2], &[0x60, 0x80]);
        assert_eq!(data.len(), 2 + 32);
    }
}
