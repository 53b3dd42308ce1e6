//! ABI values

use std::fmt;

use serde_json::{json, Value};

use crate::param::ParamType;
use crate::types::{encode_hex, Address, Uint256};

/// A decoded (or to-be-encoded) ABI value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Address(Address),
    Bool(bool),
    Uint(Uint256),
    /// Signed integer kept as its two's complement word
    Int(Uint256),
    FixedBytes(Vec<u8>),
    Bytes(Vec<u8>),
    String(String),
    Array(Vec<Token>),
    FixedArray(Vec<Token>),
    Tuple(Vec<Token>),
}

impl Token {
    pub fn as_address(&self) -> Option<Address> {
        match self {
            Token::Address(addr) => Some(*addr),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Token::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<Uint256> {
        match self {
            Token::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Token::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_fixed_bytes(&self) -> Option<&[u8]> {
        match self {
            Token::FixedBytes(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Token]> {
        match self {
            Token::Array(items) | Token::FixedArray(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Build a `T[]` token from values that convert into tokens
    pub fn array<T: Into<Token>>(items: impl IntoIterator<Item = T>) -> Token {
        Token::Array(items.into_iter().map(Into::into).collect())
    }

    /// Build a `T[k]` token
    pub fn fixed_array<T: Into<Token>>(items: impl IntoIterator<Item = T>) -> Token {
        Token::FixedArray(items.into_iter().map(Into::into).collect())
    }

    /// Check that the value can be encoded as `kind`
    pub fn matches(&self, kind: &ParamType) -> bool {
        match (self, kind) {
            (Token::Address(_), ParamType::Address) => true,
            (Token::Bool(_), ParamType::Bool) => true,
            (Token::Uint(v), ParamType::Uint(bits)) => v.bits() <= *bits,
            (Token::Int(_), ParamType::Int(_)) => true,
            (Token::FixedBytes(b), ParamType::FixedBytes(len)) => b.len() == *len,
            (Token::Bytes(_), ParamType::Bytes) => true,
            (Token::String(_), ParamType::String) => true,
            (Token::Array(items), ParamType::Array(inner)) => {
                items.iter().all(|item| item.matches(inner))
            }
            (Token::FixedArray(items), ParamType::FixedArray(inner, len)) => {
                items.len() == *len && items.iter().all(|item| item.matches(inner))
            }
            (Token::Tuple(items), ParamType::Tuple(members)) => {
                items.len() == members.len()
                    && items.iter().zip(members).all(|(item, member)| item.matches(member))
            }
            _ => false,
        }
    }

    /// JSON rendering: addresses and hashes as hex, integers as decimal strings
    pub fn to_json(&self) -> Value {
        match self {
            Token::Address(addr) => json!(addr.to_checksum()),
            Token::Bool(b) => json!(b),
            Token::Uint(v) => json!(v.to_string()),
            Token::Int(v) => json!(format_signed(v)),
            Token::FixedBytes(b) | Token::Bytes(b) => json!(encode_hex(b)),
            Token::String(s) => json!(s),
            Token::Array(items) | Token::FixedArray(items) | Token::Tuple(items) => {
                Value::Array(items.iter().map(Token::to_json).collect())
            }
        }
    }
}

fn format_signed(word: &Uint256) -> String {
    if word.is_negative() {
        format!("-{}", word.wrapping_neg())
    } else {
        word.to_string()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Address(addr) => write!(f, "{}", addr.to_checksum()),
            Token::Bool(b) => write!(f, "{}", b),
            Token::Uint(v) => write!(f, "{}", v),
            Token::Int(v) => f.write_str(&format_signed(v)),
            Token::FixedBytes(b) | Token::Bytes(b) => f.write_str(&encode_hex(b)),
            Token::String(s) => write!(f, "{:?}", s),
            Token::Array(items) | Token::FixedArray(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Token::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl From<Address> for Token {
    fn from(addr: Address) -> Self {
        Token::Address(addr)
    }
}

impl From<bool> for Token {
    fn from(b: bool) -> Self {
        Token::Bool(b)
    }
}

impl From<Uint256> for Token {
    fn from(v: Uint256) -> Self {
        Token::Uint(v)
    }
}

impl From<u64> for Token {
    fn from(v: u64) -> Self {
        Token::Uint(Uint256::from_u64(v))
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Token::String(s.to_string())
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        Token::String(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_checks_width_and_length() {
        assert!(Token::from(255u64).matches(&ParamType::Uint(8)));
        assert!(!Token::from(256u64).matches(&ParamType::Uint(8)));
        let settings = Token::fixed_array([1u64, 2, 3]);
        assert!(settings.matches(&ParamType::parse("uint64[3]").unwrap()));
        assert!(!settings.matches(&ParamType::parse("uint64[2]").unwrap()));
        assert!(!Token::from("x").matches(&ParamType::Bytes));
    }

    #[test]
    fn test_json_rendering() {
        let addr: Address = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".parse().unwrap();
        assert_eq!(Token::from(addr).to_json(), json!("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
        assert_eq!(Token::Int(Uint256::from_u64(5).wrapping_neg()).to_json(), json!("-5"));
        assert_eq!(Token::array([1u64, 2]).to_json(), json!(["1", "2"]));
    }
}
