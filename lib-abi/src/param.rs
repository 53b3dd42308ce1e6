//! ABI parameter types
//!
//! Parsed from the canonical type strings found in interface documents
//! (`uint64[3]`, `address[]`, `(bool,bytes32)`).

use std::fmt;
use std::str::FromStr;

use crate::errors::{AbiError, AbiResult};
use crate::types::WORD_SIZE;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    Address,
    Bool,
    /// Unsigned integer with the given bit width
    Uint(usize),
    /// Signed integer with the given bit width
    Int(usize),
    /// `bytesN`, N in 1..=32
    FixedBytes(usize),
    Bytes,
    String,
    Array(Box<ParamType>),
    FixedArray(Box<ParamType>, usize),
    Tuple(Vec<ParamType>),
}

impl ParamType {
    /// Parse a canonical type string
    pub fn parse(s: &str) -> AbiResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AbiError::InvalidType(s.to_string()));
        }

        if s.ends_with(']') {
            let open = s
                .rfind('[')
                .ok_or_else(|| AbiError::InvalidType(s.to_string()))?;
            let inner = ParamType::parse(&s[..open])?;
            let dim = &s[open + 1..s.len() - 1];
            if dim.is_empty() {
                return Ok(ParamType::Array(Box::new(inner)));
            }
            let len = dim
                .parse::<usize>()
                .map_err(|_| AbiError::InvalidType(s.to_string()))?;
            return Ok(ParamType::FixedArray(Box::new(inner), len));
        }

        if s.starts_with('(') && s.ends_with(')') {
            let body = &s[1..s.len() - 1];
            let members = split_top_level(body)
                .into_iter()
                .filter(|part| !part.trim().is_empty())
                .map(ParamType::parse)
                .collect::<AbiResult<Vec<_>>>()?;
            return Ok(ParamType::Tuple(members));
        }

        match s {
            "address" => return Ok(ParamType::Address),
            "bool" => return Ok(ParamType::Bool),
            "string" => return Ok(ParamType::String),
            "bytes" => return Ok(ParamType::Bytes),
            "uint" => return Ok(ParamType::Uint(256)),
            "int" => return Ok(ParamType::Int(256)),
            "byte" => return Ok(ParamType::FixedBytes(1)),
            _ => {}
        }

        if let Some(bits) = s.strip_prefix("uint") {
            return Ok(ParamType::Uint(parse_bits(s, bits)?));
        }
        if let Some(bits) = s.strip_prefix("int") {
            return Ok(ParamType::Int(parse_bits(s, bits)?));
        }
        if let Some(len) = s.strip_prefix("bytes") {
            let len = len
                .parse::<usize>()
                .map_err(|_| AbiError::InvalidType(s.to_string()))?;
            if len == 0 || len > 32 {
                return Err(AbiError::InvalidType(s.to_string()));
            }
            return Ok(ParamType::FixedBytes(len));
        }

        Err(AbiError::InvalidType(s.to_string()))
    }

    /// Whether the encoding lives in the tail section
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::Bytes | ParamType::String | ParamType::Array(_) => true,
            ParamType::FixedArray(inner, _) => inner.is_dynamic(),
            ParamType::Tuple(members) => members.iter().any(|m| m.is_dynamic()),
            _ => false,
        }
    }

    /// Bytes occupied in the head section
    pub fn head_size(&self) -> usize {
        if self.is_dynamic() {
            return WORD_SIZE;
        }
        match self {
            ParamType::FixedArray(inner, len) => inner.head_size() * len,
            ParamType::Tuple(members) => members.iter().map(|m| m.head_size()).sum(),
            _ => WORD_SIZE,
        }
    }
}

impl FromStr for ParamType {
    type Err = AbiError;

    fn from_str(s: &str) -> AbiResult<Self> {
        ParamType::parse(s)
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Address => f.write_str("address"),
            ParamType::Bool => f.write_str("bool"),
            ParamType::Uint(bits) => write!(f, "uint{}", bits),
            ParamType::Int(bits) => write!(f, "int{}", bits),
            ParamType::FixedBytes(len) => write!(f, "bytes{}", len),
            ParamType::Bytes => f.write_str("bytes"),
            ParamType::String => f.write_str("string"),
            ParamType::Array(inner) => write!(f, "{}[]", inner),
            ParamType::FixedArray(inner, len) => write!(f, "{}[{}]", inner, len),
            ParamType::Tuple(members) => {
                f.write_str("(")?;
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", member)?;
                }
                f.write_str(")")
            }
        }
    }
}

fn parse_bits(full: &str, bits: &str) -> AbiResult<usize> {
    let bits = bits
        .parse::<usize>()
        .map_err(|_| AbiError::InvalidType(full.to_string()))?;
    if bits == 0 || bits > 256 || bits % 8 != 0 {
        return Err(AbiError::InvalidType(full.to_string()));
    }
    Ok(bits)
}

/// Split on commas that are not nested inside parentheses
fn split_top_level(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in body.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_elementary() {
        assert_eq!(ParamType::parse("address").unwrap(), ParamType::Address);
        assert_eq!(ParamType::parse("uint8").unwrap(), ParamType::Uint(8));
        assert_eq!(ParamType::parse("uint").unwrap(), ParamType::Uint(256));
        assert_eq!(ParamType::parse("bytes32").unwrap(), ParamType::FixedBytes(32));
        assert!(ParamType::parse("uint7").is_err());
        assert!(ParamType::parse("bytes33").is_err());
        assert!(ParamType::parse("mapping").is_err());
    }

    #[test]
    fn test_parse_arrays() {
        assert_eq!(
            ParamType::parse("uint64[3]").unwrap(),
            ParamType::FixedArray(Box::new(ParamType::Uint(64)), 3)
        );
        assert_eq!(
            ParamType::parse("address[]").unwrap(),
            ParamType::Array(Box::new(ParamType::Address))
        );
        assert_eq!(
            ParamType::parse("bool[2][]").unwrap(),
            ParamType::Array(Box::new(ParamType::FixedArray(Box::new(ParamType::Bool), 2)))
        );
    }

    #[test]
    fn test_parse_tuple_roundtrips_to_canonical() {
        let ty = ParamType::parse("(address,(bool,string)[],bytes32)").unwrap();
        assert_eq!(ty.to_string(), "(address,(bool,string)[],bytes32)");
        assert!(ty.is_dynamic());
    }

    #[test]
    fn test_head_size() {
        assert_eq!(ParamType::parse("uint64[3]").unwrap().head_size(), 96);
        assert_eq!(ParamType::parse("string[3]").unwrap().head_size(), 32);
        assert_eq!(ParamType::parse("(uint8,address)").unwrap().head_size(), 64);
    }
}
