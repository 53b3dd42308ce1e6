//! Primitive ledger value types
//!
//! Fixed-size words, addresses and the hex string forms used by JSON-RPC
//! documents. All of them serialize to and from `0x`-prefixed strings.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{AbiError, AbiResult};
use crate::hash::keccak256;

/// Size of one ABI word
pub const WORD_SIZE: usize = 32;

/// Decode a hex string, with or without `0x` prefix
pub fn decode_hex(value: &str) -> AbiResult<Vec<u8>> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.len() % 2 == 1 {
        hex::decode(format!("0{}", digits))
    } else {
        hex::decode(digits)
    }
    .map_err(|e| AbiError::InvalidHex(format!("{}: {}", value, e)))
}

/// Encode bytes as a `0x`-prefixed lower-case hex string
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

// ============================================================================
// Address
// ============================================================================

/// 20-byte account or contract address
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub fn from_slice(bytes: &[u8]) -> AbiResult<Self> {
        if bytes.len() != 20 {
            return Err(AbiError::InvalidAddress(format!(
                "expected 20 bytes, got {}",
                bytes.len()
            )));
        }
        let mut out = [0u8; 20];
        out.copy_from_slice(bytes);
        Ok(Address(out))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Left-pad into an ABI word
    pub fn to_word(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(&self.0);
        word
    }

    /// Read an address out of an ABI word. The 12 padding bytes must be zero.
    pub fn from_word(word: &[u8; 32]) -> AbiResult<Self> {
        if word[..12].iter().any(|b| *b != 0) {
            return Err(AbiError::InvalidData(format!(
                "address word has dirty padding: {}",
                encode_hex(word)
            )));
        }
        Address::from_slice(&word[12..])
    }

    /// Mixed-case checksum rendering (EIP-55)
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = keccak256(lower.as_bytes());
        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl FromStr for Address {
    type Err = AbiError;

    fn from_str(s: &str) -> AbiResult<Self> {
        let digits = s.trim().strip_prefix("0x").unwrap_or(s.trim());
        if digits.len() != 40 {
            return Err(AbiError::InvalidAddress(s.to_string()));
        }
        let bytes = hex::decode(digits).map_err(|_| AbiError::InvalidAddress(s.to_string()))?;
        Address::from_slice(&bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

// ============================================================================
// 32-byte hash
// ============================================================================

/// 32-byte hash (transaction hashes, topics, app ids)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct H256(pub [u8; 32]);

impl H256 {
    pub fn from_slice(bytes: &[u8]) -> AbiResult<Self> {
        if bytes.len() != 32 {
            return Err(AbiError::InvalidHex(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        let mut out = [0u8; 32];
        out.copy_from_slice(bytes);
        Ok(H256(out))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for H256 {
    fn from(bytes: [u8; 32]) -> Self {
        H256(bytes)
    }
}

impl FromStr for H256 {
    type Err = AbiError;

    fn from_str(s: &str) -> AbiResult<Self> {
        H256::from_slice(&decode_hex(s)?)
    }
}

impl fmt::Display for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H256({})", self)
    }
}

// ============================================================================
// Unsigned 256-bit integer
// ============================================================================

/// Unsigned 256-bit integer stored as a big-endian ABI word.
///
/// Only the arithmetic needed for parsing and printing amounts is provided.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Uint256([u8; 32]);

impl Uint256 {
    pub const ZERO: Uint256 = Uint256([0u8; 32]);

    pub fn from_be_bytes(bytes: [u8; 32]) -> Self {
        Uint256(bytes)
    }

    /// Right-align up to 32 big-endian bytes
    pub fn from_be_slice(bytes: &[u8]) -> AbiResult<Self> {
        if bytes.len() > 32 {
            return Err(AbiError::InvalidNumber(format!(
                "{} bytes do not fit in 256 bits",
                bytes.len()
            )));
        }
        let mut out = [0u8; 32];
        out[32 - bytes.len()..].copy_from_slice(bytes);
        Ok(Uint256(out))
    }

    pub fn to_be_bytes(&self) -> [u8; 32] {
        self.0
    }

    pub fn from_u64(value: u64) -> Self {
        Self::from_u128(value as u128)
    }

    pub fn from_u128(value: u128) -> Self {
        let mut out = [0u8; 32];
        out[16..].copy_from_slice(&value.to_be_bytes());
        Uint256(out)
    }

    pub fn to_u128(&self) -> Option<u128> {
        if self.0[..16].iter().any(|b| *b != 0) {
            return None;
        }
        let mut buf = [0u8; 16];
        buf.copy_from_slice(&self.0[16..]);
        Some(u128::from_be_bytes(buf))
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.to_u128().and_then(|v| u64::try_from(v).ok())
    }

    pub fn to_usize(&self) -> Option<usize> {
        self.to_u128().and_then(|v| usize::try_from(v).ok())
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Number of significant bits
    pub fn bits(&self) -> usize {
        for (i, byte) in self.0.iter().enumerate() {
            if *byte != 0 {
                return (32 - i) * 8 - byte.leading_zeros() as usize;
            }
        }
        0
    }

    /// JSON-RPC quantity form: minimal hex digits, `0x0` for zero
    pub fn to_quantity_hex(&self) -> String {
        let digits = hex::encode(self.0);
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            "0x0".to_string()
        } else {
            format!("0x{}", trimmed)
        }
    }

    pub fn checked_mul_u64(&self, rhs: u64) -> Option<Self> {
        let mut out = [0u8; 32];
        let mut carry: u128 = 0;
        for i in (0..32).rev() {
            let product = self.0[i] as u128 * rhs as u128 + carry;
            out[i] = (product & 0xff) as u8;
            carry = product >> 8;
        }
        if carry != 0 {
            return None;
        }
        Some(Uint256(out))
    }

    pub fn checked_add_u64(&self, rhs: u64) -> Option<Self> {
        let mut out = self.0;
        let mut carry: u128 = rhs as u128;
        for i in (0..32).rev() {
            if carry == 0 {
                break;
            }
            let sum = out[i] as u128 + (carry & 0xff);
            out[i] = (sum & 0xff) as u8;
            carry = (carry >> 8) + (sum >> 8);
        }
        if carry != 0 {
            return None;
        }
        Some(Uint256(out))
    }

    /// Divide by a small divisor, returning quotient and remainder
    pub fn div_rem_u64(&self, divisor: u64) -> (Self, u64) {
        let mut out = [0u8; 32];
        let mut rem: u128 = 0;
        let divisor = divisor as u128;
        for i in 0..32 {
            let acc = (rem << 8) | self.0[i] as u128;
            out[i] = (acc / divisor) as u8;
            rem = acc % divisor;
        }
        (Uint256(out), rem as u64)
    }

    /// Two's complement negation, used for signed words
    pub fn wrapping_neg(&self) -> Self {
        let mut out = [0u8; 32];
        for (i, byte) in self.0.iter().enumerate() {
            out[i] = !byte;
        }
        let mut carry = 1u16;
        for i in (0..32).rev() {
            let sum = out[i] as u16 + carry;
            out[i] = (sum & 0xff) as u8;
            carry = sum >> 8;
        }
        Uint256(out)
    }

    /// Top bit set, i.e. negative when read as a signed word
    pub fn is_negative(&self) -> bool {
        self.0[0] & 0x80 != 0
    }

    pub fn pow10(exponent: u32) -> Option<Self> {
        let mut value = Uint256::from_u64(1);
        for _ in 0..exponent {
            value = value.checked_mul_u64(10)?;
        }
        Some(value)
    }

    /// Parse a plain decimal string (underscores allowed as separators)
    pub fn from_dec_str(s: &str) -> AbiResult<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AbiError::InvalidNumber("empty number".to_string()));
        }
        let mut value = Uint256::ZERO;
        for c in trimmed.chars() {
            if c == '_' {
                continue;
            }
            let digit = c
                .to_digit(10)
                .ok_or_else(|| AbiError::InvalidNumber(s.to_string()))?;
            value = value
                .checked_mul_u64(10)
                .and_then(|v| v.checked_add_u64(digit as u64))
                .ok_or_else(|| AbiError::InvalidNumber(format!("{} overflows 256 bits", s)))?;
        }
        Ok(value)
    }

    /// Parse `0x` hex, a decimal integer, or the scientific literal form
    /// used by deployment configs (`100000e18`, `1.5e17`).
    pub fn parse_amount(s: &str) -> AbiResult<Self> {
        let trimmed = s.trim();
        if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
            return Uint256::from_be_slice(&decode_hex(trimmed)?);
        }

        let (mantissa, exponent) = match trimmed.find(|c: char| c == 'e' || c == 'E') {
            Some(idx) => {
                let exponent = trimmed[idx + 1..]
                    .trim_start_matches('+')
                    .parse::<u32>()
                    .map_err(|_| AbiError::InvalidNumber(s.to_string()))?;
                (&trimmed[..idx], exponent)
            }
            None => (trimmed, 0),
        };

        let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        let frac = frac_part.trim_end_matches('0');
        if frac.len() as u32 > exponent {
            return Err(AbiError::InvalidNumber(format!(
                "{} is not a whole number",
                s
            )));
        }

        let digits = format!("{}{}", int_part, frac);
        let base = Uint256::from_dec_str(&digits)?;
        if base.is_zero() {
            return Ok(base);
        }
        let mut value = base;
        for _ in 0..(exponent - frac.len() as u32) {
            value = value
                .checked_mul_u64(10)
                .ok_or_else(|| AbiError::InvalidNumber(format!("{} overflows 256 bits", s)))?;
        }
        Ok(value)
    }
}

impl From<u64> for Uint256 {
    fn from(value: u64) -> Self {
        Uint256::from_u64(value)
    }
}

impl From<u128> for Uint256 {
    fn from(value: u128) -> Self {
        Uint256::from_u128(value)
    }
}

impl FromStr for Uint256 {
    type Err = AbiError;

    fn from_str(s: &str) -> AbiResult<Self> {
        Uint256::parse_amount(s)
    }
}

impl fmt::Display for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.pad("0");
        }
        let mut digits = Vec::with_capacity(78);
        let mut value = *self;
        while !value.is_zero() {
            let (quotient, rem) = value.div_rem_u64(10);
            digits.push(b'0' + rem as u8);
            value = quotient;
        }
        digits.reverse();
        f.pad(&String::from_utf8_lossy(&digits))
    }
}

impl fmt::Debug for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uint256({})", self)
    }
}

// ============================================================================
// Hex byte strings and quantities
// ============================================================================

/// Arbitrary-length byte string in `0x` hex form
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct HexBytes(pub Vec<u8>);

impl HexBytes {
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for HexBytes {
    fn from(bytes: Vec<u8>) -> Self {
        HexBytes(bytes)
    }
}

impl fmt::Display for HexBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_hex(&self.0))
    }
}

impl fmt::Debug for HexBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HexBytes({})", self)
    }
}

/// Integer quantity as JSON-RPC writes it (`"0x1b"`)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Debug)]
pub struct Quantity(pub u64);

impl Quantity {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

// ============================================================================
// serde
// ============================================================================

macro_rules! string_serde {
    ($ty:ty, $expecting:expr) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(|e: AbiError| {
                    de::Error::custom(format!("{} ({})", e, $expecting))
                })
            }
        }
    };
}

string_serde!(Address, "expected a 20-byte hex address");
string_serde!(H256, "expected a 32-byte hex hash");

impl Serialize for HexBytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode_hex(&self.0))
    }
}

impl<'de> Deserialize<'de> for HexBytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        decode_hex(&raw).map(HexBytes).map_err(de::Error::custom)
    }
}

impl Serialize for Uint256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

struct NumberVisitor;

impl<'de> Visitor<'de> for NumberVisitor {
    type Value = Uint256;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a non-negative integer or a numeric string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Uint256, E> {
        Ok(Uint256::from_u64(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Uint256, E> {
        u64::try_from(v)
            .map(Uint256::from_u64)
            .map_err(|_| E::custom(format!("negative amount {}", v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Uint256, E> {
        Uint256::parse_amount(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Uint256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NumberVisitor)
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = deserializer.deserialize_any(NumberVisitor)?;
        value
            .to_u64()
            .map(Quantity)
            .ok_or_else(|| de::Error::custom("quantity exceeds 64 bits"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_parse_and_display() {
        let addr: Address = "0x27644a3F5D51dEA8705DC7FB1CD67100D73273B1".parse().unwrap();
        assert_eq!(addr.to_string(), "0x27644a3f5d51dea8705dc7fb1cd67100d73273b1");
        assert!("0x1234".parse::<Address>().is_err());
        assert!("zz644a3f5d51dea8705dc7fb1cd67100d73273b1".parse::<Address>().is_err());
    }

    #[test]
    fn test_address_checksum() {
        // EIP-55 reference vector
        let addr: Address = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".parse().unwrap();
        assert_eq!(addr.to_checksum(), "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
    }

    #[test]
    fn test_address_word_padding() {
        let addr: Address = "0xfd90411b0c246743ae0000bb18c723a3bb909dee".parse().unwrap();
        let word = addr.to_word();
        assert_eq!(Address::from_word(&word).unwrap(), addr);

        let mut dirty = word;
        dirty[0] = 1;
        assert!(Address::from_word(&dirty).is_err());
    }

    #[test]
    fn test_uint_decimal_display() {
        assert_eq!(Uint256::ZERO.to_string(), "0");
        assert_eq!(Uint256::from_u64(604800).to_string(), "604800");
        assert_eq!(Uint256::from_u128(u128::MAX).to_string(), u128::MAX.to_string());
    }

    #[test]
    fn test_uint_parse_scientific() {
        let stake = Uint256::parse_amount("100000e18").unwrap();
        assert_eq!(stake.to_string(), "100000000000000000000000");
        assert_eq!(Uint256::parse_amount("50e16").unwrap().to_u64(), Some(500_000_000_000_000_000));
        assert_eq!(Uint256::parse_amount("1.5e3").unwrap().to_u64(), Some(1500));
        assert_eq!(Uint256::parse_amount("0x10").unwrap().to_u64(), Some(16));
        assert!(Uint256::parse_amount("1.25e1").is_err());
        assert!(Uint256::parse_amount("-1").is_err());
        assert!(Uint256::parse_amount("").is_err());
    }

    #[test]
    fn test_parse_amount_zero_with_huge_exponent_is_immediate() {
        assert!(Uint256::parse_amount("0e4294967295").unwrap().is_zero());
        assert!(Uint256::parse_amount("0.0e4294967295").unwrap().is_zero());
        assert!(Uint256::parse_amount("1e78").is_err());
        assert!(Uint256::parse_amount("1e77").is_ok());
    }

    #[test]
    fn test_uint_overflow() {
        let max = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        assert_eq!(Uint256::from_dec_str(max).unwrap().to_string(), max);
        let too_big = "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        assert!(Uint256::from_dec_str(too_big).is_err());
    }

    #[test]
    fn test_uint_quantity_hex() {
        assert_eq!(Uint256::ZERO.to_quantity_hex(), "0x0");
        assert_eq!(Uint256::from_u64(60_000_000_001).to_quantity_hex(), "0xdf8475801");
    }

    #[test]
    fn test_uint_negation() {
        let one = Uint256::from_u64(1);
        let minus_one = one.wrapping_neg();
        assert!(minus_one.is_negative());
        assert_eq!(minus_one.to_be_bytes(), [0xff; 32]);
        assert_eq!(minus_one.wrapping_neg(), one);
    }

    #[test]
    fn test_uint_serde_accepts_strings_and_numbers() {
        let from_str: Uint256 = serde_json::from_str("\"100000e18\"").unwrap();
        let from_num: Uint256 = serde_json::from_str("42").unwrap();
        assert_eq!(from_str, Uint256::parse_amount("100000000000000000000000").unwrap());
        assert_eq!(from_num, Uint256::from_u64(42));
        assert_eq!(serde_json::to_string(&from_num).unwrap(), "\"42\"");
    }

    #[test]
    fn test_quantity_serde() {
        let q: Quantity = serde_json::from_str("\"0x1b\"").unwrap();
        assert_eq!(q.as_u64(), 27);
        assert_eq!(serde_json::to_string(&q).unwrap(), "\"0x1b\"");
    }

    #[test]
    fn test_hex_bytes_serde() {
        let empty: HexBytes = serde_json::from_str("\"0x\"").unwrap();
        assert!(empty.is_empty());
        let bytes: HexBytes = serde_json::from_str("\"0xdeadbeef\"").unwrap();
        assert_eq!(bytes.as_slice(), &[0xde, 0xad, 0xbe, 0xef]);
    }
}
