//! ABI head/tail codec
//!
//! Static values are laid out in place; dynamic values leave a 32-byte
//! offset in the head and append their encoding to the tail. Decoding
//! bounds-checks every offset and length against the input.

use crate::errors::{AbiError, AbiResult};
use crate::param::ParamType;
use crate::token::Token;
use crate::types::{Address, Uint256, WORD_SIZE};

/// Encode a sequence of values as a tuple
pub fn encode(tokens: &[Token]) -> Vec<u8> {
    encode_sequence(tokens)
}

/// Decode a sequence of values laid out as a tuple of `types`
pub fn decode(types: &[ParamType], data: &[u8]) -> AbiResult<Vec<Token>> {
    decode_sequence(types, data)
}

/// Decode a single static value from one 32-byte topic
pub fn decode_word(kind: &ParamType, word: &[u8; 32]) -> AbiResult<Token> {
    decode_param(kind, word)
}

// ============================================================================
// Encoding
// ============================================================================

fn is_dynamic(token: &Token) -> bool {
    match token {
        Token::Bytes(_) | Token::String(_) | Token::Array(_) => true,
        Token::FixedArray(items) | Token::Tuple(items) => items.iter().any(is_dynamic),
        _ => false,
    }
}

fn head_len(token: &Token) -> usize {
    if is_dynamic(token) {
        return WORD_SIZE;
    }
    match token {
        Token::FixedArray(items) | Token::Tuple(items) => items.iter().map(head_len).sum(),
        _ => WORD_SIZE,
    }
}

fn usize_word(value: usize) -> [u8; 32] {
    Uint256::from_u64(value as u64).to_be_bytes()
}

fn pad_right(bytes: &[u8]) -> Vec<u8> {
    let mut out = bytes.to_vec();
    let rem = out.len() % WORD_SIZE;
    if rem != 0 {
        out.resize(out.len() + WORD_SIZE - rem, 0);
    }
    out
}

fn encode_sequence(tokens: &[Token]) -> Vec<u8> {
    let heads: usize = tokens.iter().map(head_len).sum();
    let mut head = Vec::with_capacity(heads);
    let mut tail = Vec::new();

    for token in tokens {
        if is_dynamic(token) {
            head.extend_from_slice(&usize_word(heads + tail.len()));
            tail.extend(encode_token(token));
        } else {
            head.extend(encode_token(token));
        }
    }

    head.extend(tail);
    head
}

fn encode_token(token: &Token) -> Vec<u8> {
    match token {
        Token::Address(addr) => addr.to_word().to_vec(),
        Token::Bool(b) => usize_word(*b as usize).to_vec(),
        Token::Uint(v) | Token::Int(v) => v.to_be_bytes().to_vec(),
        Token::FixedBytes(bytes) => pad_right(bytes),
        Token::Bytes(bytes) => {
            let mut out = usize_word(bytes.len()).to_vec();
            out.extend(pad_right(bytes));
            out
        }
        Token::String(s) => {
            let mut out = usize_word(s.len()).to_vec();
            out.extend(pad_right(s.as_bytes()));
            out
        }
        Token::Array(items) => {
            let mut out = usize_word(items.len()).to_vec();
            out.extend(encode_sequence(items));
            out
        }
        Token::FixedArray(items) | Token::Tuple(items) => encode_sequence(items),
    }
}

// ============================================================================
// Decoding
// ============================================================================

fn read_word(data: &[u8], offset: usize) -> AbiResult<[u8; 32]> {
    let end = offset
        .checked_add(WORD_SIZE)
        .ok_or_else(|| AbiError::InvalidData("offset overflow".to_string()))?;
    let slice = data.get(offset..end).ok_or_else(|| {
        AbiError::InvalidData(format!(
            "need 32 bytes at offset {}, have {}",
            offset,
            data.len()
        ))
    })?;
    let mut word = [0u8; 32];
    word.copy_from_slice(slice);
    Ok(word)
}

fn read_usize(data: &[u8], offset: usize) -> AbiResult<usize> {
    let word = read_word(data, offset)?;
    Uint256::from_be_bytes(word)
        .to_usize()
        .filter(|v| *v <= data.len().saturating_mul(8))
        .ok_or_else(|| AbiError::InvalidData(format!("implausible offset or length at {}", offset)))
}

fn decode_sequence(types: &[ParamType], data: &[u8]) -> AbiResult<Vec<Token>> {
    let mut out = Vec::with_capacity(types.len());
    let mut offset = 0usize;

    for kind in types {
        if kind.is_dynamic() {
            let pointer = read_usize(data, offset)?;
            let tail = data.get(pointer..).ok_or_else(|| {
                AbiError::InvalidData(format!("tail offset {} beyond {} bytes", pointer, data.len()))
            })?;
            out.push(decode_param(kind, tail)?);
            offset += WORD_SIZE;
        } else {
            let section = data.get(offset..).ok_or_else(|| {
                AbiError::InvalidData(format!("head offset {} beyond {} bytes", offset, data.len()))
            })?;
            out.push(decode_param(kind, section)?);
            offset += kind.head_size();
        }
    }

    Ok(out)
}

fn repeat(kind: &ParamType, count: usize, available: usize) -> AbiResult<Vec<ParamType>> {
    // every element occupies at least one word of the remaining input
    if count.saturating_mul(WORD_SIZE) > available {
        return Err(AbiError::InvalidData(format!(
            "{} elements of {} cannot fit in {} bytes",
            count, kind, available
        )));
    }
    Ok(vec![kind.clone(); count])
}

fn decode_param(kind: &ParamType, data: &[u8]) -> AbiResult<Token> {
    match kind {
        ParamType::Address => Ok(Token::Address(Address::from_word(&read_word(data, 0)?)?)),
        ParamType::Bool => {
            let word = read_word(data, 0)?;
            match Uint256::from_be_bytes(word).to_u64() {
                Some(0) => Ok(Token::Bool(false)),
                Some(1) => Ok(Token::Bool(true)),
                _ => Err(AbiError::InvalidData("bool word is neither 0 nor 1".to_string())),
            }
        }
        ParamType::Uint(bits) => {
            let value = Uint256::from_be_bytes(read_word(data, 0)?);
            if value.bits() > *bits {
                return Err(AbiError::InvalidData(format!("value {} exceeds uint{}", value, bits)));
            }
            Ok(Token::Uint(value))
        }
        ParamType::Int(_) => Ok(Token::Int(Uint256::from_be_bytes(read_word(data, 0)?))),
        ParamType::FixedBytes(len) => {
            let word = read_word(data, 0)?;
            Ok(Token::FixedBytes(word[..*len].to_vec()))
        }
        ParamType::Bytes | ParamType::String => {
            let len = read_usize(data, 0)?;
            let bytes = data
                .get(WORD_SIZE..WORD_SIZE + len)
                .ok_or_else(|| AbiError::InvalidData(format!("{} bytes of {} truncated", len, kind)))?
                .to_vec();
            if *kind == ParamType::Bytes {
                Ok(Token::Bytes(bytes))
            } else {
                String::from_utf8(bytes)
                    .map(Token::String)
                    .map_err(|_| AbiError::InvalidData("string is not valid UTF-8".to_string()))
            }
        }
        ParamType::Array(inner) => {
            let len = read_usize(data, 0)?;
            let body = &data[WORD_SIZE..];
            let types = repeat(inner, len, body.len())?;
            Ok(Token::Array(decode_sequence(&types, body)?))
        }
        ParamType::FixedArray(inner, len) => {
            let types = repeat(inner, *len, data.len())?;
            Ok(Token::FixedArray(decode_sequence(&types, data)?))
        }
        ParamType::Tuple(members) => Ok(Token::Tuple(decode_sequence(members, data)?)),
    }
}
