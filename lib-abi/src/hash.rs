//! Keccak hashing helpers
//!
//! Signature hashes, function selectors and the ENS namehash used to derive
//! application ids. Hashing only: nothing here talks to a registry.

use sha3::{Digest, Keccak256};

use crate::types::H256;

/// Keccak-256 digest
pub fn keccak256(data: impl AsRef<[u8]>) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data.as_ref());
    hasher.finalize().into()
}

/// First four bytes of the signature hash
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// ENS namehash of a dotted name. Labels are lower-cased before hashing.
pub fn namehash(name: &str) -> H256 {
    let mut node = [0u8; 32];
    if name.is_empty() {
        return H256(node);
    }
    for label in name.rsplit('.') {
        let label_hash = keccak256(label.to_lowercase().as_bytes());
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(&node);
        buf[32..].copy_from_slice(&label_hash);
        node = keccak256(buf);
    }
    H256(node)
}

/// Registry suffix for apps published on the public repository
pub const APM_REGISTRY: &str = "aragonpm.eth";

/// Registry suffix for apps published on the open repository
pub const OPEN_APM_REGISTRY: &str = "open.aragonpm.eth";

/// Application id: namehash of `<name>.aragonpm.eth` or, for apps published
/// on the open registry, `<name>.open.aragonpm.eth`.
pub fn app_id(name: &str, open: bool) -> H256 {
    let registry = if open { OPEN_APM_REGISTRY } else { APM_REGISTRY };
    namehash(&format!("{}.{}", name, registry))
}
