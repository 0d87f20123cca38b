//! # Case Address Derivation
//!
//! Deterministic 20-byte references for registries and the cases they
//! deploy. Both are Keccak-256 based and CREATE-like, not EVM-exact: the
//! registry form hashes the raw deployer bytes and nonce without RLP.
//!
//! - registry: `keccak256(deployer ++ nonce)[12..]`
//! - case: `keccak256(0xff ++ registry ++ salt ++ keccak256(init_code))[12..]`
//!   where `salt` is the case id as a 32-byte big-endian word

use sha3::{Digest, Keccak256};
use shared_types::entities::{Address, CaseId};

/// Init code tag hashed into every case address.
pub const CASE_INIT_CODE: &[u8] = b"custody-chain/case/v1";

fn truncate(hash: &[u8]) -> Address {
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&hash[12..32]);
    Address::new(addr)
}

/// Reference of a registry created by `deployer` at `nonce`.
#[must_use]
pub fn compute_registry_address(deployer: &Address, nonce: u64) -> Address {
    let mut hasher = Keccak256::new();
    hasher.update(deployer.as_bytes());
    hasher.update(nonce.to_be_bytes());
    truncate(&hasher.finalize())
}

/// Reference of case `case_id` deployed by `registry`.
#[must_use]
pub fn compute_case_address(registry: &Address, case_id: CaseId) -> Address {
    let code_hash = Keccak256::digest(CASE_INIT_CODE);

    let mut salt = [0u8; 32];
    salt[24..].copy_from_slice(&case_id.to_be_bytes());

    let mut data = Vec::with_capacity(85);
    data.push(0xff);
    data.extend_from_slice(registry.as_bytes());
    data.extend_from_slice(&salt);
    data.extend_from_slice(&code_hash);

    truncate(&Keccak256::digest(&data))
}
