//! # BT2C Crypto
//!
//! Key pairs, deterministic address derivation, message signing and
//! verification, content hashing, and Merkle roots — the `Crypto`
//! collaborator named in the system design.
//!
//! One signature scheme (Ed25519) and one address format at a time, per
//! the project's non-goals: no multi-curve support, no derivation paths.

#![warn(missing_docs)]

pub mod errors;
pub mod hashing;
pub mod keys;

pub use errors::CryptoError;
pub use hashing::{hash, merkle_root, Hash};
pub use keys::{Address, KeyPair, PublicKey, Signature, ADDRESS_LEN, PUBLIC_KEY_LEN, SIGNATURE_LEN};
