//! AES-256-GCM sealing of short text payloads.
//!
//! This crate is free of HTTP and runtime dependencies. It provides the key,
//! cipher, and codec layers, the [`ResultEnvelope`](common::ResultEnvelope)
//! boundary, and an export table through which a host calls the operations
//! by name.
//!
//! # Sealed message format
//!
//! ```text
//! base64( nonce[12] || ciphertext || tag[16] )
//! ```

pub mod cipher;
pub mod codec;
pub mod envelope;
pub mod error;
pub mod exports;
pub mod key;
pub mod selftest;

pub use cipher::{open, seal, NONCE_LEN, TAG_LEN};
pub use envelope::{decrypt, decrypt_json, encrypt, encrypt_json};
pub use error::CryptoError;
pub use exports::{Exports, ReadinessObserver};
pub use key::{KeyMaterial, ALGORITHM, KEY_LEN};
