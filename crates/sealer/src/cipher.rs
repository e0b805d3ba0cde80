//! AES-256-GCM sealing and opening of arbitrary byte payloads.
//!
//! # Wire format
//!
//! ```text
//! nonce (12 bytes) || ciphertext || tag (16 bytes)
//! ```
//!
//! This is the layout produced by Go's `gcm.Seal(nonce, nonce, ...)` and by
//! Node's `aes-256-gcm` with `iv || update || authTag`, so messages interoperate
//! with those peers once base64-encoded.
//!
//! A fresh random nonce is drawn from the OS CSPRNG for every seal. **Never**
//! seal with a caller-chosen or counter nonce under this key: GCM nonce reuse
//! breaks both confidentiality and authentication.

use aes_gcm::{
    aead::{
        rand_core::{CryptoRng, RngCore},
        Aead, KeyInit, OsRng,
    },
    Aes256Gcm, Nonce,
};

use crate::error::CryptoError;
use crate::key::{KeyMaterial, KEY_LEN};

/// Byte length of an AES-GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the GCM authentication tag.
pub const TAG_LEN: usize = 16;

/// A sealed message split into its nonce and authenticated body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedMessage {
    /// Raw nonce bytes.
    pub nonce: [u8; NONCE_LEN],
    /// Ciphertext followed by the authentication tag.
    pub ciphertext: Vec<u8>,
}

impl SealedMessage {
    /// Concatenate into the `nonce || ciphertext_with_tag` wire form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(NONCE_LEN + self.ciphertext.len());
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Split a wire-form message.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MalformedInput`] if `bytes` is shorter than
    /// [`NONCE_LEN`]. A body shorter than the tag is left for
    /// [`open`] to reject as an authentication failure.
    pub fn parse(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() < NONCE_LEN {
            return Err(CryptoError::MalformedInput { len: bytes.len() });
        }
        let (nonce_bytes, body) = bytes.split_at(NONCE_LEN);
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(nonce_bytes);
        Ok(Self {
            nonce,
            ciphertext: body.to_vec(),
        })
    }
}

/// Seal `plaintext` under `key` with a nonce from the OS CSPRNG.
///
/// The output is `NONCE_LEN + plaintext.len() + TAG_LEN` bytes long.
///
/// # Errors
///
/// Returns [`CryptoError::RandomSource`] if the OS cannot supply randomness.
/// There is no fallback to a weaker generator.
pub fn seal(plaintext: &[u8], key: &KeyMaterial) -> Result<Vec<u8>, CryptoError> {
    seal_with_rng(plaintext, key, &mut OsRng)
}

/// Seal `plaintext` under `key`, drawing the nonce from `rng`.
///
/// # Errors
///
/// Returns [`CryptoError::RandomSource`] if `rng` fails, and
/// [`CryptoError::SealFailed`] if the AEAD rejects the payload (only possible
/// for plaintexts beyond the GCM length limit).
pub fn seal_with_rng<R>(
    plaintext: &[u8],
    key: &KeyMaterial,
    rng: &mut R,
) -> Result<Vec<u8>, CryptoError>
where
    R: RngCore + CryptoRng,
{
    let cipher = build_cipher(key.as_bytes())?;

    let mut nonce = [0u8; NONCE_LEN];
    rng.try_fill_bytes(&mut nonce)
        .map_err(|_| CryptoError::RandomSource)?;

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| CryptoError::SealFailed)?;

    Ok(SealedMessage { nonce, ciphertext }.to_bytes())
}

/// Open a message produced by [`seal`].
///
/// Decryption is all-or-nothing: no plaintext is returned unless the tag
/// verifies.
///
/// # Errors
///
/// Returns [`CryptoError::MalformedInput`] if `sealed` is shorter than the
/// nonce, and [`CryptoError::Authentication`] for a wrong key, any modified
/// byte, or a body shorter than the tag.
pub fn open(sealed: &[u8], key: &KeyMaterial) -> Result<Vec<u8>, CryptoError> {
    let cipher = build_cipher(key.as_bytes())?;
    let message = SealedMessage::parse(sealed)?;
    cipher
        .decrypt(Nonce::from_slice(&message.nonce), message.ciphertext.as_ref())
        .map_err(|_| CryptoError::Authentication)
}

fn build_cipher(key: &[u8]) -> Result<Aes256Gcm, CryptoError> {
    if key.len() != KEY_LEN {
        return Err(CryptoError::key_len(key.len()));
    }
    Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::key_len(key.len()))
}
