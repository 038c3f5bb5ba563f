//! PIN-derived secrets.
//!
//! A PIN yields two independent things:
//!
//! - a **hash** (lowercase hex SHA-256) that is persisted and used to
//!   authenticate the owner on later runs, and
//! - a **key/IV pair** used by the entry cipher, which only ever lives in
//!   memory.
//!
//! The key material is taken directly from the PIN bytes, without a KDF:
//!
//! ```text
//! key = utf8(pin)[0..16]    zero-padded on the right
//! iv  = utf8(pin)[16..32]   zero-padded on the right
//! ```
//!
//! Bytes past offset 32 are ignored.  This keeps stored ciphertext
//! compatible with existing backups; it is not a strong scheme.  A short
//! PIN such as `"1234"` gets an all-zero IV, and two PINs that differ only
//! in trailing NUL bytes or past the 32nd byte share key material.

use std::fmt;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::errors::{BentoError, Result};

/// Minimum PIN length, counted in characters.
pub const MIN_PIN_LEN: usize = 4;

/// Length of the content key in bytes (AES-128).
pub const KEY_LEN: usize = 16;

/// Length of the initialization vector in bytes.
pub const IV_LEN: usize = 16;

/// Hash and key material derived from one PIN.
///
/// The hash and the key/IV always come from the same PIN value; the only
/// constructors derive all three together.
pub struct PinSecret {
    hash: String,
    key: Zeroizing<[u8; KEY_LEN]>,
    iv: Zeroizing<[u8; IV_LEN]>,
}

impl PinSecret {
    /// Derive the secret for `pin` without checking its strength.
    ///
    /// Used after a successful `verify_pin`, where the PIN already passed
    /// the length check when it was first chosen.
    pub fn derive(pin: &str) -> Self {
        let (key, iv) = derive_key_iv(pin);
        Self {
            hash: hash_pin(pin),
            key,
            iv,
        }
    }

    /// The persisted authentication hash.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn key(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    pub fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }
}

impl fmt::Debug for PinSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinSecret")
            .field("hash", &self.hash)
            .field("key", &"<redacted>")
            .field("iv", &"<redacted>")
            .finish()
    }
}

/// Choose a new PIN, rejecting anything shorter than `MIN_PIN_LEN`.
pub fn set_pin(pin: &str) -> Result<PinSecret> {
    check_strength(pin)?;
    Ok(PinSecret::derive(pin))
}

/// Fail with `WeakPin` when `pin` is too short.
pub fn check_strength(pin: &str) -> Result<()> {
    if pin.chars().count() < MIN_PIN_LEN {
        return Err(BentoError::WeakPin(MIN_PIN_LEN));
    }
    Ok(())
}

/// One-way hash of a PIN: lowercase hex SHA-256 of its UTF-8 bytes.
pub fn hash_pin(pin: &str) -> String {
    Sha256::digest(pin.as_bytes())
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Check `pin` against a stored hash.
pub fn verify_pin(pin: &str, hash: &str) -> bool {
    let candidate = hash_pin(pin);

    // Constant-time comparison to avoid timing side channels.
    candidate.as_bytes().ct_eq(hash.as_bytes()).into()
}

/// Split the PIN bytes into a zero-padded key and IV.
fn derive_key_iv(pin: &str) -> (Zeroizing<[u8; KEY_LEN]>, Zeroizing<[u8; IV_LEN]>) {
    let bytes = pin.as_bytes();
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    let mut iv = Zeroizing::new([0u8; IV_LEN]);

    let key_part = &bytes[..bytes.len().min(KEY_LEN)];
    key[..key_part.len()].copy_from_slice(key_part);

    if bytes.len() > KEY_LEN {
        let iv_part = &bytes[KEY_LEN..bytes.len().min(KEY_LEN + IV_LEN)];
        iv[..iv_part.len()].copy_from_slice(iv_part);
    }

    (key, iv)
}
