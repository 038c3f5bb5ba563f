//! Password-field encryption.
//!
//! AES-128-GCM keyed by the PIN-derived key, using the 16-byte
//! PIN-derived IV as the nonce.  There is no per-entry nonce, so the same
//! password under the same PIN always produces the same ciphertext.
//!
//! Stored form: base64 (standard alphabet) of `ciphertext || 16-byte tag`.

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::aes::Aes128;
use aes_gcm::{AesGcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use zeroize::{Zeroize, Zeroizing};

use super::pin::PinSecret;
use crate::errors::{BentoError, Result};

/// AES-128-GCM with a 128-bit nonce.
type PinCipher = AesGcm<Aes128, U16>;

/// Text shown in place of a password that cannot be decrypted.
pub const DECRYPT_SENTINEL: &str = "Error: Could not decrypt.";

/// Encrypt a plaintext password under `secret`.
pub fn encrypt(plaintext: &str, secret: &PinSecret) -> Result<String> {
    let cipher = PinCipher::new_from_slice(secret.key())
        .map_err(|e| BentoError::EncryptionFailed(format!("invalid key length: {e}")))?;
    let nonce = Nonce::<U16>::from_slice(secret.iv());

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|e| BentoError::EncryptionFailed(format!("encryption error: {e}")))?;

    Ok(BASE64.encode(ciphertext))
}

/// Decrypt a stored password.
///
/// Malformed base64, a failed authentication tag and non-UTF-8 output all
/// map to `BentoError::Decrypt`; this never panics.
pub fn decrypt(ciphertext: &str, secret: &PinSecret) -> Result<Zeroizing<String>> {
    let raw = BASE64.decode(ciphertext).map_err(|_| BentoError::Decrypt)?;

    let cipher = PinCipher::new_from_slice(secret.key()).map_err(|_| BentoError::Decrypt)?;
    let nonce = Nonce::<U16>::from_slice(secret.iv());

    let plaintext = cipher
        .decrypt(nonce, raw.as_slice())
        .map_err(|_| BentoError::Decrypt)?;

    String::from_utf8(plaintext)
        .map(Zeroizing::new)
        .map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            BentoError::Decrypt
        })
}

/// Decrypt for display, substituting `DECRYPT_SENTINEL` on any failure,
/// including when no key material is available at all.
pub fn decrypt_or_sentinel(ciphertext: &str, secret: Option<&PinSecret>) -> Zeroizing<String> {
    secret
        .and_then(|s| decrypt(ciphertext, s).ok())
        .unwrap_or_else(|| Zeroizing::new(DECRYPT_SENTINEL.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let secret = PinSecret::derive("1234");
        let ct = encrypt("hunter2", &secret).unwrap();
        assert_ne!(ct, "hunter2");
        assert_eq!(decrypt(&ct, &secret).unwrap().as_str(), "hunter2");
    }

    #[test]
    fn encryption_is_deterministic_per_pin() {
        let secret = PinSecret::derive("1234");
        let a = encrypt("same password", &secret).unwrap();
        let b = encrypt("same password", &secret).unwrap();
        assert_eq!(a, b);

        let other = PinSecret::derive("5678");
        assert_ne!(a, encrypt("same password", &other).unwrap());
    }

    #[test]
    fn wrong_pin_is_a_decrypt_error() {
        let ct = encrypt("hunter2", &PinSecret::derive("1234")).unwrap();
        let result = decrypt(&ct, &PinSecret::derive("0000"));
        assert!(matches!(result, Err(BentoError::Decrypt)));
    }

    #[test]
    fn garbage_is_a_decrypt_error() {
        let secret = PinSecret::derive("1234");
        for bad in ["", "not base64 !!", "AAAA", "U2FsdGVkX1+abc"] {
            assert!(matches!(decrypt(bad, &secret), Err(BentoError::Decrypt)));
        }
    }

    #[test]
    fn tampered_ciphertext_is_rejected() {
        let secret = PinSecret::derive("1234");
        let ct = encrypt("hunter2", &secret).unwrap();
        let mut raw = BASE64.decode(&ct).unwrap();
        raw[0] ^= 0x01;
        let tampered = BASE64.encode(raw);
        assert!(matches!(decrypt(&tampered, &secret), Err(BentoError::Decrypt)));
    }

    #[test]
    fn sentinel_without_key_material() {
        let ct = encrypt("hunter2", &PinSecret::derive("1234")).unwrap();
        assert_eq!(decrypt_or_sentinel(&ct, None).as_str(), DECRYPT_SENTINEL);
        assert_eq!(
            decrypt_or_sentinel(&ct, Some(&PinSecret::derive("4321"))).as_str(),
            DECRYPT_SENTINEL
        );
        assert_eq!(
            decrypt_or_sentinel(&ct, Some(&PinSecret::derive("1234"))).as_str(),
            "hunter2"
        );
    }

    #[test]
    fn unicode_passwords_roundtrip() {
        let secret = PinSecret::derive("pässwörd-pin");
        let ct = encrypt("ключ🔑", &secret).unwrap();
        assert_eq!(decrypt(&ct, &secret).unwrap().as_str(), "ключ🔑");
    }
}
