//! Cryptographic primitives for Bento.
//!
//! This module provides:
//! - PIN hashing, verification and key/IV derivation (`pin`)
//! - AES-128-GCM encryption of individual password fields (`cipher`)
//! - A random password generator (`generator`)

pub mod cipher;
pub mod generator;
pub mod pin;

pub use cipher::{decrypt, decrypt_or_sentinel, encrypt, DECRYPT_SENTINEL};
pub use generator::generate_password;
pub use pin::{hash_pin, set_pin, verify_pin, PinSecret, MIN_PIN_LEN};
