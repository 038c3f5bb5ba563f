//! Credential entries as stored, and a read-only view that decrypts on
//! demand.

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::crypto::{cipher, PinSecret};
use crate::errors::Result;

/// One stored credential.  `password` is always ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialEntry {
    pub id: String,
    pub service: String,
    pub username: String,

    /// Encrypted password (base64).
    pub password: String,
}

/// An entry paired with the session's key material.
///
/// Listing hands out views instead of plaintext, so one corrupt entry
/// only fails when that entry is revealed.
#[derive(Clone, Copy)]
pub struct EntryView<'a> {
    entry: &'a CredentialEntry,
    secret: &'a PinSecret,
}

impl<'a> EntryView<'a> {
    pub(crate) fn new(entry: &'a CredentialEntry, secret: &'a PinSecret) -> Self {
        Self { entry, secret }
    }

    pub fn id(&self) -> &'a str {
        &self.entry.id
    }

    pub fn service(&self) -> &'a str {
        &self.entry.service
    }

    pub fn username(&self) -> &'a str {
        &self.entry.username
    }

    pub fn ciphertext(&self) -> &'a str {
        &self.entry.password
    }

    /// Decrypt this entry's password.
    pub fn reveal(&self) -> Result<Zeroizing<String>> {
        cipher::decrypt(&self.entry.password, self.secret)
    }

    /// Decrypt for display; failures render as `DECRYPT_SENTINEL`.
    pub fn reveal_or_sentinel(&self) -> Zeroizing<String> {
        cipher::decrypt_or_sentinel(&self.entry.password, Some(self.secret))
    }
}
