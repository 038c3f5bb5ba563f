//! The vault handle and its lock state machine.
//!
//! ```text
//!                 set_pin                       lock / restart
//! Uninitialized ──────────▶ Unlocked ◀──────────────────────────▶ Locked
//!                              │  ▲         authenticate
//!                              └──┘
//!                           rotate_pin
//! ```
//!
//! Only the PIN hash and the encrypted entries are ever persisted.  Key
//! material and the loaded entry list live inside `Session`, which exists
//! only while the vault is unlocked and is dropped (zeroizing the key) on
//! `lock`.  A fresh `Vault::open` therefore always starts `Locked` or
//! `Uninitialized`.

use std::fmt;

use tracing::{info, warn};

use super::entry::CredentialEntry;
use crate::crypto::{cipher, pin, PinSecret};
use crate::errors::{BentoError, Result};
use crate::storage::{keys, read_list, write_json, KeyValueStore};

/// Externally visible lock state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// No PIN has ever been set.
    Uninitialized,
    /// A PIN exists but has not been entered in this session.
    Locked,
    /// The PIN was entered; entries are loaded and decryptable.
    Unlocked,
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Uninitialized => "not set up",
            Self::Locked => "locked",
            Self::Unlocked => "unlocked",
        };
        f.write_str(label)
    }
}

/// What happens to existing ciphertext when the PIN changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationPolicy {
    /// Only the hash and in-memory key change.  Entries encrypted under
    /// the old PIN stop decrypting.
    #[default]
    PreserveCiphertext,
    /// Decrypt every entry under the old key and re-encrypt it under the
    /// new one before the new hash is written.
    Reencrypt,
}

/// Key material and loaded entries for an unlocked vault.
pub(crate) struct Session {
    pub(crate) secret: PinSecret,
    pub(crate) entries: Vec<CredentialEntry>,
}

/// The password vault.
///
/// Owns the durable store; every operation takes `&self`/`&mut self`
/// instead of reaching for global state.
pub struct Vault<S> {
    pub(crate) store: S,
    pub(crate) pin_hash: Option<String>,
    pub(crate) session: Option<Session>,
    rotation: RotationPolicy,
}

impl<S: KeyValueStore> Vault<S> {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Open the vault backed by `store`, as at process start.
    ///
    /// The result is `Locked` if a PIN hash is stored, otherwise
    /// `Uninitialized`.
    pub fn open(store: S) -> Result<Self> {
        let pin_hash = store
            .get(keys::MASTER_PIN_HASH)?
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty());

        Ok(Self {
            store,
            pin_hash,
            session: None,
            rotation: RotationPolicy::default(),
        })
    }

    /// Choose how `rotate_pin` treats existing ciphertext.
    pub fn with_rotation_policy(mut self, rotation: RotationPolicy) -> Self {
        self.rotation = rotation;
        self
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// `Uninitialized -> Unlocked`: choose the first PIN.
    ///
    /// Persists the hash and an empty entry list.
    pub fn set_pin(&mut self, new_pin: &str) -> Result<()> {
        if self.pin_hash.is_some() {
            return Err(BentoError::AlreadyInitialized);
        }

        let secret = pin::set_pin(new_pin)?;
        let entries: Vec<CredentialEntry> = Vec::new();

        self.store.set(keys::MASTER_PIN_HASH, secret.hash())?;
        write_json(&mut self.store, keys::PASSWORD_ENTRIES, &entries)?;

        self.pin_hash = Some(secret.hash().to_string());
        self.session = Some(Session { secret, entries });

        info!("vault initialized");
        Ok(())
    }

    /// `Locked -> Unlocked`: enter the PIN.
    ///
    /// On an already unlocked vault this re-verifies the PIN and reloads
    /// the entries from storage.
    pub fn authenticate(&mut self, candidate: &str) -> Result<()> {
        let hash = self
            .pin_hash
            .as_deref()
            .ok_or(BentoError::NoVaultConfigured)?;

        if !pin::verify_pin(candidate, hash) {
            warn!("rejected PIN attempt");
            return Err(BentoError::InvalidPin);
        }

        let entries: Vec<CredentialEntry> = read_list(&self.store, keys::PASSWORD_ENTRIES)?;
        info!(entries = entries.len(), "vault unlocked");

        self.session = Some(Session {
            secret: PinSecret::derive(candidate),
            entries,
        });
        Ok(())
    }

    /// `Unlocked -> Unlocked`: change the PIN.
    ///
    /// Checks run in order: current PIN, new PIN strength, confirmation.
    /// Any failure leaves the vault exactly as it was.
    pub fn rotate_pin(&mut self, current: &str, new_pin: &str, confirm: &str) -> Result<()> {
        let session = self.session.as_ref().ok_or(BentoError::VaultLocked)?;
        let hash = self
            .pin_hash
            .as_deref()
            .ok_or(BentoError::NoVaultConfigured)?;

        if !pin::verify_pin(current, hash) {
            warn!("rejected PIN rotation: wrong current PIN");
            return Err(BentoError::InvalidPin);
        }
        pin::check_strength(new_pin)?;
        if new_pin != confirm {
            return Err(BentoError::PinMismatch);
        }

        let new_secret = PinSecret::derive(new_pin);

        let reencrypted = match self.rotation {
            RotationPolicy::PreserveCiphertext => None,
            RotationPolicy::Reencrypt => {
                Some(reencrypt_entries(&session.entries, &session.secret, &new_secret)?)
            }
        };

        // Entries first: if the hash write then fails, the old PIN still
        // unlocks and the entries are only unreadable until a retry.
        if let Some(entries) = &reencrypted {
            write_json(&mut self.store, keys::PASSWORD_ENTRIES, entries)?;
        }
        self.store.set(keys::MASTER_PIN_HASH, new_secret.hash())?;

        self.pin_hash = Some(new_secret.hash().to_string());
        if let Some(session) = self.session.as_mut() {
            session.secret = new_secret;
            if let Some(entries) = reencrypted {
                session.entries = entries;
            }
        }

        info!(policy = ?self.rotation, "PIN rotated");
        Ok(())
    }

    /// `Unlocked -> Locked`: drop key material and loaded entries.
    ///
    /// A no-op in any other state.
    pub fn lock(&mut self) {
        if self.session.take().is_some() {
            info!("vault locked");
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn state(&self) -> LockState {
        match (&self.pin_hash, &self.session) {
            (None, _) => LockState::Uninitialized,
            (Some(_), None) => LockState::Locked,
            (Some(_), Some(_)) => LockState::Unlocked,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.state() == LockState::Unlocked
    }

    /// The stored PIN hash, if a PIN was ever set.
    pub fn pin_hash(&self) -> Option<&str> {
        self.pin_hash.as_deref()
    }

    pub fn rotation_policy(&self) -> RotationPolicy {
        self.rotation
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the durable store, discarding all session state.
    pub fn into_store(self) -> S {
        self.store
    }

    pub(crate) fn session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(BentoError::VaultLocked)
    }
}

/// Re-encrypt every entry under `new`.  Entries that do not decrypt under
/// `old` are carried over unchanged.
fn reencrypt_entries(
    entries: &[CredentialEntry],
    old: &PinSecret,
    new: &PinSecret,
) -> Result<Vec<CredentialEntry>> {
    entries
        .iter()
        .map(|entry| match cipher::decrypt(&entry.password, old) {
            Ok(plaintext) => Ok(CredentialEntry {
                password: cipher::encrypt(&plaintext, new)?,
                ..entry.clone()
            }),
            Err(_) => {
                warn!(id = %entry.id, "entry not decryptable during rotation; left as-is");
                Ok(entry.clone())
            }
        })
        .collect()
}
