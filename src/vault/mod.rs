//! Vault module — the PIN-locked password store.
//!
//! This module provides:
//! - `CredentialEntry` and the lazily decrypting `EntryView` (`entry`)
//! - The `Vault` handle and its lock state machine (`session`)
//! - Entry CRUD on an unlocked vault (`store`)
//! - Backup export and import (`transfer`)

pub mod entry;
pub mod session;
pub mod store;
pub mod transfer;

// Re-export the most commonly used items.
pub use entry::{CredentialEntry, EntryView};
pub use session::{LockState, RotationPolicy, Vault};
pub use transfer::Snapshot;
