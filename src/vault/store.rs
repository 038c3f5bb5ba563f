//! Entry operations on an unlocked vault.
//!
//! Every operation fails with `VaultLocked` unless the vault is unlocked.
//! Mutations build the new entry list, persist it in full, and only then
//! swap it into memory, so a failed write leaves both sides unchanged.

use tracing::debug;
use zeroize::Zeroizing;

use super::entry::{CredentialEntry, EntryView};
use super::session::Vault;
use crate::crypto::cipher;
use crate::errors::{BentoError, Result};
use crate::id::next_id;
use crate::storage::{keys, write_json, KeyValueStore};

impl<S: KeyValueStore> Vault<S> {
    /// Add a credential and return its id.
    pub fn add(&mut self, service: &str, username: &str, password: &str) -> Result<String> {
        let session = self.session()?;
        validate_required(service, username)?;
        validate_password(password)?;

        let entry = CredentialEntry {
            id: next_id(session.entries.iter().map(|e| e.id.as_str())),
            service: service.to_string(),
            username: username.to_string(),
            password: cipher::encrypt(password, &session.secret)?,
        };
        let id = entry.id.clone();

        let mut entries = session.entries.clone();
        entries.push(entry);
        self.commit_entries(entries)?;

        debug!(id = %id, "entry added");
        Ok(id)
    }

    /// Change an entry's service and username, and its password when one
    /// is given.  Without a password the stored ciphertext is kept.
    pub fn update(
        &mut self,
        id: &str,
        service: &str,
        username: &str,
        password: Option<&str>,
    ) -> Result<()> {
        let session = self.session()?;
        validate_required(service, username)?;

        let position = session
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| BentoError::not_found("Entry", id))?;

        let ciphertext = match password {
            Some(pw) => {
                validate_password(pw)?;
                cipher::encrypt(pw, &session.secret)?
            }
            None => session.entries[position].password.clone(),
        };

        let mut entries = session.entries.clone();
        entries[position] = CredentialEntry {
            id: id.to_string(),
            service: service.to_string(),
            username: username.to_string(),
            password: ciphertext,
        };
        self.commit_entries(entries)?;

        debug!(id, "entry updated");
        Ok(())
    }

    /// Remove an entry.
    pub fn delete(&mut self, id: &str) -> Result<()> {
        let session = self.session()?;
        if !session.entries.iter().any(|e| e.id == id) {
            return Err(BentoError::not_found("Entry", id));
        }

        let entries = session
            .entries
            .iter()
            .filter(|e| e.id != id)
            .cloned()
            .collect();
        self.commit_entries(entries)?;

        debug!(id, "entry deleted");
        Ok(())
    }

    /// All entries in insertion order.  Passwords decrypt on demand.
    pub fn get_all(&self) -> Result<Vec<EntryView<'_>>> {
        let session = self.session()?;
        Ok(session
            .entries
            .iter()
            .map(|e| EntryView::new(e, &session.secret))
            .collect())
    }

    /// A single entry by id.
    pub fn entry(&self, id: &str) -> Result<EntryView<'_>> {
        let session = self.session()?;
        session
            .entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| EntryView::new(e, &session.secret))
            .ok_or_else(|| BentoError::not_found("Entry", id))
    }

    /// Decrypt one entry's password.
    pub fn reveal(&self, id: &str) -> Result<Zeroizing<String>> {
        self.entry(id)?.reveal()
    }

    /// Number of loaded entries.
    pub fn len(&self) -> Result<usize> {
        Ok(self.session()?.entries.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Persist `entries` and make them the loaded set.
    fn commit_entries(&mut self, entries: Vec<CredentialEntry>) -> Result<()> {
        write_json(&mut self.store, keys::PASSWORD_ENTRIES, &entries)?;
        if let Some(session) = self.session.as_mut() {
            session.entries = entries;
        }
        Ok(())
    }
}

fn validate_required(service: &str, username: &str) -> Result<()> {
    if service.trim().is_empty() {
        return Err(BentoError::Validation("Service cannot be empty".into()));
    }
    if username.trim().is_empty() {
        return Err(BentoError::Validation("Username cannot be empty".into()));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(BentoError::Validation("Password cannot be empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::DECRYPT_SENTINEL;
    use crate::storage::{read_list, MemoryStore};

    fn unlocked() -> Vault<MemoryStore> {
        let mut vault = Vault::open(MemoryStore::new()).unwrap();
        vault.set_pin("1234").unwrap();
        vault
    }

    fn stored_entries(vault: &Vault<MemoryStore>) -> Vec<CredentialEntry> {
        read_list(vault.store(), keys::PASSWORD_ENTRIES).unwrap()
    }

    #[test]
    fn add_persists_ciphertext_only() {
        let mut vault = unlocked();
        let id = vault.add("mail", "a@b.com", "hunter2").unwrap();

        let stored = stored_entries(&vault);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, id);
        assert_ne!(stored[0].password, "hunter2");
        assert_eq!(vault.reveal(&id).unwrap().as_str(), "hunter2");
    }

    #[test]
    fn add_rejects_empty_fields() {
        let mut vault = unlocked();
        for (service, user, pw) in [("", "u", "p"), ("s", "", "p"), ("s", "u", "")] {
            assert!(matches!(
                vault.add(service, user, pw),
                Err(BentoError::Validation(_))
            ));
        }
        assert!(stored_entries(&vault).is_empty());
    }

    #[test]
    fn ids_are_unique_for_rapid_adds() {
        let mut vault = unlocked();
        let a = vault.add("a", "u", "p").unwrap();
        let b = vault.add("b", "u", "p").unwrap();
        let c = vault.add("c", "u", "p").unwrap();
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn update_without_password_keeps_ciphertext() {
        let mut vault = unlocked();
        let id = vault.add("mail", "old@b.com", "hunter2").unwrap();
        let before = stored_entries(&vault)[0].password.clone();

        vault.update(&id, "mail", "new@b.com", None).unwrap();

        let after = &stored_entries(&vault)[0];
        assert_eq!(after.username, "new@b.com");
        assert_eq!(after.password, before);
        assert_eq!(after.id, id);
    }

    #[test]
    fn update_with_password_reencrypts() {
        let mut vault = unlocked();
        let id = vault.add("mail", "a@b.com", "hunter2").unwrap();
        vault.update(&id, "mail", "a@b.com", Some("correct horse")).unwrap();
        assert_eq!(vault.reveal(&id).unwrap().as_str(), "correct horse");
    }

    #[test]
    fn update_and_delete_unknown_id() {
        let mut vault = unlocked();
        assert!(matches!(
            vault.update("missing", "s", "u", None),
            Err(BentoError::NotFound { .. })
        ));
        assert!(matches!(
            vault.delete("missing"),
            Err(BentoError::NotFound { .. })
        ));
    }

    #[test]
    fn delete_removes_only_that_entry() {
        let mut vault = unlocked();
        let keep = vault.add("keep", "u", "p1").unwrap();
        let gone = vault.add("gone", "u", "p2").unwrap();

        vault.delete(&gone).unwrap();
        let ids: Vec<_> = vault.get_all().unwrap().iter().map(|e| e.id()).collect();
        assert_eq!(ids, [keep.as_str()]);
        assert_eq!(stored_entries(&vault).len(), 1);
    }

    #[test]
    fn locked_vault_rejects_everything() {
        let mut vault = unlocked();
        let id = vault.add("mail", "a@b.com", "hunter2").unwrap();
        vault.lock();

        assert!(matches!(vault.add("s", "u", "p"), Err(BentoError::VaultLocked)));
        assert!(matches!(
            vault.update(&id, "s", "u", None),
            Err(BentoError::VaultLocked)
        ));
        assert!(matches!(vault.delete(&id), Err(BentoError::VaultLocked)));
        assert!(matches!(vault.get_all(), Err(BentoError::VaultLocked)));
        assert!(matches!(vault.reveal(&id), Err(BentoError::VaultLocked)));
    }

    #[test]
    fn corrupt_entry_does_not_block_listing() {
        let mut vault = unlocked();
        vault.add("good", "u", "fine").unwrap();

        let mut store = vault.into_store();
        let mut entries: Vec<CredentialEntry> =
            read_list(&store, keys::PASSWORD_ENTRIES).unwrap();
        entries.push(CredentialEntry {
            id: "broken".into(),
            service: "bad".into(),
            username: "u".into(),
            password: "!!not-ciphertext!!".into(),
        });
        write_json(&mut store, keys::PASSWORD_ENTRIES, &entries).unwrap();

        let mut vault = Vault::open(store).unwrap();
        vault.authenticate("1234").unwrap();

        let all = vault.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].reveal().unwrap().as_str(), "fine");
        assert!(matches!(all[1].reveal(), Err(BentoError::Decrypt)));
        assert_eq!(all[1].reveal_or_sentinel().as_str(), DECRYPT_SENTINEL);
    }

    #[test]
    fn failed_write_leaves_memory_unchanged() {
        let mut vault = unlocked();
        vault.add("first", "u", "p").unwrap();

        let mut store = vault.into_store();
        store.fail_writes(true);
        let mut vault = Vault::open(store).unwrap();
        vault.authenticate("1234").unwrap();

        let err = vault.add("second", "u", "p").unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(vault.len().unwrap(), 1);
    }
}
