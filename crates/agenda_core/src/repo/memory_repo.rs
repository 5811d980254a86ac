//! In-memory contact store.
//!
//! # Responsibility
//! - Provide the full repository contract without a storage engine.
//!
//! # Invariants
//! - Insertion order is tracked so equal creation timestamps still list
//!   newest first, matching the SQLite rowid tie-break.
//! - `create` checks email uniqueness under the same lock as the insert.
//! - Lock poisoning is recovered, never propagated as a panic.

use crate::model::contact::{Contact, ContactId, NewContact};
use crate::repo::contact_repo::{ContactRepository, RepoError, RepoResult};
use crate::repo::now_epoch_ms;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct MemoryRow {
    contact: Contact,
    seq: u64,
}

#[derive(Debug, Default)]
struct MemoryState {
    rows: HashMap<ContactId, MemoryRow>,
    next_seq: u64,
}

/// Keyed in-memory store, interchangeable with the SQLite repository.
#[derive(Debug, Default)]
pub struct MemoryContactRepository {
    inner: Mutex<MemoryState>,
}

impl MemoryContactRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        // A poisoned lock only means another thread panicked mid-operation;
        // the map itself is still structurally sound.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn collect_sorted(state: &MemoryState, keep: impl Fn(&Contact) -> bool) -> Vec<Contact> {
        let mut rows: Vec<&MemoryRow> = state.rows.values().filter(|row| keep(&row.contact)).collect();
        rows.sort_by(|a, b| {
            b.contact
                .created_at
                .cmp(&a.contact.created_at)
                .then(b.seq.cmp(&a.seq))
        });
        rows.into_iter().map(|row| row.contact.clone()).collect()
    }
}

impl ContactRepository for MemoryContactRepository {
    fn get_all(&self) -> RepoResult<Vec<Contact>> {
        Ok(Self::collect_sorted(&self.state(), |_| true))
    }

    fn get_by_id(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        Ok(self.state().rows.get(&id).map(|row| row.contact.clone()))
    }

    fn search(&self, term: &str) -> RepoResult<Vec<Contact>> {
        let needle = term.to_lowercase();
        Ok(Self::collect_sorted(&self.state(), |contact| {
            contact.nombre.to_lowercase().contains(&needle)
                || contact.email.to_lowercase().contains(&needle)
                || contact.ciudad.to_lowercase().contains(&needle)
        }))
    }

    fn create(&self, draft: &NewContact) -> RepoResult<Contact> {
        let mut state = self.state();

        if state
            .rows
            .values()
            .any(|row| row.contact.email.eq_ignore_ascii_case(&draft.email))
        {
            return Err(RepoError::DuplicateEmail);
        }

        let contact = Contact {
            id: Uuid::new_v4(),
            nombre: draft.nombre.clone(),
            email: draft.email.clone(),
            telefono: draft.telefono,
            ciudad: draft.ciudad.clone(),
            notas: draft.notas.clone(),
            created_at: now_epoch_ms(),
        };

        let seq = state.next_seq;
        state.next_seq += 1;
        state.rows.insert(
            contact.id,
            MemoryRow {
                contact: contact.clone(),
                seq,
            },
        );

        Ok(contact)
    }

    fn delete(&self, id: ContactId) -> RepoResult<bool> {
        Ok(self.state().rows.remove(&id).is_some())
    }

    fn email_exists(&self, email: &str, exclude_id: Option<ContactId>) -> RepoResult<bool> {
        Ok(self.state().rows.values().any(|row| {
            row.contact.email.eq_ignore_ascii_case(email) && exclude_id != Some(row.contact.id)
        }))
    }
}
