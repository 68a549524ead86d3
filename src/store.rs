use chrono::Utc;
use tracing::{debug, info, warn};

use crate::{
    constants::STORAGE_KEY,
    domain::{Category, Note, NoteId, UpdateError, ValidationError, validate_note},
    storage::{self, KeyValueStore},
};

/// Authoritative note collection plus the backend it is persisted to.
pub struct NoteStore<S: KeyValueStore> {
    notes: Vec<Note>,
    backend: S,
    last_issued_id: u64,
}

impl<S: KeyValueStore> NoteStore<S> {
    /// Loads the persisted collection, falling back to the bundled seed when
    /// nothing usable is stored. Never fails.
    pub fn initialize(backend: S) -> Self {
        let notes = match backend.get(STORAGE_KEY) {
            Ok(Some(raw)) => match storage::decode_notes(&raw) {
                Ok(notes) => {
                    info!(count = notes.len(), "loaded persisted notes");
                    Some(notes)
                }
                Err(e) => {
                    warn!(error = %e, "persisted notes unreadable, using seed");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "could not read persisted notes, using seed");
                None
            }
        };

        let notes = notes.unwrap_or_else(|| match storage::load_seed_notes() {
            Ok(seed) => {
                info!(count = seed.len(), "seeded notes from bundled file");
                seed
            }
            Err(e) => {
                warn!(error = %e, "bundled seed unreadable, starting empty");
                Vec::new()
            }
        });

        Self::with_notes(notes, backend)
    }

    pub fn with_notes(notes: Vec<Note>, backend: S) -> Self {
        let last_issued_id = notes
            .iter()
            .filter_map(|n| n.id.as_number())
            .max()
            .unwrap_or(0);
        NoteStore {
            notes,
            backend,
            last_issued_id,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| &n.id == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn create(
        &mut self,
        title: &str,
        description: &str,
        category: Category,
    ) -> Result<NoteId, ValidationError> {
        let fields = validate_note(&self.notes, None, title, description, category)?;

        let id = self.next_id();
        self.notes.push(Note {
            id: id.clone(),
            title: fields.title,
            description: fields.description,
            category: fields.category,
            created_at: Some(Utc::now()),
        });
        info!(%id, category = %category, "note created");

        self.persist();
        Ok(id)
    }

    pub fn update(
        &mut self,
        id: &NoteId,
        title: &str,
        description: &str,
        category: Category,
    ) -> Result<(), UpdateError> {
        let Some(index) = self.notes.iter().position(|n| &n.id == id) else {
            return Err(UpdateError::NotFound(id.clone()));
        };

        let fields = validate_note(&self.notes, Some(id), title, description, category)?;

        let note = &mut self.notes[index];
        note.title = fields.title;
        note.description = fields.description;
        note.category = fields.category;
        info!(%id, category = %category, "note updated");

        self.persist();
        Ok(())
    }

    /// Removes the note if present. Returns whether anything was removed.
    pub fn delete(&mut self, id: &NoteId) -> bool {
        let before = self.notes.len();
        self.notes.retain(|n| &n.id != id);
        let removed = self.notes.len() != before;
        if removed {
            info!(%id, "note deleted");
        } else {
            debug!(%id, "delete of unknown note ignored");
        }

        self.persist();
        removed
    }

    fn next_id(&mut self) -> NoteId {
        let now_ms = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        match self.last_issued_id.checked_add(1) {
            Some(next) => {
                let id = now_ms.max(next);
                self.last_issued_id = id;
                NoteId::new(id)
            }
            None => {
                // Numeric space above the loaded ids is exhausted.
                let id = self.first_free_number(now_ms);
                warn!(%id, "numeric ids exhausted, reusing a free slot");
                NoteId::new(id)
            }
        }
    }

    fn first_free_number(&self, from: u64) -> u64 {
        (from..=u64::MAX)
            .chain(0..from)
            .find(|candidate| {
                !self
                    .notes
                    .iter()
                    .any(|n| n.id.as_number() == Some(*candidate))
            })
            .unwrap_or(from)
    }

    fn persist(&mut self) {
        let encoded = match storage::encode_notes(&self.notes) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(error = %e, "could not serialize notes");
                return;
            }
        };

        if let Err(e) = self.backend.set(STORAGE_KEY, &encoded) {
            warn!(error = %e, "could not persist notes");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::storage::MemoryStore;

    fn empty_store() -> NoteStore<MemoryStore> {
        NoteStore::with_notes(Vec::new(), MemoryStore::new())
    }

    fn persisted(store: &NoteStore<MemoryStore>) -> Vec<Note> {
        let raw = store
            .backend()
            .get(STORAGE_KEY)
            .unwrap()
            .expect("notes should be persisted");
        storage::decode_notes(&raw).unwrap()
    }

    #[test]
    fn test_initialize_seeds_when_nothing_stored() {
        let store = NoteStore::initialize(MemoryStore::new());
        assert_eq!(store.notes(), storage::load_seed_notes().unwrap().as_slice());
        assert_eq!(store.backend().writes, 0);
    }

    #[test]
    fn test_initialize_prefers_persisted_notes() {
        let raw = r#"[{"id":9,"title":"Mine","description":"kept","category":"Ideas"}]"#;
        let store = NoteStore::initialize(MemoryStore::with_value(STORAGE_KEY, raw));
        assert_eq!(store.len(), 1);
        assert_eq!(store.notes()[0].title, "Mine");
    }

    #[test]
    fn test_initialize_corrupt_data_falls_back_to_seed() {
        let store = NoteStore::initialize(MemoryStore::with_value(STORAGE_KEY, "{not json"));
        assert_eq!(store.len(), storage::load_seed_notes().unwrap().len());

        let wrong_schema = r#"[{"id":1,"title":"t","category":"Work"}]"#;
        let store = NoteStore::initialize(MemoryStore::with_value(STORAGE_KEY, wrong_schema));
        assert_eq!(store.len(), storage::load_seed_notes().unwrap().len());
    }

    #[test]
    fn test_initialize_keeps_existing_duplicates() {
        let raw = r#"[{"id":1,"title":"Same","description":"a","category":"Work"},
                     {"id":2,"title":"same ","description":"b","category":"Work"}]"#;
        let store = NoteStore::initialize(MemoryStore::with_value(STORAGE_KEY, raw));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_create_appends_and_persists() {
        let mut store = empty_store();
        let id = store.create("  Buy milk ", " 2% ", Category::Work).unwrap();

        assert_eq!(store.len(), 1);
        let note = store.get(&id).unwrap();
        assert_eq!(note.title, "Buy milk");
        assert_eq!(note.description, "2%");
        assert!(note.created_at.is_some());
        assert_eq!(persisted(&store), store.notes());
        assert_eq!(store.backend().writes, 1);
    }

    #[test]
    fn test_create_issues_distinct_ids() {
        let mut store = empty_store();
        let mut seen = HashSet::new();
        for i in 0..20 {
            let id = store
                .create(&format!("note {}", i), "body", Category::Ideas)
                .unwrap();
            assert!(seen.insert(id));
        }
        assert_eq!(store.len(), 20);
    }

    #[test]
    fn test_new_ids_do_not_collide_with_loaded_ids() {
        let far_future = u64::MAX / 2;
        let notes = vec![Note {
            id: NoteId::new(far_future),
            title: "Loaded".to_string(),
            description: "x".to_string(),
            category: Category::Work,
            created_at: None,
        }];
        let mut store = NoteStore::with_notes(notes, MemoryStore::new());
        let id = store.create("Fresh", "y", Category::Work).unwrap();
        assert_eq!(id, NoteId::new(far_future + 1));
    }

    #[test]
    fn test_create_after_max_numeric_id_does_not_overflow() {
        let raw = r#"[{"id":18446744073709551615,"title":"Edge","description":"x","category":"Work"}]"#;
        let mut store = NoteStore::initialize(MemoryStore::with_value(STORAGE_KEY, raw));

        let first = store.create("new", "x", Category::Work).unwrap();
        let second = store.create("newer", "y", Category::Work).unwrap();

        let max = NoteId::new(u64::MAX);
        assert_ne!(first, max);
        assert_ne!(second, max);
        assert_ne!(first, second);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut store = empty_store();
        let first = store.create("A", "a", Category::Work).unwrap();
        assert!(store.delete(&first));
        let second = store.create("A", "a", Category::Work).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_create_empty_fields_leave_store_untouched() {
        let mut store = empty_store();
        assert_eq!(
            store.create("   ", "body", Category::Work),
            Err(ValidationError::EmptyField)
        );
        assert_eq!(
            store.create("title", "", Category::Work),
            Err(ValidationError::EmptyField)
        );
        assert!(store.is_empty());
        assert_eq!(store.backend().writes, 0);
    }

    #[test]
    fn test_duplicate_title_scoped_by_category() {
        let mut store = empty_store();
        store.create("groceries ", "list", Category::Work).unwrap();

        assert_eq!(
            store.create("Groceries", "again", Category::Work),
            Err(ValidationError::DuplicateTitle)
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.backend().writes, 1);

        assert!(store.create("Groceries", "again", Category::Personal).is_ok());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_update_replaces_mutable_fields_only() {
        let mut store = empty_store();
        let first = store.create("First", "one", Category::Work).unwrap();
        let second = store.create("Second", "two", Category::Work).unwrap();
        let created_at = store.get(&first).unwrap().created_at;

        store
            .update(&first, " Renamed ", "changed", Category::Ideas)
            .unwrap();

        let note = &store.notes()[0];
        assert_eq!(note.id, first);
        assert_eq!(note.title, "Renamed");
        assert_eq!(note.description, "changed");
        assert_eq!(note.category, Category::Ideas);
        assert_eq!(note.created_at, created_at);
        assert_eq!(store.notes()[1].id, second);
        assert_eq!(persisted(&store), store.notes());
    }

    #[test]
    fn test_update_to_own_title_succeeds() {
        let mut store = empty_store();
        let id = store.create("Plan", "v1", Category::Work).unwrap();
        assert!(store.update(&id, "plan", "v2", Category::Work).is_ok());
        assert_eq!(store.get(&id).unwrap().description, "v2");
    }

    #[test]
    fn test_update_colliding_with_other_note_fails() {
        let mut store = empty_store();
        let x = store.create("X", "x", Category::Work).unwrap();
        store.create("Y", "y", Category::Work).unwrap();
        let writes = store.backend().writes;

        assert_eq!(
            store.update(&x, "y", "x", Category::Work),
            Err(UpdateError::Invalid(ValidationError::DuplicateTitle))
        );
        assert_eq!(store.get(&x).unwrap().title, "X");
        assert_eq!(store.backend().writes, writes);
    }

    #[test]
    fn test_update_blank_field_fails() {
        let mut store = empty_store();
        let id = store.create("X", "x", Category::Work).unwrap();
        assert_eq!(
            store.update(&id, "X", "  ", Category::Work),
            Err(UpdateError::Invalid(ValidationError::EmptyField))
        );
        assert_eq!(store.get(&id).unwrap().description, "x");
    }

    #[test]
    fn test_update_unknown_id() {
        let mut store = empty_store();
        let missing = NoteId::new(404);
        assert_eq!(
            store.update(&missing, "a", "b", Category::Work),
            Err(UpdateError::NotFound(missing))
        );
        assert_eq!(store.backend().writes, 0);
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let mut store = empty_store();
        store.create("Keep", "me", Category::Personal).unwrap();
        let before = store.notes().to_vec();

        assert!(!store.delete(&NoteId::Text("nope".to_string())));
        assert_eq!(store.notes(), before.as_slice());
    }

    #[test]
    fn test_end_to_end_slot_freed_by_delete() {
        let mut store = empty_store();
        let first = store.create("Buy milk", "2%", Category::Work).unwrap();
        store
            .create("Buy milk", "whole", Category::Personal)
            .unwrap();
        assert_eq!(
            store.create("buy milk", "2%", Category::Work),
            Err(ValidationError::DuplicateTitle)
        );

        store.delete(&first);
        let again = store.create("buy milk", "x", Category::Work).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.notes()[0].category, Category::Personal);
        assert_eq!(store.notes()[1].id, again);
        assert_eq!(persisted(&store), store.notes());
    }

    #[test]
    fn test_reload_from_backend_matches() {
        let mut store = empty_store();
        store.create("One", "1", Category::Work).unwrap();
        store.create("Two", "2", Category::Ideas).unwrap();

        let raw = store.backend().get(STORAGE_KEY).unwrap().unwrap();
        let reloaded = NoteStore::initialize(MemoryStore::with_value(STORAGE_KEY, &raw));
        assert_eq!(reloaded.notes(), store.notes());
    }
}
