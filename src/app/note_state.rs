use tracing::debug;

use crate::{
    domain::{Note, NoteId},
    storage::KeyValueStore,
};

use super::{App, CardAction, CardMenu, Draft, DraftField, ModalMode, ModalState, ui_helpers};

impl<S: KeyValueStore> App<S> {
    pub(super) fn detail_note(&self) -> Option<&Note> {
        self.selected_note
            .as_ref()
            .and_then(|id| self.store.get(id))
    }

    pub(super) fn select_note(&mut self, id: NoteId) {
        self.card_menu = None;
        self.selected_note = Some(id);
    }

    pub(super) fn close_detail(&mut self) {
        self.selected_note = None;
    }

    /// Note that `e` and `d` act on: the open detail panel wins over the cursor.
    pub(super) fn action_target(&self) -> Option<NoteId> {
        self.detail_note()
            .map(|note| note.id.clone())
            .or_else(|| self.cursor_note_id())
    }

    pub(super) fn toggle_card_menu(&mut self) {
        if self.card_menu.is_some() {
            self.card_menu = None;
            return;
        }
        if let Some(note_id) = self.cursor_note_id() {
            self.card_menu = Some(CardMenu {
                note_id,
                action_index: 0,
            });
        }
    }

    pub(super) fn move_card_menu(&mut self, direction: isize) {
        if let Some(menu) = self.card_menu.as_mut() {
            let len = CardAction::ALL.len();
            menu.action_index = if direction < 0 {
                ui_helpers::wrap_prev_index(menu.action_index, len)
            } else {
                ui_helpers::wrap_next_index(menu.action_index, len)
            };
        }
    }

    pub(super) fn activate_card_menu(&mut self) {
        let Some(menu) = self.card_menu.take() else {
            return;
        };
        match CardAction::ALL.get(menu.action_index) {
            Some(CardAction::Edit) => {
                self.open_edit_modal(&menu.note_id);
            }
            Some(CardAction::Delete) => self.delete_note(&menu.note_id),
            None => {}
        }
    }

    pub(super) fn open_add_modal(&mut self) {
        self.card_menu = None;
        self.modal = ModalState::Open {
            mode: ModalMode::Add,
            draft: Draft::default(),
            focus: DraftField::Title,
            error: None,
        };
    }

    /// Shared by the card menu and the detail panel.
    pub(super) fn open_edit_modal(&mut self, id: &NoteId) -> bool {
        let Some(note) = self.store.get(id) else {
            return false;
        };
        let draft = Draft {
            title: note.title.clone(),
            description: note.description.clone(),
            category: note.category,
        };

        self.card_menu = None;
        self.modal = ModalState::Open {
            mode: ModalMode::Edit(id.clone()),
            draft,
            focus: DraftField::Title,
            error: None,
        };
        true
    }

    pub(super) fn cancel_modal(&mut self) {
        self.modal = ModalState::Closed;
    }

    pub(super) fn save_modal(&mut self) {
        let ModalState::Open { mode, draft, .. } = &self.modal else {
            return;
        };
        let mode = mode.clone();
        let draft = draft.clone();

        let result = match &mode {
            ModalMode::Add => self
                .store
                .create(&draft.title, &draft.description, draft.category)
                .map(Some)
                .map_err(|e| e.to_string()),
            ModalMode::Edit(id) => self
                .store
                .update(id, &draft.title, &draft.description, draft.category)
                .map(|_| None)
                .map_err(|e| e.to_string()),
        };

        match result {
            Ok(created) => {
                self.modal = ModalState::Closed;
                if let Some(id) = created {
                    self.focus_note(&id);
                }
                self.clamp_cursor();
            }
            Err(message) => {
                debug!(%message, "save rejected");
                if let ModalState::Open { error, .. } = &mut self.modal {
                    *error = Some(message);
                }
            }
        }
    }

    pub(super) fn delete_note(&mut self, id: &NoteId) {
        self.store.delete(id);
        if self.selected_note.as_ref() == Some(id) {
            self.selected_note = None;
        }
        if self.card_menu.as_ref().is_some_and(|menu| &menu.note_id == id) {
            self.card_menu = None;
        }
        self.clamp_cursor();
    }

    fn draft_mut(&mut self) -> Option<(&mut Draft, &mut DraftField)> {
        match &mut self.modal {
            ModalState::Open {
                draft,
                focus,
                error,
                ..
            } => {
                *error = None;
                Some((draft, focus))
            }
            ModalState::Closed => None,
        }
    }

    pub(super) fn modal_focus(&self) -> Option<DraftField> {
        match &self.modal {
            ModalState::Open { focus, .. } => Some(*focus),
            ModalState::Closed => None,
        }
    }

    pub(super) fn modal_move_focus(&mut self, direction: isize) {
        if let Some((_, focus)) = self.draft_mut() {
            *focus = if direction < 0 {
                focus.prev()
            } else {
                focus.next()
            };
        }
    }

    pub(super) fn modal_push_char(&mut self, c: char) {
        if let Some((draft, focus)) = self.draft_mut() {
            match focus {
                DraftField::Title => draft.title.push(c),
                DraftField::Description => draft.description.push(c),
                DraftField::Category => {}
            }
        }
    }

    pub(super) fn modal_pop_char(&mut self) {
        if let Some((draft, focus)) = self.draft_mut() {
            match focus {
                DraftField::Title => {
                    draft.title.pop();
                }
                DraftField::Description => {
                    draft.description.pop();
                }
                DraftField::Category => {}
            }
        }
    }

    pub(super) fn modal_cycle_category(&mut self, direction: isize) {
        if let Some((draft, DraftField::Category)) = self.draft_mut() {
            draft.category = if direction < 0 {
                draft.category.prev()
            } else {
                draft.category.next()
            };
        }
    }
}
