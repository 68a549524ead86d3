use tracing::debug;

use crate::{
    domain::{ActiveCategory, Note, NoteId, filter_notes},
    storage::KeyValueStore,
};

use super::{App, ui_helpers};

impl<S: KeyValueStore> App<S> {
    pub(super) fn visible_notes(&self) -> Vec<&Note> {
        filter_notes(self.store.notes(), self.active_category, &self.search_text)
    }

    pub(super) fn cursor_note_id(&self) -> Option<NoteId> {
        self.visible_notes()
            .get(self.cursor)
            .map(|note| note.id.clone())
    }

    pub(super) fn clamp_cursor(&mut self) {
        let len = self.visible_notes().len();
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    pub(super) fn focus_note(&mut self, id: &NoteId) {
        let position = self.visible_notes().iter().position(|n| &n.id == id);
        if let Some(position) = position {
            self.cursor = position;
        }
    }

    pub(super) fn set_active_category(&mut self, active: ActiveCategory) {
        if self.active_category != active {
            debug!(category = active.label(), "category filter changed");
            self.active_category = active;
            self.card_menu = None;
            self.clamp_cursor();
        }
    }

    pub(super) fn cycle_category(&mut self, direction: isize) {
        let options = ActiveCategory::options();
        let current = options
            .iter()
            .position(|option| *option == self.active_category)
            .unwrap_or(0);
        let next = if direction < 0 {
            ui_helpers::wrap_prev_index(current, options.len())
        } else {
            ui_helpers::wrap_next_index(current, options.len())
        };
        self.set_active_category(options[next]);
    }

    pub(super) fn begin_search(&mut self) {
        self.search_active = true;
        self.card_menu = None;
    }

    pub(super) fn end_search(&mut self) {
        self.search_active = false;
    }

    pub(super) fn clear_search(&mut self) {
        self.search_text.clear();
        self.search_active = false;
        self.clamp_cursor();
    }

    pub(super) fn push_search_char(&mut self, c: char) {
        self.search_text.push(c);
        self.clamp_cursor();
    }

    pub(super) fn pop_search_char(&mut self) {
        self.search_text.pop();
        self.clamp_cursor();
    }

    pub(super) fn move_cursor(&mut self, direction: isize) {
        let len = self.visible_notes().len();
        self.cursor = if direction < 0 {
            ui_helpers::wrap_prev_index(self.cursor, len)
        } else {
            ui_helpers::wrap_next_index(self.cursor, len)
        };
    }
}
