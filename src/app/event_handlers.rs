use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::storage::KeyValueStore;

use super::{App, DraftField};

impl<S: KeyValueStore> App<S> {
    /// Returns `true` when the app should quit.
    pub(super) fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.in_modal() {
            self.handle_modal_key(key);
            false
        } else if self.search_active {
            self.handle_search_key(key);
            false
        } else if self.card_menu.is_some() {
            self.handle_card_menu_key(key);
            false
        } else {
            self.handle_normal_key(key)
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let focus = self.modal_focus();

        match key.code {
            KeyCode::Esc => self.cancel_modal(),
            KeyCode::Char('s') if ctrl => self.save_modal(),
            KeyCode::Tab => self.modal_move_focus(1),
            KeyCode::BackTab => self.modal_move_focus(-1),
            KeyCode::Enter => match focus {
                Some(DraftField::Title) => self.modal_move_focus(1),
                Some(DraftField::Description) => self.modal_push_char('\n'),
                Some(DraftField::Category) => self.save_modal(),
                None => {}
            },
            KeyCode::Left => self.modal_cycle_category(-1),
            KeyCode::Right => self.modal_cycle_category(1),
            KeyCode::Backspace => self.modal_pop_char(),
            KeyCode::Char(c) if !ctrl => self.modal_push_char(c),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.clear_search(),
            KeyCode::Enter => self.end_search(),
            KeyCode::Backspace => self.pop_search_char(),
            KeyCode::Up => self.move_cursor(-1),
            KeyCode::Down => self.move_cursor(1),
            KeyCode::Char(c) => self.push_search_char(c),
            _ => {}
        }
    }

    fn handle_card_menu_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('m') => self.card_menu = None,
            KeyCode::Up => self.move_card_menu(-1),
            KeyCode::Down => self.move_card_menu(1),
            KeyCode::Enter => self.activate_card_menu(),
            _ => {}
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Tab => self.cycle_category(1),
            KeyCode::BackTab => self.cycle_category(-1),
            KeyCode::Char('/') => self.begin_search(),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Enter => {
                if let Some(id) = self.cursor_note_id() {
                    self.select_note(id);
                }
            }
            KeyCode::Char('m') => self.toggle_card_menu(),
            KeyCode::Char('a') | KeyCode::Char('n') => self.open_add_modal(),
            KeyCode::Char('e') => {
                if let Some(id) = self.action_target() {
                    self.open_edit_modal(&id);
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.action_target() {
                    self.delete_note(&id);
                }
            }
            KeyCode::Esc => self.close_detail(),
            _ => {}
        }
        false
    }
}
