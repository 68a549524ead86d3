use std::{io, time::Duration};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use tracing::info;

use crate::{
    constants::TIME_SETTINGS,
    domain::{ActiveCategory, Category, NoteId},
    storage::KeyValueStore,
    store::NoteStore,
};

mod event_handlers;
mod filter_state;
mod note_modal_view;
mod note_state;
mod render_views;
mod time_format;
mod ui_helpers;
mod view_style;

#[derive(Clone, Debug, PartialEq, Eq)]
enum ModalMode {
    Add,
    Edit(NoteId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DraftField {
    Title,
    Description,
    Category,
}

impl DraftField {
    fn next(self) -> Self {
        match self {
            DraftField::Title => DraftField::Description,
            DraftField::Description => DraftField::Category,
            DraftField::Category => DraftField::Title,
        }
    }

    fn prev(self) -> Self {
        match self {
            DraftField::Title => DraftField::Category,
            DraftField::Description => DraftField::Title,
            DraftField::Category => DraftField::Description,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Draft {
    title: String,
    description: String,
    category: Category,
}

impl Default for Draft {
    fn default() -> Self {
        Draft {
            title: String::new(),
            description: String::new(),
            category: Category::Work,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum ModalState {
    Closed,
    Open {
        mode: ModalMode,
        draft: Draft,
        focus: DraftField,
        error: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CardAction {
    Edit,
    Delete,
}

impl CardAction {
    const ALL: [CardAction; 2] = [CardAction::Edit, CardAction::Delete];

    fn label(self) -> &'static str {
        match self {
            CardAction::Edit => "Edit",
            CardAction::Delete => "Delete",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct CardMenu {
    note_id: NoteId,
    action_index: usize,
}

struct App<S: KeyValueStore> {
    store: NoteStore<S>,
    active_category: ActiveCategory,
    search_text: String,
    search_active: bool,
    cursor: usize,
    selected_note: Option<NoteId>,
    card_menu: Option<CardMenu>,
    modal: ModalState,
    render_needed: bool,
}

impl<S: KeyValueStore> App<S> {
    fn new(store: NoteStore<S>) -> Self {
        App {
            store,
            active_category: ActiveCategory::All,
            search_text: String::new(),
            search_active: false,
            cursor: 0,
            selected_note: None,
            card_menu: None,
            modal: ModalState::Closed,
            render_needed: true,
        }
    }

    fn in_modal(&self) -> bool {
        matches!(self.modal, ModalState::Open { .. })
    }

    fn modal_rect(&self, terminal_size: Rect) -> Rect {
        let target_width = (terminal_size.width / 2).max(40);
        let target_height = 14;

        let max_width = terminal_size.width.saturating_sub(2).max(1);
        let max_height = terminal_size.height.saturating_sub(2).max(1);

        let modal_width = target_width.clamp(1, max_width);
        let modal_height = target_height.clamp(1, max_height);

        let modal_x = (terminal_size.width.saturating_sub(modal_width)) / 2;
        let modal_y = (terminal_size.height.saturating_sub(modal_height)) / 2;

        Rect::new(modal_x, modal_y, modal_width, modal_height)
    }
}

/// Runs the terminal UI until `q`, handing the store back afterwards.
pub fn run_ui<S: KeyValueStore>(store: NoteStore<S>) -> Result<NoteStore<S>, io::Error> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store);
    info!(notes = app.store.len(), "ui started");

    let poll_rate = Duration::from_millis(TIME_SETTINGS.poll_ms);

    loop {
        if app.render_needed {
            terminal.draw(|f| app.draw_frame(f))?;
            app.render_needed = false;
        }

        if event::poll(poll_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key) {
                        break;
                    }
                    app.render_needed = true;
                }
                Event::Resize(_, _) => app.render_needed = true,
                _ => {}
            }
        }
    }

    info!(notes = app.store.len(), "ui stopped");

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(app.store)
}
