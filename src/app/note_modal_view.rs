use ratatui::prelude::{Line, Span};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::{domain::Category, storage::KeyValueStore};

use super::{App, DraftField, ModalMode, ModalState, view_style};

const ERROR_ROWS: u16 = 2;

impl<S: KeyValueStore> App<S> {
    pub(super) fn render_note_modal(&self, f: &mut Frame, terminal_size: Rect) {
        let ModalState::Open {
            mode,
            draft,
            focus,
            error,
        } = &self.modal
        else {
            return;
        };

        let modal_rect = self.modal_rect(terminal_size);
        let border_color = view_style::category_color(draft.category);
        let title = match mode {
            ModalMode::Add => "Add Note",
            ModalMode::Edit(_) => "Edit Note",
        };

        let label_style = |field: DraftField| {
            if *focus == field {
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                view_style::hint_style()
            }
        };
        let caret = |field: DraftField| if *focus == field { "▏" } else { "" };

        let mut body = vec![
            Line::from(Span::styled("Title", label_style(DraftField::Title))),
            Line::from(vec![
                Span::raw(draft.title.clone()),
                Span::raw(caret(DraftField::Title)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Description",
                label_style(DraftField::Description),
            )),
        ];

        let mut description_lines: Vec<String> =
            draft.description.split('\n').map(str::to_string).collect();
        if let Some(last) = description_lines.last_mut() {
            last.push_str(caret(DraftField::Description));
        }
        body.extend(description_lines.into_iter().map(Line::from));

        let mut category_spans = vec![Span::styled(
            "Category  ",
            label_style(DraftField::Category),
        )];
        for category in Category::ALL {
            let color = view_style::category_color(category);
            if category == draft.category {
                category_spans.push(Span::styled(
                    format!(" {} ", category.label()),
                    Style::default()
                        .fg(view_style::text_color_for_bg(color))
                        .bg(color),
                ));
            } else {
                category_spans.push(Span::raw(format!(" {} ", category.label())).fg(color));
            }
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(Line::from(Span::styled(
                title,
                Style::default().fg(Color::White),
            )))
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(modal_rect);

        // Category and error rows are reserved so a long description
        // can only clip itself.
        let error_rows = if error.is_some() { ERROR_ROWS } else { 0 };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(2),
                Constraint::Length(error_rows),
            ])
            .split(inner);

        f.render_widget(Clear, modal_rect);
        f.render_widget(block, modal_rect);
        f.render_widget(Paragraph::new(body).wrap(Wrap { trim: false }), rows[0]);
        f.render_widget(
            Paragraph::new(vec![Line::from(""), Line::from(category_spans)]),
            rows[1],
        );
        if let Some(message) = error {
            f.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    message.clone(),
                    view_style::error_style(),
                )))
                .wrap(Wrap { trim: true }),
                rows[2],
            );
        }
    }
}
