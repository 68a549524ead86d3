use ratatui::prelude::{Line, Span};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    widgets::{
        Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Wrap,
        block::{Position, Title},
    },
};

use crate::{
    domain::{ActiveCategory, Note, count_in},
    storage::KeyValueStore,
};

use super::{App, CardAction, time_format, ui_helpers, view_style};

const SIDEBAR_WIDTH: u16 = 24;

impl<S: KeyValueStore> App<S> {
    pub(super) fn draw_frame(&self, f: &mut Frame) {
        let size = f.size();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(size);

        let detail = self.detail_note();
        let columns = if detail.is_some() {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Length(SIDEBAR_WIDTH),
                    Constraint::Min(20),
                    Constraint::Percentage(40),
                ])
                .split(rows[0])
        } else {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
                .split(rows[0])
        };

        self.render_sidebar(f, columns[0]);
        self.render_notes_column(f, columns[1]);
        if let Some(note) = detail {
            self.render_detail(f, columns[2], note);
        }
        self.render_footer(f, rows[1]);

        if self.in_modal() {
            self.render_note_modal(f, size);
        }
    }

    fn render_sidebar(&self, f: &mut Frame, area: Rect) {
        let notes = self.store.notes();
        let options = ActiveCategory::options();

        let items: Vec<ListItem> = options
            .iter()
            .map(|option| {
                let is_active = *option == self.active_category;
                let color = view_style::active_category_color(*option);
                let count = count_in(notes, *option);
                let line = Line::from(vec![
                    Span::raw("● ").fg(color),
                    view_style::label_span(option.label(), is_active),
                    Span::styled(format!(" ({})", count), view_style::hint_style()),
                ]);
                if is_active {
                    ListItem::new(line).style(Style::default().bg(Color::Rgb(40, 40, 60)))
                } else {
                    ListItem::new(line)
                }
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(Line::from(Span::styled(
                    "notebox",
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )))
                .border_style(
                    Style::default().fg(view_style::active_category_color(self.active_category)),
                ),
        );

        f.render_widget(list, area);
    }

    fn render_notes_column(&self, f: &mut Frame, area: Rect) {
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);

        self.render_search_bar(f, parts[0]);
        self.render_note_list(f, parts[1]);
    }

    fn render_search_bar(&self, f: &mut Frame, area: Rect) {
        let content = if self.search_text.is_empty() && !self.search_active {
            Line::from(Span::styled("/ to search", view_style::hint_style()))
        } else {
            let cursor = if self.search_active { "▏" } else { "" };
            Line::from(vec![
                Span::raw(self.search_text.clone()),
                Span::raw(cursor),
            ])
        };

        let border = if self.search_active {
            Color::White
        } else {
            Color::DarkGray
        };

        let paragraph = Paragraph::new(content).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title("Search")
                .border_style(Style::default().fg(border)),
        );
        f.render_widget(paragraph, area);
    }

    fn render_note_list(&self, f: &mut Frame, area: Rect) {
        let visible = self.visible_notes();
        let inner_width = area.width.saturating_sub(4) as usize;

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(Line::from(vec![
                Span::styled(
                    self.active_category.label(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!(" {}", visible.len()), view_style::hint_style()),
            ]))
            .border_style(Style::default().fg(Color::DarkGray));

        if visible.is_empty() {
            let message = if self.store.is_empty() {
                "No notes yet. Press a to add one."
            } else {
                "No notes match."
            };
            let paragraph =
                Paragraph::new(Line::from(Span::styled(message, view_style::hint_style())))
                    .block(block);
            f.render_widget(paragraph, area);
            return;
        }

        let items: Vec<ListItem> = visible
            .iter()
            .map(|note| self.note_card(note, inner_width))
            .collect();

        let mut list_state = ListState::default();
        list_state.select(Some(self.cursor));

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::Rgb(40, 40, 60)))
            .highlight_symbol("▌");

        f.render_stateful_widget(list, area, &mut list_state);
    }

    fn note_card(&self, note: &Note, width: usize) -> ListItem<'static> {
        let color = view_style::category_color(note.category);
        let label = note.category.label();
        let title_width = width.saturating_sub(label.chars().count() + 3);

        let mut lines = vec![
            Line::from(vec![
                Span::styled(
                    ui_helpers::truncate_label(&note.title, title_width),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" · "),
                Span::raw(label).fg(color),
            ]),
            Line::from(Span::styled(
                ui_helpers::truncate_label(ui_helpers::preview_line(&note.description), width),
                Style::default().fg(Color::Gray),
            )),
        ];

        if let Some(menu) = self
            .card_menu
            .as_ref()
            .filter(|menu| menu.note_id == note.id)
        {
            let mut spans = vec![Span::raw("  ")];
            for (i, action) in CardAction::ALL.iter().enumerate() {
                let style = if i == menu.action_index {
                    Style::default().fg(Color::Black).bg(Color::White)
                } else {
                    Style::default().fg(Color::White)
                };
                spans.push(Span::styled(format!(" {} ", action.label()), style));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }

        ListItem::new(lines)
    }

    fn render_detail(&self, f: &mut Frame, area: Rect, note: &Note) {
        let color = view_style::category_color(note.category);

        let mut lines = vec![
            Line::from(Span::styled(
                note.title.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        lines.extend(note.description.lines().map(|l| Line::from(l.to_string())));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Category: ", view_style::hint_style()),
            Span::raw(note.category.label()).fg(color),
        ]));
        if let Some(created_at) = note.created_at.as_ref() {
            lines.push(Line::from(Span::styled(
                format!("Created: {}", time_format::format_created_at_local(created_at)),
                view_style::hint_style(),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" Note ")
                .title(
                    Title::from(Line::from(Span::styled(
                        " e edit · d delete · Esc close ",
                        view_style::hint_style(),
                    )))
                    .position(Position::Bottom),
                )
                .border_style(Style::default().fg(color)),
        );
        f.render_widget(paragraph, area);
    }

    fn render_footer(&self, f: &mut Frame, area: Rect) {
        let hint = if self.in_modal() {
            "Tab next field · ←/→ category · Ctrl-S save · Esc cancel"
        } else if self.search_active {
            "type to filter · Enter keep · Esc clear"
        } else if self.card_menu.is_some() {
            "↑/↓ choose · Enter run · Esc close"
        } else {
            "a add · e edit · d delete · m menu · / search · Tab category · Enter open · q quit"
        };
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(hint, view_style::hint_style()))),
            area,
        );
    }
}
