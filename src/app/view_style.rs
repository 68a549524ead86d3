use ratatui::{
    prelude::Span,
    style::{Color, Modifier, Style},
};

use crate::{
    constants::CATEGORY_COLORS,
    domain::{ActiveCategory, Category},
};

pub(super) fn category_color(category: Category) -> Color {
    match category {
        Category::Work => CATEGORY_COLORS.work,
        Category::Personal => CATEGORY_COLORS.personal,
        Category::Ideas => CATEGORY_COLORS.ideas,
    }
}

pub(super) fn active_category_color(active: ActiveCategory) -> Color {
    match active {
        ActiveCategory::All => CATEGORY_COLORS.all,
        ActiveCategory::Only(category) => category_color(category),
    }
}

pub(super) fn text_color_for_bg(bg_color: Color) -> Color {
    if let Color::Rgb(r, g, b) = bg_color {
        let brightness = (299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000;
        if brightness > 128 {
            Color::Black
        } else {
            Color::White
        }
    } else {
        Color::Black
    }
}

pub(super) fn label_span(label: &str, active: bool) -> Span<'static> {
    let style = if active {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    Span::styled(label.to_string(), style)
}

pub(super) fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub(super) fn error_style() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}
