use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};
use ratatui::Frame;

use crate::types::SortOrder;

/// Centered select for the sort order; the active order is marked with `*`.
pub fn render_sort_select(frame: &mut Frame, current: SortOrder, selected: usize) {
    let height = SortOrder::ALL.len() as u16 + 2; // +2 for borders
    let area = centered_rect(32, height, frame.area());
    frame.render_widget(Clear, area);

    let items: Vec<ListItem> = SortOrder::ALL
        .iter()
        .enumerate()
        .map(|(i, order)| {
            let style = if i == selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let prefix = if i == selected { "> " } else { "  " };
            let marker = if *order == current { " *" } else { "" };
            ListItem::new(Line::from(Span::styled(
                format!("{}{}{}", prefix, order, marker),
                style,
            )))
        })
        .collect();

    let list = List::new(items).block(
        Block::default().borders(Borders::ALL).title(Span::styled(
            " Ordenar por estrelas ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
    );

    let mut state = ListState::default();
    state.select(Some(selected));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Rect of the given size centered in `outer`, shrunk to fit
fn centered_rect(width: u16, height: u16, outer: Rect) -> Rect {
    let popup_width = width.min(outer.width);
    let popup_height = height.min(outer.height);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((outer.height.saturating_sub(popup_height)) / 2),
            Constraint::Length(popup_height),
            Constraint::Min(0),
        ])
        .split(outer);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((outer.width.saturating_sub(popup_width)) / 2),
            Constraint::Length(popup_width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}
