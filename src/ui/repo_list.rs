use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::listing::{stars_text, Column};

/// Narrowest a column is allowed to get before we page sideways
const MIN_COLUMN_WIDTH: u16 = 28;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let repos = app.view.repos();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Repositórios ({})", repos.len()));

    if repos.is_empty() {
        let empty = Paragraph::new("Nenhum repositório encontrado")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = app.view.columns();
    let fits = (inner.width / MIN_COLUMN_WIDTH).max(1) as usize;
    let (start, end) = visible_window(columns.len(), fits, app.column_index);
    let shown = &columns[start..end];

    let constraints = vec![Constraint::Ratio(1, shown.len() as u32); shown.len()];
    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(inner);

    for (column, slot) in shown.iter().zip(slots.iter()) {
        let selected = (column.index == app.column_index).then_some(app.row_index);
        render_column(frame, column, selected, *slot);
    }
}

/// Range of column indices to draw so that `selected` is always on screen.
fn visible_window(total: usize, fits: usize, selected: usize) -> (usize, usize) {
    if total <= fits {
        return (0, total);
    }
    let start = (selected + 1).saturating_sub(fits).min(total - fits);
    (start, start + fits)
}

fn render_column(frame: &mut Frame, column: &Column<'_>, selected: Option<usize>, area: Rect) {
    let items: Vec<ListItem> = column
        .repos
        .iter()
        .enumerate()
        .map(|(i, repo)| {
            let style = if selected == Some(i) {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Cyan)
            };

            ListItem::new(Line::from(vec![
                Span::styled(repo.name.clone(), style),
                Span::raw(" "),
                Span::styled(stars_text(repo.stars), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .title(format!("{}", column.index + 1)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    state.select(selected);

    frame.render_stateful_widget(list, area, &mut state);
}
