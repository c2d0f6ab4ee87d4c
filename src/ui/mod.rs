mod popup;
mod repo_list;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{App, Mode};
use crate::view::ViewState;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);

    // Exactly one of: loading indicator, error alert, columns
    match app.view.state() {
        ViewState::Loading => render_loading(frame, chunks[1]),
        ViewState::Error(message) => render_error(frame, message, chunks[1]),
        ViewState::Ready(_) => repo_list::render(frame, app, chunks[1]),
    }

    render_status_bar(frame, app, chunks[2]);

    if let Mode::SortSelect { selected } = app.mode {
        if app.view.error().is_none() {
            popup::render_sort_select(frame, app.view.sort_order(), selected);
        }
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(
        "stargrid - {} - {}",
        app.forge_name(),
        app.view.username()
    );
    let mut spans = vec![Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];

    // The sort control is not offered alongside an error
    if app.view.error().is_none() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("Ordem: {}", app.view.sort_order()),
            Style::default().fg(Color::Gray),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let loading = Paragraph::new("Carregando...")
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(loading, area);
}

fn render_error(frame: &mut Frame, message: &str, area: Rect) {
    let alert = Paragraph::new(message.to_string())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(Span::styled(
                    " Erro ",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
        )
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true });
    frame.render_widget(alert, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if app.mode == Mode::UserInput {
        Line::from(vec![
            Span::styled("Usuário: ", Style::default().fg(Color::Yellow)),
            Span::raw(format!("{}█", app.input)),
        ])
    } else if let Some(notice) = &app.notice {
        Line::from(vec![Span::styled(
            notice.clone(),
            Style::default().fg(Color::Green),
        )])
    } else {
        let help = match app.view.state() {
            ViewState::Error(_) => "u: usuário | r: recarregar | q: sair",
            _ => "h/j/k/l: navegar | s/o: ordenar | u: usuário | r: recarregar | Enter: abrir | y: copiar rota | q: sair",
        };
        Line::from(vec![Span::styled(help, Style::default().fg(Color::Gray))])
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}
