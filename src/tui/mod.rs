pub mod components;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Tabs},
};

use crate::app::{App, Page};

use components::{download, home, player, status_bar};

pub fn ui(f: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1) // Outer margin
        .constraints([
            Constraint::Length(3), // Page tabs
            Constraint::Min(1),    // Page content
            Constraint::Length(3), // Status bar
        ])
        .split(f.area());

    f.render_widget(
        Block::default().style(Style::default().bg(app.theme.bg)),
        f.area(),
    );

    render_tabs(f, app, main_layout[0]);

    match app.page {
        Page::Home => home::render(f, app, main_layout[1]),
        Page::Download => download::render(f, app, main_layout[1]),
        Page::Player => player::render(f, app, main_layout[1]),
    }

    status_bar::render(f, app, main_layout[2]);
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let pages = [Page::Home, Page::Download, Page::Player];
    let selected = pages.iter().position(|p| *p == app.page).unwrap_or(0);

    let labels: Vec<Line> = pages
        .iter()
        .enumerate()
        .map(|(i, page)| {
            let label = format!(" {} {} ", i + 1, page.label());
            if *page == Page::Player && !app.mpv_available {
                Line::styled(label, Style::default().fg(app.theme.border))
            } else {
                Line::from(label)
            }
        })
        .collect();

    let tabs = Tabs::new(labels)
        .select(selected)
        .divider(Span::styled("|", Style::default().fg(app.theme.border)))
        .style(Style::default().fg(app.theme.fg))
        .highlight_style(
            Style::default()
                .fg(app.theme.bg)
                .bg(app.theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(app.theme.border))
                .title(" Beluga "),
        );

    f.render_widget(tabs, area);
}
