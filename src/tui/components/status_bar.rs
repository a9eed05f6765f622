use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::app::{App, InputMode, Page};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let mode_str = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Editing => "EDITING",
    };

    let key_hints = match app.input_mode {
        InputMode::Normal => match app.page {
            Page::Home => "q: Quit | 1/2/3: Pages | e: Edit URL | Enter: Continue | t: Theme",
            Page::Download => "q: Quit | 1/2/3: Pages | s: Start | c: Cancel | t: Theme",
            Page::Player => "q: Quit | 1/2/3: Pages | Enter: Play | p: Pause | x: Stop | t: Theme",
        },
        InputMode::Editing => "Esc: Done | Enter: Apply | Ctrl+w: Delete word | Ctrl+u: Clear line",
    };

    let mut spans = vec![Span::styled(
        format!(" [{}] {}", mode_str, key_hints),
        Style::default().fg(app.theme.accent),
    )];

    if let Some(message) = &app.status_message {
        spans.push(Span::styled(" | ", Style::default().fg(app.theme.border)));
        let message_style = if app.status_is_error {
            Style::default()
                .fg(app.theme.error)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.fg)
        };
        spans.push(Span::styled(message.clone(), message_style));
    }

    let p = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(p, area);
}
