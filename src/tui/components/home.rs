use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{App, EditTarget};
use crate::sys::state;

use super::logo::Logo;
use super::widgets::render_input_box;

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(9),    // Logo
            Constraint::Length(3), // URL box
            Constraint::Length(4), // Hints
        ])
        .split(area);

    f.render_widget(Logo::new(app.theme), chunks[0]);

    render_input_box(
        f,
        chunks[1],
        " Video URL ",
        &app.home_url,
        app.cursor_position,
        app.editing == Some(EditTarget::HomeUrl),
        &app.theme,
    );

    render_hints(f, app, chunks[2]);
}

fn render_hints(f: &mut Frame, app: &App, area: Rect) {
    let key = |k: &'static str| {
        Span::styled(
            k,
            Style::default()
                .fg(app.theme.highlight)
                .add_modifier(Modifier::BOLD),
        )
    };
    let dim = |s: &'static str| Span::styled(s, Style::default().fg(app.theme.border));

    let folder = if app.form.folder.trim().is_empty() {
        state::default_download_dir().display().to_string()
    } else {
        app.form.folder.trim().to_string()
    };

    let text = vec![
        Line::from(vec![
            dim("Press "),
            key("e"),
            dim(" to paste or type a video URL."),
        ]),
        Line::from(vec![
            dim("Press "),
            key("Enter"),
            dim(" to carry it to the download page."),
        ]),
        Line::from(vec![
            dim("Downloads land in "),
            Span::styled(folder, Style::default().fg(app.theme.accent)),
        ]),
    ];

    let p = Paragraph::new(text).alignment(ratatui::layout::Alignment::Center);
    f.render_widget(p, area);
}
