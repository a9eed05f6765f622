use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState,
    },
};

use crate::app::{App, EditTarget};

use super::widgets::{render_input_box, truncate_str};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    render_input_box(
        f,
        chunks[0],
        " Audio Folder ",
        &app.state.audio_dir,
        app.cursor_position,
        app.editing == Some(EditTarget::AudioDir),
        &app.theme,
    );

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    render_library(f, app, content[0]);
    render_playback_panel(f, app, content[1]);
}

fn render_library(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(app.theme.highlight))
        .title(format!(" Library ({}) ", app.tracks.len()));

    if app.tracks.is_empty() {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "No audio files found.",
                Style::default().fg(app.theme.fg),
            )),
            Line::from(Span::styled(
                "Press a to set the audio folder.",
                Style::default().fg(app.theme.border),
            )),
        ];
        let p = Paragraph::new(text)
            .alignment(ratatui::layout::Alignment::Center)
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("NAME"),
        Cell::from("SIZE"),
        Cell::from("FORMAT"),
    ])
    .style(
        Style::default()
            .fg(app.theme.accent)
            .add_modifier(Modifier::BOLD),
    )
    .height(1)
    .bottom_margin(1);

    let name_width = ((area.width as usize) * 60 / 100).saturating_sub(4);
    let rows: Vec<Row> = app
        .tracks
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let is_focused = app.selected_track == Some(i);
            let marker = if is_focused { "> " } else { "  " };

            let row_style = if is_focused {
                Style::default()
                    .bg(app.theme.highlight)
                    .fg(app.theme.bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.fg)
            };

            Row::new(vec![
                Cell::from(format!("{}{}", marker, truncate_str(&track.name, name_width))),
                Cell::from(track.size.clone()),
                Cell::from(track.extension.clone()),
            ])
            .style(row_style)
            .height(1)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(60),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ],
    )
    .header(header)
    .block(block);

    // Selection drives the built-in offset so long libraries scroll.
    let mut state = TableState::default();
    state.select(app.selected_track);
    f.render_stateful_widget(table, area, &mut state);
}

fn render_playback_panel(f: &mut Frame, app: &App, area: Rect) {
    let key = |k: &'static str| {
        Span::styled(
            k,
            Style::default()
                .fg(app.theme.highlight)
                .add_modifier(Modifier::BOLD),
        )
    };
    let dim = |s: &'static str| Span::styled(s, Style::default().fg(app.theme.border));

    let mut text = Vec::new();

    if app.is_playing() {
        let badge = if app.is_paused { " PAUSED " } else { " PLAYING " };
        let badge_color = if app.is_paused {
            app.theme.border
        } else {
            app.theme.accent
        };
        let title = app.playback_title.as_deref().unwrap_or("Untitled");
        let width = (area.width as usize).saturating_sub(14);

        text.push(Line::from(vec![
            Span::styled(
                badge,
                Style::default()
                    .fg(app.theme.bg)
                    .bg(badge_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(
                truncate_str(title, width),
                Style::default()
                    .fg(app.theme.fg)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]));
        text.push(Line::from(Span::styled(
            format!(
                "{} / {}",
                format_duration(app.playback_time),
                format_duration(app.playback_total)
            ),
            Style::default()
                .fg(app.theme.highlight)
                .add_modifier(Modifier::BOLD),
        )));
    } else {
        text.push(Line::from(Span::styled(
            "Nothing playing.",
            Style::default().fg(app.theme.fg),
        )));
    }

    let muted = if app.state.muted { "  [MUTED]" } else { "" };
    text.push(Line::from(Span::styled(
        format!("Volume {}%{}", app.state.volume, muted),
        Style::default().fg(app.theme.accent),
    )));

    text.push(Line::from(""));
    text.push(Line::from(vec![
        key("Enter"),
        dim(": Play  "),
        key("p"),
        dim(": Pause  "),
        key("x"),
        dim(": Stop"),
    ]));
    text.push(Line::from(vec![
        key("Left/Right"),
        dim(": Seek 10s  "),
        key("[/]"),
        dim(": 30s"),
    ]));
    text.push(Line::from(vec![
        key("+/-"),
        dim(": Volume  "),
        key("m"),
        dim(": Mute"),
    ]));
    text.push(Line::from(vec![
        key("r"),
        dim(": Rescan  "),
        key("a"),
        dim(": Folder"),
    ]));

    let p = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(app.theme.border))
            .title(" Now Playing "),
    );
    f.render_widget(p, area);
}

/// mpv reports seconds as a float; show them as m:ss (or h:mm:ss).
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let total = seconds as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_format_as_clock_time() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(59.9), "0:59");
        assert_eq!(format_duration(61.0), "1:01");
        assert_eq!(format_duration(3661.0), "1:01:01");
    }

    #[test]
    fn bad_durations_render_as_zero() {
        assert_eq!(format_duration(-5.0), "0:00");
        assert_eq!(format_duration(f64::NAN), "0:00");
    }
}
