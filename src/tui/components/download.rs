use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph,
    },
};

use crate::app::{App, DownloadField, EditTarget, actions};
use crate::model::JobPhase;

use super::widgets::{centered_rect_fixed, truncate_str};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(area);

    render_form(f, app, chunks[0]);
    render_job_panel(f, app, chunks[1]);

    if let Some(EditTarget::Form(field)) = app.editing {
        render_edit_popup(f, app, field);
    }
}

fn field_value(app: &App, field: DownloadField) -> String {
    match field {
        DownloadField::Url => app.form.url.clone(),
        DownloadField::Folder => {
            if app.form.folder.trim().is_empty() {
                "(default)".to_string()
            } else {
                app.form.folder.clone()
            }
        }
        DownloadField::Template => {
            if app.form.template.trim().is_empty() {
                "(video title)".to_string()
            } else {
                app.form.template.clone()
            }
        }
        DownloadField::Quality => app.form.quality.label().to_string(),
        DownloadField::Resolution => app.form.resolution_cap.label().to_string(),
        DownloadField::Codec => app.form.codec_preference.label().to_string(),
        DownloadField::AudioOnly => (if app.form.audio_only { "On" } else { "Off" }).to_string(),
        DownloadField::Container => app.form.container.clone(),
        DownloadField::FormatOverride => {
            if app.form.format_override.trim().is_empty() {
                "(off)".to_string()
            } else {
                app.form.format_override.clone()
            }
        }
        DownloadField::PlaylistToggle => {
            (if app.form.playlist_enabled { "On" } else { "Off" }).to_string()
        }
        DownloadField::PlaylistCount => app.form.playlist_count.to_string(),
    }
}

fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let fields = DownloadField::all();

    let block = Block::default()
        .title(" Download ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(app.theme.bg).fg(app.theme.fg))
        .border_style(Style::default().fg(app.theme.highlight));

    let value_width = (area.width as usize).saturating_sub(24);
    let list_items: Vec<ListItem> = fields
        .iter()
        .map(|field| {
            let value = truncate_str(&field_value(app, *field), value_width);

            // The count row only matters while the playlist toggle is on.
            let value_style =
                if *field == DownloadField::PlaylistCount && !app.form.playlist_enabled {
                    Style::default().fg(app.theme.border)
                } else {
                    Style::default().fg(app.theme.accent)
                };

            let content = Line::from(vec![
                Span::styled(
                    format!("{:<18}: ", field.name()),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(value, value_style),
            ]);
            ListItem::new(content)
        })
        .collect();

    let list = List::new(list_items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(app.theme.highlight)
                .fg(app.theme.bg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("┃ ");

    let mut state = ListState::default();
    state.select(fields.iter().position(|fld| *fld == app.focus));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_job_panel(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    render_job_gauge(f, app, chunks[0]);
    render_job_details(f, app, chunks[1]);
}

fn phase_word(phase: JobPhase) -> &'static str {
    match phase {
        JobPhase::Idle => "Idle",
        JobPhase::Running => "Downloading",
        JobPhase::Succeeded => "Done",
        JobPhase::Failed => "Failed",
        JobPhase::Cancelled => "Cancelled",
    }
}

fn render_job_gauge(f: &mut Frame, app: &App, area: Rect) {
    let percent = if app.job_phase == JobPhase::Succeeded {
        100
    } else {
        app.job_percent.min(100)
    };
    let gauge_color = if matches!(app.job_phase, JobPhase::Failed | JobPhase::Cancelled) {
        app.theme.error
    } else {
        app.theme.accent
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(app.theme.highlight)),
        )
        .gauge_style(Style::default().fg(gauge_color).bg(app.theme.bg))
        .label(Span::styled(
            format!(" {} {}% ", phase_word(app.job_phase), percent),
            Style::default()
                .fg(app.theme.fg)
                .add_modifier(Modifier::BOLD),
        ))
        .ratio(f64::from(percent) / 100.0)
        .use_unicode(true);
    f.render_widget(gauge, area);
}

fn render_job_details(f: &mut Frame, app: &App, area: Rect) {
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

    if let Some(total) = app.playlist_total {
        text.push(Line::from(Span::styled(
            format!("Playlist: {} videos", total),
            Style::default().fg(app.theme.accent),
        )));
    }

    if let Some(preview) = &app.preview_path {
        let width = (area.width as usize).saturating_sub(10);
        text.push(Line::from(vec![
            Span::styled("Saved: ", Style::default().fg(app.theme.fg)),
            Span::styled(
                truncate_str(&preview.display().to_string(), width),
                Style::default()
                    .fg(app.theme.accent)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]));
    }

    if !text.is_empty() {
        text.push(Line::from(""));
    }

    text.push(Line::from(vec![key("s"), dim(": Start  "), key("c"), dim(": Cancel")]));
    text.push(Line::from(vec![
        key("j/k"),
        dim(": Move  "),
        key("h/l"),
        dim(": Adjust"),
    ]));
    text.push(Line::from(vec![
        key("Enter"),
        dim(": Edit  "),
        key("Space"),
        dim(": Toggle"),
    ]));

    let p = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(app.theme.border))
            .title(" Job "),
    );
    f.render_widget(p, area);
}

fn render_edit_popup(f: &mut Frame, app: &App, field: DownloadField) {
    let area = centered_rect_fixed(60, 3, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" Edit {} ", field.name()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(app.theme.bg))
        .border_style(Style::default().fg(app.theme.accent));

    let buffer = actions::edit_buffer(app, EditTarget::Form(field)).unwrap_or_default();
    let width = (area.width as usize).saturating_sub(2);
    let scroll = app.cursor_position.saturating_sub(width.saturating_sub(1));
    let display_text: String = buffer.chars().skip(scroll).take(width).collect();

    let input = Paragraph::new(display_text)
        .style(
            Style::default()
                .fg(app.theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .block(block);

    f.render_widget(input, area);
    f.set_cursor_position((
        area.x + (app.cursor_position.saturating_sub(scroll)) as u16 + 1,
        area.y + 1,
    ));
}
