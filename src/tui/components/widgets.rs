use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use super::theme::Theme;

pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

/// Single-line bordered text box, shared by the URL and folder inputs.
/// While editing, the content scrolls so the cursor stays visible and
/// the terminal cursor is parked on it.
pub fn render_input_box(
    f: &mut Frame,
    area: Rect,
    title: &str,
    text: &str,
    cursor: usize,
    editing: bool,
    theme: &Theme,
) {
    let inner_width = (area.width as usize).saturating_sub(2);
    let scroll = if editing {
        cursor.saturating_sub(inner_width.saturating_sub(1))
    } else {
        0
    };
    let visible: String = text.chars().skip(scroll).take(inner_width).collect();

    let (text_style, border_color) = if editing {
        (
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
            theme.accent,
        )
    } else {
        (Style::default().fg(theme.fg), theme.border)
    };

    let box_widget = Paragraph::new(visible).style(text_style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .title(title.to_string()),
    );
    f.render_widget(box_widget, area);

    if editing {
        f.set_cursor_position((area.x + (cursor.saturating_sub(scroll)) as u16 + 1, area.y + 1));
    }
}

// Most terminals draw the emoji blocks double-width.
fn char_width(c: char) -> usize {
    match c as u32 {
        0x1F300..=0x1F9FF | 0x2600..=0x26FF => 2,
        _ => 1,
    }
}

pub fn display_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

pub fn truncate_str(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = char_width(c);
        if used + w + 3 > max_width {
            out.push_str("...");
            break;
        }
        out.push(c);
        used += w;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_strings_pass_through() {
        assert_eq!(truncate_str("clip.mp4", 20), "clip.mp4");
    }

    #[test]
    fn long_strings_get_an_ellipsis() {
        let out = truncate_str("a_very_long_file_name.mp4", 12);
        assert!(out.ends_with("..."));
        assert!(display_width(&out) <= 12);
    }
}
