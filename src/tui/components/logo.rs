use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};
use super::theme::Theme;

pub struct Logo {
    theme: Theme,
}

impl Logo {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }
}

const BANNER: &[&str] = &[
    r" ____       _                   ",
    r"| __ )  ___| |_   _  __ _  __ _ ",
    r"|  _ \ / _ \ | | | |/ _` |/ _` |",
    r"| |_) |  __/ | |_| | (_| | (_| |",
    r"|____/ \___|_|\__,_|\__, |\__,_|",
    r"                    |___/       ",
];

const TAGLINE: &str = "download videos, play your audio";

impl Widget for Logo {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let banner_width = BANNER.iter().map(|l| l.len()).max().unwrap_or(0) as u16;
        let banner_height = BANNER.len() as u16;

        let origin_x = area.x + area.width.saturating_sub(banner_width) / 2;
        let origin_y = area.y + area.height.saturating_sub(banner_height + 2) / 2;

        // Column bands cycle through three theme colors.
        let palette = [self.theme.highlight, self.theme.accent, self.theme.fg];

        for (row, line) in BANNER.iter().enumerate() {
            let y = origin_y + row as u16;
            if y >= area.bottom() {
                break;
            }
            for (col, ch) in line.chars().enumerate() {
                let x = origin_x + col as u16;
                if x >= area.right() {
                    break;
                }
                if ch == ' ' {
                    continue;
                }
                let style = Style::default()
                    .fg(palette[(col / 4) % palette.len()])
                    .add_modifier(Modifier::BOLD);
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_char(ch).set_style(style);
                }
            }
        }

        let tag_x = area.x + area.width.saturating_sub(TAGLINE.len() as u16) / 2;
        let tag_y = origin_y + banner_height + 1;
        if tag_y < area.bottom() {
            buf.set_string(tag_x, tag_y, TAGLINE, Style::default().fg(self.theme.border));
        }
    }
}
