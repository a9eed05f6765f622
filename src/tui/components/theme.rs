use ratatui::style::Color;

/// Palette for one theme. The whole UI pulls its colors from here so a
/// theme switch is a single struct swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub highlight: Color,
    pub border: Color,
    pub error: Color,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            name: "Light",
            bg: Color::Rgb(246, 247, 251),
            fg: Color::Rgb(26, 26, 46),
            accent: Color::Rgb(58, 116, 237),
            highlight: Color::Rgb(13, 110, 253),
            border: Color::Rgb(168, 176, 196),
            error: Color::Rgb(176, 0, 32),
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "Dark",
            bg: Color::Rgb(20, 20, 25),      // Dark slate/blue
            fg: Color::Rgb(220, 220, 240),   // Soft white
            accent: Color::Rgb(100, 200, 255), // Cyan-ish
            highlight: Color::Rgb(255, 100, 200), // Pink/Magenta
            border: Color::Rgb(80, 80, 120), // Muted blue-purple
            error: Color::Rgb(255, 105, 97),
        }
    }

    pub fn from_name(name: &str) -> Self {
        if name == "Dark" {
            Self::dark()
        } else {
            Self::light()
        }
    }
}
