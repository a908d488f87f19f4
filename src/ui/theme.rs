use ratatui::style::{Color, Style};

use crate::board::Priority;

/// Color theme for kb.
///
/// Text and chrome use the terminal's default foreground (Color::Reset).
/// Only functional signals get color: priority glyphs, labels, WIP state
/// and the card being moved.
pub struct Theme;

impl Theme {
    // Base: the terminal's own foreground
    pub const FG: Color = Color::Reset;
    pub const DIM: Color = Color::DarkGray;

    // Column
    pub const COLUMN_HEADER: Color = Color::Reset;
    pub const COLUMN_BORDER: Color = Color::DarkGray;
    pub const COLUMN_FOCUSED_BORDER: Color = Color::Reset;

    // Card
    pub const CARD_BORDER: Color = Color::Reset;
    pub const CARD_TITLE: Color = Color::Reset;
    pub const MOVING: Color = Color::Cyan;

    pub const PRIORITY_LOW: Color = Color::Green;
    pub const PRIORITY_HIGH: Color = Color::Yellow;
    pub const PRIORITY_URGENT: Color = Color::Red;

    // WIP limit
    pub const WIP_OVER: Color = Color::Red;

    pub const PROGRESS: Color = Color::Green;

    // Status bar
    pub const STATUS_ERROR: Color = Color::Red;

    pub fn dim_style() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn status_style() -> Style {
        Style::default().fg(Self::FG)
    }

    /// Color for a priority level.
    pub fn priority_color(priority: Priority) -> Color {
        match priority {
            Priority::Low => Self::PRIORITY_LOW,
            Priority::Medium => Self::FG,
            Priority::High => Self::PRIORITY_HIGH,
            Priority::Urgent => Self::PRIORITY_URGENT,
        }
    }

    /// ASCII glyph drawn next to a card title.
    pub fn priority_glyph(priority: Priority) -> &'static str {
        match priority {
            Priority::Low => "-",
            Priority::Medium => "·",
            Priority::High => "!",
            Priority::Urgent => "!!",
        }
    }

    /// Assign a consistent color to a label based on its name.
    pub fn label_color(label: &str) -> Color {
        let hash = label
            .to_lowercase()
            .bytes()
            .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
        const PALETTE: [Color; 12] = [
            Color::Cyan,
            Color::Green,
            Color::Magenta,
            Color::Blue,
            Color::Yellow,
            Color::Red,
            Color::LightCyan,
            Color::LightGreen,
            Color::LightMagenta,
            Color::LightBlue,
            Color::LightYellow,
            Color::LightRed,
        ];
        PALETTE[(hash % PALETTE.len() as u32) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_color_is_stable_and_case_insensitive() {
        assert_eq!(Theme::label_color("bug"), Theme::label_color("bug"));
        assert_eq!(Theme::label_color("Bug"), Theme::label_color("bug"));
    }

    #[test]
    fn urgent_is_red() {
        assert_eq!(Theme::priority_color(Priority::Urgent), Color::Red);
        assert_eq!(Theme::priority_glyph(Priority::Urgent), "!!");
    }
}
