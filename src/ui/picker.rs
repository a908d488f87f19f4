use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use super::theme::Theme;
use super::truncate;
use crate::app::PickerState;

pub fn render_picker(f: &mut Frame, area: Rect, picker: &PickerState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Theme::FG))
        .title(Span::styled(
            " Boards ",
            Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD),
        ))
        .padding(Padding::new(2, 2, 1, 1));

    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.height == 0 {
        return;
    }

    let boards = picker.visible();
    let empty_msg = if picker.loading {
        Some("Loading boards…")
    } else if picker.boards.is_empty() {
        Some("No boards yet. Press n to create one.")
    } else if boards.is_empty() {
        Some("No boards match the filter.")
    } else {
        None
    };
    if let Some(msg) = empty_msg {
        f.render_widget(Paragraph::new(msg).style(Theme::dim_style()), inner);
        return;
    }

    // Keep the selection on screen.
    let rows = inner.height as usize;
    let offset = picker.selected.saturating_sub(rows.saturating_sub(1));

    let name_width = (inner.width as usize / 3).max(12);
    let lines: Vec<Line> = boards
        .iter()
        .enumerate()
        .skip(offset)
        .take(rows)
        .map(|(i, board)| {
            let is_selected = i == picker.selected;
            let marker = if is_selected { "▸ " } else { "  " };
            let name_style = if is_selected {
                Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(Theme::FG)
            };
            let name = truncate(&board.name, name_width);
            let pad = " ".repeat(name_width.saturating_sub(name.width()));
            Line::from(vec![
                Span::raw(marker),
                Span::styled(name, name_style),
                Span::raw(pad),
                Span::raw("  "),
                Span::styled(board.description.as_str(), Theme::dim_style()),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}
