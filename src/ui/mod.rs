pub mod board_view;
pub mod card_detail;
pub mod help;
pub mod picker;
pub mod status_bar;
pub mod theme;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::app::{AppState, Mode, Screen};

/// Create a centered rect within `area` using percentage-based sizing with minimums.
pub fn centered_rect(area: Rect, w_pct: u16, h_pct: u16, min_w: u16, min_h: u16) -> Rect {
    let width = (area.width * w_pct / 100).max(min_w).min(area.width);
    let height = (area.height * h_pct / 100).max(min_h).min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

/// Cut `s` to at most `max` display columns, ending in `…` when shortened.
/// Splits on grapheme clusters so wide and combined characters stay intact.
pub fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let avail = max - 1;
    let mut out: String = s
        .graphemes(true)
        .scan(0, |w, g| {
            let gw = g.width();
            (*w + gw <= avail).then(|| {
                *w += gw;
                g
            })
        })
        .collect();
    out.push('…');
    out
}

/// Fixed-width bar, e.g. `████░░░░` for 4 of 8.
pub fn progress_bar(done: usize, total: usize, width: usize) -> String {
    let filled = if total == 0 { 0 } else { (done.min(total) * width) / total };
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn render(f: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(f.area());

    match &state.screen {
        Screen::Picker(picker) => picker::render_picker(f, chunks[0], picker),
        Screen::Board(session) => board_view::render_board(f, chunks[0], session, state),
    }

    status_bar::render_status_bar(f, chunks[1], state);

    // Overlays
    match &state.mode {
        Mode::CardDetail { card_id } => {
            let found = state.session().and_then(|s| {
                let (col, card) = s.snapshot.find_card(card_id)?;
                Some((s.snapshot.column(col)?.column.name.as_str(), card))
            });
            if let Some((column_name, card)) = found {
                card_detail::render_card_detail(f, chunks[0], card, column_name);
            }
        }
        Mode::Help => help::render_help(f, f.area()),
        _ => {}
    }
}

/// Render into an in-memory buffer and return plain text (no styles).
#[cfg(test)]
pub(crate) fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut Frame, Rect),
{
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    buf.content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::BoardSession;
    use crate::board::snapshot::tests::snapshot_with;

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exact", 5), "exact");
    }

    #[test]
    fn truncate_adds_ellipsis_within_width() {
        let t = truncate("a rather long title", 8);
        assert_eq!(t, "a rathe…");
        assert_eq!(t.width(), 8);
    }

    #[test]
    fn truncate_respects_wide_graphemes() {
        // Each CJK character is two columns wide.
        let t = truncate("日本語のタイトル", 7);
        assert_eq!(t, "日本語…");
        assert!(t.width() <= 7);
    }

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0, 0, 4), "░░░░");
        assert_eq!(progress_bar(1, 2, 4), "██░░");
        assert_eq!(progress_bar(3, 3, 4), "████");
    }

    #[test]
    fn centered_rect_respects_minimums() {
        let r = centered_rect(Rect::new(0, 0, 100, 40), 50, 50, 60, 10);
        assert_eq!(r.width, 60);
        assert_eq!(r.height, 20);
        assert_eq!(r.x, 20);
    }

    #[test]
    fn render_help_overlay_on_board() {
        let mut state = AppState::new(24, None);
        state.screen = Screen::Board(BoardSession::new(snapshot_with(&[("Todo", &["a"])])));
        state.mode = Mode::Help;
        let out = render_to_string(100, 40, |f, _| render(f, &state));
        assert!(out.contains("kb Help"));
        assert!(out.contains("Move Mode"));
    }

    #[test]
    fn render_card_detail_overlay() {
        let mut state = AppState::new(24, None);
        state.screen = Screen::Board(BoardSession::new(snapshot_with(&[("Todo", &["write docs"])])));
        state.mode = Mode::CardDetail { card_id: "0000".into() };
        let out = render_to_string(100, 30, |f, _| render(f, &state));
        assert!(out.contains("Column:   Todo"));
    }
}
