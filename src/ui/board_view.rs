use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};
use ratatui::Frame;

use super::theme::Theme;
use super::{progress_bar, truncate};
use crate::app::overlay::{display_cards, MoveOverlay};
use crate::app::{AppState, BoardSession};
use crate::board::snapshot::ColumnCards;
use crate::board::Card;

/// Header text for a column and whether it is at or over its WIP limit.
pub(crate) fn column_header(name: &str, count: usize, limit: Option<u32>) -> (String, bool) {
    match limit {
        Some(limit) => (format!("{name} ({count}/{limit})"), count >= limit as usize),
        None => (format!("{name} ({count})"), false),
    }
}

/// Overflow indicators for the horizontal column window.
pub(crate) fn scroll_indicators(scroll: usize, visible: usize, total: usize) -> (Option<String>, Option<String>) {
    let left = (scroll > 0).then(|| format!("< {scroll} more"));
    let hidden_right = total.saturating_sub(scroll + visible);
    let right = (hidden_right > 0).then(|| format!("{hidden_right} more >"));
    (left, right)
}

/// Border color for a card: the moving card stands out, cards in unfocused
/// columns are dimmed.
pub(crate) fn card_border_color(is_moving: bool, is_col_focused: bool) -> Color {
    if is_moving {
        Theme::MOVING
    } else if is_col_focused {
        Theme::CARD_BORDER
    } else {
        Theme::DIM
    }
}

pub fn render_board(f: &mut Frame, area: Rect, session: &BoardSession, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let snapshot = &session.snapshot;
    let total = snapshot.columns.len();
    let visible = state.visible_columns();
    let scroll = session.cursor.scroll.min(total.saturating_sub(visible));

    render_title_bar(f, chunks[0], session, scroll, visible);

    if total == 0 {
        let msg = if session.loading {
            "Loading board…"
        } else {
            "No columns. Press C to add one."
        };
        f.render_widget(Paragraph::new(msg).style(Theme::dim_style()), chunks[1]);
        return;
    }

    let constraints: Vec<Constraint> = (0..visible)
        .map(|_| Constraint::Ratio(1, visible as u32))
        .collect();
    let col_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(chunks[1]);

    let overlay = state.overlay();
    for (vis_idx, col_idx) in (scroll..(scroll + visible).min(total)).enumerate() {
        let Some(col) = snapshot.column(col_idx) else {
            continue;
        };
        let cards = display_cards(snapshot, session.filter(), overlay, col_idx);
        let count = display_cards(snapshot, None, overlay, col_idx).len();
        let selected = (session.cursor.column == col_idx).then_some(session.cursor.card);
        render_column(f, col_areas[vis_idx], col, &cards, count, selected, overlay);
    }
}

fn render_title_bar(f: &mut Frame, area: Rect, session: &BoardSession, scroll: usize, visible: usize) {
    let snapshot = &session.snapshot;
    let done = snapshot.done_cards();
    let total = snapshot.total_cards();

    let mut spans = vec![
        Span::styled(
            format!(" {} ", snapshot.board.name),
            Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD),
        ),
        Span::styled(progress_bar(done, total, 10), Style::default().fg(Theme::PROGRESS)),
        Span::styled(format!(" {done}/{total} done"), Theme::dim_style()),
    ];

    let (left, right) = scroll_indicators(scroll, visible, snapshot.columns.len());
    if let Some(left) = left {
        spans.push(Span::styled(format!("  {left}"), Theme::dim_style()));
    }
    if let Some(right) = right {
        spans.push(Span::styled(format!("  {right}"), Theme::dim_style()));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_column(
    f: &mut Frame,
    area: Rect,
    col: &ColumnCards,
    cards: &[&Card],
    count: usize,
    selected: Option<usize>,
    overlay: Option<&MoveOverlay>,
) {
    let is_focused = selected.is_some();
    let (header, at_limit) = column_header(&col.column.name, count, col.column.wip_limit);
    let header_style = if at_limit {
        Style::default().fg(Theme::WIP_OVER).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Theme::COLUMN_HEADER).add_modifier(Modifier::BOLD)
    };

    let border_color = if is_focused {
        Theme::COLUMN_FOCUSED_BORDER
    } else {
        Theme::COLUMN_BORDER
    };
    let focused_mod = if is_focused { Modifier::BOLD } else { Modifier::empty() };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color).add_modifier(focused_mod))
        .border_type(BorderType::Rounded)
        .title(Line::from(Span::styled(format!(" {header} "), header_style)))
        .padding(Padding::new(1, 1, 0, 0));

    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let card_height: u16 = 4; // 2 inner lines + 2 border lines
    let max_visible = ((inner.height / card_height) as usize).max(1);

    let selected_idx = selected.unwrap_or(0);
    let scroll_offset = if cards.len() > max_visible && selected_idx >= max_visible {
        selected_idx - max_visible + 1
    } else {
        0
    };

    for (vis_idx, card) in cards.iter().enumerate().skip(scroll_offset).take(max_visible) {
        let y = inner.y + ((vis_idx - scroll_offset) as u16 * card_height);
        if y + card_height > inner.y + inner.height {
            break;
        }
        let card_area = Rect::new(inner.x, y, inner.width, card_height);
        let is_selected = selected == Some(vis_idx);
        let is_moving = overlay.is_some_and(|o| o.card_id == card.id);
        render_card(f, card_area, card, is_selected, is_focused, is_moving);
    }

    if cards.len() > max_visible {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
        let mut scrollbar_state = ScrollbarState::new(cards.len()).position(scroll_offset);
        f.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
    }
}

fn render_card(f: &mut Frame, area: Rect, card: &Card, is_selected: bool, is_col_focused: bool, is_moving: bool) {
    if area.width < 4 || area.height < 3 {
        return;
    }

    let selected_mod = if is_selected { Modifier::BOLD } else { Modifier::empty() };
    let border_type = if is_moving {
        BorderType::Double
    } else if is_selected {
        BorderType::Thick
    } else {
        BorderType::Rounded
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(
            Style::default()
                .fg(card_border_color(is_moving, is_col_focused))
                .add_modifier(selected_mod),
        )
        .border_type(border_type);

    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.height == 0 || inner.width < 2 {
        return;
    }

    // Line 1: [marker] title
    let marker = if is_selected { "▸ " } else { "  " };
    let title_width = (inner.width as usize).saturating_sub(2);
    let title_line = Line::from(vec![
        Span::styled(marker, Style::default().fg(Theme::FG).add_modifier(selected_mod)),
        Span::styled(
            truncate(&card.title, title_width),
            Style::default().fg(Theme::CARD_TITLE).add_modifier(selected_mod),
        ),
    ]);
    f.render_widget(Paragraph::new(title_line), Rect::new(inner.x, inner.y, inner.width, 1));

    // Line 2: priority glyph + labels
    if inner.height >= 2 {
        let mut spans = vec![
            Span::raw("  "),
            Span::styled(
                Theme::priority_glyph(card.priority),
                Style::default().fg(Theme::priority_color(card.priority)),
            ),
        ];
        for label in card.label_list() {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(label, Style::default().fg(Theme::label_color(label))));
        }
        f.render_widget(
            Paragraph::new(Line::from(spans)),
            Rect::new(inner.x, inner.y + 1, inner.width, 1),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{AppState, Mode, MoveOverlay, Screen};
    use crate::board::snapshot::tests::snapshot_with;
    use crate::ui::render_to_string;

    fn board_state(columns: &[(&str, &[&str])]) -> AppState {
        let mut state = AppState::new(24, None);
        state.viewport_width = 100;
        state.screen = Screen::Board(BoardSession::new(snapshot_with(columns)));
        state
    }

    fn draw(state: &AppState) -> String {
        render_to_string(100, 30, |f, area| {
            if let Some(session) = state.session() {
                render_board(f, area, session, state);
            }
        })
    }

    // ── column_header ──

    #[test]
    fn header_without_limit() {
        assert_eq!(column_header("Todo", 3, None), ("Todo (3)".to_string(), false));
    }

    #[test]
    fn header_with_limit_flags_at_capacity() {
        assert_eq!(column_header("Doing", 1, Some(2)), ("Doing (1/2)".to_string(), false));
        assert_eq!(column_header("Doing", 2, Some(2)), ("Doing (2/2)".to_string(), true));
        assert_eq!(column_header("Doing", 3, Some(2)).1, true);
    }

    // ── scroll_indicators ──

    #[test]
    fn indicators_absent_when_everything_fits() {
        assert_eq!(scroll_indicators(0, 4, 4), (None, None));
    }

    #[test]
    fn indicators_on_both_sides() {
        assert_eq!(
            scroll_indicators(1, 2, 5),
            (Some("< 1 more".to_string()), Some("2 more >".to_string()))
        );
    }

    #[test]
    fn border_color_moving_wins() {
        assert_eq!(card_border_color(true, false), Theme::MOVING);
        assert_eq!(card_border_color(false, false), Theme::DIM);
        assert_eq!(card_border_color(false, true), Theme::CARD_BORDER);
    }

    // ── rendering ──

    #[test]
    fn renders_headers_and_cards() {
        let state = board_state(&[("Todo", &["write docs"]), ("Done", &[])]);
        let out = draw(&state);
        assert!(out.contains("Todo (1)"));
        assert!(out.contains("Done (0)"));
        assert!(out.contains("▸ write docs"));
        assert!(out.contains("0/1 done"));
    }

    #[test]
    fn renders_overflow_indicator() {
        let mut state = board_state(&[("A", &[]), ("B", &[]), ("C", &[]), ("D", &[]), ("E", &[])]);
        state.viewport_width = 48;
        let out = draw(&state);
        assert!(out.contains("3 more >"));
        assert!(!out.contains("< "));
    }

    #[test]
    fn moving_card_renders_once_in_target_column() {
        let mut state = board_state(&[("Todo", &["mover"]), ("Done", &[])]);
        state.mode = Mode::Moving(MoveOverlay {
            card_id: "0000".into(),
            card_title: "mover".into(),
            origin_column: 0,
            origin_card: 0,
            column: 1,
            cursor: 0,
            committing: false,
        });
        let out = draw(&state);
        assert_eq!(out.matches("mover").count(), 1);
        assert!(out.contains("Todo (0)"));
        assert!(out.contains("Done (1)"));
    }

    #[test]
    fn empty_board_hint() {
        let state = board_state(&[]);
        let out = draw(&state);
        assert!(out.contains("No columns. Press C to add one."));
    }
}
