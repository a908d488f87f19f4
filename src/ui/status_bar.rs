use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use super::theme::Theme;
use super::truncate;
use crate::app::{AppState, Mode, NotificationLevel, Screen};
use crate::board::filter::total_matches;

fn badge(text: String) -> Span<'static> {
    Span::styled(
        text,
        Style::default()
            .fg(Theme::FG)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED),
    )
}

pub fn render_status_bar(f: &mut Frame, area: Rect, state: &AppState) {
    // Full-line modes take over the entire bar
    if let Some(line) = render_full_line_mode(state) {
        let paragraph = Paragraph::new(line).style(Theme::status_style());
        f.render_widget(paragraph, area);
        return;
    }

    let left = build_left_zone(state);
    let left_width: usize = left.iter().map(|s| s.content.width()).sum();
    let center_avail = (area.width as usize).saturating_sub(left_width);

    let mut spans = left;
    spans.extend(build_center_zone(state, center_avail));

    let paragraph = Paragraph::new(Line::from(spans)).style(Theme::status_style());
    f.render_widget(paragraph, area);
}

/// Mode badge, board name and active filter.
fn build_left_zone(state: &AppState) -> Vec<Span<'_>> {
    let mode_str = match (&state.mode, &state.screen) {
        (Mode::CardDetail { .. }, _) => "DETAIL",
        (Mode::Help, _) => "HELP",
        (_, Screen::Picker(_)) => "BOARDS",
        _ => "NORMAL",
    };

    let mut spans = vec![badge(format!(" {mode_str} ")), Span::raw(" ")];

    if let Some(session) = state.session() {
        spans.push(Span::styled(
            format!("{} ", session.snapshot.board.name),
            Style::default().fg(Theme::DIM),
        ));
        if let Some(filter) = session.filter() {
            let matches = total_matches(&session.snapshot, Some(filter));
            spans.push(Span::styled(
                format!("/{filter} ({matches} matches) "),
                Style::default().fg(Theme::FG),
            ));
        }
    } else if let Some(filter) = state.active_filter() {
        spans.push(Span::styled(format!("/{filter} "), Style::default().fg(Theme::FG)));
    }

    spans
}

/// Notification when there is one, key hints otherwise.
fn build_center_zone(state: &AppState, avail_width: usize) -> Vec<Span<'_>> {
    if let Some(ref notif) = state.notification {
        let color = match state.notification_level {
            NotificationLevel::Info => Theme::FG,
            NotificationLevel::Error => Theme::STATUS_ERROR,
        };
        return vec![Span::styled(truncate(notif, avail_width), Style::default().fg(color))];
    }

    let hints = match (&state.mode, &state.screen) {
        (Mode::CardDetail { .. }, _) => "e title · t labels · i desc · x ref · p priority · d archive · Esc close",
        (_, Screen::Picker(_)) => "Enter open · n new · d delete · / filter · q quit",
        _ => "n new · H/L move · d archive · / filter · ? help",
    };
    vec![Span::styled(truncate(hints, avail_width), Theme::dim_style())]
}

/// Render full-line modes (Filter, Input, Confirm, Move).
fn render_full_line_mode(state: &AppState) -> Option<Line<'_>> {
    match &state.mode {
        Mode::Filtering { buf } => Some(Line::from(vec![
            badge(" / ".to_string()),
            Span::raw(format!(" {}", buf.input)),
            Span::raw("_"),
        ])),
        Mode::Input { prompt, buf, .. } => Some(Line::from(vec![
            badge(format!(" {prompt} ")),
            Span::raw(format!(" {}", buf.input)),
            Span::raw("_"),
        ])),
        Mode::Confirming { action, .. } => {
            let snapshot = state.session().map(|s| &s.snapshot);
            Some(Line::from(vec![badge(format!(" {} (y/n) ", action.prompt(snapshot)))]))
        }
        Mode::Moving(overlay) => {
            let hint = if overlay.committing {
                "saving…".to_string()
            } else {
                format!(
                    "{} · h/j/k/l position · Enter confirm · Esc cancel",
                    truncate(&overlay.card_title, 30)
                )
            };
            Some(Line::from(vec![
                badge(" MOVE ".to_string()),
                Span::raw(" "),
                Span::styled(hint, Style::default().fg(Theme::MOVING)),
            ]))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{BoardSession, ConfirmAction, MoveOverlay, TextBuffer};
    use crate::board::snapshot::tests::snapshot_with;
    use crate::ui::render_to_string;

    fn board_state() -> AppState {
        let mut state = AppState::new(24, None);
        state.screen = Screen::Board(BoardSession::new(snapshot_with(&[
            ("Todo", &["api work", "docs"]),
            ("Done", &[]),
        ])));
        state
    }

    fn draw(state: &AppState) -> String {
        render_to_string(100, 1, |f, area| render_status_bar(f, area, state))
    }

    #[test]
    fn filter_prompt() {
        let mut state = board_state();
        state.mode = Mode::Filtering { buf: TextBuffer::new("api") };
        assert_eq!(draw(&state), " /  api_");
    }

    #[test]
    fn input_prompt() {
        let mut state = board_state();
        state.mode = Mode::Input {
            prompt: "New card",
            buf: TextBuffer::new("x"),
            target: crate::app::InputTarget::NewColumn,
        };
        assert!(draw(&state).contains("New card  x_"));
    }

    #[test]
    fn confirm_prompt_has_yes_no_suffix() {
        let mut state = board_state();
        state.mode = Mode::Confirming {
            action: ConfirmAction::ArchiveCard {
                card_id: "0000".into(),
                title: "api work".into(),
            },
            return_to: Box::new(Mode::Normal),
        };
        assert!(draw(&state).contains("Archive \"api work\"? (y/n)"));
    }

    #[test]
    fn move_hint() {
        let mut state = board_state();
        state.mode = Mode::Moving(MoveOverlay {
            card_id: "0000".into(),
            card_title: "api work".into(),
            origin_column: 0,
            origin_card: 0,
            column: 1,
            cursor: 0,
            committing: false,
        });
        let out = draw(&state);
        assert!(out.contains("MOVE"));
        assert!(out.contains("Esc cancel"));
    }

    #[test]
    fn active_filter_shows_match_count() {
        let mut state = board_state();
        if let Screen::Board(session) = &mut state.screen {
            session.filter = Some("api".into());
        }
        assert!(draw(&state).contains("/api (1 matches)"));
    }

    #[test]
    fn notification_replaces_hints() {
        let mut state = board_state();
        assert!(draw(&state).contains("? help"));
        state.notify_error("column Todo is at its WIP limit (1)");
        let out = draw(&state);
        assert!(out.contains("WIP limit (1)"));
        assert!(!out.contains("? help"));
    }
}
