use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap};
use ratatui::Frame;

use super::theme::Theme;
use crate::board::Card;

fn field<'a>(label: &'static str, value: impl Into<Span<'a>>) -> Line<'a> {
    Line::from(vec![Span::styled(label, Theme::dim_style()), value.into()])
}

pub fn render_card_detail(f: &mut Frame, area: Rect, card: &Card, column_name: &str) {
    let panel_area = super::centered_rect(area, 60, 70, 50, 14);

    // Clear background
    f.render_widget(Clear, panel_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Theme::FG))
        .title(Span::styled(
            " Card ",
            Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD),
        ))
        .padding(Padding::new(2, 2, 1, 1));

    let inner = block.inner(panel_area);
    f.render_widget(block, panel_area);

    if inner.height == 0 {
        return;
    }

    let mut lines = vec![
        Line::from(Span::styled(
            card.title.as_str(),
            Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        field("Column:   ", Span::raw(column_name)),
    ];

    let color = Theme::priority_color(card.priority);
    lines.push(Line::from(vec![
        Span::styled("Priority: ", Theme::dim_style()),
        Span::styled(
            format!("{} ", Theme::priority_glyph(card.priority)),
            Style::default().fg(color),
        ),
        Span::raw(card.priority.as_str()),
    ]));

    let labels = card.label_list();
    if !labels.is_empty() {
        let mut spans = vec![Span::styled("Labels:   ", Theme::dim_style())];
        for (i, label) in labels.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" · "));
            }
            spans.push(Span::styled(label, Style::default().fg(Theme::label_color(label))));
        }
        lines.push(Line::from(spans));
    }

    if let Some(external) = &card.external_ref {
        lines.push(field("Ref:      ", Span::raw(external.as_str())));
    }

    lines.push(field(
        "Created:  ",
        Span::styled(card.created_at.format("%Y-%m-%d %H:%M").to_string(), Theme::dim_style()),
    ));
    lines.push(field(
        "Updated:  ",
        Span::styled(card.updated_at.format("%Y-%m-%d %H:%M").to_string(), Theme::dim_style()),
    ));

    if !card.description.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "─".repeat(inner.width as usize),
            Theme::dim_style(),
        )));
        lines.push(Line::from(""));
        for body_line in card.description.lines() {
            lines.push(Line::from(body_line.to_string()));
        }
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(paragraph, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Priority;
    use crate::ui::render_to_string;

    fn card() -> Card {
        let mut card = Card::new("c1".into(), "col".into(), "Ship the release".into());
        card.priority = Priority::Urgent;
        card.labels = "release, ops".into();
        card.description = "Tag, build, publish.".into();
        card.external_ref = Some("GH-42".into());
        card
    }

    #[test]
    fn shows_all_fields() {
        let card = card();
        let out = render_to_string(80, 24, |f, area| render_card_detail(f, area, &card, "Review"));
        assert!(out.contains("Ship the release"));
        assert!(out.contains("Column:   Review"));
        assert!(out.contains("Priority: !! urgent"));
        assert!(out.contains("Labels:   release · ops"));
        assert!(out.contains("Ref:      GH-42"));
        assert!(out.contains("Tag, build, publish."));
    }

    #[test]
    fn omits_empty_optional_fields() {
        let card = Card::new("c2".into(), "col".into(), "Plain".into());
        let out = render_to_string(80, 24, |f, area| render_card_detail(f, area, &card, "Todo"));
        assert!(!out.contains("Labels:"));
        assert!(!out.contains("Ref:"));
    }
}
