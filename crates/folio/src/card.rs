//! The profile card drawn over the background.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
};

use crate::typewriter::Typed;
use folio_config::Profile;

/// Blank cells between the card border and its text.
const PADDING: u16 = 2;

/// Card text, top to bottom.
pub fn card_lines(profile: &Profile, title: Typed<'_>, color: Color) -> Vec<Line<'static>> {
    let cursor = if title.cursor { "|" } else { " " };
    let mut lines = vec![
        Line::from(Span::styled(profile.name.clone(), Style::new().fg(color).bold())),
        Line::default(),
        Line::from(vec![
            Span::styled(title.text.to_string(), Style::new().fg(color)),
            Span::styled(cursor, Style::new().fg(color)),
        ]),
        Line::default(),
        Line::from(Span::raw(profile.tagline.clone()).dark_gray()),
    ];
    if !profile.links.is_empty() {
        lines.push(Line::default());
        for link in &profile.links {
            lines.push(Line::from(vec![
                Span::styled(format!("{} ", link.label), Style::new().fg(color).bold()),
                Span::raw(link.url.clone()).dark_gray(),
            ]));
        }
    }
    lines
}

/// Size of the card holding `lines`, borders included, capped to `area`.
pub fn card_size(lines: &[Line<'_>], area: Rect) -> (u16, u16) {
    let widest = lines.iter().map(Line::width).max().unwrap_or(0);
    let width = u16::try_from(widest).unwrap_or(u16::MAX).saturating_add(2 * PADDING + 2);
    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(4);
    (width.min(area.width), height.min(area.height))
}

/// Draw the card centred in `area`.
pub fn render(frame: &mut Frame, area: Rect, profile: &Profile, title: Typed<'_>, color: Color) {
    let lines = card_lines(profile, title, color);
    let (width, height) = card_size(&lines, area);

    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [card] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);

    let block = Block::bordered()
        .border_style(Style::new().fg(color))
        .padding(ratatui::widgets::Padding::new(PADDING, PADDING, 1, 1));
    frame.render_widget(Clear, card);
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        card,
    );
}
